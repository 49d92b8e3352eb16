use crate::foundation::core::Rgb;
use crate::foundation::error::{AssetFallbackWarning, FallbackKind};
use crate::foundation::math::{hsv_to_rgb, rgb_to_hsv};

/// Two palette entries closer than this are treated as the same color.
pub const MIN_GRADIENT_DISTANCE: f64 = 0.2;
const SHADE_DELTA: f64 = 0.2;

/// Gradient endpoints chosen from a palette.
#[derive(Clone, Debug, PartialEq)]
pub struct GradientPick {
    /// Start (top) and end (bottom) colors.
    pub colors: [Rgb; 2],
    /// Fallbacks taken while picking.
    pub warnings: Vec<AssetFallbackWarning>,
}

/// Pick the gradient endpoints `indices` from `palette`.
///
/// Returns `None` for an empty palette. Out-of-range indices fall back to `(0, 1)` with a
/// warning, except on a single-color palette where the shades are used silently. A palette
/// without two distinct colors yields a darker and a lighter shade of its dominant color, so a
/// non-empty palette always produces exactly two colors.
pub fn gradient_colors(palette: &[Rgb], indices: (usize, usize)) -> Option<GradientPick> {
    let first = *palette.first()?;
    let mut warnings = Vec::new();

    let (i, j) = if palette.len() < 2 || (indices.0 < palette.len() && indices.1 < palette.len())
    {
        indices
    } else {
        warnings.push(AssetFallbackWarning::emit(
            FallbackKind::Palette,
            format!(
                "gradient indices ({}, {}) out of range for a {}-color palette; using (0, 1)",
                indices.0,
                indices.1,
                palette.len()
            ),
        ));
        (0, 1)
    };

    let colors = match (palette.get(i), palette.get(j)) {
        (Some(&a), Some(&b)) if a.distance(b) >= MIN_GRADIENT_DISTANCE => [a, b],
        _ => shades(first),
    };
    Some(GradientPick { colors, warnings })
}

/// Darker and lighter variants of `color` in HSV value.
pub fn shades(color: Rgb) -> [Rgb; 2] {
    let (h, s, v) = rgb_to_hsv(color);
    [
        hsv_to_rgb(h, s, (v - SHADE_DELTA).max(0.0)),
        hsv_to_rgb(h, s, (v + SHADE_DELTA).min(1.0)),
    ]
}
