use std::{borrow::Cow, collections::HashMap, sync::Mutex};

use crate::foundation::error::{CardgenError, CardgenResult};
use crate::theme::fonts::FontAsset;

/// Reference to a font family at a given weight.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FontRef {
    /// Family name (built-in name or fetched Google font family).
    pub family: String,
    /// CSS-style weight in `[100, 900]`.
    pub weight: u16,
    /// Whether every glyph has the same advance.
    pub monospace: bool,
}

impl FontRef {
    /// Proportional font reference.
    pub fn new(family: impl Into<String>, weight: u16) -> Self {
        Self {
            family: family.into(),
            weight,
            monospace: false,
        }
    }

    /// Monospace font reference.
    pub fn mono(family: impl Into<String>, weight: u16) -> Self {
        Self {
            family: family.into(),
            weight,
            monospace: true,
        }
    }
}

/// Font measurement used by the text fitting engine.
///
/// `spacing` is an extra advance in points inserted between adjacent characters; it may be
/// negative. Implementations must be deterministic for identical inputs.
pub trait FontMetrics: Send + Sync {
    /// Advance width of `text` in points.
    fn width(&self, text: &str, font: &FontRef, size: f64, spacing: f64) -> f64;

    /// Make fetched font bytes available for measurement. The default ignores them.
    fn register_font(&self, _asset: &FontAsset) -> CardgenResult<()> {
        Ok(())
    }
}

/// Table-driven approximation of proportional sans-serif advances.
///
/// Needs no font files, which keeps plans reproducible on any machine.
#[derive(Clone, Copy, Debug, Default)]
pub struct ApproxMetrics;

impl ApproxMetrics {
    const MONO_ADVANCE: f64 = 0.6;

    fn advance_em(c: char, monospace: bool) -> f64 {
        if monospace {
            return Self::MONO_ADVANCE;
        }
        match c {
            ' ' => 0.28,
            'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '!' | '|' => 0.25,
            'm' | 'w' | 'M' | 'W' => 0.85,
            'A'..='Z' => 0.68,
            '0'..='9' => 0.56,
            _ => 0.52,
        }
    }

    fn weight_factor(weight: u16) -> f64 {
        1.0 + f64::from(weight.saturating_sub(400)) / 5000.0
    }
}

impl FontMetrics for ApproxMetrics {
    fn width(&self, text: &str, font: &FontRef, size: f64, spacing: f64) -> f64 {
        let mut n = 0usize;
        let mut em = 0.0;
        for c in text.chars() {
            em += Self::advance_em(c, font.monospace);
            n += 1;
        }
        if n == 0 {
            return 0.0;
        }
        em * size * Self::weight_factor(font.weight) + spacing * ((n - 1) as f64)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct MeasureBrush;

struct ParleyState {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<MeasureBrush>,
    families: HashMap<(String, u16), String>,
}

/// Shaping-based measurement through Parley for fonts registered from fetched bytes.
///
/// Fonts that were never registered are measured with [`ApproxMetrics`].
pub struct ParleyMetrics {
    state: Mutex<ParleyState>,
    fallback: ApproxMetrics,
}

impl Default for ParleyMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ParleyMetrics {
    /// Construct with empty Parley contexts.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ParleyState {
                font_ctx: parley::FontContext::default(),
                layout_ctx: parley::LayoutContext::new(),
                families: HashMap::new(),
            }),
            fallback: ApproxMetrics,
        }
    }

    /// Register raw font bytes for `family`/`weight`.
    pub fn register_bytes(&self, family: &str, weight: u16, bytes: &[u8]) -> CardgenResult<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| CardgenError::config("font measurement state poisoned"))?;
        if state.families.contains_key(&(family.to_string(), weight)) {
            return Ok(());
        }
        let families = state
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            CardgenError::config(format!("no font families registered for '{family}'"))
        })?;
        let resolved = state
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CardgenError::config("registered font family has no name"))?
            .to_string();
        tracing::debug!(family, weight, resolved = %resolved, "registered font for measurement");
        state.families.insert((family.to_string(), weight), resolved);
        Ok(())
    }

    fn measure(&self, text: &str, font: &FontRef, size: f64, spacing: f64) -> Option<f64> {
        let mut guard = self.state.lock().ok()?;
        let state = &mut *guard;
        let name = state
            .families
            .get(&(font.family.clone(), font.weight))?
            .clone();

        let mut builder = state
            .layout_ctx
            .ranged_builder(&mut state.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(font.weight)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size as f32));
        builder.push_default(parley::style::StyleProperty::LetterSpacing(spacing as f32));

        let mut layout: parley::Layout<MeasureBrush> = builder.build(text);
        layout.break_all_lines(None);

        let mut w = 0.0f64;
        for line in layout.lines() {
            w = w.max(f64::from(line.metrics().advance));
        }
        // Parley spaces after every cluster, including the last one.
        Some(w - spacing)
    }
}

impl FontMetrics for ParleyMetrics {
    fn width(&self, text: &str, font: &FontRef, size: f64, spacing: f64) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        self.measure(text, font, size, spacing)
            .unwrap_or_else(|| self.fallback.width(text, font, size, spacing))
    }

    fn register_font(&self, asset: &FontAsset) -> CardgenResult<()> {
        self.register_bytes(&asset.key.family, asset.key.weight, &asset.bytes)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/metrics.rs"]
mod tests;
