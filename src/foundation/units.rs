//! Physical units: inches, PDF points (72 per inch) and device pixels.

use crate::foundation::error::{CardgenError, CardgenResult};

/// PDF points per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Spine width in inches; identical for every card variant.
pub const SPINE_WIDTH_IN: f64 = 0.5;
/// Back (short flap) panel width in inches.
pub const BACK_PANEL_WIDTH_IN: f64 = 0.667;
/// Front, inside and genre panel width in inches.
pub const PANEL_WIDTH_IN: f64 = 2.5;
/// Card height in inches.
pub const CARD_HEIGHT_IN: f64 = 4.0;
/// Print bleed in inches.
pub const BLEED_IN: f64 = 0.125;
/// Safe margin in inches.
pub const SAFE_MARGIN_IN: f64 = 0.125;

/// Lowest accepted DPI.
pub const MIN_DPI: u32 = 300;
/// Highest accepted DPI.
pub const MAX_DPI: u32 = 1200;

/// Validated rasterization density.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Dpi(u32);

impl Dpi {
    /// Build a DPI value, failing with a config error outside `[300, 1200]`.
    pub fn new(dpi: u32) -> CardgenResult<Self> {
        if !(MIN_DPI..=MAX_DPI).contains(&dpi) {
            return Err(CardgenError::config(format!(
                "dpi must be within [{MIN_DPI}, {MAX_DPI}], got {dpi}"
            )));
        }
        Ok(Self(dpi))
    }

    /// Raw dots-per-inch value.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Convert points to pixels at this density.
    pub fn pixels(self, points: f64) -> f64 {
        points / POINTS_PER_INCH * f64::from(self.0)
    }
}

impl Default for Dpi {
    fn default() -> Self {
        Self(600)
    }
}

impl TryFrom<u32> for Dpi {
    type Error = CardgenError;

    fn try_from(v: u32) -> Result<Self, Self::Error> {
        Self::new(v)
    }
}

impl From<Dpi> for u32 {
    fn from(d: Dpi) -> Self {
        d.0
    }
}

/// Inches to PDF points.
pub fn to_points(inches: f64) -> f64 {
    inches * POINTS_PER_INCH
}

/// PDF points to inches.
pub fn points_to_inches(points: f64) -> f64 {
    points / POINTS_PER_INCH
}

/// Points to pixels at a raw DPI, validating the DPI first.
pub fn to_pixels(points: f64, dpi: u32) -> CardgenResult<f64> {
    Ok(Dpi::new(dpi)?.pixels(points))
}

/// Physical page formats cards are composed onto.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    /// US letter, 8.5 x 11 in.
    #[default]
    Letter,
    /// Half letter, 8.5 x 5.5 in.
    Half,
    /// ISO A4.
    A4,
    /// ISO A5.
    A5,
}

impl PageSize {
    /// Page dimensions in inches (width, height).
    pub fn inches(self) -> (f64, f64) {
        match self {
            Self::Letter => (8.5, 11.0),
            Self::Half => (8.5, 5.5),
            Self::A4 => (8.27, 11.69),
            Self::A5 => (5.83, 8.27),
        }
    }

    /// Page dimensions in points (width, height).
    pub fn points(self) -> (f64, f64) {
        let (w, h) = self.inches();
        (to_points(w), to_points(h))
    }

    /// Config name of this page size.
    pub fn name(self) -> &'static str {
        match self {
            Self::Letter => "letter",
            Self::Half => "half",
            Self::A4 => "a4",
            Self::A5 => "a5",
        }
    }
}

/// Page orientation chosen for a card size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Short edge horizontal.
    #[default]
    Portrait,
    /// Long edge horizontal.
    Landscape,
}

impl PageSize {
    /// Page dimensions in points for `orientation`.
    pub fn oriented_points(self, orientation: Orientation) -> (f64, f64) {
        let (w, h) = self.points();
        match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }

    /// Portrait if a `card_w` x `card_h` point card fits upright, otherwise landscape if it fits
    /// sideways; a config error when it fits neither way.
    pub fn orientation_for(self, card_w: f64, card_h: f64) -> CardgenResult<Orientation> {
        for orientation in [Orientation::Portrait, Orientation::Landscape] {
            let (pw, ph) = self.oriented_points(orientation);
            if card_w <= pw + 1e-6 && card_h <= ph + 1e-6 {
                return Ok(orientation);
            }
        }
        Err(CardgenError::config(format!(
            "a {:.3} x {:.3} in card does not fit on a {} page",
            points_to_inches(card_w),
            points_to_inches(card_h),
            self.name()
        )))
    }
}

impl std::str::FromStr for PageSize {
    type Err = CardgenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "letter" => Ok(Self::Letter),
            "half" => Ok(Self::Half),
            "a4" => Ok(Self::A4),
            "a5" => Ok(Self::A5),
            other => Err(CardgenError::config(format!(
                "unknown page size '{other}' (expected letter, half, a4 or a5)"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/units.rs"]
mod tests;
