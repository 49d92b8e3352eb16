use crate::foundation::error::{CardgenError, CardgenResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// RGB color with components in `[0, 1]`, serialized as `[r, g, b]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Rgb {
    /// Red.
    pub r: f64,
    /// Green.
    pub g: f64,
    /// Blue.
    pub b: f64,
}

impl Rgb {
    /// `[1, 1, 1]`.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    /// `[0, 0, 0]`.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    /// Color from unit components. Not validated; see [`Rgb::validate`].
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Color from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
        )
    }

    /// Fails unless every component is finite and within `[0, 1]`.
    pub fn validate(self, field: &str) -> CardgenResult<()> {
        for c in [self.r, self.g, self.b] {
            if !c.is_finite() || !(0.0..=1.0).contains(&c) {
                return Err(CardgenError::config(format!(
                    "{field} components must be within [0, 1], got [{}, {}, {}]",
                    self.r, self.g, self.b
                )));
            }
        }
        Ok(())
    }

    /// Euclidean distance in RGB space.
    pub fn distance(self, other: Self) -> f64 {
        let dr = self.r - other.r;
        let dg = self.g - other.g;
        let db = self.b - other.b;
        (dr * dr + dg * dg + db * db).sqrt()
    }
}

impl From<[f64; 3]> for Rgb {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Rgb> for [f64; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

/// Horizontal alignment of text and artwork.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    /// Flush left.
    Left,
    /// Centered.
    #[default]
    Center,
    /// Flush right.
    Right,
}

impl std::str::FromStr for Align {
    type Err = CardgenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            other => Err(CardgenError::config(format!(
                "unknown alignment '{other}' (expected left, center or right)"
            ))),
        }
    }
}

/// Panel content rotation. Positive angles turn the content frame clockwise on the page, so
/// `Plus90` text reads bottom to top.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    /// Upright.
    #[default]
    None,
    /// Quarter turn clockwise.
    Plus90,
    /// Quarter turn counter-clockwise.
    Minus90,
}

impl Rotation {
    /// Signed angle in degrees.
    pub fn degrees(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Plus90 => 90,
            Self::Minus90 => -90,
        }
    }

    /// Whether width and height swap.
    pub fn is_quarter_turn(self) -> bool {
        !matches!(self, Self::None)
    }
}
