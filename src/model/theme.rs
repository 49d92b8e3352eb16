//! Style overrides expressed as explicit "inherit or value" settings.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::foundation::core::{Align, Rgb};
use crate::foundation::error::CardgenError;
use crate::text::fit::OverflowPolicy;

/// One overridable style field: either inherit from the layer below or set explicitly.
///
/// Serialized as the plain value, or the string `"inherit"`. A missing field deserializes to
/// [`Setting::Inherit`].
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Setting<T> {
    /// Use the value of the layer below.
    #[default]
    Inherit,
    /// Shadow lower layers with this value.
    Value(T),
}

impl<T: Clone> Setting<T> {
    /// `self` if explicit, otherwise `lower`.
    pub fn or(&self, lower: &Setting<T>) -> Setting<T> {
        match self {
            Self::Value(v) => Self::Value(v.clone()),
            Self::Inherit => lower.clone(),
        }
    }
}

impl<T> Setting<T> {
    /// Explicit value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Inherit => None,
        }
    }

    /// Whether the layer defers to the one below.
    pub fn is_inherit(&self) -> bool {
        matches!(self, Self::Inherit)
    }
}

impl<T> From<T> for Setting<T> {
    fn from(v: T) -> Self {
        Self::Value(v)
    }
}

const INHERIT: &str = "inherit";

impl<T: Serialize> Serialize for Setting<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Inherit => serializer.serialize_str(INHERIT),
            Self::Value(v) => v.serialize(serializer),
        }
    }
}

#[derive(Deserialize)]
enum InheritMarker {
    #[serde(rename = "inherit")]
    Inherit,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSetting<T> {
    Marker(InheritMarker),
    Value(T),
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Setting<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawSetting::<T>::deserialize(deserializer)? {
            RawSetting::Marker(InheritMarker::Inherit) => Self::Inherit,
            RawSetting::Value(v) => Self::Value(v),
        })
    }
}

/// How the front-panel artwork is placed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverArtMode {
    /// Centered square with text below.
    #[default]
    Square,
    /// Full panel width, cropped horizontally by alignment.
    Fullscale,
}

impl std::str::FromStr for CoverArtMode {
    type Err = CardgenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "square" => Ok(Self::Square),
            "fullscale" => Ok(Self::Fullscale),
            other => Err(CardgenError::config(format!(
                "unknown cover art mode '{other}' (expected square or fullscale)"
            ))),
        }
    }
}

/// One layer of style overrides (built-in, global config or per card).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeOverrides {
    /// Body text family.
    pub font_family: Setting<String>,
    /// Family for headings and bold text.
    pub bold_font_family: Setting<String>,
    /// Family for track numbers.
    pub monospace_family: Setting<String>,
    /// Google font family for the album title.
    pub title_google_font: Setting<String>,
    /// Title weight in `[100, 900]`.
    pub title_font_weight: Setting<u16>,
    /// Google font family for the artist name.
    pub artist_google_font: Setting<String>,
    /// Artist weight in `[100, 900]`.
    pub artist_font_weight: Setting<u16>,
    /// Preferred title size in points.
    pub title_font_size: Setting<f64>,
    /// Preferred artist size in points.
    pub artist_font_size: Setting<f64>,
    /// Preferred tracklist size in points.
    pub track_font_size: Setting<f64>,
    /// Preferred back and genre panel size in points.
    pub metadata_font_size: Setting<f64>,
    /// Preferred spine text size in points.
    pub spine_font_size: Setting<f64>,
    /// Floor size for every shrinking text field.
    pub min_font_size: Setting<f64>,
    /// Solid panel background.
    pub background_color: Setting<Rgb>,
    /// Default text color.
    pub text_color: Setting<Rgb>,
    /// Side headers and other highlights.
    pub accent_color: Setting<Rgb>,
    /// Replace the solid background with a gradient taken from the cover art.
    pub use_gradient: Setting<bool>,
    /// Palette entries used as gradient start and end.
    pub gradient_indices: Setting<(usize, usize)>,
    /// Number of colors extracted from the cover art.
    pub palette_size: Setting<usize>,
    /// How the front panel places its art.
    pub cover_art_mode: Setting<CoverArtMode>,
    /// Horizontal alignment of square art.
    pub cover_art_align: Setting<Align>,
    /// Tape length in minutes (both sides).
    pub tape_length: Setting<u32>,
    /// Place the Dolby NR logo on the spine.
    pub dolby_logo: Setting<bool>,
    /// Show the cover art thumbnail on the spine.
    pub spine_art: Setting<bool>,
    /// Whether long track titles wrap or truncate.
    pub track_title_overflow: Setting<OverflowPolicy>,
    /// Tightest character spacing track titles may be compressed to, in points.
    pub min_track_title_char_spacing: Setting<f64>,
    /// Panel padding in inches.
    pub padding: Setting<f64>,
}

macro_rules! merge_fields {
    ($lower:ident, $upper:ident; $($field:ident),+ $(,)?) => {
        ThemeOverrides {
            $($field: $upper.$field.or(&$lower.$field),)+
        }
    };
}

impl ThemeOverrides {
    /// Hardcoded defaults: the bottom layer of every resolution.
    pub fn builtin() -> Self {
        Self {
            font_family: "Helvetica".to_string().into(),
            bold_font_family: "Helvetica-Bold".to_string().into(),
            monospace_family: "Courier".to_string().into(),
            title_google_font: Setting::Inherit,
            title_font_weight: 700.into(),
            artist_google_font: Setting::Inherit,
            artist_font_weight: 400.into(),
            title_font_size: 14.0.into(),
            artist_font_size: 12.0.into(),
            track_font_size: 10.0.into(),
            metadata_font_size: 9.0.into(),
            spine_font_size: 11.0.into(),
            min_font_size: 5.0.into(),
            background_color: Rgb::WHITE.into(),
            text_color: Rgb::BLACK.into(),
            accent_color: Rgb::new(0.2, 0.2, 0.2).into(),
            use_gradient: false.into(),
            gradient_indices: (0, 1).into(),
            palette_size: 3.into(),
            cover_art_mode: CoverArtMode::Square.into(),
            cover_art_align: Align::Center.into(),
            tape_length: 90.into(),
            dolby_logo: false.into(),
            spine_art: true.into(),
            track_title_overflow: OverflowPolicy::Truncate.into(),
            min_track_title_char_spacing: (-1.0).into(),
            padding: 0.125.into(),
        }
    }

    /// Field-wise merge: explicit values in `upper` shadow `lower`.
    pub fn merge(lower: &Self, upper: &Self) -> Self {
        merge_fields!(lower, upper;
            font_family,
            bold_font_family,
            monospace_family,
            title_google_font,
            title_font_weight,
            artist_google_font,
            artist_font_weight,
            title_font_size,
            artist_font_size,
            track_font_size,
            metadata_font_size,
            spine_font_size,
            min_font_size,
            background_color,
            text_color,
            accent_color,
            use_gradient,
            gradient_indices,
            palette_size,
            cover_art_mode,
            cover_art_align,
            tape_length,
            dolby_logo,
            spine_art,
            track_title_overflow,
            min_track_title_char_spacing,
            padding,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/theme.rs"]
mod tests;
