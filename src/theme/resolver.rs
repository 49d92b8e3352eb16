use std::sync::Arc;

use crate::foundation::core::{Align, Rgb};
use crate::foundation::error::{AssetFallbackWarning, CardgenError, CardgenResult, FallbackKind};
use crate::foundation::units::to_points;
use crate::model::theme::{CoverArtMode, Setting, ThemeOverrides};
use crate::text::fit::OverflowPolicy;
use crate::text::metrics::FontRef;
use crate::theme::fonts::{FontAsset, FontCache, FontKey};

/// Fonts used by the different text roles of a card.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ResolvedFonts {
    /// Body text at 400.
    pub body: FontRef,
    /// Headings at 700.
    pub bold: FontRef,
    /// Track numbers.
    pub mono: FontRef,
    /// Album title, possibly a fetched family.
    pub title: FontRef,
    /// Artist name, possibly a fetched family.
    pub artist: FontRef,
}

/// Point sizes per text role.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FontSizes {
    /// Front panel title.
    pub title: f64,
    /// Front panel artist.
    pub artist: f64,
    /// Tracklist rows.
    pub track: f64,
    /// Back and genre panels.
    pub metadata: f64,
    /// Spine text.
    pub spine: f64,
    /// Floor every shrinking field stops at.
    pub min: f64,
}

/// Immutable, fully concrete theme snapshot for one card.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ResolvedTheme {
    /// Fonts per role.
    pub fonts: ResolvedFonts,
    /// Preferred sizes per role.
    pub sizes: FontSizes,
    /// Solid background color.
    pub background_color: Rgb,
    /// Default text color.
    pub text_color: Rgb,
    /// Highlight color.
    pub accent_color: Rgb,
    /// Gradient backgrounds from cover art.
    pub use_gradient: bool,
    /// Palette entries for the gradient, each below `palette_size`.
    pub gradient_indices: (usize, usize),
    /// Colors extracted per cover, at least 2.
    pub palette_size: usize,
    /// Front panel art placement.
    pub cover_art_mode: CoverArtMode,
    /// Alignment of square front art.
    pub cover_art_align: Align,
    /// Tape length in minutes, both sides together.
    pub tape_length_min: u32,
    /// Dolby logo on the spine.
    pub dolby_logo: bool,
    /// Cover thumbnails on the spine.
    pub spine_art: bool,
    /// Track title overflow handling.
    pub track_title_overflow: OverflowPolicy,
    /// Tightest spacing for track titles, in points.
    pub min_track_title_char_spacing: f64,
    /// Panel padding in points.
    pub padding_pt: f64,
    /// Fonts fetched for this theme; registered with the metrics before fitting.
    #[serde(skip)]
    pub font_assets: Vec<Arc<FontAsset>>,
    /// Fallbacks taken while resolving.
    pub warnings: Vec<AssetFallbackWarning>,
}

impl ResolvedTheme {
    /// Tape capacity per side in seconds.
    pub fn side_capacity_secs(&self) -> u64 {
        u64::from(self.tape_length_min) * 60 / 2
    }
}

fn required<T: Clone>(s: &Setting<T>, field: &str) -> CardgenResult<T> {
    s.value()
        .cloned()
        .ok_or_else(|| CardgenError::config(format!("theme field '{field}' has no value")))
}

fn check_weight(weight: u16, field: &str) -> CardgenResult<u16> {
    if !(100..=900).contains(&weight) {
        return Err(CardgenError::config(format!(
            "{field} must be within [100, 900], got {weight}"
        )));
    }
    Ok(weight)
}

fn check_size(size: f64, field: &str) -> CardgenResult<f64> {
    if !size.is_finite() || size <= 0.0 {
        return Err(CardgenError::config(format!(
            "{field} must be finite and > 0, got {size}"
        )));
    }
    Ok(size)
}

/// Merges override layers and resolves fonts through an injected [`FontCache`].
#[derive(Clone, Debug)]
pub struct ThemeResolver {
    global: ThemeOverrides,
    fonts: Arc<FontCache>,
}

impl ThemeResolver {
    /// Resolver with a global override layer sitting above the built-in defaults.
    pub fn new(global: ThemeOverrides, fonts: Arc<FontCache>) -> Self {
        Self { global, fonts }
    }

    /// Shared font cache.
    pub fn font_cache(&self) -> &Arc<FontCache> {
        &self.fonts
    }

    /// Global override layer.
    pub fn global(&self) -> &ThemeOverrides {
        &self.global
    }

    /// Validate the merged layers without fetching fonts.
    pub fn validate(&self, card: &ThemeOverrides) -> CardgenResult<()> {
        let merged = self.merged(card);
        Self::concrete(&merged).map(|_| ())
    }

    fn merged(&self, card: &ThemeOverrides) -> ThemeOverrides {
        let base = ThemeOverrides::merge(&ThemeOverrides::builtin(), &self.global);
        ThemeOverrides::merge(&base, card)
    }

    /// Resolve built-in < global < `card` into a snapshot.
    ///
    /// Font fetch failures never fail resolution; they substitute the built-in family and add a
    /// warning. Invalid values are config errors.
    #[tracing::instrument(skip(self, card))]
    pub fn resolve(&self, card: &ThemeOverrides) -> CardgenResult<ResolvedTheme> {
        let merged = self.merged(card);
        let mut theme = Self::concrete(&merged)?;

        let title_weight = theme.fonts.title.weight;
        if let Some(family) = merged.title_google_font.value() {
            match self.fetch(family, title_weight) {
                Ok(asset) => {
                    theme.fonts.title = FontRef::new(family.clone(), title_weight);
                    theme.font_assets.push(asset);
                }
                Err(err) => theme.warnings.push(AssetFallbackWarning::emit(
                    FallbackKind::Font,
                    format!(
                        "title font '{family}' ({title_weight}) unavailable, using '{}': {err}",
                        theme.fonts.title.family
                    ),
                )),
            }
        }

        let artist_weight = theme.fonts.artist.weight;
        if let Some(family) = merged.artist_google_font.value() {
            match self.fetch(family, artist_weight) {
                Ok(asset) => {
                    theme.fonts.artist = FontRef::new(family.clone(), artist_weight);
                    theme.font_assets.push(asset);
                }
                Err(err) => theme.warnings.push(AssetFallbackWarning::emit(
                    FallbackKind::Font,
                    format!(
                        "artist font '{family}' ({artist_weight}) unavailable, using '{}': {err}",
                        theme.fonts.artist.family
                    ),
                )),
            }
        }

        Ok(theme)
    }

    fn fetch(&self, family: &str, weight: u16) -> Result<Arc<FontAsset>, String> {
        self.fonts.get(&FontKey::new(family, weight))
    }

    fn concrete(m: &ThemeOverrides) -> CardgenResult<ResolvedTheme> {
        let title_weight = check_weight(
            required(&m.title_font_weight, "title_font_weight")?,
            "title_font_weight",
        )?;
        let artist_weight = check_weight(
            required(&m.artist_font_weight, "artist_font_weight")?,
            "artist_font_weight",
        )?;

        let body_family = required(&m.font_family, "font_family")?;
        let bold_family = required(&m.bold_font_family, "bold_font_family")?;
        let mono_family = required(&m.monospace_family, "monospace_family")?;

        let size = |s: &Setting<f64>, field: &str| check_size(required(s, field)?, field);
        let sizes = FontSizes {
            title: size(&m.title_font_size, "title_font_size")?,
            artist: size(&m.artist_font_size, "artist_font_size")?,
            track: size(&m.track_font_size, "track_font_size")?,
            metadata: size(&m.metadata_font_size, "metadata_font_size")?,
            spine: size(&m.spine_font_size, "spine_font_size")?,
            min: size(&m.min_font_size, "min_font_size")?,
        };

        let background_color = required(&m.background_color, "background_color")?;
        background_color.validate("background_color")?;
        let text_color = required(&m.text_color, "text_color")?;
        text_color.validate("text_color")?;
        let accent_color = required(&m.accent_color, "accent_color")?;
        accent_color.validate("accent_color")?;

        let palette_size = required(&m.palette_size, "palette_size")?;
        if palette_size < 2 {
            return Err(CardgenError::config(format!(
                "palette_size must be >= 2, got {palette_size}"
            )));
        }
        let gradient_indices = required(&m.gradient_indices, "gradient_indices")?;
        if gradient_indices.0 >= palette_size || gradient_indices.1 >= palette_size {
            return Err(CardgenError::config(format!(
                "gradient_indices ({}, {}) must be < palette_size {palette_size}",
                gradient_indices.0, gradient_indices.1
            )));
        }

        let tape_length_min = required(&m.tape_length, "tape_length")?;
        if tape_length_min == 0 {
            return Err(CardgenError::config("tape_length must be > 0"));
        }

        let padding_in = required(&m.padding, "padding")?;
        if !padding_in.is_finite() || padding_in < 0.0 {
            return Err(CardgenError::config(format!(
                "padding must be finite and >= 0, got {padding_in}"
            )));
        }

        let min_spacing = required(
            &m.min_track_title_char_spacing,
            "min_track_title_char_spacing",
        )?;
        if !min_spacing.is_finite() {
            return Err(CardgenError::config(
                "min_track_title_char_spacing must be finite",
            ));
        }

        Ok(ResolvedTheme {
            fonts: ResolvedFonts {
                body: FontRef::new(body_family.clone(), 400),
                bold: FontRef::new(bold_family.clone(), 700),
                mono: FontRef::mono(mono_family, 400),
                title: FontRef::new(bold_family, title_weight),
                artist: FontRef::new(body_family, artist_weight),
            },
            sizes,
            background_color,
            text_color,
            accent_color,
            use_gradient: required(&m.use_gradient, "use_gradient")?,
            gradient_indices,
            palette_size,
            cover_art_mode: required(&m.cover_art_mode, "cover_art_mode")?,
            cover_art_align: required(&m.cover_art_align, "cover_art_align")?,
            tape_length_min,
            dolby_logo: required(&m.dolby_logo, "dolby_logo")?,
            spine_art: required(&m.spine_art, "spine_art")?,
            track_title_overflow: required(&m.track_title_overflow, "track_title_overflow")?,
            min_track_title_char_spacing: min_spacing,
            padding_pt: to_points(padding_in),
            font_assets: Vec::new(),
            warnings: Vec::new(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/theme/resolver.rs"]
mod tests;
