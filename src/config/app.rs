//! Application configuration.
//!
//! Loaded from a TOML file with `confy`; every field has a default so a missing file or a
//! partial file is fine. [`AppConfig::validate`] runs before any card is built.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::foundation::error::{CardgenError, CardgenResult};
use crate::foundation::units::{Dpi, PageSize};
use crate::model::card::CardKind;
use crate::model::theme::ThemeOverrides;

/// Config file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "cardgen.toml";

const PLACEHOLDERS: &[&str] = &["artist", "album", "year", "date"];
const UNSAFE_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Music server credentials. Album lookup is done by an external collaborator; the engine
/// only carries these through.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct NavidromeConfig {
    /// Server base URL.
    pub url: Option<String>,
    /// Login name.
    pub username: Option<String>,
    /// Password, kept in the config file as plain text.
    pub password: Option<String>,
}

/// Output naming.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Template name to filename pattern.
    pub templates: BTreeMap<String, String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        let templates = [
            ("default", "{artist} - {album}.json"),
            ("dated", "{artist} - {album} ({year}).json"),
            ("simple", "{album}.json"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Self { templates }
    }
}

/// Run-wide settings read from `cardgen.toml`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Output resolution, validated to [300, 1200].
    pub dpi: u32,
    /// Single-album card layout.
    pub card_type: CardKind,
    /// Paper the cards are composed onto.
    pub page_size: PageSize,
    /// Draw crop marks around each card on composed pages.
    pub crop_marks: bool,
    /// Music server section.
    pub navidrome: NavidromeConfig,
    /// Output file naming.
    pub output: OutputConfig,
    /// Global theme layer between the built-in defaults and per-card overrides.
    pub theme: ThemeOverrides,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dpi: Dpi::default().get(),
            card_type: CardKind::FivePanel,
            page_size: PageSize::Letter,
            crop_marks: true,
            navidrome: NavidromeConfig::default(),
            output: OutputConfig::default(),
            theme: ThemeOverrides::default(),
        }
    }
}

impl AppConfig {
    /// Load `path`, or `./cardgen.toml` when `path` is `None`.
    ///
    /// A missing default file yields the built-in defaults; a missing explicit file is an
    /// error. Nothing is written to disk.
    pub fn load(path: Option<&Path>) -> CardgenResult<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        if !path.exists() {
            if explicit {
                return Err(CardgenError::config(format!(
                    "config file '{}' does not exist",
                    path.display()
                )));
            }
            tracing::debug!(path = %path.display(), "no config file; using defaults");
            return Ok(Self::default());
        }
        let cfg: Self = confy::load_path(&path).map_err(|e| {
            CardgenError::config(format!("load config '{}': {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(cfg)
    }

    /// Check every value a run depends on.
    pub fn validate(&self) -> CardgenResult<()> {
        self.dpi()?;
        if self.card_type == CardKind::DoubleFivePanel {
            return Err(CardgenError::config(
                "card_type 'double_jcard_5panel' is chosen by passing two albums, not in config",
            ));
        }
        for (name, template) in &self.output.templates {
            check_template(template)
                .map_err(|e| CardgenError::config(format!("output template '{name}': {e}")))?;
        }
        Ok(())
    }

    /// Validated [`Dpi`].
    pub fn dpi(&self) -> CardgenResult<Dpi> {
        Dpi::new(self.dpi)
    }

    /// Named output template.
    pub fn template(&self, name: &str) -> CardgenResult<&str> {
        self.output
            .templates
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| CardgenError::config(format!("unknown output template '{name}'")))
    }
}

/// Expand `{name}` placeholders through `value`, rejecting unknown names.
fn expand(template: &str, value: impl Fn(&str) -> String) -> Result<String, String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            return Err(format!("unclosed '{{' in '{template}'"));
        };
        let name = &after[..close];
        if !PLACEHOLDERS.contains(&name) {
            return Err(format!("unknown placeholder '{{{name}}}'"));
        }
        out.push_str(&value(name));
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

fn check_template(template: &str) -> Result<(), String> {
    expand(template, |_| String::new()).map(|_| ())
}

fn sanitize(value: &str) -> String {
    let replaced: String = value
        .chars()
        .map(|c| if UNSAFE_FILENAME_CHARS.contains(&c) { '_' } else { c })
        .collect();
    replaced.trim_matches(|c| c == '.' || c == ' ').to_string()
}

/// Fill `template` with sanitized album fields.
///
/// `{date}` is an alias of `{year}`; a missing year renders as "Unknown".
pub fn format_output_name(
    template: &str,
    artist: &str,
    album: &str,
    year: Option<i32>,
) -> CardgenResult<String> {
    let year = year.map_or_else(|| "Unknown".to_string(), |y| y.to_string());
    expand(template, |name| match name {
        "artist" => sanitize(artist),
        "album" => sanitize(album),
        _ => year.clone(),
    })
    .map_err(CardgenError::config)
}

#[cfg(test)]
#[path = "../../tests/unit/config/app.rs"]
mod tests;
