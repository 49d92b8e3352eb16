/// Convenience result type used across cardgen.
pub type CardgenResult<T> = Result<T, CardgenError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Only fatal conditions live here. Missing fonts, missing artwork and palette problems are
/// absorbed where they occur and reported as [`AssetFallbackWarning`] values instead.
#[derive(thiserror::Error, Debug)]
pub enum CardgenError {
    /// Invalid DPI, card type, page size, theme value or config schema.
    #[error("config error: {0}")]
    Config(String),

    /// A computed panel cannot hold its required minimum content.
    #[error("render error in panel '{panel}': {message}")]
    Render {
        /// Name of the offending panel (for example `inside` or `spine`).
        panel: String,
        /// Human-readable description of what did not fit.
        message: String,
    },

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CardgenError {
    /// Build a [`CardgenError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`CardgenError::Render`] value for `panel`.
    pub fn render(panel: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Render {
            panel: panel.into(),
            message: msg.into(),
        }
    }

    /// Build a [`CardgenError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

/// Which optional asset path degraded to a documented fallback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackKind {
    /// A font could not be fetched; a built-in family was substituted.
    Font,
    /// Artwork was missing or could not be decoded.
    Artwork,
    /// Palette extraction or gradient selection fell back.
    Palette,
}

/// Non-fatal warning recorded when an optional asset path falls back.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AssetFallbackWarning {
    /// Category of the fallback.
    pub kind: FallbackKind,
    /// Description suitable for a single warning line.
    pub message: String,
}

impl AssetFallbackWarning {
    /// Create a warning and emit it through `tracing`.
    pub fn emit(kind: FallbackKind, message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::warn!(?kind, "{message}");
        Self { kind, message }
    }
}

impl std::fmt::Display for AssetFallbackWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.kind {
            FallbackKind::Font => "font",
            FallbackKind::Artwork => "artwork",
            FallbackKind::Palette => "palette",
        };
        write!(f, "{kind} fallback: {}", self.message)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
