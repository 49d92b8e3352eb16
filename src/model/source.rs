use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::foundation::error::{AssetFallbackWarning, CardgenError, CardgenResult, FallbackKind};
use crate::model::album::{Album, AlbumArt};

/// Track entry of an album manifest.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceTrack {
    /// Track title.
    pub title: String,
    /// Length in seconds.
    pub duration: u32,
}

/// JSON album manifest: the local stand-in for a music-server album record.
///
/// ```json
/// { "artist": "Low", "title": "Trust", "year": 2002, "cover_art": "trust.png",
///   "tracks": [{ "title": "(That's How You Sing) Amazing Grace", "duration": 318 }] }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlbumSource {
    /// Artist name.
    pub artist: String,
    /// Album title.
    pub title: String,
    /// Release year.
    #[serde(default)]
    pub year: Option<i32>,
    /// Genres, primary first.
    #[serde(default)]
    pub genres: Vec<String>,
    /// Record label.
    #[serde(default)]
    pub label: Option<String>,
    /// Descriptive tags.
    #[serde(default)]
    pub descriptors: Vec<String>,
    /// Artwork file; relative paths resolve against the manifest's directory.
    #[serde(default)]
    pub cover_art: Option<PathBuf>,
    /// Tracks in album order.
    #[serde(default)]
    pub tracks: Vec<SourceTrack>,
}

impl AlbumSource {
    /// Parse a manifest from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> CardgenResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| CardgenError::serde(format!("parse album manifest JSON: {e}")))
    }

    /// Parse a manifest from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> CardgenResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            CardgenError::config(format!("open album manifest '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Build the album, reading artwork relative to `base_dir`.
    ///
    /// An unreadable artwork file leaves the album without art and yields a warning.
    pub fn into_album(self, base_dir: &Path) -> (Album, Vec<AssetFallbackWarning>) {
        let mut warnings = Vec::new();
        let mut builder = Album::builder(self.artist, self.title);
        if let Some(year) = self.year {
            builder = builder.year(year);
        }
        if let Some(label) = self.label {
            builder = builder.label(label);
        }
        for genre in self.genres {
            builder = builder.genre(genre);
        }
        for descriptor in self.descriptors {
            builder = builder.descriptor(descriptor);
        }
        for track in self.tracks {
            builder = builder.track(track.title, track.duration);
        }
        if let Some(rel) = self.cover_art {
            let path = base_dir.join(rel);
            match std::fs::read(&path) {
                Ok(bytes) => builder = builder.art(Arc::new(AlbumArt::from_bytes(bytes))),
                Err(e) => warnings.push(AssetFallbackWarning::emit(
                    FallbackKind::Artwork,
                    format!("read cover art '{}': {e}", path.display()),
                )),
            }
        }
        (builder.build(), warnings)
    }

    /// Read a manifest file and build its album.
    #[tracing::instrument]
    pub fn load(path: &Path) -> CardgenResult<(Album, Vec<AssetFallbackWarning>)> {
        let source = Self::from_path(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(source.into_album(base_dir))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/source.rs"]
mod tests;
