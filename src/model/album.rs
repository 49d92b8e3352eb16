use std::{
    collections::HashMap,
    sync::{Arc, Mutex, OnceLock},
};

use image::RgbaImage;

use crate::foundation::core::Rgb;
use crate::foundation::math::Fnv1a64;
use crate::palette::extract::{decode_artwork, extract_palette};

/// One track; `number` is its 1-based position in the album.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Track {
    /// 1-based sequence position.
    pub number: u32,
    /// Track title.
    pub title: String,
    /// Duration in seconds.
    pub duration_secs: u32,
}

/// Stable content hash of artwork bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ArtId(pub(crate) u64);

impl ArtId {
    /// Access raw 64-bit identifier.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Encoded cover artwork with lazily decoded pixels and per-size palette cache.
pub struct AlbumArt {
    id: ArtId,
    bytes: Arc<Vec<u8>>,
    decoded: OnceLock<Option<Arc<RgbaImage>>>,
    palettes: Mutex<HashMap<usize, Vec<Rgb>>>,
}

impl std::fmt::Debug for AlbumArt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlbumArt")
            .field("id", &self.id)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

impl AlbumArt {
    /// Wrap encoded image bytes. Decoding is deferred until pixels are needed.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        let mut h = Fnv1a64::new_default();
        h.write_bytes(&bytes);
        Self {
            id: ArtId(h.finish()),
            bytes: Arc::new(bytes),
            decoded: OnceLock::new(),
            palettes: Mutex::new(HashMap::new()),
        }
    }

    /// Content hash of the encoded bytes.
    pub fn id(&self) -> ArtId {
        self.id
    }

    /// Encoded bytes as supplied.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decoded pixels, or `None` when the bytes are not a supported image.
    pub fn image(&self) -> Option<Arc<RgbaImage>> {
        self.decoded
            .get_or_init(|| match decode_artwork(&self.bytes) {
                Ok(img) => Some(Arc::new(img)),
                Err(err) => {
                    tracing::debug!(id = self.id.0, error = %err, "artwork decode failed");
                    None
                }
            })
            .clone()
    }

    /// Pixel dimensions of the decoded image.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.image().map(|img| img.dimensions())
    }

    /// Palette of up to `n` colors, computed once per `n`.
    ///
    /// `None` when the artwork cannot be decoded.
    pub fn palette(&self, n: usize) -> Option<Vec<Rgb>> {
        let img = self.image()?;
        let Ok(mut cache) = self.palettes.lock() else {
            return Some(extract_palette(&img, n));
        };
        Some(
            cache
                .entry(n)
                .or_insert_with(|| extract_palette(&img, n))
                .clone(),
        )
    }
}

/// Album metadata as fetched from a music source. Immutable once built.
#[derive(Clone, Debug)]
pub struct Album {
    artist: String,
    title: String,
    year: Option<i32>,
    genres: Vec<String>,
    label: Option<String>,
    descriptors: Vec<String>,
    tracks: Vec<Track>,
    art: Option<Arc<AlbumArt>>,
}

impl Album {
    /// Start building an album.
    pub fn builder(artist: impl Into<String>, title: impl Into<String>) -> AlbumBuilder {
        AlbumBuilder {
            album: Album {
                artist: artist.into(),
                title: title.into(),
                year: None,
                genres: Vec::new(),
                label: None,
                descriptors: Vec::new(),
                tracks: Vec::new(),
                art: None,
            },
        }
    }

    /// Artist name as given.
    pub fn artist(&self) -> &str {
        &self.artist
    }

    /// Album title as given.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Release year.
    pub fn year(&self) -> Option<i32> {
        self.year
    }

    /// Primary genre, if any.
    pub fn genre(&self) -> Option<&str> {
        self.genres.first().map(String::as_str)
    }

    /// All genres, primary first.
    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    /// Record label.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Descriptive tags such as "melancholic".
    pub fn descriptors(&self) -> &[String] {
        &self.descriptors
    }

    /// Tracks in album order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Cover artwork.
    pub fn art(&self) -> Option<&Arc<AlbumArt>> {
        self.art.as_ref()
    }

    /// Sum of track durations in seconds.
    pub fn total_duration_secs(&self) -> u64 {
        self.tracks.iter().map(|t| u64::from(t.duration_secs)).sum()
    }
}

/// Builder for [`Album`]; tracks are numbered in insertion order.
#[derive(Clone, Debug)]
pub struct AlbumBuilder {
    album: Album,
}

impl AlbumBuilder {
    /// Set the release year.
    pub fn year(mut self, year: i32) -> Self {
        self.album.year = Some(year);
        self
    }

    /// Append a genre.
    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.album.genres.push(genre.into());
        self
    }

    /// Set the record label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.album.label = Some(label.into());
        self
    }

    /// Append a descriptor.
    pub fn descriptor(mut self, descriptor: impl Into<String>) -> Self {
        self.album.descriptors.push(descriptor.into());
        self
    }

    /// Append a track; its number is its 1-based position.
    pub fn track(mut self, title: impl Into<String>, duration_secs: u32) -> Self {
        let number = self.album.tracks.len() as u32 + 1;
        self.album.tracks.push(Track {
            number,
            title: title.into(),
            duration_secs,
        });
        self
    }

    /// Attach cover artwork.
    pub fn art(mut self, art: Arc<AlbumArt>) -> Self {
        self.album.art = Some(art);
        self
    }

    /// Finish the album.
    pub fn build(self) -> Album {
        self.album
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/album.rs"]
mod tests;
