use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{
        Arc, Mutex, OnceLock,
        atomic::{AtomicUsize, Ordering},
    },
};

use anyhow::Context;

/// Identity of a fetchable font: family plus weight.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FontKey {
    /// Family name, e.g. `Space Grotesk`.
    pub family: String,
    /// Weight in `[100, 900]`.
    pub weight: u16,
}

impl FontKey {
    /// Build a key.
    pub fn new(family: impl Into<String>, weight: u16) -> Self {
        Self {
            family: family.into(),
            weight,
        }
    }
}

/// Font file bytes for one key.
#[derive(Clone)]
pub struct FontAsset {
    /// Key the bytes were fetched for.
    pub key: FontKey,
    /// Raw TTF/OTF bytes.
    pub bytes: Arc<Vec<u8>>,
}

impl std::fmt::Debug for FontAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontAsset")
            .field("key", &self.key)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

/// External collaborator that fetches font files (download, local cache, ...).
pub trait FontProvider: Send + Sync {
    /// Fetch the font for `key`. May block.
    fn fetch(&self, key: &FontKey) -> anyhow::Result<FontAsset>;
}

/// Reads `<FamilyWithoutSpaces>-<weight>.ttf` from a local directory.
#[derive(Clone, Debug)]
pub struct DirFontProvider {
    root: PathBuf,
}

impl DirFontProvider {
    /// Provider rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// File name a key maps to.
    pub fn file_name(key: &FontKey) -> String {
        let family: String = key.family.chars().filter(|c| !c.is_whitespace()).collect();
        format!("{family}-{}.ttf", key.weight)
    }
}

impl FontProvider for DirFontProvider {
    fn fetch(&self, key: &FontKey) -> anyhow::Result<FontAsset> {
        let path = self.root.join(Self::file_name(key));
        let bytes =
            std::fs::read(&path).with_context(|| format!("read font file {}", path.display()))?;
        Ok(FontAsset {
            key: key.clone(),
            bytes: Arc::new(bytes),
        })
    }
}

/// Provider used when no font source is configured; every fetch fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct OfflineFontProvider;

impl FontProvider for OfflineFontProvider {
    fn fetch(&self, key: &FontKey) -> anyhow::Result<FontAsset> {
        anyhow::bail!(
            "no font source configured for '{}' weight {}",
            key.family,
            key.weight
        )
    }
}

type FontCell = Arc<OnceLock<Result<Arc<FontAsset>, String>>>;

/// Fetch-once cache in front of a [`FontProvider`].
///
/// Created once per run and passed explicitly to whoever resolves themes. Concurrent requests
/// for the same key wait on a single fetch; failures are remembered as well.
pub struct FontCache {
    provider: Box<dyn FontProvider>,
    cells: Mutex<HashMap<FontKey, FontCell>>,
    fetches: AtomicUsize,
}

impl FontCache {
    /// Cache backed by `provider`.
    pub fn new(provider: impl FontProvider + 'static) -> Self {
        Self::from_boxed(Box::new(provider))
    }

    /// Cache backed by a provider chosen at runtime.
    pub fn from_boxed(provider: Box<dyn FontProvider>) -> Self {
        Self {
            provider,
            cells: Mutex::new(HashMap::new()),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Font for `key`, fetching it at most once per cache lifetime.
    pub fn get(&self, key: &FontKey) -> Result<Arc<FontAsset>, String> {
        let cell = {
            let mut cells = self
                .cells
                .lock()
                .map_err(|_| "font cache lock poisoned".to_string())?;
            Arc::clone(cells.entry(key.clone()).or_default())
        };
        cell.get_or_init(|| {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            tracing::debug!(family = %key.family, weight = key.weight, "fetching font");
            self.provider
                .fetch(key)
                .map(Arc::new)
                .map_err(|e| format!("{e:#}"))
        })
        .clone()
    }

    /// Number of provider fetches performed so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for FontCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontCache")
            .field("fetches", &self.fetch_count())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/theme/fonts.rs"]
mod tests;
