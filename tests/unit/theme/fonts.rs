use std::sync::atomic::AtomicUsize;

use super::*;

struct CountingProvider {
    calls: Arc<AtomicUsize>,
    fail: bool,
}

impl FontProvider for CountingProvider {
    fn fetch(&self, key: &FontKey) -> anyhow::Result<FontAsset> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(std::time::Duration::from_millis(5));
        if self.fail {
            anyhow::bail!("network down");
        }
        Ok(FontAsset {
            key: key.clone(),
            bytes: Arc::new(vec![0u8; 4]),
        })
    }
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("cardgen_fonts_{name}_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn concurrent_requests_fetch_once_per_key() {
    let calls = Arc::new(AtomicUsize::new(0));
    let cache = Arc::new(FontCache::new(CountingProvider {
        calls: Arc::clone(&calls),
        fail: false,
    }));
    let key = FontKey::new("Space Grotesk", 700);

    std::thread::scope(|s| {
        for _ in 0..8 {
            let cache = Arc::clone(&cache);
            let key = key.clone();
            s.spawn(move || {
                assert!(cache.get(&key).is_ok());
            });
        }
    });

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.fetch_count(), 1);

    cache.get(&FontKey::new("Space Grotesk", 400)).unwrap();
    assert_eq!(cache.fetch_count(), 2);
}

#[test]
fn failures_are_cached_too() {
    let calls = Arc::new(AtomicUsize::new(0));
    let cache = FontCache::new(CountingProvider {
        calls: Arc::clone(&calls),
        fail: true,
    });
    let key = FontKey::new("Nope", 400);
    let first = cache.get(&key).unwrap_err();
    assert!(first.contains("network down"));
    assert!(cache.get(&key).is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn dir_provider_maps_family_to_file_name() {
    assert_eq!(
        DirFontProvider::file_name(&FontKey::new("Space Grotesk", 700)),
        "SpaceGrotesk-700.ttf"
    );
    let dir = temp_dir("dir_provider");
    std::fs::write(dir.join("Inter-400.ttf"), b"fontbytes").unwrap();
    let provider = DirFontProvider::new(&dir);
    let asset = provider.fetch(&FontKey::new("Inter", 400)).unwrap();
    assert_eq!(asset.bytes.as_slice(), b"fontbytes");
    assert!(provider.fetch(&FontKey::new("Inter", 700)).is_err());
}

#[test]
fn offline_provider_always_fails() {
    assert!(
        OfflineFontProvider
            .fetch(&FontKey::new("Inter", 400))
            .is_err()
    );
}
