use super::*;
use crate::theme::fonts::{FontProvider, OfflineFontProvider};

struct StaticProvider;

impl FontProvider for StaticProvider {
    fn fetch(&self, key: &FontKey) -> anyhow::Result<FontAsset> {
        if key.family == "Good Font" {
            Ok(FontAsset {
                key: key.clone(),
                bytes: Arc::new(vec![1, 2, 3]),
            })
        } else {
            anyhow::bail!("404")
        }
    }
}

fn resolver(global: ThemeOverrides) -> ThemeResolver {
    ThemeResolver::new(global, Arc::new(FontCache::new(StaticProvider)))
}

#[test]
fn builtin_defaults_resolve() {
    let t = resolver(ThemeOverrides::default())
        .resolve(&ThemeOverrides::default())
        .unwrap();
    assert_eq!(t.fonts.body.family, "Helvetica");
    assert_eq!(t.fonts.title.family, "Helvetica-Bold");
    assert_eq!(t.fonts.title.weight, 700);
    assert!(t.fonts.mono.monospace);
    assert_eq!(t.sizes.track, 10.0);
    assert_eq!(t.background_color, Rgb::WHITE);
    assert_eq!(t.tape_length_min, 90);
    assert_eq!(t.side_capacity_secs(), 2700);
    assert_eq!(t.padding_pt, 9.0);
    assert!(t.warnings.is_empty());
}

#[test]
fn card_layer_beats_global_beats_builtin() {
    let global = ThemeOverrides {
        tape_length: 60.into(),
        dolby_logo: true.into(),
        ..ThemeOverrides::default()
    };
    let card = ThemeOverrides {
        tape_length: 110.into(),
        dolby_logo: Setting::Inherit,
        ..ThemeOverrides::default()
    };
    let t = resolver(global).resolve(&card).unwrap();
    assert_eq!(t.tape_length_min, 110);
    assert!(t.dolby_logo);
}

#[test]
fn fetched_google_font_replaces_title_family() {
    let card = ThemeOverrides {
        title_google_font: "Good Font".to_string().into(),
        title_font_weight: 600.into(),
        ..ThemeOverrides::default()
    };
    let t = resolver(ThemeOverrides::default()).resolve(&card).unwrap();
    assert_eq!(t.fonts.title, FontRef::new("Good Font", 600));
    assert_eq!(t.font_assets.len(), 1);
    assert!(t.warnings.is_empty());
}

#[test]
fn failed_font_falls_back_with_warning() {
    let card = ThemeOverrides {
        title_google_font: "Missing".to_string().into(),
        artist_google_font: "Missing".to_string().into(),
        ..ThemeOverrides::default()
    };
    let t = ThemeResolver::new(
        ThemeOverrides::default(),
        Arc::new(FontCache::new(OfflineFontProvider)),
    )
    .resolve(&card)
    .unwrap();
    assert_eq!(t.fonts.title.family, "Helvetica-Bold");
    assert_eq!(t.fonts.artist.family, "Helvetica");
    assert_eq!(t.warnings.len(), 2);
    assert!(t.warnings.iter().all(|w| w.kind == FallbackKind::Font));
}

#[test]
fn invalid_values_are_config_errors() {
    let r = resolver(ThemeOverrides::default());
    let cases = [
        ThemeOverrides {
            title_font_weight: 950.into(),
            ..ThemeOverrides::default()
        },
        ThemeOverrides {
            text_color: Rgb::new(0.0, 2.0, 0.0).into(),
            ..ThemeOverrides::default()
        },
        ThemeOverrides {
            tape_length: 0.into(),
            ..ThemeOverrides::default()
        },
        ThemeOverrides {
            gradient_indices: (0, 3).into(),
            ..ThemeOverrides::default()
        },
        ThemeOverrides {
            track_font_size: (-1.0).into(),
            ..ThemeOverrides::default()
        },
    ];
    for card in &cases {
        let err = r.resolve(card).unwrap_err();
        assert!(matches!(err, CardgenError::Config(_)), "{err}");
        assert!(r.validate(card).is_err());
    }
}
