use std::io::Cursor;
use std::sync::Arc;

use super::*;
use crate::compile::plan::{Element, TextRole};
use crate::model::card::CardKind;
use crate::model::theme::ThemeOverrides;
use crate::text::metrics::ApproxMetrics;
use crate::theme::fonts::{FontCache, OfflineFontProvider};
use crate::theme::resolver::ThemeResolver;

fn png(w: u32, h: u32, top: [u8; 4], bottom: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_fn(w, h, |_, y| {
        image::Rgba(if y < h / 2 { top } else { bottom })
    });
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn theme(card: ThemeOverrides) -> Arc<ResolvedTheme> {
    let resolver = ThemeResolver::new(
        ThemeOverrides::default(),
        Arc::new(FontCache::new(OfflineFontProvider)),
    );
    Arc::new(resolver.resolve(&card).unwrap())
}

fn album_with_art() -> Album {
    Album::builder("Slowdive", "Souvlaki")
        .year(1993)
        .genre("Shoegaze")
        .genre("Dream Pop")
        .label("Creation")
        .descriptor("ethereal")
        .track("Alison", 230)
        .track("Machine Gun", 265)
        .track("40 Days", 194)
        .art(Arc::new(AlbumArt::from_bytes(png(
            40,
            30,
            [20, 40, 160, 255],
            [220, 200, 40, 255],
        ))))
        .build()
}

fn card(kind: CardKind, overrides: ThemeOverrides) -> Card {
    Card::single(kind, album_with_art(), theme(overrides)).unwrap()
}

fn plan(card: &Card) -> CardgenResult<RenderPlan> {
    build_render_plan(card, Dpi::default(), &ApproxMetrics, &PlanOptions::default())
}

#[test]
fn five_panel_plan_has_every_panel_with_content() {
    let card = card(CardKind::FivePanel, ThemeOverrides::default());
    let plan = plan(&card).unwrap();
    let names: Vec<&str> = plan.panels().iter().map(|p| p.name()).collect();
    assert_eq!(names, vec!["back", "spine", "front", "inside", "genre"]);
    for panel in plan.panels() {
        assert!(!panel.elements.is_empty(), "{} is empty", panel.name());
        assert_eq!(
            panel.background,
            Fill::Solid {
                color: crate::foundation::core::Rgb::WHITE
            }
        );
    }
    assert!(plan.warnings().is_empty(), "{:?}", plan.warnings());
}

#[test]
fn front_places_art_and_title() {
    let card = card(CardKind::FivePanel, ThemeOverrides::default());
    let plan = plan(&card).unwrap();
    let front = plan.panel("front").unwrap();
    let image = front
        .elements
        .iter()
        .find_map(|e| match e {
            Element::Image(i) => Some(i),
            _ => None,
        })
        .unwrap();
    assert!((image.dest.width() - image.dest.height()).abs() < 1e-9);
    assert_eq!(image.source_crop, Rect::new(5.0, 0.0, 35.0, 30.0));
    let px = (image.dest.width() / 72.0 * 600.0).round() as u32;
    assert_eq!(image.pixel_size, (px, px));
    assert!(front.texts().any(|t| t.role == TextRole::Title && t.run.text == "Souvlaki"));
    assert!(front.texts().any(|t| t.role == TextRole::Artist && t.run.text == "Slowdive"));
}

#[test]
fn text_stays_inside_its_panel() {
    let card = card(CardKind::FivePanel, ThemeOverrides::default());
    let plan = plan(&card).unwrap();
    for panel in plan.panels() {
        let size = panel.content_size();
        for text in panel.texts() {
            let b = text.run.bbox;
            assert!(b.x0 >= -1e-6 && b.x1 <= size.width + 1e-6, "{}: {b:?}", panel.name());
            assert!(b.y0 >= -1e-6 && b.y1 <= size.height + 1e-6, "{}: {b:?}", panel.name());
        }
    }
}

#[test]
fn missing_art_warns_once_and_keeps_going() {
    let album = Album::builder("Artist", "No Art").track("Only", 100).build();
    let card = Card::single(CardKind::FivePanel, album, theme(Default::default())).unwrap();
    let plan = plan(&card).unwrap();
    let artwork: Vec<_> = plan
        .warnings()
        .iter()
        .filter(|w| w.kind == FallbackKind::Artwork)
        .collect();
    assert_eq!(artwork.len(), 1);
    assert!(
        plan.panel("front")
            .unwrap()
            .elements
            .iter()
            .all(|e| !matches!(e, Element::Image(_)))
    );
}

#[test]
fn gradient_background_uses_the_palette() {
    let overrides = ThemeOverrides {
        use_gradient: true.into(),
        ..ThemeOverrides::default()
    };
    let card = card(CardKind::FivePanel, overrides);
    let plan = plan(&card).unwrap();
    for panel in plan.panels() {
        let Fill::LinearGradient { start, end } = panel.background else {
            panic!("{} has a solid background", panel.name());
        };
        assert_ne!(start, end);
    }
}

#[test]
fn dolby_logo_is_placed_on_the_spine() {
    let overrides = ThemeOverrides {
        dolby_logo: true.into(),
        ..ThemeOverrides::default()
    };
    let card = card(CardKind::FivePanel, overrides);
    let plan = plan(&card).unwrap();
    let spine = plan.panel("spine").unwrap();
    let logos = spine
        .elements
        .iter()
        .filter(|e| matches!(e, Element::Logo(_)))
        .count();
    let images = spine
        .elements
        .iter()
        .filter(|e| matches!(e, Element::Image(_)))
        .count();
    assert_eq!((logos, images), (1, 1));
}

#[test]
fn four_panel_inside_carries_descriptors() {
    let card = card(CardKind::FourPanel, ThemeOverrides::default());
    let plan = plan(&card).unwrap();
    assert!(plan.panel("genre").is_none());
    let inside = plan.panel("inside").unwrap();
    assert!(inside.texts().any(|t| t.role == TextRole::Descriptor));
    assert_eq!(plan.track_order(), vec![(0, 1), (0, 2), (0, 3)]);
}

#[test]
fn tracklist_that_cannot_hold_one_track_is_a_render_error() {
    let overrides = ThemeOverrides {
        track_font_size: 120.0.into(),
        min_font_size: 120.0.into(),
        ..ThemeOverrides::default()
    };
    let card = card(CardKind::FivePanel, overrides);
    let err = plan(&card).unwrap_err();
    assert!(err.to_string().contains("'inside'"), "{err}");
}

#[test]
fn genre_panel_lists_genres_and_descriptors() {
    let card = card(CardKind::FivePanel, ThemeOverrides::default());
    let plan = plan(&card).unwrap();
    let genre = plan.panel("genre").unwrap();
    let genres: Vec<&str> = genre
        .texts()
        .filter(|t| t.role == TextRole::Genre)
        .map(|t| t.run.text.as_str())
        .collect();
    assert_eq!(genres, vec!["Shoegaze", "Dream Pop"]);
    assert!(genre.texts().any(|t| t.role == TextRole::PanelHeading && t.run.text == "Genres"));
    assert!(
        genre
            .texts()
            .any(|t| t.role == TextRole::Descriptor && t.run.text.contains("ethereal"))
    );
}

#[test]
fn flat_cover_gradient_falls_back_to_shades_quietly() {
    let album = Album::builder("Artist", "Flat")
        .track("Only", 100)
        .art(Arc::new(AlbumArt::from_bytes(png(
            8,
            8,
            [90, 30, 30, 255],
            [90, 30, 30, 255],
        ))))
        .build();
    let overrides = ThemeOverrides {
        use_gradient: true.into(),
        ..ThemeOverrides::default()
    };
    let card = Card::single(CardKind::FourPanel, album, theme(overrides)).unwrap();
    let plan = plan(&card).unwrap();
    assert!(
        plan.warnings().iter().all(|w| w.kind != FallbackKind::Palette),
        "{:?}",
        plan.warnings()
    );
    let Fill::LinearGradient { start, end } = plan.panels()[0].background else {
        panic!("expected a gradient background");
    };
    assert_ne!(start, end);
}
