use super::*;
use crate::foundation::units::Dpi;
use crate::layout::geometry::card_size;
use crate::model::card::CardKind;

fn plan(kind: CardKind) -> RenderPlan {
    let size = card_size(kind);
    RenderPlan {
        card_kind: kind,
        dpi: Dpi::default(),
        page_size: PageSize::Letter,
        orientation: Orientation::Portrait,
        crop_marks: true,
        size,
        panels: Vec::new(),
        fold_lines: vec![48.0, 84.0],
        warnings: Vec::new(),
    }
}

#[test]
fn three_cards_make_two_pages() {
    let plans = vec![plan(CardKind::FourPanel); 3];
    let pages = compose_pages(&plans, PageSize::Letter, Dpi::default(), true).unwrap();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].cards.len(), 2);
    assert_eq!(pages[1].cards.len(), 1);
    assert_eq!(pages[1].cards[0].index, 2);

    // Lone card is centered on the page.
    let lone = pages[1].cards[0];
    let page = pages[1].size;
    assert!((lone.origin.x * 2.0 + lone.size.width - page.width).abs() < 1e-9);
    assert!((lone.origin.y * 2.0 + lone.size.height - page.height).abs() < 1e-9);
}

#[test]
fn pair_is_centered_as_a_block_with_a_gap() {
    let plans = vec![plan(CardKind::FourPanel); 2];
    let pages = compose_pages(&plans, PageSize::Letter, Dpi::default(), false).unwrap();
    let [a, b] = [pages[0].cards[0], pages[0].cards[1]];
    assert!((b.origin.y - (a.origin.y + a.size.height) - CARD_GAP_PT).abs() < 1e-9);
    let bottom_margin = pages[0].size.height - (b.origin.y + b.size.height);
    assert!((a.origin.y - bottom_margin).abs() < 1e-9);
    assert_eq!(a.origin.x, b.origin.x);
}

#[test]
fn five_panel_cards_go_landscape_two_per_letter_page() {
    let plans = vec![plan(CardKind::FivePanel); 2];
    let pages = compose_pages(&plans, PageSize::Letter, Dpi::default(), true).unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].orientation, Orientation::Landscape);
    assert_eq!(pages[0].size, Size::new(792.0, 612.0));
    assert_eq!(cards_per_page(card_size(CardKind::FivePanel), PageSize::Letter).unwrap(), 2);
}

#[test]
fn card_larger_than_page_is_config_error() {
    let plans = vec![plan(CardKind::FivePanel)];
    let err = compose_pages(&plans, PageSize::Half, Dpi::default(), true).unwrap_err();
    assert!(err.to_string().starts_with("config error:"), "{err}");
}

#[test]
fn crop_marks_point_outward_from_each_corner() {
    let plans = vec![plan(CardKind::FourPanel)];
    let pages = compose_pages(&plans, PageSize::Letter, Dpi::default(), true).unwrap();
    let card = pages[0].cards[0];
    let crops: Vec<&Guide> = pages[0]
        .guides
        .iter()
        .filter(|g| g.kind == GuideKind::Crop)
        .collect();
    assert_eq!(crops.len(), 8);
    let inside = |p: Point| {
        p.x > card.origin.x + 1e-9
            && p.x < card.origin.x + card.size.width - 1e-9
            && p.y > card.origin.y + 1e-9
            && p.y < card.origin.y + card.size.height - 1e-9
    };
    for g in crops {
        assert!(!inside(g.to));
        assert!((g.from.distance(g.to) - TICK_PT).abs() < 1e-9);
        assert!(!g.is_dashed());
    }
}

#[test]
fn fold_guides_sit_above_and_below_each_fold() {
    let plans = vec![plan(CardKind::FourPanel)];
    let pages = compose_pages(&plans, PageSize::Letter, Dpi::default(), true).unwrap();
    let card = pages[0].cards[0];
    let folds: Vec<&Guide> = pages[0]
        .guides
        .iter()
        .filter(|g| g.kind == GuideKind::Fold)
        .collect();
    assert_eq!(folds.len(), 4);
    assert!(folds.iter().all(|g| g.is_dashed()));
    assert_eq!(folds[0].from.x, card.origin.x + 48.0);
    assert_eq!(folds[0].to.y, card.origin.y);
    assert_eq!(folds[1].from.y, card.origin.y + card.size.height);
}

#[test]
fn no_guides_without_crop_marks() {
    let plans = vec![plan(CardKind::FourPanel), plan(CardKind::FourPanel)];
    let pages = compose_pages(&plans, PageSize::Letter, Dpi::default(), false).unwrap();
    assert_eq!(pages[0].cards.len(), 2);
    assert!(pages[0].guides.is_empty(), "{:?}", pages[0].guides);
}

#[test]
fn plans_at_another_dpi_are_rejected() {
    let plans = vec![plan(CardKind::FourPanel)];
    let err = compose_pages(&plans, PageSize::Letter, Dpi::new(300).unwrap(), true).unwrap_err();
    assert!(err.to_string().starts_with("config error:"), "{err}");
    assert!(err.to_string().contains("600"), "{err}");
}

#[test]
fn bleed_extends_every_edge() {
    let card = PlacedCard {
        index: 0,
        origin: Point::new(100.0, 100.0),
        size: Size::new(50.0, 20.0),
    };
    assert_eq!(bleed_box(&card), Rect::new(91.0, 91.0, 159.0, 129.0));
}
