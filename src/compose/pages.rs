//! Page imposition: cards placed on physical pages with crop marks and fold guides.

use kurbo::Size;

use crate::compile::plan::RenderPlan;
use crate::foundation::core::{Point, Rect};
use crate::foundation::error::{CardgenError, CardgenResult};
use crate::foundation::units::{BLEED_IN, Dpi, Orientation, PageSize, to_points};

/// Vertical gap between two cards sharing a page.
pub const CARD_GAP_PT: f64 = 36.0;
/// Length of crop and fold ticks.
pub const TICK_PT: f64 = 18.0;

/// Kind of printed guide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuideKind {
    /// Solid tick continuing a card edge outward from a corner.
    Crop,
    /// Dashed tick marking a fold line above or below a card.
    Fold,
}

/// A straight guide line in page coordinates (points, origin top-left).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Guide {
    /// Crop or fold.
    pub kind: GuideKind,
    /// Endpoint on the card edge or fold.
    pub from: Point,
    /// Outer endpoint.
    pub to: Point,
}

impl Guide {
    /// Fold guides are drawn dashed.
    pub fn is_dashed(&self) -> bool {
        self.kind == GuideKind::Fold
    }
}

/// A card's position on its page.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlacedCard {
    /// Index into the plan list passed to [`compose_pages`].
    pub index: usize,
    /// Page position of the card's top-left corner.
    pub origin: Point,
    /// Card size in points.
    pub size: Size,
}

/// One printed page.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Page {
    /// Named paper size.
    pub page_size: PageSize,
    /// Orientation shared by every card on the page.
    pub orientation: Orientation,
    /// Oriented page size in points.
    pub size: Size,
    /// One or two cards, top to bottom.
    pub cards: Vec<PlacedCard>,
    /// Crop and fold guides; empty without crop marks.
    pub guides: Vec<Guide>,
}

/// Place plans on pages in order, two per page when two cards and the gap fit the page
/// height.
///
/// Every plan must have been built at `dpi`. Crop and fold guides are only emitted when
/// `crop_marks` is set; they never move cards.
#[tracing::instrument(skip(plans), fields(cards = plans.len(), dpi = dpi.get()))]
pub fn compose_pages(
    plans: &[RenderPlan],
    page_size: PageSize,
    dpi: Dpi,
    crop_marks: bool,
) -> CardgenResult<Vec<Page>> {
    if let Some((i, plan)) = plans.iter().enumerate().find(|(_, p)| p.dpi() != dpi) {
        return Err(CardgenError::config(format!(
            "plan {i} was built at {} dpi, pages are composed at {} dpi",
            plan.dpi().get(),
            dpi.get()
        )));
    }
    let orientations = plans
        .iter()
        .map(|p| page_size.orientation_for(p.size().width, p.size().height))
        .collect::<CardgenResult<Vec<_>>>()?;

    let mut pages = Vec::new();
    let mut i = 0;
    while i < plans.len() {
        let orientation = orientations[i];
        let (pw, ph) = page_size.oriented_points(orientation);
        let first = plans[i].size();
        let pair = plans.get(i + 1).filter(|next| {
            orientations[i + 1] == orientation
                && first.height + CARD_GAP_PT + next.size().height <= ph + 1e-6
        });

        let mut placed = Vec::with_capacity(2);
        match pair {
            Some(next) => {
                let second = next.size();
                let top = (ph - (first.height + CARD_GAP_PT + second.height)) / 2.0;
                placed.push(place(i, first, pw, top));
                placed.push(place(i + 1, second, pw, top + first.height + CARD_GAP_PT));
            }
            None => placed.push(place(i, first, pw, (ph - first.height) / 2.0)),
        }

        let mut guides = Vec::new();
        for card in &placed {
            if crop_marks {
                guides.extend(crop_guides(card));
                guides.extend(fold_guides(card, plans[card.index].fold_lines()));
            }
        }

        i += placed.len();
        pages.push(Page {
            page_size,
            orientation,
            size: Size::new(pw, ph),
            cards: placed,
            guides,
        });
    }

    tracing::info!(pages = pages.len(), "pages composed");
    Ok(pages)
}

/// Number of cards that share a page of `page_size`.
pub fn cards_per_page(card: Size, page_size: PageSize) -> CardgenResult<usize> {
    let orientation = page_size.orientation_for(card.width, card.height)?;
    let (_, ph) = page_size.oriented_points(orientation);
    Ok(if 2.0 * card.height + CARD_GAP_PT <= ph + 1e-6 {
        2
    } else {
        1
    })
}

fn place(index: usize, size: Size, page_w: f64, top: f64) -> PlacedCard {
    PlacedCard {
        index,
        origin: Point::new((page_w - size.width) / 2.0, top),
        size,
    }
}

fn crop_guides(card: &PlacedCard) -> Vec<Guide> {
    let (x0, y0) = (card.origin.x, card.origin.y);
    let (x1, y1) = (x0 + card.size.width, y0 + card.size.height);
    let mut out = Vec::with_capacity(8);
    for (x, dx) in [(x0, -1.0), (x1, 1.0)] {
        for (y, dy) in [(y0, -1.0), (y1, 1.0)] {
            out.push(Guide {
                kind: GuideKind::Crop,
                from: Point::new(x, y),
                to: Point::new(x + dx * TICK_PT, y),
            });
            out.push(Guide {
                kind: GuideKind::Crop,
                from: Point::new(x, y),
                to: Point::new(x, y + dy * TICK_PT),
            });
        }
    }
    out
}

fn fold_guides(card: &PlacedCard, folds: &[f64]) -> Vec<Guide> {
    let (y0, y1) = (card.origin.y, card.origin.y + card.size.height);
    folds
        .iter()
        .flat_map(|fx| {
            let x = card.origin.x + fx;
            [
                Guide {
                    kind: GuideKind::Fold,
                    from: Point::new(x, y0 - TICK_PT),
                    to: Point::new(x, y0),
                },
                Guide {
                    kind: GuideKind::Fold,
                    from: Point::new(x, y1),
                    to: Point::new(x, y1 + TICK_PT),
                },
            ]
        })
        .collect()
}

/// Bleed-inclusive trim box of a card placed on a page, in points.
pub fn bleed_box(card: &PlacedCard) -> Rect {
    let bleed = to_points(BLEED_IN);
    Rect::new(
        card.origin.x - bleed,
        card.origin.y - bleed,
        card.origin.x + card.size.width + bleed,
        card.origin.y + card.size.height + bleed,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/compose/pages.rs"]
mod tests;
