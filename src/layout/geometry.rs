//! Panel rectangles for every card variant.
//!
//! Coordinates are PDF points, card-local, origin top-left, y down. Columns run left to right
//! as back | spine | front | inside (| genre).

use kurbo::Size;

use crate::foundation::core::{Affine, Rect, Rotation};
use crate::foundation::error::{CardgenError, CardgenResult};
use crate::foundation::units::{
    BACK_PANEL_WIDTH_IN, CARD_HEIGHT_IN, Orientation, PANEL_WIDTH_IN, PageSize, SPINE_WIDTH_IN,
    to_points,
};
use crate::model::card::CardKind;

const AREA_EPS: f64 = 1e-6;

/// Role of a panel on the card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelKind {
    /// Metadata flap.
    Back,
    /// Narrow panel visible on the shelf.
    Spine,
    /// Cover.
    Front,
    /// Tracklist.
    Inside,
    /// Genres and descriptors.
    Genre,
}

impl PanelKind {
    /// Base panel name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Back => "back",
            Self::Spine => "spine",
            Self::Front => "front",
            Self::Inside => "inside",
            Self::Genre => "genre",
        }
    }

    fn rotation(self) -> Rotation {
        match self {
            Self::Back | Self::Spine => Rotation::Plus90,
            Self::Front | Self::Inside | Self::Genre => Rotation::None,
        }
    }
}

/// Ratio table: column order with the physical width of each non-spine column in inches.
const FOUR_PANEL_COLUMNS: &[(PanelKind, f64)] = &[
    (PanelKind::Back, BACK_PANEL_WIDTH_IN),
    (PanelKind::Spine, SPINE_WIDTH_IN),
    (PanelKind::Front, PANEL_WIDTH_IN),
    (PanelKind::Inside, PANEL_WIDTH_IN),
];

const FIVE_PANEL_COLUMNS: &[(PanelKind, f64)] = &[
    (PanelKind::Back, BACK_PANEL_WIDTH_IN),
    (PanelKind::Spine, SPINE_WIDTH_IN),
    (PanelKind::Front, PANEL_WIDTH_IN),
    (PanelKind::Inside, PANEL_WIDTH_IN),
    (PanelKind::Genre, PANEL_WIDTH_IN),
];

/// One positioned panel before content is attached.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PanelFrame {
    /// Unique panel name (`front`, `front_1`, ...).
    pub name: String,
    /// Content the panel holds.
    pub kind: PanelKind,
    /// Index of the album this panel belongs to; `None` for shared panels.
    pub album: Option<usize>,
    /// Card-local rectangle in points.
    pub rect: Rect,
    /// Content rotation.
    pub rotation: Rotation,
}

impl PanelFrame {
    /// Size of the panel's content frame: width and height swap for quarter turns.
    pub fn content_size(&self) -> Size {
        let (w, h) = (self.rect.width(), self.rect.height());
        if self.rotation.is_quarter_turn() {
            Size::new(h, w)
        } else {
            Size::new(w, h)
        }
    }

    /// Maps content-frame coordinates (origin top-left, y down) to card coordinates.
    pub fn content_transform(&self) -> Affine {
        let Rect { x0, y0, x1, y1 } = self.rect;
        match self.rotation {
            Rotation::None => Affine::translate((x0, y0)),
            Rotation::Plus90 => Affine::new([0.0, -1.0, 1.0, 0.0, x0, y1]),
            Rotation::Minus90 => Affine::new([0.0, 1.0, -1.0, 0.0, x1, y0]),
        }
    }
}

/// Panel layout of one card.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CardGeometry {
    /// Layout variant.
    pub kind: CardKind,
    /// Card size in points.
    pub size: Size,
    /// Panels in left-to-right, top-to-bottom order.
    pub frames: Vec<PanelFrame>,
    /// Card-local x positions of the folds between columns.
    pub fold_lines: Vec<f64>,
    /// Orientation of the page the card was checked against.
    pub orientation: Orientation,
}

impl CardGeometry {
    /// Frame of the spine panel.
    pub fn spine(&self) -> Option<&PanelFrame> {
        self.frames.iter().find(|f| f.kind == PanelKind::Spine)
    }
}

/// Card size in points for `kind`.
pub fn card_size(kind: CardKind) -> Size {
    let columns = match kind {
        CardKind::FourPanel => FOUR_PANEL_COLUMNS,
        CardKind::FivePanel | CardKind::DoubleFivePanel => FIVE_PANEL_COLUMNS,
    };
    let width_in: f64 = columns.iter().map(|(_, w)| w).sum();
    Size::new(to_points(width_in), to_points(CARD_HEIGHT_IN))
}

/// Build and verify the panel layout for `kind`, checking that it fits on `page`.
#[tracing::instrument]
pub fn build_geometry(kind: CardKind, page: PageSize) -> CardgenResult<CardGeometry> {
    let size = card_size(kind);
    let orientation = page.orientation_for(size.width, size.height)?;

    let frames = match kind {
        CardKind::FourPanel => four_panel(size),
        CardKind::FivePanel => five_panel(size),
        CardKind::DoubleFivePanel => double_five_panel(size),
    };
    validate_partition(&frames, size.to_rect())?;

    let mut fold_lines: Vec<f64> = frames
        .iter()
        .map(|f| f.rect.x0)
        .filter(|&x| x > AREA_EPS)
        .collect();
    fold_lines.sort_by(f64::total_cmp);
    fold_lines.dedup_by(|a, b| (*a - *b).abs() < AREA_EPS);

    Ok(CardGeometry {
        kind,
        size,
        frames,
        fold_lines,
        orientation,
    })
}

fn four_panel(size: Size) -> Vec<PanelFrame> {
    columns(FOUR_PANEL_COLUMNS, size)
}

fn five_panel(size: Size) -> Vec<PanelFrame> {
    columns(FIVE_PANEL_COLUMNS, size)
}

/// Two independent five-panel sets combined: back, front and genre split into a top half for
/// album 1 and a bottom half for album 2; spine and inside shared.
fn double_five_panel(size: Size) -> Vec<PanelFrame> {
    let first = five_panel(size);
    let second = five_panel(size);
    let mut out = Vec::with_capacity(first.len() + 3);
    for (a, b) in first.into_iter().zip(second) {
        match a.kind {
            PanelKind::Spine | PanelKind::Inside => out.push(PanelFrame { album: None, ..a }),
            PanelKind::Back | PanelKind::Front | PanelKind::Genre => {
                let mid = (a.rect.y0 + a.rect.y1) / 2.0;
                out.push(PanelFrame {
                    name: format!("{}_1", a.name),
                    album: Some(0),
                    rect: Rect::new(a.rect.x0, a.rect.y0, a.rect.x1, mid),
                    ..a
                });
                out.push(PanelFrame {
                    name: format!("{}_2", b.name),
                    album: Some(1),
                    rect: Rect::new(b.rect.x0, mid, b.rect.x1, b.rect.y1),
                    ..b
                });
            }
        }
    }
    out
}

/// Spine first at its fixed width; the rest of the card split by the table weights, with the
/// last column absorbing rounding so the columns tile the card exactly.
fn columns(table: &[(PanelKind, f64)], size: Size) -> Vec<PanelFrame> {
    let spine_pt = to_points(SPINE_WIDTH_IN);
    let remaining = size.width - spine_pt;
    let weight_sum: f64 = table
        .iter()
        .filter(|(k, _)| *k != PanelKind::Spine)
        .map(|(_, w)| w)
        .sum();

    let mut x = 0.0;
    let last = table.len() - 1;
    table
        .iter()
        .enumerate()
        .map(|(i, &(kind, weight))| {
            let width = if kind == PanelKind::Spine {
                spine_pt
            } else {
                remaining * weight / weight_sum
            };
            let x1 = if i == last { size.width } else { x + width };
            let rect = Rect::new(x, 0.0, x1, size.height);
            x = x1;
            PanelFrame {
                name: kind.name().to_string(),
                kind,
                album: Some(0),
                rect,
                rotation: kind.rotation(),
            }
        })
        .collect()
}

/// Fails unless `frames` tile `bounds` exactly: every panel inside, no overlap, no gap.
pub fn validate_partition(frames: &[PanelFrame], bounds: Rect) -> CardgenResult<()> {
    let mut area = 0.0;
    for f in frames {
        let r = f.rect;
        if r.width() <= 0.0 || r.height() <= 0.0 {
            return Err(CardgenError::render(&f.name, "panel has no area"));
        }
        if r.x0 < bounds.x0 - AREA_EPS
            || r.y0 < bounds.y0 - AREA_EPS
            || r.x1 > bounds.x1 + AREA_EPS
            || r.y1 > bounds.y1 + AREA_EPS
        {
            return Err(CardgenError::render(&f.name, "panel extends past the card"));
        }
        area += r.area();
    }
    for (i, a) in frames.iter().enumerate() {
        for b in &frames[i + 1..] {
            if a.rect.intersect(b.rect).area() > AREA_EPS {
                return Err(CardgenError::render(
                    &a.name,
                    format!("panel overlaps '{}'", b.name),
                ));
            }
        }
    }
    if (area - bounds.area()).abs() > AREA_EPS * bounds.area().max(1.0) {
        return Err(CardgenError::render(
            "card",
            format!(
                "panels cover {area:.6} pt² of a {:.6} pt² card",
                bounds.area()
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/layout/geometry.rs"]
mod tests;
