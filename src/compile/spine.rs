//! Spine: artwork thumbnails, the "artist • title • year" line and the Dolby logo, packed
//! along the rotated panel.

use std::sync::Arc;

use crate::compile::builder::PlanCtx;
use crate::compile::cover::square_crop;
use crate::compile::plan::{Element, LogoKind, LogoPlacement, PlacedText, TextRole};
use crate::foundation::core::{Align, Rect};
use crate::foundation::error::{CardgenError, CardgenResult};
use crate::layout::geometry::PanelFrame;
use crate::layout::spine::{
    DOLBY_LOGO_PT, SPINE_ART_PT, SPINE_MIN_GAP_PT, SpineComponent, SpineComponents, pack_spine,
    text_budget,
};
use crate::model::album::{Album, AlbumArt};
use crate::text::fit::{DEFAULT_LINE_HEIGHT, FitRequest, OverflowPolicy, TextRun};

const SEPARATOR: &str = " \u{2022} ";

/// "artist • title • year", skipping absent parts.
pub(crate) fn spine_line(album: &Album) -> String {
    let year = album.year().map(|y| y.to_string());
    [Some(album.artist()), Some(album.title()), year.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

pub(crate) fn spine(ctx: &mut PlanCtx<'_>, frame: &PanelFrame) -> CardgenResult<Vec<Element>> {
    let theme = ctx.theme();
    let size = frame.content_size();
    let (length, thickness) = (size.width, size.height);
    let text_h = (thickness - 2.0 * SPINE_MIN_GAP_PT).max(0.0);
    let double = ctx.card.albums().len() > 1;

    let art_left = if theme.spine_art { ctx.art(0) } else { None };
    let art_right = if theme.spine_art && double { ctx.art(1) } else { None };
    let components = SpineComponents {
        art_left: art_left.is_some(),
        dolby_logo: theme.dolby_logo,
        art_right: art_right.is_some(),
    };
    let budget = text_budget(length, components)?;

    let font = &theme.fonts.bold;
    let mut runs: Vec<TextRun> = Vec::new();
    let mut wanted = false;
    if double {
        let line_h = text_h / 2.0;
        let font_size = theme.sizes.spine.min(line_h / DEFAULT_LINE_HEIGHT);
        for (i, album) in ctx.card.albums().iter().enumerate() {
            let line = spine_line(album);
            wanted |= !line.is_empty();
            let req = FitRequest::new(&line, font, budget, line_h, font_size)
                .color(theme.text_color)
                .align(Align::Center);
            runs.extend(
                ctx.fit(&req)
                    .into_iter()
                    .map(|run| run.translated(0.0, i as f64 * line_h)),
            );
        }
    } else {
        let line = spine_line(ctx.album(0));
        wanted = !line.is_empty();
        let req = FitRequest::new(&line, font, budget, text_h, theme.sizes.spine)
            .floor(theme.sizes.min)
            .overflow(OverflowPolicy::Wrap)
            .color(theme.text_color)
            .align(Align::Center);
        runs = ctx.fit(&req);
    }
    if wanted && runs.iter().all(|r| r.text.is_empty()) {
        return Err(CardgenError::render(
            frame.name.as_str(),
            format!("spine text does not fit {budget:.1}pt x {text_h:.1}pt"),
        ));
    }

    let text_len = runs.iter().map(|r| r.bbox.width()).fold(0.0, f64::max);
    let block_h = runs.iter().map(|r| r.bbox.y1).fold(0.0, f64::max);
    let slots = pack_spine(length, components, text_len)?;

    let mut elements = Vec::new();
    for slot in slots {
        match slot.component {
            SpineComponent::ArtLeft => {
                if let Some(art) = &art_left {
                    elements.push(art_element(ctx, art, 0, slot.start, thickness));
                }
            }
            SpineComponent::ArtRight => {
                if let Some(art) = &art_right {
                    elements.push(art_element(ctx, art, 1, slot.start, thickness));
                }
            }
            SpineComponent::DolbyLogo => {
                let y = (thickness - DOLBY_LOGO_PT).max(0.0) / 2.0;
                let dest = Rect::new(slot.start, y, slot.end(), y + DOLBY_LOGO_PT.min(thickness));
                elements.push(Element::Logo(LogoPlacement {
                    logo: LogoKind::DolbyNr,
                    dest,
                    pixel_size: ctx.pixel_size(dest),
                }));
            }
            SpineComponent::Text => {
                let dy = (thickness - block_h) / 2.0;
                for run in &runs {
                    let dx = slot.start + (slot.length - run.bbox.width()) / 2.0 - run.bbox.x0;
                    elements.push(Element::Text(PlacedText {
                        role: TextRole::SpineText,
                        run: run.translated(dx, dy),
                    }));
                }
            }
        }
    }
    Ok(elements)
}

fn art_element(
    ctx: &PlanCtx<'_>,
    art: &Arc<AlbumArt>,
    album: usize,
    start: f64,
    thickness: f64,
) -> Element {
    let side = SPINE_ART_PT.min(thickness);
    let y = (thickness - side) / 2.0;
    let dest = Rect::new(start, y, start + side, y + side);
    let crop = art
        .dimensions()
        .map(|(w, h)| square_crop(f64::from(w), f64::from(h)))
        .unwrap_or(Rect::ZERO);
    ctx.image(art, album, dest, crop)
}

#[cfg(test)]
#[path = "../../tests/unit/compile/spine.rs"]
mod tests;
