//! Genre panel: genre list and descriptor blurb.

use crate::compile::builder::{PlanCtx, text_elements};
use crate::compile::plan::{Element, TextRole};
use crate::foundation::core::Rect;
use crate::foundation::error::CardgenResult;
use crate::layout::geometry::PanelFrame;
use crate::model::album::Album;
use crate::text::fit::{DEFAULT_LINE_HEIGHT, FitRequest, OverflowPolicy};

const GENRE_SHARE: f64 = 0.3;
const DESCRIPTOR_SHARE: f64 = 0.3;

pub(crate) fn genre(ctx: &mut PlanCtx<'_>, frame: &PanelFrame) -> CardgenResult<Vec<Element>> {
    let album = ctx.album(frame.album.unwrap_or(0));
    let body = ctx.content_box(frame);

    let (genres, descriptors) = if ctx.card.albums().len() > 1 {
        let mid = body.x0 + body.width() / 2.0;
        (
            Rect::new(body.x0, body.y0, mid, body.y1),
            Rect::new(mid, body.y0, body.x1, body.y1),
        )
    } else {
        let split = body.y0 + body.height() * GENRE_SHARE;
        (
            Rect::new(body.x0, body.y0, body.x1, split),
            Rect::new(body.x0, split, body.x1, split + body.height() * DESCRIPTOR_SHARE),
        )
    };

    let mut elements = genre_block(ctx, album, genres);
    elements.extend(descriptor_block(ctx, album, descriptors));
    Ok(elements)
}

/// "Genres" heading and one truncated line per genre, as many as fit.
fn genre_block(ctx: &PlanCtx<'_>, album: &Album, area: Rect) -> Vec<Element> {
    let theme = ctx.theme();
    if album.genres().is_empty() {
        return Vec::new();
    }
    let size = theme.sizes.metadata.min(area.height() / DEFAULT_LINE_HEIGHT);
    if size < theme.sizes.min {
        tracing::debug!(height = area.height(), "genre block too short for a heading");
        return Vec::new();
    }
    let line_h = size * DEFAULT_LINE_HEIGHT;
    let rows = ((area.height() + 1e-6) / line_h).floor() as usize;

    let heading = FitRequest::new("Genres", &theme.fonts.bold, area.width(), line_h, size)
        .color(theme.text_color);
    let mut elements = text_elements(TextRole::PanelHeading, ctx.fit(&heading), area.x0, area.y0);
    for (i, genre) in album.genres().iter().take(rows.saturating_sub(1)).enumerate() {
        let req = FitRequest::new(genre, &theme.fonts.body, area.width(), line_h, size)
            .color(theme.text_color);
        elements.extend(text_elements(
            TextRole::Genre,
            ctx.fit(&req),
            area.x0,
            area.y0 + (i + 1) as f64 * line_h,
        ));
    }
    elements
}

fn descriptor_block(ctx: &PlanCtx<'_>, album: &Album, area: Rect) -> Vec<Element> {
    if album.descriptors().is_empty() {
        return Vec::new();
    }
    let theme = ctx.theme();
    let text = format!("Descriptors: {}", album.descriptors().join(", "));
    let req = FitRequest::new(
        &text,
        &theme.fonts.body,
        area.width(),
        area.height(),
        theme.sizes.metadata,
    )
    .floor(theme.sizes.min)
    .overflow(OverflowPolicy::Wrap)
    .color(theme.text_color);
    text_elements(TextRole::Descriptor, ctx.fit(&req), area.x0, area.y0)
}
