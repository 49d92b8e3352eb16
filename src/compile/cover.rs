//! Front panel: cover artwork above a title/artist band.

use crate::compile::builder::{PlanCtx, text_elements};
use crate::compile::plan::{Element, TextRole};
use crate::foundation::core::{Align, Rect};
use crate::foundation::error::{CardgenError, CardgenResult};
use crate::foundation::math::align_offset;
use crate::layout::geometry::PanelFrame;
use crate::model::theme::CoverArtMode;
use crate::text::fit::{DEFAULT_LINE_HEIGHT, FitRequest, OverflowPolicy};

/// Height of the text band under the artwork, capped at 30% of the panel.
const TEXT_BAND_PT: f64 = 60.0;
const TITLE_SHARE: f64 = 0.6;

pub(crate) fn front(ctx: &mut PlanCtx<'_>, frame: &PanelFrame) -> CardgenResult<Vec<Element>> {
    let idx = frame.album.unwrap_or(0);
    let theme = ctx.theme();
    let album = ctx.album(idx);
    let size = frame.content_size();
    let body = ctx.content_box(frame);
    let pad = body.x0;
    let reserve = TEXT_BAND_PT.min(0.3 * size.height);

    let mut elements = Vec::new();

    if let Some(art) = ctx.art(idx)
        && let Some((iw, ih)) = art.dimensions()
    {
        let (iw, ih) = (f64::from(iw), f64::from(ih));
        let (dest, crop) = match theme.cover_art_mode {
            CoverArtMode::Square => {
                let area_h = (size.height - reserve - 2.0 * pad).max(0.0);
                let side = body.width().min(area_h);
                let x = pad + align_offset(body.width(), side, theme.cover_art_align);
                (Rect::new(x, pad, x + side, pad + side), square_crop(iw, ih))
            }
            CoverArtMode::Fullscale => {
                let dest = Rect::new(0.0, 0.0, size.width, size.height - reserve);
                (dest, fullscale_crop(iw, ih, dest, theme.cover_art_align))
            }
        };
        if dest.area() > 0.0 {
            elements.push(ctx.image(&art, idx, dest, crop));
        }
    }

    let band_top = size.height - reserve;
    let band_h = (reserve - pad).max(0.0);
    let title_h = band_h * TITLE_SHARE;
    let artist_h = band_h - title_h;

    let title_req = FitRequest::new(
        album.title(),
        &theme.fonts.title,
        body.width(),
        title_h,
        theme.sizes.title,
    )
    .floor(theme.sizes.min)
    .overflow(OverflowPolicy::Wrap)
    .color(theme.text_color)
    .align(Align::Center);
    let title = ctx.fit(&title_req);
    if title.is_empty() && !album.title().trim().is_empty() {
        return Err(CardgenError::render(
            frame.name.as_str(),
            format!("title does not fit a {:.1}pt x {title_h:.1}pt band", body.width()),
        ));
    }
    elements.extend(text_elements(TextRole::Title, title, pad, band_top));

    let artist_size = theme.sizes.artist.min(artist_h / DEFAULT_LINE_HEIGHT);
    if artist_size > 0.0 {
        let artist_req = FitRequest::new(
            album.artist(),
            &theme.fonts.artist,
            body.width(),
            artist_h,
            artist_size,
        )
        .color(theme.text_color)
        .align(Align::Center);
        let artist = ctx.fit(&artist_req);
        elements.extend(text_elements(TextRole::Artist, artist, pad, band_top + title_h));
    }

    Ok(elements)
}

/// Centered square crop of a `w` x `h` image.
pub(crate) fn square_crop(w: f64, h: f64) -> Rect {
    let side = w.min(h);
    let x = (w - side) / 2.0;
    let y = (h - side) / 2.0;
    Rect::new(x, y, x + side, y + side)
}

/// Source crop that covers `dest` with the image scaled to the destination height.
///
/// Images too narrow for that are scaled to the destination width and cropped vertically
/// around their center instead.
pub(crate) fn fullscale_crop(w: f64, h: f64, dest: Rect, align: Align) -> Rect {
    let (dw, dh) = (dest.width(), dest.height());
    if dw <= 0.0 || dh <= 0.0 {
        return Rect::new(0.0, 0.0, w, h);
    }
    let scale = dh / h;
    if w * scale >= dw {
        let crop_w = dw / scale;
        let x = align_offset(w, crop_w, align);
        Rect::new(x, 0.0, x + crop_w, h)
    } else {
        let scale = dw / w;
        let crop_h = dh / scale;
        let y = (h - crop_h) / 2.0;
        Rect::new(0.0, y, w, y + crop_h)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/cover.rs"]
mod tests;
