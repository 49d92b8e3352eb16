use std::sync::Arc;

use crate::compile::plan::{Element, Fill, ImagePlacement, PanelRegion, PlacedText, RenderPlan, TextRole};
use crate::compile::{cover, genre, metadata, spine, tracklist};
use crate::foundation::core::Rect;
use crate::foundation::error::{AssetFallbackWarning, CardgenResult, FallbackKind};
use crate::foundation::units::{Dpi, PageSize};
use crate::layout::geometry::{PanelFrame, PanelKind, build_geometry};
use crate::model::album::{Album, AlbumArt};
use crate::model::card::Card;
use crate::palette::gradient::gradient_colors;
use crate::text::fit::{FitRequest, TextRun, fit_text};
use crate::text::metrics::{FontMetrics, FontRef};
use crate::theme::resolver::ResolvedTheme;

/// Page-level options carried into every plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PlanOptions {
    /// Target page; the card must fit it in some orientation.
    pub page_size: PageSize,
    /// Emit crop marks and fold guides when composing pages.
    pub crop_marks: bool,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::Letter,
            crop_marks: true,
        }
    }
}

/// Per-card state shared by the panel content builders.
pub(crate) struct PlanCtx<'a> {
    pub(crate) card: &'a Card,
    pub(crate) dpi: Dpi,
    pub(crate) metrics: &'a dyn FontMetrics,
    pub(crate) warnings: Vec<AssetFallbackWarning>,
    art_checked: Vec<bool>,
}

impl<'a> PlanCtx<'a> {
    fn new(card: &'a Card, dpi: Dpi, metrics: &'a dyn FontMetrics) -> Self {
        Self {
            card,
            dpi,
            metrics,
            warnings: Vec::new(),
            art_checked: vec![false; card.albums().len()],
        }
    }

    pub(crate) fn theme(&self) -> &'a ResolvedTheme {
        self.card.theme()
    }

    pub(crate) fn album(&self, idx: usize) -> &'a Album {
        let albums = self.card.albums();
        &albums[idx.min(albums.len() - 1)]
    }

    /// Decodable artwork of album `idx`. Missing or broken artwork is reported once per album.
    pub(crate) fn art(&mut self, idx: usize) -> Option<Arc<AlbumArt>> {
        let idx = idx.min(self.art_checked.len() - 1);
        let album = self.album(idx);
        let art = album.art().filter(|a| a.image().is_some()).cloned();
        if art.is_none() && !self.art_checked[idx] {
            let message = match album.art() {
                None => format!("no cover art for '{}'", album.title()),
                Some(_) => format!("cover art for '{}' could not be decoded", album.title()),
            };
            self.warnings
                .push(AssetFallbackWarning::emit(FallbackKind::Artwork, message));
        }
        self.art_checked[idx] = true;
        art
    }

    pub(crate) fn fit(&self, req: &FitRequest<'_>) -> Vec<TextRun> {
        fit_text(req, self.metrics)
    }

    pub(crate) fn width(&self, text: &str, font: &FontRef, size: f64) -> f64 {
        self.metrics.width(text, font, size, 0.0)
    }

    /// Content frame of `frame` inset by the theme padding.
    pub(crate) fn content_box(&self, frame: &PanelFrame) -> Rect {
        let size = frame.content_size();
        let pad = self.theme().padding_pt.min(size.width / 4.0).min(size.height / 4.0);
        Rect::new(pad, pad, size.width - pad, size.height - pad)
    }

    pub(crate) fn pixel_size(&self, dest: Rect) -> (u32, u32) {
        (
            self.dpi.pixels(dest.width()).round().max(1.0) as u32,
            self.dpi.pixels(dest.height()).round().max(1.0) as u32,
        )
    }

    pub(crate) fn image(&self, art: &AlbumArt, album: usize, dest: Rect, crop: Rect) -> Element {
        Element::Image(ImagePlacement {
            art: art.id(),
            album,
            dest,
            source_crop: crop,
            pixel_size: self.pixel_size(dest),
        })
    }

    fn background(&mut self, idx: usize) -> Fill {
        let theme = self.theme();
        let solid = Fill::Solid {
            color: theme.background_color,
        };
        if !theme.use_gradient {
            return solid;
        }
        let Some(art) = self.art(idx) else {
            return solid;
        };
        let Some(palette) = art.palette(theme.palette_size) else {
            return solid;
        };
        match gradient_colors(&palette, theme.gradient_indices) {
            Some(pick) => {
                self.warnings.extend(pick.warnings);
                Fill::LinearGradient {
                    start: pick.colors[0],
                    end: pick.colors[1],
                }
            }
            None => {
                let message = format!(
                    "cover art for '{}' has no opaque pixels; using solid background",
                    self.album(idx).title()
                );
                self.warnings
                    .push(AssetFallbackWarning::emit(FallbackKind::Palette, message));
                solid
            }
        }
    }
}

/// Runs moved into panel content coordinates and wrapped as elements.
pub(crate) fn text_elements(role: TextRole, runs: Vec<TextRun>, dx: f64, dy: f64) -> Vec<Element> {
    runs.into_iter()
        .map(|run| {
            Element::Text(PlacedText {
                role,
                run: run.translated(dx, dy),
            })
        })
        .collect()
}

/// Turn one card into its render plan.
///
/// Pure apart from `tracing` output: no drawing and no file IO. Fatal layout problems are
/// returned as errors; asset fallbacks end up in [`RenderPlan::warnings`].
#[tracing::instrument(skip_all, fields(kind = ?card.kind(), dpi = dpi.get()))]
pub fn build_render_plan(
    card: &Card,
    dpi: Dpi,
    metrics: &dyn FontMetrics,
    options: &PlanOptions,
) -> CardgenResult<RenderPlan> {
    let theme = card.theme();
    let geometry = build_geometry(card.kind(), options.page_size)?;

    let mut ctx = PlanCtx::new(card, dpi, metrics);
    ctx.warnings.extend(theme.warnings.iter().cloned());
    for asset in &theme.font_assets {
        if let Err(err) = metrics.register_font(asset) {
            ctx.warnings.push(AssetFallbackWarning::emit(
                FallbackKind::Font,
                format!(
                    "font '{}' could not be loaded for measurement: {err}",
                    asset.key.family
                ),
            ));
        }
    }

    let fills: Vec<Fill> = (0..card.albums().len())
        .map(|idx| ctx.background(idx))
        .collect();

    let mut panels = Vec::with_capacity(geometry.frames.len());
    for frame in &geometry.frames {
        let elements = match frame.kind {
            PanelKind::Front => cover::front(&mut ctx, frame)?,
            PanelKind::Back => metadata::back(&mut ctx, frame)?,
            PanelKind::Spine => spine::spine(&mut ctx, frame)?,
            PanelKind::Inside => tracklist::inside(&mut ctx, frame)?,
            PanelKind::Genre => genre::genre(&mut ctx, frame)?,
        };
        panels.push(PanelRegion {
            frame: frame.clone(),
            background: fills[frame.album.unwrap_or(0).min(fills.len() - 1)].clone(),
            elements,
        });
    }

    tracing::info!(
        panels = panels.len(),
        warnings = ctx.warnings.len(),
        "render plan built"
    );

    Ok(RenderPlan {
        card_kind: card.kind(),
        dpi,
        page_size: options.page_size,
        orientation: geometry.orientation,
        crop_marks: options.crop_marks,
        size: geometry.size,
        panels,
        fold_lines: geometry.fold_lines,
        warnings: ctx.warnings,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/compile/builder.rs"]
mod tests;
