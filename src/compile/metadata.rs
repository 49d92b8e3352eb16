//! Back panel: album facts in two columns, read along the rotated panel.

use crate::compile::builder::{PlanCtx, text_elements};
use crate::compile::plan::{Element, TextRole};
use crate::foundation::error::CardgenResult;
use crate::foundation::math::{descending_grid, fits};
use crate::layout::geometry::PanelFrame;
use crate::text::fit::{DEFAULT_LINE_HEIGHT, FitRequest, SIZE_STEP};

const GENRE_LABEL: &str = "Genre: ";

/// `H:MM:SS` from one hour on, `M:SS` below.
pub(crate) fn format_duration(secs: u64) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

struct Row {
    text: String,
    /// Continuation rows start under the value of the row above.
    indented: bool,
}

fn left_rows(genres: &[String]) -> Vec<Row> {
    genres
        .iter()
        .enumerate()
        .map(|(i, g)| Row {
            text: if i == 0 {
                format!("{GENRE_LABEL}{g}")
            } else {
                g.clone()
            },
            indented: i > 0,
        })
        .collect()
}

fn right_rows(year: Option<i32>, label: Option<&str>, duration: u64, tracks: usize) -> Vec<Row> {
    let mut rows = Vec::with_capacity(4);
    if let Some(year) = year {
        rows.push(format!("Year: {year}"));
    }
    if let Some(label) = label {
        rows.push(format!("Label: {label}"));
    }
    rows.push(format!("Duration: {}", format_duration(duration)));
    rows.push(format!("Tracks: {tracks}"));
    rows.into_iter()
        .map(|text| Row {
            text,
            indented: false,
        })
        .collect()
}

pub(crate) fn back(ctx: &mut PlanCtx<'_>, frame: &PanelFrame) -> CardgenResult<Vec<Element>> {
    let theme = ctx.theme();
    let album = ctx.album(frame.album.unwrap_or(0));
    let body = ctx.content_box(frame);
    let font = &theme.fonts.body;

    let columns = [
        left_rows(album.genres()),
        right_rows(
            album.year(),
            album.label(),
            album.total_duration_secs(),
            album.tracks().len(),
        ),
    ];
    let tallest = columns.iter().map(Vec::len).max().unwrap_or(0);
    if tallest == 0 {
        return Ok(Vec::new());
    }

    let size = descending_grid(theme.sizes.metadata, theme.sizes.min, SIZE_STEP)
        .find(|&s| fits(tallest as f64 * s * DEFAULT_LINE_HEIGHT, body.height()))
        .unwrap_or(theme.sizes.min);
    let line_h = size * DEFAULT_LINE_HEIGHT;
    let max_rows = ((body.height() + 1e-6) / line_h).floor() as usize;
    if tallest > max_rows {
        tracing::debug!(
            panel = %frame.name,
            rows = tallest,
            max_rows,
            "metadata rows exceed the panel; dropping trailing rows"
        );
    }

    let col_w = body.width() / 2.0;
    let indent = ctx.width(GENRE_LABEL, font, size);
    let mut elements = Vec::new();
    for (col, rows) in columns.iter().enumerate() {
        let x = body.x0 + col as f64 * col_w;
        for (i, row) in rows.iter().take(max_rows).enumerate() {
            let dx = if row.indented { indent.min(col_w / 2.0) } else { 0.0 };
            let req = FitRequest::new(&row.text, font, col_w - dx, line_h, size)
                .color(theme.text_color);
            let runs = ctx.fit(&req);
            elements.extend(text_elements(
                TextRole::Metadata,
                runs,
                x + dx,
                body.y0 + i as f64 * line_h,
            ));
        }
    }
    Ok(elements)
}

#[cfg(test)]
#[path = "../../tests/unit/compile/metadata.rs"]
mod tests;
