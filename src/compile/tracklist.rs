//! Inside panel: tracklist split into tape sides, with a duration minimap per side.

use crate::compile::builder::{PlanCtx, text_elements};
use crate::compile::metadata::format_duration;
use crate::compile::plan::{Element, Minimap, MinimapSegment, TapeSide, TextRole};
use crate::foundation::core::{Align, Rect, Vec2};
use crate::foundation::error::{CardgenError, CardgenResult};
use crate::foundation::math::{descending_grid, fits};
use crate::layout::geometry::PanelFrame;
use crate::model::album::{Album, Track};
use crate::model::card::CardKind;
use crate::text::fit::{DEFAULT_LINE_HEIGHT, FitRequest, OverflowPolicy, SIZE_STEP};

/// Share of the inside panel a four-panel card keeps for the tracklist; the rest holds
/// descriptors.
const FOUR_PANEL_LIST_SHARE: f64 = 0.7;
/// Narrowest minimap worth drawing next to a side header.
const MIN_MINIMAP_PT: f64 = 12.0;
const HEADING: &str = "Tracklist";

/// Tracks assigned to one side of the tape.
#[derive(Clone, Debug)]
pub(crate) struct SidePlan<'t> {
    pub(crate) side: TapeSide,
    /// Unused tape before the first track.
    pub(crate) offset_secs: u64,
    pub(crate) tracks: Vec<(usize, &'t Track)>,
}

impl SidePlan<'_> {
    fn duration_secs(&self) -> u64 {
        self.tracks
            .iter()
            .map(|(_, t)| u64::from(t.duration_secs))
            .sum()
    }
}

/// Distribute tracks over the two sides of a tape with `capacity` seconds per side.
///
/// One album fills Side A in order until a track does not fit, then everything else goes to
/// Side B, which starts after Side A's unused tape. Two albums get one side each.
pub(crate) fn assign_sides<'t>(albums: &'t [Album], capacity: u64) -> Vec<SidePlan<'t>> {
    let sides = match albums {
        [album] => {
            let mut a = Vec::new();
            let mut b = Vec::new();
            let mut used = 0u64;
            for track in album.tracks() {
                let secs = u64::from(track.duration_secs);
                if b.is_empty() && used + secs <= capacity {
                    used += secs;
                    a.push((0, track));
                } else {
                    b.push((0, track));
                }
            }
            let mut sides = vec![SidePlan {
                side: TapeSide::A,
                offset_secs: 0,
                tracks: a,
            }];
            if !b.is_empty() {
                sides.push(SidePlan {
                    side: TapeSide::B,
                    offset_secs: capacity.saturating_sub(used),
                    tracks: b,
                });
            }
            sides
        }
        _ => albums
            .iter()
            .take(2)
            .enumerate()
            .map(|(i, album)| SidePlan {
                side: if i == 0 { TapeSide::A } else { TapeSide::B },
                offset_secs: 0,
                tracks: album.tracks().iter().map(|t| (i, t)).collect(),
            })
            .collect(),
    };
    for side in &sides {
        let total = side.offset_secs + side.duration_secs();
        if total > capacity {
            tracing::debug!(
                side = side.side.label(),
                total,
                capacity,
                "side runs past the tape length"
            );
        }
    }
    sides
}

/// Minimap segments as fractions of the side capacity.
pub(crate) fn minimap_segments(side: &SidePlan<'_>, capacity: u64) -> Vec<MinimapSegment> {
    let cap = capacity.max(1) as f64;
    let mut at = side.offset_secs;
    side.tracks
        .iter()
        .map(|(album, track)| {
            let start = at;
            at += u64::from(track.duration_secs);
            MinimapSegment {
                album: *album,
                track: track.number,
                start: (start as f64 / cap).min(1.0),
                end: (at as f64 / cap).min(1.0),
            }
        })
        .collect()
}

enum Row<'s, 't> {
    Heading,
    Side(&'s SidePlan<'t>),
    Track(usize, &'t Track),
}

/// A row fitted at one size, positioned relative to its own top edge.
struct LaidRow {
    height: f64,
    is_track: bool,
    elements: Vec<Element>,
}

fn shifted(element: Element, dy: f64) -> Element {
    match element {
        Element::Text(mut t) => {
            t.run = t.run.translated(0.0, dy);
            Element::Text(t)
        }
        Element::Minimap(mut m) => {
            m.dest = m.dest + Vec2::new(0.0, dy);
            Element::Minimap(m)
        }
        Element::Image(mut i) => {
            i.dest = i.dest + Vec2::new(0.0, dy);
            Element::Image(i)
        }
        Element::Logo(mut l) => {
            l.dest = l.dest + Vec2::new(0.0, dy);
            Element::Logo(l)
        }
    }
}

fn lay_out(
    ctx: &PlanCtx<'_>,
    rows: &[Row<'_, '_>],
    size: f64,
    area: Rect,
    capacity: u64,
) -> Vec<LaidRow> {
    let theme = ctx.theme();
    let fonts = &theme.fonts;
    let line_h = size * DEFAULT_LINE_HEIGHT;
    let gap = size * 0.5;

    let tracks = rows.iter().filter_map(|r| match r {
        Row::Track(_, t) => Some(*t),
        _ => None,
    });
    let (mut num_w, mut dur_w) = (0.0f64, 0.0f64);
    for track in tracks {
        num_w = num_w.max(ctx.width(&number_text(track), &fonts.mono, size));
        dur_w = dur_w.max(ctx.width(&duration_text(track), &fonts.body, size));
    }
    let title_x = area.x0 + num_w + gap;
    let title_w = (area.width() - num_w - dur_w - 2.0 * gap).max(0.0);

    rows.iter()
        .map(|row| match row {
            Row::Heading => {
                let heading_size = theme.sizes.title.min(size + 2.0);
                let h = heading_size * DEFAULT_LINE_HEIGHT;
                let req = FitRequest::new(HEADING, &fonts.bold, area.width(), h, heading_size)
                    .color(theme.text_color);
                LaidRow {
                    height: h,
                    is_track: false,
                    elements: text_elements(TextRole::PanelHeading, ctx.fit(&req), area.x0, 0.0),
                }
            }
            Row::Side(side) => {
                let label = side.side.label();
                let req = FitRequest::new(label, &fonts.bold, area.width(), line_h, size)
                    .color(theme.accent_color);
                let runs = ctx.fit(&req);
                let label_w = runs.iter().map(|r| r.bbox.x1).fold(0.0, f64::max);
                let mut elements =
                    text_elements(TextRole::SideHeader { side: side.side }, runs, area.x0, 0.0);
                let map_x = area.x0 + label_w + gap;
                if area.x1 - map_x >= MIN_MINIMAP_PT {
                    elements.push(Element::Minimap(Minimap {
                        side: side.side,
                        dest: Rect::new(map_x, line_h * 0.25, area.x1, line_h * 0.75),
                        capacity_secs: capacity,
                        offset_secs: side.offset_secs,
                        segments: minimap_segments(side, capacity),
                    }));
                }
                LaidRow {
                    height: line_h,
                    is_track: false,
                    elements,
                }
            }
            Row::Track(album, track) => {
                let max_lines = match theme.track_title_overflow {
                    OverflowPolicy::Wrap => 2.0,
                    OverflowPolicy::Truncate => 1.0,
                };
                let title_req =
                    FitRequest::new(&track.title, &fonts.body, title_w, max_lines * line_h, size)
                        .spacing(0.0, theme.min_track_title_char_spacing)
                        .overflow(theme.track_title_overflow)
                        .color(theme.text_color);
                let title = ctx.fit(&title_req);
                let height = title.len().max(1) as f64 * line_h;

                let number = number_text(track);
                let number_req = FitRequest::new(&number, &fonts.mono, num_w, line_h, size)
                    .color(theme.text_color)
                    .align(Align::Right);
                let duration = duration_text(track);
                let duration_req = FitRequest::new(&duration, &fonts.body, dur_w, line_h, size)
                    .color(theme.text_color)
                    .align(Align::Right);

                let mut elements =
                    text_elements(TextRole::TrackNumber, ctx.fit(&number_req), area.x0, 0.0);
                elements.extend(text_elements(
                    TextRole::TrackTitle {
                        album: *album,
                        number: track.number,
                    },
                    title,
                    title_x,
                    0.0,
                ));
                elements.extend(text_elements(
                    TextRole::TrackDuration,
                    ctx.fit(&duration_req),
                    area.x1 - dur_w,
                    0.0,
                ));
                LaidRow {
                    height,
                    is_track: true,
                    elements,
                }
            }
        })
        .collect()
}

fn number_text(track: &Track) -> String {
    format!("{:>2}.", track.number)
}

fn duration_text(track: &Track) -> String {
    format_duration(u64::from(track.duration_secs))
}

pub(crate) fn inside(ctx: &mut PlanCtx<'_>, frame: &PanelFrame) -> CardgenResult<Vec<Element>> {
    let theme = ctx.theme();
    let body = ctx.content_box(frame);
    let four_panel = ctx.card.kind() == CardKind::FourPanel;
    let list_area = if four_panel {
        Rect::new(
            body.x0,
            body.y0,
            body.x1,
            body.y0 + body.height() * FOUR_PANEL_LIST_SHARE,
        )
    } else {
        body
    };

    let capacity = theme.side_capacity_secs();
    let sides = assign_sides(ctx.card.albums(), capacity);
    let mut rows = vec![Row::Heading];
    for side in &sides {
        rows.push(Row::Side(side));
        rows.extend(side.tracks.iter().map(|&(album, track)| Row::Track(album, track)));
    }
    let has_tracks = rows.iter().any(|r| matches!(r, Row::Track(..)));

    let mut laid = Vec::new();
    let mut chosen = theme.sizes.min;
    for size in descending_grid(theme.sizes.track, theme.sizes.min, SIZE_STEP) {
        laid = lay_out(ctx, &rows, size, list_area, capacity);
        chosen = size;
        let total: f64 = laid.iter().map(|r| r.height).sum();
        if fits(total, list_area.height()) {
            break;
        }
    }

    let mut elements = Vec::new();
    let mut y = list_area.y0;
    let mut kept_track = false;
    let total_rows = laid.len();
    let mut kept = 0;
    for row in laid {
        if !fits(y + row.height, list_area.y1) {
            break;
        }
        kept_track |= row.is_track;
        elements.extend(row.elements.into_iter().map(|e| shifted(e, y)));
        y += row.height;
        kept += 1;
    }
    if kept == 0 || (has_tracks && !kept_track) {
        return Err(CardgenError::render(
            frame.name.as_str(),
            format!(
                "tracklist heading and first track do not fit {:.1}pt at {chosen}pt",
                list_area.height()
            ),
        ));
    }
    if kept < total_rows {
        tracing::debug!(
            dropped = total_rows - kept,
            size = chosen,
            "tracklist exceeds the inside panel; dropping trailing rows"
        );
    } else {
        tracing::debug!(size = chosen, rows = kept, "tracklist size chosen");
    }

    if four_panel {
        let descriptors = ctx.album(0).descriptors().join(", ");
        let area_h = body.y1 - list_area.y1;
        let req = FitRequest::new(
            &descriptors,
            &theme.fonts.body,
            body.width(),
            area_h,
            theme.sizes.metadata,
        )
        .floor(theme.sizes.min)
        .overflow(OverflowPolicy::Wrap)
        .color(theme.text_color);
        elements.extend(text_elements(
            TextRole::Descriptor,
            ctx.fit(&req),
            body.x0,
            list_area.y1,
        ));
    }

    Ok(elements)
}

#[cfg(test)]
#[path = "../../tests/unit/compile/tracklist.rs"]
mod tests;
