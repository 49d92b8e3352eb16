//! Deterministic fitting of arbitrary strings into fixed rectangular regions.
//!
//! The engine tries, in order: the text as-is, tighter character spacing, and then either a
//! greedy word wrap (with font-size reduction and hard splitting of over-long words) or
//! truncation with an ellipsis. Greedy wrapping and spacing compression are order-sensitive
//! heuristics; they do not promise the minimal number of lines.

use crate::foundation::core::{Align, Rect, Rgb};
use crate::foundation::math::{align_offset, descending_grid, fits};
use crate::text::metrics::{FontMetrics, FontRef};

/// Character spacing decrement in points.
pub const SPACING_STEP: f64 = 0.1;
/// Font size decrement in points.
pub const SIZE_STEP: f64 = 0.5;
/// Marker appended to truncated text.
pub const ELLIPSIS: &str = "\u{2026}";
/// Line height as a multiple of the font size unless overridden.
pub const DEFAULT_LINE_HEIGHT: f64 = 1.2;

/// What to do when text still overflows after spacing compression.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Shorten with a trailing ellipsis on a single line.
    #[default]
    Truncate,
    /// Break into several lines, shrinking the size if a single word does not fit.
    Wrap,
}

impl std::str::FromStr for OverflowPolicy {
    type Err = crate::foundation::error::CardgenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "truncate" => Ok(Self::Truncate),
            "wrap" => Ok(Self::Wrap),
            other => Err(crate::foundation::error::CardgenError::config(format!(
                "unknown overflow policy '{other}' (expected truncate or wrap)"
            ))),
        }
    }
}

/// A single fitted line of text.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextRun {
    /// Resolved string after fitting.
    pub text: String,
    /// Font used for measuring and drawing.
    pub font: FontRef,
    /// Point size.
    pub size: f64,
    /// Extra advance between adjacent characters, in points.
    pub spacing: f64,
    /// Fill color.
    pub color: Rgb,
    /// Horizontal alignment inside the fitted region.
    pub align: Align,
    /// Bounding box; relative to the fitted region until placed in a panel.
    pub bbox: Rect,
}

impl TextRun {
    /// Copy of this run moved by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            bbox: Rect::new(
                self.bbox.x0 + dx,
                self.bbox.y0 + dy,
                self.bbox.x1 + dx,
                self.bbox.y1 + dy,
            ),
            ..self.clone()
        }
    }
}

/// Inputs for one fitting call.
#[derive(Clone, Debug)]
pub struct FitRequest<'a> {
    /// Text to fit.
    pub text: &'a str,
    /// Font to measure with.
    pub font: &'a FontRef,
    /// Available width in points.
    pub max_width: f64,
    /// Available height in points. Only bounds wrap mode.
    pub max_height: f64,
    /// Preferred size.
    pub base_size: f64,
    /// Smallest size wrap mode may shrink to.
    pub floor_size: f64,
    /// Preferred character spacing.
    pub base_spacing: f64,
    /// Tightest character spacing allowed.
    pub min_spacing: f64,
    /// Overflow handling.
    pub overflow: OverflowPolicy,
    /// Line height as a multiple of the size.
    pub line_height: f64,
    /// Fill color copied into runs.
    pub color: Rgb,
    /// Alignment used to position runs.
    pub align: Align,
}

impl<'a> FitRequest<'a> {
    /// Request with no shrinking, no spacing compression, truncate policy and left alignment.
    pub fn new(text: &'a str, font: &'a FontRef, max_width: f64, max_height: f64, size: f64) -> Self {
        Self {
            text,
            font,
            max_width,
            max_height,
            base_size: size,
            floor_size: size,
            base_spacing: 0.0,
            min_spacing: 0.0,
            overflow: OverflowPolicy::Truncate,
            line_height: DEFAULT_LINE_HEIGHT,
            color: Rgb::BLACK,
            align: Align::Left,
        }
    }

    /// Allow wrap mode to shrink down to `floor_size`.
    pub fn floor(mut self, floor_size: f64) -> Self {
        self.floor_size = floor_size.min(self.base_size);
        self
    }

    /// Preferred and tightest character spacing.
    pub fn spacing(mut self, base: f64, min: f64) -> Self {
        self.base_spacing = base;
        self.min_spacing = min.min(base);
        self
    }

    /// Overflow handling.
    pub fn overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    /// Line height ratio.
    pub fn line_height(mut self, ratio: f64) -> Self {
        self.line_height = ratio;
        self
    }

    /// Run color.
    pub fn color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    /// Run alignment.
    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}

/// Fit `req.text` into the requested region.
///
/// Identical requests and metrics always produce identical runs.
pub fn fit_text(req: &FitRequest<'_>, metrics: &dyn FontMetrics) -> Vec<TextRun> {
    let text = req.text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let base_line_h = req.base_size * req.line_height;
    let height_ok = req.overflow == OverflowPolicy::Truncate || fits(base_line_h, req.max_height);
    if height_ok
        && let Some(spacing) = loosest_spacing(req, metrics, text, req.base_size)
    {
        return vec![make_run(req, metrics, text, req.base_size, spacing, 0)];
    }

    match req.overflow {
        OverflowPolicy::Wrap => wrap(req, metrics, text),
        OverflowPolicy::Truncate => truncate(req, metrics, text),
    }
}

fn loosest_spacing(
    req: &FitRequest<'_>,
    metrics: &dyn FontMetrics,
    text: &str,
    size: f64,
) -> Option<f64> {
    descending_grid(req.base_spacing, req.min_spacing, SPACING_STEP)
        .find(|&sp| fits(metrics.width(text, req.font, size, sp), req.max_width))
}

fn make_run(
    req: &FitRequest<'_>,
    metrics: &dyn FontMetrics,
    text: &str,
    size: f64,
    spacing: f64,
    line: usize,
) -> TextRun {
    let w = metrics.width(text, req.font, size, spacing);
    let line_h = size * req.line_height;
    let x = align_offset(req.max_width, w, req.align).max(0.0);
    let y = (line as f64) * line_h;
    TextRun {
        text: text.to_string(),
        font: req.font.clone(),
        size,
        spacing,
        color: req.color,
        align: req.align,
        bbox: Rect::new(x, y, x + w, y + line_h),
    }
}

#[derive(Debug)]
struct Token {
    text: String,
    glued: bool,
}

fn wrap(req: &FitRequest<'_>, metrics: &dyn FontMetrics, text: &str) -> Vec<TextRun> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let width_at = |s: &str, size: f64| metrics.width(s, req.font, size, req.min_spacing);

    let size = descending_grid(req.base_size, req.floor_size, SIZE_STEP)
        .find(|&size| {
            fits(size * req.line_height, req.max_height)
                && words.iter().all(|w| fits(width_at(w, size), req.max_width))
        })
        .unwrap_or(req.floor_size);

    let line_h = size * req.line_height;
    if !fits(line_h, req.max_height) {
        tracing::debug!(text, line_h, max_h = req.max_height, "no line fits the region height");
        return Vec::new();
    }
    let max_lines = ((req.max_height + 1e-6) / line_h).floor() as usize;

    let mut tokens: Vec<Token> = Vec::new();
    for word in &words {
        if fits(width_at(word, size), req.max_width) {
            tokens.push(Token {
                text: (*word).to_string(),
                glued: false,
            });
            continue;
        }
        for (i, chunk) in hard_split(word, |s| fits(width_at(s, size), req.max_width))
            .into_iter()
            .enumerate()
        {
            tokens.push(Token {
                text: chunk,
                glued: i > 0,
            });
        }
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for token in tokens {
        if current.is_empty() {
            current = token.text;
            continue;
        }
        let candidate = if token.glued {
            format!("{current}{}", token.text)
        } else {
            format!("{current} {}", token.text)
        };
        if fits(width_at(&candidate, size), req.max_width) {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, token.text));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.len() > max_lines {
        tracing::debug!(
            dropped = lines.len() - max_lines,
            max_lines,
            "wrapped text exceeds region height; dropping trailing lines"
        );
        lines.truncate(max_lines);
    }

    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let spacing = loosest_spacing(req, metrics, line, size).unwrap_or(req.min_spacing);
            make_run(req, metrics, line, size, spacing, i)
        })
        .collect()
}

/// Split `word` at character boundaries into the longest chunks `accept` allows.
///
/// A single character that is rejected on its own is dropped.
fn hard_split(word: &str, accept: impl Fn(&str) -> bool) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    for c in word.chars() {
        current.push(c);
        if accept(&current) {
            continue;
        }
        current.pop();
        if !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        let single = c.to_string();
        if accept(&single) {
            current = single;
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn truncate(req: &FitRequest<'_>, metrics: &dyn FontMetrics, text: &str) -> Vec<TextRun> {
    let boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    let candidate = |n: usize| format!("{}{ELLIPSIS}", text[..boundaries[n]].trim_end());
    let accepts = |n: usize| {
        fits(
            metrics.width(&candidate(n), req.font, req.base_size, req.min_spacing),
            req.max_width,
        )
    };

    if !accepts(0) {
        tracing::debug!(max_w = req.max_width, "not even an ellipsis fits; emitting empty run");
        return vec![make_run(req, metrics, "", req.base_size, req.base_spacing, 0)];
    }
    // Candidate width is monotone in the prefix length.
    let (mut lo, mut hi) = (0, boundaries.len() - 1);
    while lo < hi {
        let mid = lo + (hi - lo).div_ceil(2);
        if accepts(mid) {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }

    let text = candidate(lo);
    let spacing = loosest_spacing(req, metrics, &text, req.base_size).unwrap_or(req.min_spacing);
    vec![make_run(req, metrics, &text, req.base_size, spacing, 0)]
}

#[cfg(test)]
#[path = "../../tests/unit/text/fit.rs"]
mod tests;
