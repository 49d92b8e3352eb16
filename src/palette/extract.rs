use std::borrow::Cow;

use anyhow::Context;
use image::RgbaImage;

use crate::foundation::core::Rgb;
use crate::foundation::error::CardgenResult;

/// Longest edge of the thumbnail palettes are computed from.
pub const THUMBNAIL_MAX: u32 = 200;

/// Decode encoded artwork bytes to straight RGBA8.
pub fn decode_artwork(bytes: &[u8]) -> CardgenResult<RgbaImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode artwork from memory")?;
    Ok(dyn_img.to_rgba8())
}

/// Median-cut palette of at most `n` colors, most common first.
///
/// Fully transparent pixels are ignored. The result depends only on the pixels and `n`.
pub fn extract_palette(image: &RgbaImage, n: usize) -> Vec<Rgb> {
    if n == 0 {
        return Vec::new();
    }
    let thumb = thumbnail(image);
    let pixels: Vec<[u8; 3]> = thumb
        .pixels()
        .filter(|p| p.0[3] > 0)
        .map(|p| [p.0[0], p.0[1], p.0[2]])
        .collect();
    if pixels.is_empty() {
        return Vec::new();
    }

    let mut buckets = vec![pixels];
    while buckets.len() < n {
        let Some(idx) = next_split(&buckets) else {
            break;
        };
        let (channel, _) = widest_channel(&buckets[idx]);
        let bucket = &mut buckets[idx];
        bucket.sort_unstable_by_key(|p| (p[channel], *p));
        let upper = bucket.split_off(bucket.len() / 2);
        buckets.insert(idx + 1, upper);
    }

    let mut colors: Vec<(usize, Rgb)> = buckets.iter().map(|b| (b.len(), mean(b))).collect();
    colors.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then(a.1.r.total_cmp(&b.1.r))
            .then(a.1.g.total_cmp(&b.1.g))
            .then(a.1.b.total_cmp(&b.1.b))
    });
    colors.into_iter().map(|(_, c)| c).collect()
}

fn thumbnail(image: &RgbaImage) -> Cow<'_, RgbaImage> {
    let (w, h) = image.dimensions();
    let longest = w.max(h);
    if longest <= THUMBNAIL_MAX {
        return Cow::Borrowed(image);
    }
    let scale = f64::from(THUMBNAIL_MAX) / f64::from(longest);
    let nw = ((f64::from(w) * scale).round() as u32).max(1);
    let nh = ((f64::from(h) * scale).round() as u32).max(1);
    Cow::Owned(image::imageops::resize(
        image,
        nw,
        nh,
        image::imageops::FilterType::Nearest,
    ))
}

/// Most populous bucket that can still be split; lowest index wins ties.
fn next_split(buckets: &[Vec<[u8; 3]>]) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (idx, bucket) in buckets.iter().enumerate() {
        if bucket.len() < 2 || widest_channel(bucket).1 == 0 {
            continue;
        }
        if best.is_none_or(|(_, len)| bucket.len() > len) {
            best = Some((idx, bucket.len()));
        }
    }
    best.map(|(idx, _)| idx)
}

fn widest_channel(bucket: &[[u8; 3]]) -> (usize, u8) {
    let mut lo = [u8::MAX; 3];
    let mut hi = [u8::MIN; 3];
    for p in bucket {
        for c in 0..3 {
            lo[c] = lo[c].min(p[c]);
            hi[c] = hi[c].max(p[c]);
        }
    }
    let mut best = (0, 0u8);
    for c in 0..3 {
        let range = hi[c].saturating_sub(lo[c]);
        if range > best.1 {
            best = (c, range);
        }
    }
    best
}

fn mean(bucket: &[[u8; 3]]) -> Rgb {
    let mut sum = [0u64; 3];
    for p in bucket {
        for c in 0..3 {
            sum[c] += u64::from(p[c]);
        }
    }
    let n = bucket.len().max(1) as f64;
    Rgb::new(
        sum[0] as f64 / n / 255.0,
        sum[1] as f64 / n / 255.0,
        sum[2] as f64 / n / 255.0,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/palette/extract.rs"]
mod tests;
