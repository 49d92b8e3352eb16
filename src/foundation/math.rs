use crate::foundation::core::{Align, Rgb};

/// Tolerance used for all point-space fit comparisons.
pub(crate) const FIT_EPS: f64 = 1e-6;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64(u64);

impl Fnv1a64 {
    pub(crate) const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub(crate) fn new_default() -> Self {
        Self(Self::OFFSET_BASIS)
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u64 {
        self.0
    }
}

pub(crate) fn fits(measured: f64, limit: f64) -> bool {
    measured <= limit + FIT_EPS
}

/// Offset of `content` inside `container` for the given alignment.
pub(crate) fn align_offset(container: f64, content: f64, align: Align) -> f64 {
    let free = container - content;
    match align {
        Align::Left => 0.0,
        Align::Center => free / 2.0,
        Align::Right => free,
    }
}

/// `base - k * step` clamped at `floor`, for k = 0, 1, 2, ...
///
/// Values are recomputed from the index rather than accumulated so the grid is exact and
/// repeatable.
pub(crate) fn descending_grid(base: f64, floor: f64, step: f64) -> impl Iterator<Item = f64> {
    let steps = if base > floor {
        ((base - floor) / step - 1e-9).ceil() as usize
    } else {
        0
    };
    (0..=steps).map(move |k| {
        if k == 0 {
            base
        } else {
            (base - (k as f64) * step).max(floor)
        }
    })
}

pub(crate) fn rgb_to_hsv(c: Rgb) -> (f64, f64, f64) {
    let max = c.r.max(c.g).max(c.b);
    let min = c.r.min(c.g).min(c.b);
    let delta = max - min;
    let h = if delta <= 0.0 {
        0.0
    } else if max == c.r {
        ((c.g - c.b) / delta).rem_euclid(6.0) / 6.0
    } else if max == c.g {
        ((c.b - c.r) / delta + 2.0) / 6.0
    } else {
        ((c.r - c.g) / delta + 4.0) / 6.0
    };
    let s = if max <= 0.0 { 0.0 } else { delta / max };
    (h, s, max)
}

pub(crate) fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    let h6 = (h.rem_euclid(1.0)) * 6.0;
    let i = h6.floor();
    let f = h6 - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match i as u32 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Rgb::new(r, g, b)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
