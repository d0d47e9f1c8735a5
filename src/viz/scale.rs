//! Scales mapping data values to pixels and colors.

use plotters::prelude::*;
use std::collections::HashMap;

/// Categorical palette for per-country series (11 colors, cycles when exhausted).
const CATEGORICAL11: [RGBColor; 11] = [
    RGBColor(0x7F, 0x3C, 0x8D), // purple
    RGBColor(0x11, 0xA5, 0x79), // green
    RGBColor(0x39, 0x69, 0xAC), // blue
    RGBColor(0xF2, 0xB7, 0x01), // yellow
    RGBColor(0xE7, 0x3F, 0x74), // pink
    RGBColor(0x80, 0xBA, 0x5A), // light green
    RGBColor(0xE6, 0x83, 0x10), // orange
    RGBColor(0x00, 0x86, 0x95), // teal
    RGBColor(0xCF, 0x1C, 0x90), // magenta
    RGBColor(0xF9, 0x7B, 0x72), // salmon
    RGBColor(0x4B, 0x4B, 0x8F), // indigo
];

/// Nine-step sequential red ramp, light to dark.
const REDS9: [(u8, u8, u8); 9] = [
    (0xff, 0xf5, 0xf0),
    (0xfe, 0xe0, 0xd2),
    (0xfc, 0xbb, 0xa1),
    (0xfc, 0x92, 0x72),
    (0xfb, 0x6a, 0x4a),
    (0xef, 0x3b, 0x2c),
    (0xcb, 0x18, 0x1d),
    (0xa5, 0x0f, 0x15),
    (0x67, 0x00, 0x0d),
];

/// Step between ticks for `count` ticks over `start..stop`, on the 1/2/5 x 10^k grid.
/// Negative results encode `1 / step` for sub-unit steps, keeping the arithmetic exact.
fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / count.max(1) as f64;
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -10f64.powf(-power) / factor
    }
}

/// Continuous linear mapping from a value domain to a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn map(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if (d1 - d0).abs() < f64::EPSILON {
            return (r0 + r1) / 2.0;
        }
        r0 + (v - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Extend the domain outward to round tick boundaries.
    pub fn nice(mut self, count: usize) -> Self {
        let (mut start, mut stop) = self.domain;
        let reversed = stop < start;
        if reversed {
            std::mem::swap(&mut start, &mut stop);
        }
        if (stop - start).abs() < f64::EPSILON {
            start -= 1.0;
            stop += 1.0;
        }
        let mut prestep = f64::NAN;
        for _ in 0..10 {
            let step = tick_increment(start, stop, count);
            if step == prestep {
                break;
            } else if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                break;
            }
            prestep = step;
        }
        self.domain = if reversed { (stop, start) } else { (start, stop) };
        self
    }

    /// Round tick values inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = if self.domain.0 <= self.domain.1 {
            self.domain
        } else {
            (self.domain.1, self.domain.0)
        };
        let step = tick_increment(lo, hi, count);
        if step == 0.0 {
            return vec![lo];
        }
        let mut out = Vec::new();
        if step > 0.0 {
            let (i0, i1) = ((lo / step).ceil() as i64, (hi / step).floor() as i64);
            out.extend((i0..=i1).map(|i| i as f64 * step));
        } else {
            let inv = -step;
            let (i0, i1) = ((lo * inv).ceil() as i64, (hi * inv).floor() as i64);
            out.extend((i0..=i1).map(|i| i as f64 / inv));
        }
        out
    }
}

/// Evenly spaced positions for an ordered set of categories.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointScale {
    pub len: usize,
    pub range: (f64, f64),
}

impl PointScale {
    pub fn new(len: usize, range: (f64, f64)) -> Self {
        Self { len, range }
    }

    pub fn position(&self, idx: usize) -> f64 {
        let (r0, r1) = self.range;
        if self.len < 2 {
            return (r0 + r1) / 2.0;
        }
        r0 + (r1 - r0) * idx as f64 / (self.len - 1) as f64
    }
}

/// Assigns palette colors to names in order of first appearance.
#[derive(Debug, Default, Clone)]
pub struct OrdinalPalette {
    index: HashMap<String, usize>,
}

impl OrdinalPalette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color(&mut self, name: &str) -> RGBColor {
        let next = self.index.len();
        let idx = *self.index.entry(name.to_string()).or_insert(next);
        CATEGORICAL11[idx % CATEGORICAL11.len()]
    }
}

/// Sequential red ramp; `t` is clamped to `[0, 1]`.
pub fn sequential_reds(t: f64) -> RGBColor {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let last = REDS9.len() - 1;
    let pos = t * last as f64;
    let i = (pos.floor() as usize).min(last - 1);
    let f = pos - i as f64;
    let (a, b) = (REDS9[i], REDS9[i + 1]);
    let lerp = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * f).round() as u8;
    RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

/// `#rrggbb` for a color.
pub fn hex(c: RGBColor) -> String {
    format!("#{:02x}{:02x}{:02x}", c.0, c.1, c.2)
}
