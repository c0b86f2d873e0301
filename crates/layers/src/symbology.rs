//! Scales and colors shared by the point layer and the chart.
//!
//! Every brightness encoding uses one fixed input domain so that a given
//! brightness always looks the same whatever the filters are.

use std::fmt;

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// Linear map from `domain` to `range`. Extrapolates unless clamped.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LinearScale {
    pub domain: [f64; 2],
    pub range: [f64; 2],
    pub clamp: bool,
}

impl LinearScale {
    pub const fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self {
            domain,
            range,
            clamp: false,
        }
    }

    pub const fn clamped(mut self) -> Self {
        self.clamp = true;
        self
    }

    /// A collapsed domain maps everything to the middle of the range.
    pub fn map(&self, v: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        let mut t = (v - d0) / (d1 - d0);
        if self.clamp {
            t = t.clamp(0.0, 1.0);
        }
        r0 + t * (r1 - r0)
    }

    /// Normalized position of `v` in the domain, clamped to `[0, 1]`.
    pub fn unit(&self, v: f64) -> f64 {
        let [d0, d1] = self.domain;
        if d1 == d0 {
            return 0.5;
        }
        ((v - d0) / (d1 - d0)).clamp(0.0, 1.0)
    }

    /// Extends the domain outward to round tick steps for about `count`
    /// ticks. Collapsed or inverted domains are left alone.
    pub fn nice(mut self, count: usize) -> Self {
        let [mut start, mut stop] = self.domain;
        if !(stop > start) || !start.is_finite() || !stop.is_finite() {
            return self;
        }
        let mut prestep = None;
        for _ in 0..10 {
            let step = tick_increment(start, stop, count);
            if prestep == Some(step) {
                break;
            }
            if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                break;
            }
            prestep = Some(step);
        }
        self.domain = [start, stop];
        self
    }

    /// Round values inside the domain, about `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let [start, stop] = self.domain;
        if !start.is_finite() || !stop.is_finite() || count == 0 {
            return Vec::new();
        }
        if start == stop {
            return vec![start];
        }
        let (lo, hi) = (start.min(stop), start.max(stop));
        let Some((i1, i2, inc)) = tick_spec(lo, hi, count as f64) else {
            return Vec::new();
        };
        if i2 < i1 {
            return Vec::new();
        }
        (i1..=i2)
            .map(|i| {
                if inc < 0.0 {
                    i as f64 / -inc
                } else {
                    i as f64 * inc
                }
            })
            .collect()
    }
}

fn step_factor(error: f64) -> f64 {
    if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    }
}

/// Tick step for `count` ticks; negative values encode `1 / step`.
fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / count.max(1) as f64;
    let power = step.log10().floor();
    let factor = step_factor(step / 10f64.powf(power));
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -(10f64.powf(-power)) / factor
    }
}

fn tick_spec(start: f64, stop: f64, count: f64) -> Option<(i64, i64, f64)> {
    let step = (stop - start) / count;
    if !(step > 0.0) || !step.is_finite() {
        return None;
    }
    let power = step.log10().floor();
    let factor = step_factor(step / 10f64.powf(power));
    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let pos = 10f64.powf(-power) / factor;
        i1 = (start * pos).round() as i64;
        i2 = (stop * pos).round() as i64;
        if (i1 as f64) / pos < start {
            i1 += 1;
        }
        if (i2 as f64) / pos > stop {
            i2 -= 1;
        }
        inc = -pos;
    } else {
        let pos = 10f64.powf(power) * factor;
        i1 = (start / pos).round() as i64;
        i2 = (stop / pos).round() as i64;
        if (i1 as f64) * pos < start {
            i1 += 1;
        }
        if (i2 as f64) * pos > stop {
            i2 -= 1;
        }
        inc = pos;
    }
    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    Some((i1, i2, inc))
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const YELLOW: Rgb = Rgb::new(255, 255, 0);
    pub const STEELBLUE: Rgb = Rgb::new(70, 130, 180);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channel-wise interpolation; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SymbologyStyle {
    pub domain: [f64; 2],
    pub radius_px: [f64; 2],
    pub opacity: [f64; 2],
    pub low_color: Rgb,
    pub high_color: Rgb,
}

impl Default for SymbologyStyle {
    fn default() -> Self {
        Self {
            domain: [325.0, 510.0],
            radius_px: [1.0, 6.0],
            opacity: [0.35, 0.9],
            low_color: Rgb::RED,
            high_color: Rgb::YELLOW,
        }
    }
}

/// Visual encoding of one point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointStyle {
    pub radius: f64,
    pub fill: Rgb,
    pub opacity: f64,
}

/// Brightness to radius, color and opacity over one fixed domain.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FireSymbology {
    radius: LinearScale,
    opacity: LinearScale,
    low_color: Rgb,
    high_color: Rgb,
}

impl FireSymbology {
    pub fn new(style: &SymbologyStyle) -> Self {
        Self {
            radius: LinearScale::new(style.domain, style.radius_px),
            opacity: LinearScale::new(style.domain, style.opacity),
            low_color: style.low_color,
            high_color: style.high_color,
        }
    }

    pub fn color(&self, brightness: f64) -> Rgb {
        self.low_color
            .lerp(self.high_color, self.radius.unit(brightness))
    }

    /// Missing brightness is drawn like the bottom of the domain.
    pub fn encode(&self, brightness: Option<f64>) -> PointStyle {
        let b = brightness
            .filter(|b| b.is_finite())
            .unwrap_or(self.radius.domain[0]);
        PointStyle {
            radius: self.radius.map(b),
            fill: self.color(b),
            opacity: self.opacity.map(b),
        }
    }
}

impl Default for FireSymbology {
    fn default() -> Self {
        Self::new(&SymbologyStyle::default())
    }
}
