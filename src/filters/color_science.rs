//! Color science filters: Hue Rotate, Saturation.
//!
//! Both filters round-trip every pixel through HSL. The conversion lives
//! here once and is shared, so the two filters cannot drift apart.
//!
//! Hue is normalized to [0, 1) (a full turn is 1.0, not 360). Alpha passes
//! through unchanged.

use serde::Serialize;

use super::core::{map_pixels, to_u8};
use super::params::{clamp_param, ParamSpec};
use crate::buffer::PixelBuffer;

// ============================================================================
// Color Space Conversion Utilities
// ============================================================================

/// Convert RGB to HSL.
/// Input: r, g, b in 0.0-1.0
/// Output: (h, s, l) all in 0.0-1.0, h in [0, 1)
#[inline]
pub fn rgb_to_hsl(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return (0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if max == r {
        ((g - b) / d + if g < b { 6.0 } else { 0.0 }) / 6.0
    } else if max == g {
        ((b - r) / d + 2.0) / 6.0
    } else {
        ((r - g) / d + 4.0) / 6.0
    };

    (wrap_unit(h), s, l)
}

/// Convert HSL to RGB.
/// Input: h in [0, 1), s and l in 0.0-1.0
/// Output: (r, g, b) in 0.0-1.0
#[inline]
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    (
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    )
}

#[inline]
fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 { t += 1.0; }
    if t > 1.0 { t -= 1.0; }
    if t < 1.0 / 6.0 { return p + (q - p) * 6.0 * t; }
    if t < 0.5 { return q; }
    if t < 2.0 / 3.0 { return p + (q - p) * (2.0 / 3.0 - t) * 6.0; }
    p
}

/// Wrap into [0, 1), negative values wrap to positive.
#[inline]
fn wrap_unit(v: f64) -> f64 {
    let w = v.rem_euclid(1.0);
    if w >= 1.0 { 0.0 } else { w }
}

/// Run `f` over the HSL representation of every pixel; alpha is kept.
fn map_hsl<F>(input: &PixelBuffer, f: F) -> PixelBuffer
where
    F: Fn(f64, f64, f64) -> (f64, f64, f64) + Sync + Send,
{
    map_pixels(input, |[r, g, b, a]| {
        let (h, s, l) = rgb_to_hsl(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0);
        let (h, s, l) = f(h, s, l);
        let (nr, ng, nb) = hsl_to_rgb(h, s, l);
        [to_u8(nr * 255.0), to_u8(ng * 255.0), to_u8(nb * 255.0), a]
    })
}

// ============================================================================
// Hue Rotate
// ============================================================================

/// Rotate all colors around the color wheel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HueRotate {
    degrees: f64,
}

impl HueRotate {
    pub const DEGREES: ParamSpec = ParamSpec {
        name: "degrees",
        label: "Hue Rotation",
        min: 0.0,
        max: 360.0,
        step: 1.0,
        default: 0.0,
    };

    pub const PARAMS: &'static [ParamSpec] = &[Self::DEGREES];

    pub fn new(degrees: f64) -> Self {
        let mut filter = Self::default();
        filter.set_degrees(degrees);
        filter
    }

    pub fn degrees(&self) -> f64 {
        self.degrees
    }

    /// Normalized into [0, 360); negative angles wrap to positive.
    /// Non-finite input resolves to 0.
    pub fn set_degrees(&mut self, degrees: f64) {
        self.degrees = if degrees.is_finite() {
            let d = degrees.rem_euclid(360.0);
            if d >= 360.0 { 0.0 } else { d }
        } else {
            0.0
        };
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn apply(&self, input: &PixelBuffer) -> PixelBuffer {
        let shift = self.degrees / 360.0;
        map_hsl(input, |h, s, l| (wrap_unit(h + shift), s, l))
    }
}

impl Default for HueRotate {
    fn default() -> Self {
        Self {
            degrees: Self::DEGREES.default,
        }
    }
}

// ============================================================================
// Saturation
// ============================================================================

/// Scale color intensity; 0 is grayscale, 100 is unchanged, 200 doubles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Saturation {
    saturation: f64,
}

impl Saturation {
    pub const SATURATION: ParamSpec = ParamSpec {
        name: "saturation",
        label: "Saturation",
        min: 0.0,
        max: 200.0,
        step: 1.0,
        default: 100.0,
    };

    pub const PARAMS: &'static [ParamSpec] = &[Self::SATURATION];

    pub fn new(saturation: f64) -> Self {
        let mut filter = Self::default();
        filter.set_saturation(saturation);
        filter
    }

    /// Saturation in percent.
    pub fn saturation(&self) -> f64 {
        self.saturation
    }

    /// Clamped to [0, 200].
    pub fn set_saturation(&mut self, saturation: f64) {
        self.saturation = clamp_param(saturation, Self::SATURATION.min, Self::SATURATION.max);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn apply(&self, input: &PixelBuffer) -> PixelBuffer {
        let factor = self.saturation / 100.0;
        map_hsl(input, |h, s, l| (h, (s * factor).clamp(0.0, 1.0), l))
    }
}

impl Default for Saturation {
    fn default() -> Self {
        Self {
            saturation: Self::SATURATION.default,
        }
    }
}
