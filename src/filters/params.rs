//! Parameter descriptors and clamp-on-write helpers.
//!
//! Every filter parameter has a closed legal range. Setters clamp into it
//! instead of failing, mirroring a continuous slider. The descriptors let a
//! host build its own controls without knowing each filter type.

use serde::Serialize;

/// Descriptor for one numeric filter parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParamSpec {
    /// Key accepted by `Filter::param` / `Filter::set_param`.
    pub name: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    /// Slider increment.
    pub step: f64,
    pub default: f64,
}

/// Clamp `value` into `[min, max]`. NaN resolves to `min`.
#[inline]
pub fn clamp_param(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

/// Round to the nearest integer, then clamp into `[min, max]`.
#[inline]
pub fn clamp_int_param(value: f64, min: u32, max: u32) -> u32 {
    clamp_param(value.round(), min as f64, max as f64) as u32
}
