//! Filter kinds and the [`Filter`] sum type.
//!
//! ## Filters
//!
//! | Kind | Id | Parameters | Edge policy |
//! |------|----|------------|-------------|
//! | Grayscale + contrast/brightness | `black-and-white` | contrast, brightness | per-pixel |
//! | Gaussian blur | `gaussian-blur` | radius, sigma | clamp-to-edge |
//! | Hue rotate | `hue-rotate` | degrees | per-pixel |
//! | Saturation | `saturation` | saturation | per-pixel |
//! | Sharpen | `sharpen` | amount | border copied |
//! | Median noise reduction | `noise-reduction` | strength | border copied |
//!
//! ## Architecture
//!
//! All filters follow these principles:
//! - **RGBA8 in, RGBA8 out** - output has the input's dimensions
//! - **Pure** - the input buffer is never mutated
//! - **Alpha preservation** - alpha passes through, except Gaussian blur
//!   which blurs it like the color channels
//! - **Clamp on write** - parameter setters never fail
//! - **Thread-safe** - rows are processed in parallel with rayon

pub mod blur;
pub mod color_science;
pub mod core;
pub mod grayscale;
pub mod noise;
pub mod params;
pub mod sharpen;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;

pub use blur::GaussianBlur;
pub use color_science::{HueRotate, Saturation};
pub use grayscale::GrayscaleContrastBrightness;
pub use noise::MedianNoiseReduction;
pub use params::ParamSpec;
pub use sharpen::Sharpen;

// ============================================================================
// Filter Kinds
// ============================================================================

/// The six filter kinds, in palette order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterKind {
    #[serde(rename = "gaussian-blur")]
    GaussianBlur,
    #[serde(rename = "black-and-white")]
    GrayscaleContrastBrightness,
    #[serde(rename = "hue-rotate")]
    HueRotate,
    #[serde(rename = "sharpen")]
    Sharpen,
    #[serde(rename = "saturation")]
    Saturation,
    #[serde(rename = "noise-reduction")]
    MedianNoiseReduction,
}

impl FilterKind {
    pub const ALL: [FilterKind; 6] = [
        FilterKind::GaussianBlur,
        FilterKind::GrayscaleContrastBrightness,
        FilterKind::HueRotate,
        FilterKind::Sharpen,
        FilterKind::Saturation,
        FilterKind::MedianNoiseReduction,
    ];

    /// Stable identifier.
    pub fn id(self) -> &'static str {
        match self {
            FilterKind::GaussianBlur => "gaussian-blur",
            FilterKind::GrayscaleContrastBrightness => "black-and-white",
            FilterKind::HueRotate => "hue-rotate",
            FilterKind::Sharpen => "sharpen",
            FilterKind::Saturation => "saturation",
            FilterKind::MedianNoiseReduction => "noise-reduction",
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            FilterKind::GaussianBlur => "Gaussian Blur",
            FilterKind::GrayscaleContrastBrightness => "Black & White",
            FilterKind::HueRotate => "Hue Rotate",
            FilterKind::Sharpen => "Sharpen",
            FilterKind::Saturation => "Saturation",
            FilterKind::MedianNoiseReduction => "Noise Reduction",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            FilterKind::GaussianBlur => "Apply a smooth blur effect to the image",
            FilterKind::GrayscaleContrastBrightness => {
                "Convert to grayscale with contrast and brightness controls"
            }
            FilterKind::HueRotate => "Rotate colors around the color wheel",
            FilterKind::Sharpen => "Enhance edges and details in the image",
            FilterKind::Saturation => "Adjust color intensity",
            FilterKind::MedianNoiseReduction => "Reduce image noise and graininess",
        }
    }

    pub fn param_specs(self) -> &'static [ParamSpec] {
        match self {
            FilterKind::GaussianBlur => GaussianBlur::PARAMS,
            FilterKind::GrayscaleContrastBrightness => GrayscaleContrastBrightness::PARAMS,
            FilterKind::HueRotate => HueRotate::PARAMS,
            FilterKind::Sharpen => Sharpen::PARAMS,
            FilterKind::Saturation => Saturation::PARAMS,
            FilterKind::MedianNoiseReduction => MedianNoiseReduction::PARAMS,
        }
    }

    /// A filter of this kind with default parameters.
    pub fn default_filter(self) -> Filter {
        match self {
            FilterKind::GaussianBlur => Filter::GaussianBlur(GaussianBlur::default()),
            FilterKind::GrayscaleContrastBrightness => {
                Filter::GrayscaleContrastBrightness(GrayscaleContrastBrightness::default())
            }
            FilterKind::HueRotate => Filter::HueRotate(HueRotate::default()),
            FilterKind::Sharpen => Filter::Sharpen(Sharpen::default()),
            FilterKind::Saturation => Filter::Saturation(Saturation::default()),
            FilterKind::MedianNoiseReduction => {
                Filter::MedianNoiseReduction(MedianNoiseReduction::default())
            }
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Returned when parsing an unknown filter id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter id: {0}")]
pub struct UnknownFilter(pub String);

impl FromStr for FilterKind {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterKind::ALL
            .into_iter()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| UnknownFilter(s.to_string()))
    }
}

// ============================================================================
// Filter
// ============================================================================

/// One pixel transformation with its own parameters.
///
/// Variants hold only owned scalar parameters, so `clone()` is a full deep
/// copy: a layer created from a template never aliases it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", from = "FilterRepr")]
pub enum Filter {
    #[serde(rename = "black-and-white")]
    GrayscaleContrastBrightness(GrayscaleContrastBrightness),
    #[serde(rename = "gaussian-blur")]
    GaussianBlur(GaussianBlur),
    #[serde(rename = "hue-rotate")]
    HueRotate(HueRotate),
    #[serde(rename = "saturation")]
    Saturation(Saturation),
    #[serde(rename = "sharpen")]
    Sharpen(Sharpen),
    #[serde(rename = "noise-reduction")]
    MedianNoiseReduction(MedianNoiseReduction),
}

impl Filter {
    /// One default template per kind, in palette order.
    pub fn catalog() -> Vec<Filter> {
        FilterKind::ALL.iter().map(|kind| kind.default_filter()).collect()
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            Filter::GrayscaleContrastBrightness(_) => FilterKind::GrayscaleContrastBrightness,
            Filter::GaussianBlur(_) => FilterKind::GaussianBlur,
            Filter::HueRotate(_) => FilterKind::HueRotate,
            Filter::Saturation(_) => FilterKind::Saturation,
            Filter::Sharpen(_) => FilterKind::Sharpen,
            Filter::MedianNoiseReduction(_) => FilterKind::MedianNoiseReduction,
        }
    }

    pub fn id(&self) -> &'static str {
        self.kind().id()
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn description(&self) -> &'static str {
        self.kind().description()
    }

    /// Apply to `input`, producing a new buffer of identical dimensions.
    pub fn apply(&self, input: &PixelBuffer) -> PixelBuffer {
        match self {
            Filter::GrayscaleContrastBrightness(f) => f.apply(input),
            Filter::GaussianBlur(f) => f.apply(input),
            Filter::HueRotate(f) => f.apply(input),
            Filter::Saturation(f) => f.apply(input),
            Filter::Sharpen(f) => f.apply(input),
            Filter::MedianNoiseReduction(f) => f.apply(input),
        }
    }

    /// Restore default parameters.
    pub fn reset(&mut self) {
        match self {
            Filter::GrayscaleContrastBrightness(f) => f.reset(),
            Filter::GaussianBlur(f) => f.reset(),
            Filter::HueRotate(f) => f.reset(),
            Filter::Saturation(f) => f.reset(),
            Filter::Sharpen(f) => f.reset(),
            Filter::MedianNoiseReduction(f) => f.reset(),
        }
    }

    pub fn param_specs(&self) -> &'static [ParamSpec] {
        self.kind().param_specs()
    }

    /// Current value of the parameter called `name`.
    pub fn param(&self, name: &str) -> Option<f64> {
        let value = match (self, name) {
            (Filter::GrayscaleContrastBrightness(f), "contrast") => f.contrast(),
            (Filter::GrayscaleContrastBrightness(f), "brightness") => f.brightness(),
            (Filter::GaussianBlur(f), "radius") => f.radius() as f64,
            (Filter::GaussianBlur(f), "sigma") => f.sigma(),
            (Filter::HueRotate(f), "degrees") => f.degrees(),
            (Filter::Saturation(f), "saturation") => f.saturation(),
            (Filter::Sharpen(f), "amount") => f.amount(),
            (Filter::MedianNoiseReduction(f), "strength") => f.strength() as f64,
            _ => return None,
        };
        Some(value)
    }

    /// Set the parameter called `name` through its clamping setter.
    ///
    /// Returns `false` (and changes nothing) for a name this kind does not
    /// have. Integer parameters are rounded to the nearest whole number.
    pub fn set_param(&mut self, name: &str, value: f64) -> bool {
        match (self, name) {
            (Filter::GrayscaleContrastBrightness(f), "contrast") => f.set_contrast(value),
            (Filter::GrayscaleContrastBrightness(f), "brightness") => f.set_brightness(value),
            (Filter::GaussianBlur(f), "radius") => f.set_radius_f64(value),
            (Filter::GaussianBlur(f), "sigma") => f.set_sigma(value),
            (Filter::HueRotate(f), "degrees") => f.set_degrees(value),
            (Filter::Saturation(f), "saturation") => f.set_saturation(value),
            (Filter::Sharpen(f), "amount") => f.set_amount(value),
            (Filter::MedianNoiseReduction(f), "strength") => f.set_strength(value),
            _ => return false,
        }
        true
    }

    /// `(name, value)` for every parameter, in descriptor order.
    pub fn params(&self) -> Vec<(&'static str, f64)> {
        self.param_specs()
            .iter()
            .filter_map(|spec| self.param(spec.name).map(|v| (spec.name, v)))
            .collect()
    }
}

impl From<FilterKind> for Filter {
    fn from(kind: FilterKind) -> Self {
        kind.default_filter()
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.id())?;
        for (i, (name, value)) in self.params().into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        f.write_str(")")
    }
}

// ============================================================================
// Deserialization
// ============================================================================

// Presets are plain data and may be hand-edited, so every value goes back
// through the clamping constructors.
#[derive(Deserialize)]
#[serde(tag = "kind")]
enum FilterRepr {
    #[serde(rename = "black-and-white")]
    GrayscaleContrastBrightness {
        #[serde(default)]
        contrast: f64,
        #[serde(default)]
        brightness: f64,
    },
    #[serde(rename = "gaussian-blur")]
    GaussianBlur {
        #[serde(default = "default_radius")]
        radius: i64,
        #[serde(default = "default_sigma")]
        sigma: f64,
    },
    #[serde(rename = "hue-rotate")]
    HueRotate {
        #[serde(default)]
        degrees: f64,
    },
    #[serde(rename = "saturation")]
    Saturation {
        #[serde(default = "default_saturation")]
        saturation: f64,
    },
    #[serde(rename = "sharpen")]
    Sharpen {
        #[serde(default = "default_amount")]
        amount: f64,
    },
    #[serde(rename = "noise-reduction")]
    MedianNoiseReduction {
        #[serde(default = "default_strength")]
        strength: f64,
    },
}

fn default_radius() -> i64 {
    GaussianBlur::RADIUS.default as i64
}

fn default_sigma() -> f64 {
    GaussianBlur::SIGMA.default
}

fn default_saturation() -> f64 {
    Saturation::SATURATION.default
}

fn default_amount() -> f64 {
    Sharpen::AMOUNT.default
}

fn default_strength() -> f64 {
    MedianNoiseReduction::STRENGTH.default
}

impl From<FilterRepr> for Filter {
    fn from(repr: FilterRepr) -> Self {
        match repr {
            FilterRepr::GrayscaleContrastBrightness {
                contrast,
                brightness,
            } => Filter::GrayscaleContrastBrightness(GrayscaleContrastBrightness::new(
                contrast, brightness,
            )),
            FilterRepr::GaussianBlur { radius, sigma } => {
                Filter::GaussianBlur(GaussianBlur::new(radius, sigma))
            }
            FilterRepr::HueRotate { degrees } => Filter::HueRotate(HueRotate::new(degrees)),
            FilterRepr::Saturation { saturation } => {
                Filter::Saturation(Saturation::new(saturation))
            }
            FilterRepr::Sharpen { amount } => Filter::Sharpen(Sharpen::new(amount)),
            FilterRepr::MedianNoiseReduction { strength } => {
                Filter::MedianNoiseReduction(MedianNoiseReduction::new(strength))
            }
        }
    }
}
