//! Error types for buffer construction, pixel access and stack mutation.
//!
//! Filter parameter setters never fail (out-of-range input is clamped), and
//! neither do `Filter::apply` or `LayerStack::compose`. Everything that can
//! fail is local and recoverable: the engine state is untouched on error.

use thiserror::Error;

use crate::layers::LayerId;

/// Errors surfaced by the filter engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// Byte length does not match `width * height * 4`.
    #[error("invalid dimensions {width}x{height}: expected {expected} bytes, got {actual}")]
    InvalidDimensions {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// Pixel coordinate outside the declared extent.
    #[error("pixel ({x}, {y}) is outside a {width}x{height} buffer")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// A stack mutation referenced a layer id the stack does not hold.
    #[error("layer not found: {0}")]
    LayerNotFound(LayerId),

    /// The decode/encode collaborator failed.
    #[error("codec error: {0}")]
    Codec(String),
}

pub type Result<T> = std::result::Result<T, FilterError>;
