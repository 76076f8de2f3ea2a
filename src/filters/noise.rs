//! Noise reduction via windowed median filtering.
//!
//! Window size is `2 * strength + 1`. Only pixels whose window lies fully
//! inside the image are filtered; the border of width `strength` is copied
//! verbatim. R, G and B are medianed independently, alpha is copied from
//! the source pixel.

use serde::Serialize;

use super::core::map_rows;
use super::params::{clamp_int_param, ParamSpec};
use crate::buffer::{PixelBuffer, CHANNELS};

// ============================================================================
// Median Selection
// ============================================================================

/// Median of `values` (sorted in place).
///
/// Odd lengths take the middle element. Even lengths average the two middle
/// values, rounded; the filter windows are always odd so this only guards
/// direct callers.
pub fn median_u8(values: &mut [u8]) -> u8 {
    if values.is_empty() {
        return 0;
    }
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        ((values[mid - 1] as u16 + values[mid] as u16 + 1) / 2) as u8
    } else {
        values[mid]
    }
}

// ============================================================================
// Median Noise Reduction
// ============================================================================

/// Median filter with strength 1-5 (3x3 up to 11x11 windows).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MedianNoiseReduction {
    strength: u32,
}

impl MedianNoiseReduction {
    pub const STRENGTH: ParamSpec = ParamSpec {
        name: "strength",
        label: "Strength",
        min: 1.0,
        max: 5.0,
        step: 1.0,
        default: 1.0,
    };

    pub const PARAMS: &'static [ParamSpec] = &[Self::STRENGTH];

    pub fn new(strength: f64) -> Self {
        let mut filter = Self::default();
        filter.set_strength(strength);
        filter
    }

    pub fn strength(&self) -> u32 {
        self.strength
    }

    /// Rounded to the nearest integer, then clamped to [1, 5].
    pub fn set_strength(&mut self, strength: f64) {
        self.strength = clamp_int_param(
            strength,
            Self::STRENGTH.min as u32,
            Self::STRENGTH.max as u32,
        );
    }

    /// Side length of the square window.
    pub fn window_size(&self) -> usize {
        self.strength as usize * 2 + 1
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Apply the median filter. Images smaller than one window are returned
    /// unchanged.
    pub fn apply(&self, input: &PixelBuffer) -> PixelBuffer {
        let width = input.width() as usize;
        let height = input.height() as usize;
        let half = self.strength as usize;
        let window_size = self.window_size();
        if width < window_size || height < window_size {
            return input.clone();
        }

        let src = input.view();
        let area = window_size * window_size;

        map_rows(input, |y, row| {
            if y < half || y >= height - half {
                return;
            }
            let mut values: Vec<u8> = Vec::with_capacity(area);
            for x in half..width - half {
                for c in 0..3 {
                    values.clear();
                    for sy in y - half..=y + half {
                        for sx in x - half..=x + half {
                            values.push(src[[sy, sx, c]]);
                        }
                    }
                    row[x * CHANNELS + c] = median_u8(&mut values);
                }
            }
        })
    }
}

impl Default for MedianNoiseReduction {
    fn default() -> Self {
        Self {
            strength: Self::STRENGTH.default as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_u8() {
        assert_eq!(median_u8(&mut [5, 1, 9]), 5);
        assert_eq!(median_u8(&mut [7, 7, 7, 7, 200, 7, 7, 7, 7]), 7);
        // Even length averages the middle pair
        assert_eq!(median_u8(&mut [1, 4, 2, 9]), 3);
        assert_eq!(median_u8(&mut [10, 20]), 15);
        assert_eq!(median_u8(&mut Vec::new()), 0);
    }

    #[test]
    fn test_strength_rounds_and_clamps() {
        assert_eq!(MedianNoiseReduction::new(2.6).strength(), 3);
        assert_eq!(MedianNoiseReduction::new(0.0).strength(), 1);
        assert_eq!(MedianNoiseReduction::new(12.0).strength(), 5);
        assert_eq!(MedianNoiseReduction::new(4.0).window_size(), 9);

        let mut filter = MedianNoiseReduction::new(5.0);
        filter.reset();
        assert_eq!(filter.strength(), 1);
    }

    #[test]
    fn test_removes_outlier_center() {
        let mut input = PixelBuffer::filled(3, 3, [40, 80, 120, 255]).unwrap();
        input.set_pixel(1, 1, [250, 3, 200, 17]).unwrap();

        let result = MedianNoiseReduction::new(1.0).apply(&input);
        // Color follows the eight identical neighbors; alpha stays the source's.
        assert_eq!(result.pixel(1, 1).unwrap(), [40, 80, 120, 17]);
    }

    #[test]
    fn test_border_is_copied_verbatim() {
        let bytes: Vec<u8> = (0..196u32).map(|i| (i * 31 % 251) as u8).collect();
        let input = PixelBuffer::new(7, 7, bytes).unwrap();
        let result = MedianNoiseReduction::new(2.0).apply(&input);

        for y in 0..7 {
            for x in 0..7 {
                if x < 2 || y < 2 || x > 4 || y > 4 {
                    assert_eq!(result.pixel(x, y).unwrap(), input.pixel(x, y).unwrap());
                }
            }
        }
    }

    #[test]
    fn test_alpha_never_medianed() {
        let bytes: Vec<u8> = (0..100u32).map(|i| (i * 97 % 256) as u8).collect();
        let input = PixelBuffer::new(5, 5, bytes).unwrap();
        let result = MedianNoiseReduction::new(1.0).apply(&input);
        for (src, dst) in input.as_bytes().chunks_exact(4).zip(result.as_bytes().chunks_exact(4)) {
            assert_eq!(src[3], dst[3]);
        }
    }

    #[test]
    fn test_flat_region_idempotent() {
        let input = PixelBuffer::filled(8, 6, [90, 90, 200, 255]).unwrap();
        let filter = MedianNoiseReduction::new(2.0);
        let once = filter.apply(&input);
        let twice = filter.apply(&once);
        assert_eq!(once, twice);
        assert_eq!(once, input);
    }

    #[test]
    fn test_image_smaller_than_window() {
        let input = PixelBuffer::new(4, 4, (0..64).collect()).unwrap();
        assert_eq!(MedianNoiseReduction::new(2.0).apply(&input), input);
        assert_eq!(
            MedianNoiseReduction::default().apply(&PixelBuffer::empty()),
            PixelBuffer::empty()
        );
    }
}
