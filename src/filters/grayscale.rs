//! Grayscale conversion with contrast and brightness.
//!
//! Uses ITU-R BT.601 luminosity coefficients. Contrast and brightness are
//! applied to the luma value, then written to R, G and B. Alpha passes
//! through unchanged.
//!
//! Pure per-pixel map, processed row-parallel.

use serde::Serialize;

use super::core::{map_pixels, to_u8};
use super::params::{clamp_param, ParamSpec};
use crate::buffer::PixelBuffer;

/// ITU-R BT.601 luminosity coefficients
const LUMA_R: f64 = 0.299;
const LUMA_G: f64 = 0.587;
const LUMA_B: f64 = 0.114;

/// Luma of an 8-bit RGB triple (BT.601), unrounded.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> f64 {
    LUMA_R * r as f64 + LUMA_G * g as f64 + LUMA_B * b as f64
}

/// Black & white conversion with contrast and brightness controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GrayscaleContrastBrightness {
    contrast: f64,
    brightness: f64,
}

impl GrayscaleContrastBrightness {
    pub const CONTRAST: ParamSpec = ParamSpec {
        name: "contrast",
        label: "Contrast",
        min: -100.0,
        max: 100.0,
        step: 1.0,
        default: 0.0,
    };

    pub const BRIGHTNESS: ParamSpec = ParamSpec {
        name: "brightness",
        label: "Brightness",
        min: -100.0,
        max: 100.0,
        step: 1.0,
        default: 0.0,
    };

    pub const PARAMS: &'static [ParamSpec] = &[Self::CONTRAST, Self::BRIGHTNESS];

    pub fn new(contrast: f64, brightness: f64) -> Self {
        let mut filter = Self::default();
        filter.set_contrast(contrast);
        filter.set_brightness(brightness);
        filter
    }

    pub fn contrast(&self) -> f64 {
        self.contrast
    }

    /// Clamped to [-100, 100].
    pub fn set_contrast(&mut self, contrast: f64) {
        self.contrast = clamp_param(contrast, Self::CONTRAST.min, Self::CONTRAST.max);
    }

    pub fn brightness(&self) -> f64 {
        self.brightness
    }

    /// Clamped to [-100, 100].
    pub fn set_brightness(&mut self, brightness: f64) {
        self.brightness = clamp_param(brightness, Self::BRIGHTNESS.min, Self::BRIGHTNESS.max);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Convert to grayscale, then apply contrast and brightness.
    ///
    /// Contrast maps [-100, 100] to a factor of [0, 2] around mid-gray
    /// (128); brightness maps [-100, 100] to an offset of [-255, 255].
    pub fn apply(&self, input: &PixelBuffer) -> PixelBuffer {
        let contrast_factor = (self.contrast + 100.0) / 100.0;
        let brightness_offset = (self.brightness / 100.0) * 255.0;

        map_pixels(input, |[r, g, b, a]| {
            let gray = luma(r, g, b);
            let gray = (gray - 128.0) * contrast_factor + 128.0;
            let gray = to_u8(gray + brightness_offset);
            [gray, gray, gray, a]
        })
    }
}

impl Default for GrayscaleContrastBrightness {
    fn default() -> Self {
        Self {
            contrast: Self::CONTRAST.default,
            brightness: Self::BRIGHTNESS.default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(rgba: [u8; 4]) -> PixelBuffer {
        PixelBuffer::filled(1, 1, rgba).unwrap()
    }

    #[test]
    fn test_red_uses_bt601_weight() {
        let result = GrayscaleContrastBrightness::default().apply(&single([255, 0, 0, 255]));
        // 0.299 * 255 = 76.245
        assert_eq!(result.pixel(0, 0).unwrap(), [76, 76, 76, 255]);
    }

    #[test]
    fn test_green_and_blue_weights() {
        let filter = GrayscaleContrastBrightness::default();
        // 0.587 * 255 = 149.685
        assert_eq!(filter.apply(&single([0, 255, 0, 255])).pixel(0, 0).unwrap()[0], 150);
        // 0.114 * 255 = 29.07
        assert_eq!(filter.apply(&single([0, 0, 255, 255])).pixel(0, 0).unwrap()[0], 29);
    }

    #[test]
    fn test_neutral_params_equal_plain_grayscale() {
        let bytes: Vec<u8> = (0..64u8).map(|i| i.wrapping_mul(37)).collect();
        let input = PixelBuffer::new(4, 4, bytes).unwrap();
        let result = GrayscaleContrastBrightness::new(0.0, 0.0).apply(&input);

        for y in 0..4 {
            for x in 0..4 {
                let [r, g, b, a] = input.pixel(x, y).unwrap();
                let expected = luma(r, g, b);
                let [gr, gg, gb, ga] = result.pixel(x, y).unwrap();
                assert!((gr as f64 - expected).abs() <= 0.5 + 1e-9);
                assert_eq!((gr, gr, ga), (gg, gb, a));
            }
        }
    }

    #[test]
    fn test_preserves_alpha() {
        let result = GrayscaleContrastBrightness::new(50.0, -20.0).apply(&single([10, 200, 30, 100]));
        assert_eq!(result.pixel(0, 0).unwrap()[3], 100);
    }

    #[test]
    fn test_brightness_saturates_mid_gray() {
        let input = PixelBuffer::filled(4, 4, [128, 128, 128, 255]).unwrap();
        let result = GrayscaleContrastBrightness::new(0.0, 50.0).apply(&input);
        // 128 + 127.5 = 255.5 -> clamped to 255
        assert!(result.as_bytes().iter().all(|&v| v == 255));
    }

    #[test]
    fn test_contrast_spreads_around_mid_gray() {
        let filter = GrayscaleContrastBrightness::new(100.0, 0.0);
        // factor 2: (150 - 128) * 2 + 128 = 172
        assert_eq!(filter.apply(&single([150, 150, 150, 255])).pixel(0, 0).unwrap()[0], 172);
        // (100 - 128) * 2 + 128 = 72
        assert_eq!(filter.apply(&single([100, 100, 100, 255])).pixel(0, 0).unwrap()[0], 72);

        // factor 0 collapses everything onto mid-gray
        let flat = GrayscaleContrastBrightness::new(-100.0, 0.0);
        assert_eq!(flat.apply(&single([200, 200, 200, 255])).pixel(0, 0).unwrap()[0], 128);
        assert_eq!(flat.apply(&single([10, 240, 90, 255])).pixel(0, 0).unwrap()[0], 128);
    }

    #[test]
    fn test_setters_clamp() {
        let mut filter = GrayscaleContrastBrightness::new(250.0, -300.0);
        assert_eq!(filter.contrast(), 100.0);
        assert_eq!(filter.brightness(), -100.0);

        filter.set_contrast(-42.0);
        assert_eq!(filter.contrast(), -42.0);

        filter.reset();
        assert_eq!(filter, GrayscaleContrastBrightness::default());
    }

    #[test]
    fn test_empty_buffer_unchanged() {
        let input = PixelBuffer::empty();
        assert_eq!(GrayscaleContrastBrightness::new(10.0, 10.0).apply(&input), input);
    }
}
