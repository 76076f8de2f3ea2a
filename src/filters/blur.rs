//! Gaussian blur for RGBA images.
//!
//! Separable 2-pass convolution: a horizontal pass into an 8-bit
//! intermediate buffer, then a vertical pass into the output. Samples
//! outside the image are clamped to the nearest edge pixel. Alpha is
//! blurred along with RGB.

use serde::Serialize;

use super::core::{clamp_index, gaussian_kernel_1d, map_rows, to_u8};
use super::params::{clamp_int_param, clamp_param, ParamSpec};
use crate::buffer::{PixelBuffer, CHANNELS};

/// Gaussian blur with an explicit kernel radius and standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GaussianBlur {
    radius: u32,
    sigma: f64,
}

impl GaussianBlur {
    pub const RADIUS: ParamSpec = ParamSpec {
        name: "radius",
        label: "Radius",
        min: 1.0,
        max: 10.0,
        step: 1.0,
        default: 3.0,
    };

    pub const SIGMA: ParamSpec = ParamSpec {
        name: "sigma",
        label: "Sigma",
        min: 0.5,
        max: 5.0,
        step: 0.1,
        default: 2.0,
    };

    pub const PARAMS: &'static [ParamSpec] = &[Self::RADIUS, Self::SIGMA];

    pub fn new(radius: i64, sigma: f64) -> Self {
        let mut filter = Self::default();
        filter.set_radius(radius);
        filter.set_sigma(sigma);
        filter
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Clamped to [1, 10].
    pub fn set_radius(&mut self, radius: i64) {
        self.radius = radius.clamp(Self::RADIUS.min as i64, Self::RADIUS.max as i64) as u32;
    }

    /// Float entry point used by generic parameter access; rounds first.
    pub(crate) fn set_radius_f64(&mut self, radius: f64) {
        self.radius = clamp_int_param(radius, Self::RADIUS.min as u32, Self::RADIUS.max as u32);
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Clamped to [0.5, 5].
    pub fn set_sigma(&mut self, sigma: f64) {
        self.sigma = clamp_param(sigma, Self::SIGMA.min, Self::SIGMA.max);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Normalized kernel for the current parameters.
    pub fn kernel(&self) -> Vec<f64> {
        gaussian_kernel_1d(self.radius, self.sigma)
    }

    /// Apply the blur. Zero-area input is returned unchanged.
    pub fn apply(&self, input: &PixelBuffer) -> PixelBuffer {
        if input.is_empty() {
            return input.clone();
        }

        let kernel = self.kernel();
        let half = self.radius as isize;
        let width = input.width() as usize;
        let height = input.height() as usize;

        // Horizontal pass
        let src = input.view();
        let temp = map_rows(input, |y, row| {
            for x in 0..width {
                for c in 0..CHANNELS {
                    let mut sum = 0.0f64;
                    for (ki, &kv) in kernel.iter().enumerate() {
                        let sx = clamp_index(x as isize + ki as isize - half, width);
                        sum += src[[y, sx, c]] as f64 * kv;
                    }
                    row[x * CHANNELS + c] = to_u8(sum);
                }
            }
        });

        // Vertical pass
        let tmp = temp.view();
        map_rows(&temp, |y, row| {
            for x in 0..width {
                for c in 0..CHANNELS {
                    let mut sum = 0.0f64;
                    for (ki, &kv) in kernel.iter().enumerate() {
                        let sy = clamp_index(y as isize + ki as isize - half, height);
                        sum += tmp[[sy, x, c]] as f64 * kv;
                    }
                    row[x * CHANNELS + c] = to_u8(sum);
                }
            }
        })
    }
}

impl Default for GaussianBlur {
    fn default() -> Self {
        Self {
            radius: Self::RADIUS.default as u32,
            sigma: Self::SIGMA.default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let blur = GaussianBlur::default();
        assert_eq!(blur.radius(), 3);
        assert_eq!(blur.sigma(), 2.0);
        assert_eq!(blur.kernel().len(), 7);
    }

    #[test]
    fn test_setters_clamp() {
        let mut blur = GaussianBlur::new(0, 0.1);
        assert_eq!(blur.radius(), 1);
        assert_eq!(blur.sigma(), 0.5);

        blur.set_radius(42);
        blur.set_sigma(9.0);
        assert_eq!(blur.radius(), 10);
        assert_eq!(blur.sigma(), 5.0);

        blur.set_radius_f64(4.6);
        assert_eq!(blur.radius(), 5);

        blur.reset();
        assert_eq!(blur, GaussianBlur::default());
    }

    #[test]
    fn test_flat_image_unchanged() {
        let input = PixelBuffer::filled(6, 5, [90, 140, 200, 255]).unwrap();
        let result = GaussianBlur::new(4, 3.0).apply(&input);
        assert_eq!(result, input);
    }

    #[test]
    fn test_spreads_single_bright_pixel() {
        let mut input = PixelBuffer::filled(7, 7, [0, 0, 0, 255]).unwrap();
        input.set_pixel(3, 3, [255, 255, 255, 255]).unwrap();

        let result = GaussianBlur::new(1, 1.0).apply(&input);
        let center = result.pixel(3, 3).unwrap()[0];
        let neighbor = result.pixel(4, 3).unwrap()[0];
        let far = result.pixel(6, 6).unwrap()[0];

        assert!(center < 255);
        assert!(neighbor > 0 && neighbor < center);
        assert_eq!(far, 0);
    }

    #[test]
    fn test_impulse_matches_hand_computed_passes() {
        // radius 1, sigma 1: weights [k0, k1, k0]
        let kernel = GaussianBlur::new(1, 1.0).kernel();
        assert!((kernel[0] - 0.274_068_6).abs() < 1e-6);
        assert!((kernel[1] - 0.451_862_7).abs() < 1e-6);

        let mut input = PixelBuffer::filled(3, 3, [0, 0, 0, 255]).unwrap();
        input.set_pixel(1, 1, [100, 100, 100, 255]).unwrap();
        let result = GaussianBlur::new(1, 1.0).apply(&input);

        // Horizontal pass rounds row 1 to [27, 45, 27] before the vertical
        // pass. Corners: 27 * k0 = 7.40 -> 7 (an unrounded intermediate
        // would give 100 * k0^2 = 7.51 -> 8).
        let expected = [[7, 12, 7], [12, 20, 12], [7, 12, 7]];
        for y in 0..3 {
            for x in 0..3 {
                let v = expected[y][x];
                assert_eq!(
                    result.pixel(x as u32, y as u32).unwrap(),
                    [v, v, v, 255],
                    "pixel ({}, {})",
                    x,
                    y
                );
            }
        }
    }

    #[test]
    fn test_clamped_edge_sample_contributes() {
        let mut input = PixelBuffer::filled(5, 1, [0, 0, 0, 255]).unwrap();
        input.set_pixel(0, 0, [255, 255, 255, 255]).unwrap();
        let result = GaussianBlur::new(1, 1.0).apply(&input);

        // x = 0 samples x = -1 clamped onto itself: 255 * (k0 + k1) = 185.11
        assert_eq!(result.pixel(0, 0).unwrap(), [185, 185, 185, 255]);
        // 255 * k0 = 69.89
        assert_eq!(result.pixel(1, 0).unwrap(), [70, 70, 70, 255]);
        assert_eq!(result.pixel(2, 0).unwrap(), [0, 0, 0, 255]);
    }

    #[test]
    fn test_alpha_is_blurred() {
        let mut input = PixelBuffer::filled(5, 1, [0, 0, 0, 0]).unwrap();
        input.set_pixel(2, 0, [0, 0, 0, 255]).unwrap();

        let result = GaussianBlur::new(1, 1.0).apply(&input);
        assert!(result.pixel(1, 0).unwrap()[3] > 0);
        assert!(result.pixel(2, 0).unwrap()[3] < 255);
    }

    #[test]
    fn test_clamp_to_edge_boundary() {
        // Left half black, right half white: the edge column keeps its own
        // value on the outside because samples clamp to it.
        let mut input = PixelBuffer::filled(8, 1, [0, 0, 0, 255]).unwrap();
        for x in 4..8 {
            input.set_pixel(x, 0, [255, 255, 255, 255]).unwrap();
        }

        let result = GaussianBlur::new(2, 1.0).apply(&input);
        assert_eq!(result.pixel(0, 0).unwrap(), [0, 0, 0, 255]);
        assert_eq!(result.pixel(7, 0).unwrap(), [255, 255, 255, 255]);
    }

    #[test]
    fn test_preserves_dimensions() {
        let input = PixelBuffer::filled(3, 9, [1, 2, 3, 4]).unwrap();
        let result = GaussianBlur::default().apply(&input);
        assert_eq!((result.width(), result.height()), (3, 9));
    }

    #[test]
    fn test_empty_buffer_unchanged() {
        let input = PixelBuffer::empty();
        assert_eq!(GaussianBlur::default().apply(&input), input);
    }
}
