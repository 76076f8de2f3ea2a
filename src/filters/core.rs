//! Core utilities shared by the filters:
//! - Gaussian kernel generation
//! - Row-parallel output construction
//! - Edge sampling and channel quantisation helpers

use rayon::prelude::*;

use crate::buffer::{PixelBuffer, CHANNELS};

/// Generate a normalized 1D Gaussian kernel of length `2 * radius + 1`.
///
/// Weights are `exp(-(i - radius)^2 / (2 sigma^2))`, then divided by their
/// sum so the kernel sums to 1 (no brightness drift).
pub fn gaussian_kernel_1d(radius: u32, sigma: f64) -> Vec<f64> {
    let size = radius as usize * 2 + 1;
    let two_sigma_sq = 2.0 * sigma * sigma;

    let mut kernel: Vec<f64> = (0..size)
        .map(|i| {
            let x = i as f64 - radius as f64;
            (-(x * x) / two_sigma_sq).exp()
        })
        .collect();

    // Normalize
    let sum: f64 = kernel.iter().sum();
    for v in kernel.iter_mut() {
        *v /= sum;
    }

    kernel
}

/// Build an output buffer row by row in parallel.
///
/// Each row starts as a copy of the corresponding input row, so a closure
/// that leaves bytes untouched passes them through verbatim. The closure
/// receives the row index and the output row bytes.
pub fn map_rows<F>(input: &PixelBuffer, f: F) -> PixelBuffer
where
    F: Fn(usize, &mut [u8]) + Sync + Send,
{
    if input.is_empty() {
        return input.clone();
    }

    let stride = input.stride();
    let mut output = input.as_bytes().to_vec();
    output
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| f(y, row));

    PixelBuffer::from_raw_parts(input.width(), input.height(), output)
}

/// Apply a per-pixel map in parallel.
pub fn map_pixels<F>(input: &PixelBuffer, f: F) -> PixelBuffer
where
    F: Fn([u8; 4]) -> [u8; 4] + Sync + Send,
{
    map_rows(input, |_, row| {
        for px in row.chunks_exact_mut(CHANNELS) {
            let out = f([px[0], px[1], px[2], px[3]]);
            px.copy_from_slice(&out);
        }
    })
}

/// Clamp a signed sample coordinate to `[0, len - 1]`.
#[inline]
pub fn clamp_index(i: isize, len: usize) -> usize {
    i.clamp(0, len as isize - 1) as usize
}

/// Round to nearest and clamp into the 8-bit channel range.
///
/// Halves round away from zero (127.5 -> 128, 128.5 -> 129), not to even.
#[inline]
pub fn to_u8(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
