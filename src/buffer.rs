//! RGBA8 pixel buffer shared by every filter.
//!
//! The buffer is a flat, row-major `R,G,B,A` byte sequence with no row
//! padding. Its length is always `width * height * 4`. Filters never mutate
//! the buffer they read; each application allocates a new one with the same
//! dimensions.
//!
//! Filters read pixels through [`PixelBuffer::view`], which exposes the bytes
//! as an `ndarray` view of shape `(height, width, 4)`.

use ndarray::{Array3, ArrayView3};

use crate::error::{FilterError, Result};

/// Number of interleaved channels per pixel.
pub const CHANNELS: usize = 4;

/// Width/height-tagged RGBA byte raster.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap an RGBA byte sequence.
    ///
    /// Fails with [`FilterError::InvalidDimensions`] when `pixels.len()` is not
    /// `width * height * 4`.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = byte_len(width, height);
        match expected {
            Some(expected) if expected == pixels.len() => Ok(Self {
                width,
                height,
                pixels,
            }),
            _ => Err(FilterError::InvalidDimensions {
                width,
                height,
                expected: expected.unwrap_or(usize::MAX),
                actual: pixels.len(),
            }),
        }
    }

    /// Buffer of the given size with every pixel set to `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self> {
        let len = byte_len(width, height).ok_or(FilterError::InvalidDimensions {
            width,
            height,
            expected: usize::MAX,
            actual: 0,
        })?;
        let pixels = rgba.iter().copied().cycle().take(len).collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// The 0x0 buffer.
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            pixels: Vec::new(),
        }
    }

    /// Build from an `(height, width, 4)` array.
    pub fn from_array(array: Array3<u8>) -> Result<Self> {
        let (height, width, channels) = array.dim();
        let invalid = || FilterError::InvalidDimensions {
            width: u32::try_from(width).unwrap_or(u32::MAX),
            height: u32::try_from(height).unwrap_or(u32::MAX),
            expected: width.saturating_mul(height).saturating_mul(CHANNELS),
            actual: array.len(),
        };
        if channels != CHANNELS {
            return Err(invalid());
        }
        let w = u32::try_from(width).map_err(|_| invalid())?;
        let h = u32::try_from(height).map_err(|_| invalid())?;

        let pixels = if array.is_standard_layout() {
            array.into_raw_vec_and_offset().0
        } else {
            array.iter().copied().collect()
        };
        Self::new(w, h, pixels)
    }

    /// Internal constructor for filter outputs that already satisfy the
    /// length invariant.
    pub(crate) fn from_raw_parts(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(Some(pixels.len()), byte_len(width, height));
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// `true` for zero-area buffers.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.pixels
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * CHANNELS
    }

    /// Read the four channel bytes at `(x, y)`.
    ///
    /// Out-of-range coordinates are an error, never clamped: edge handling
    /// belongs to the filters.
    pub fn pixel(&self, x: u32, y: u32) -> Result<[u8; 4]> {
        let i = self.offset(x, y)?;
        Ok([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    /// Overwrite the pixel at `(x, y)`.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) -> Result<()> {
        let i = self.offset(x, y)?;
        self.pixels[i..i + CHANNELS].copy_from_slice(&rgba);
        Ok(())
    }

    /// Borrow as a `(height, width, 4)` array view.
    pub fn view(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(
            (self.height as usize, self.width as usize, CHANNELS),
            &self.pixels,
        )
        .unwrap_or_else(|_| unreachable!("pixel length always matches width * height * 4"))
    }

    /// Copy into an owned `(height, width, 4)` array.
    pub fn to_array(&self) -> Array3<u8> {
        self.view().to_owned()
    }

    fn offset(&self, x: u32, y: u32) -> Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(FilterError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok((y as usize * self.width as usize + x as usize) * CHANNELS)
    }
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

fn byte_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(CHANNELS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_length_mismatch() {
        let err = PixelBuffer::new(2, 2, vec![0; 15]).unwrap_err();
        assert_eq!(
            err,
            FilterError::InvalidDimensions {
                width: 2,
                height: 2,
                expected: 16,
                actual: 15,
            }
        );
        assert!(PixelBuffer::new(2, 2, vec![0; 16]).is_ok());
    }

    #[test]
    fn test_view_shape_matches_dimensions() {
        let filled = PixelBuffer::filled(5, 3, [1, 2, 3, 4]).unwrap();
        assert_eq!(filled.view().dim(), (3, 5, 4));

        let raw = PixelBuffer::from_raw_parts(2, 7, vec![0; 56]);
        assert_eq!(raw.view().dim(), (7, 2, 4));

        assert_eq!(PixelBuffer::empty().view().dim(), (0, 0, 4));
    }

    #[test]
    fn test_zero_area_buffer() {
        let buf = PixelBuffer::new(0, 5, Vec::new()).unwrap();
        assert!(buf.is_empty());
        assert_eq!(buf.height(), 5);
        assert_eq!(buf.view().dim(), (5, 0, 4));
    }

    #[test]
    fn test_pixel_access_is_row_major() {
        let bytes: Vec<u8> = (0..24).collect();
        let buf = PixelBuffer::new(3, 2, bytes).unwrap();

        assert_eq!(buf.pixel(0, 0).unwrap(), [0, 1, 2, 3]);
        assert_eq!(buf.pixel(2, 0).unwrap(), [8, 9, 10, 11]);
        assert_eq!(buf.pixel(0, 1).unwrap(), [12, 13, 14, 15]);
        assert_eq!(buf.view()[[1, 2, 3]], 23);
    }

    #[test]
    fn test_pixel_out_of_bounds() {
        let buf = PixelBuffer::filled(3, 2, [1, 2, 3, 4]).unwrap();
        assert_eq!(
            buf.pixel(3, 0).unwrap_err(),
            FilterError::OutOfBounds {
                x: 3,
                y: 0,
                width: 3,
                height: 2,
            }
        );
        assert!(buf.pixel(0, 2).is_err());
    }

    #[test]
    fn test_set_pixel() {
        let mut buf = PixelBuffer::filled(2, 2, [0, 0, 0, 255]).unwrap();
        buf.set_pixel(1, 1, [9, 8, 7, 6]).unwrap();
        assert_eq!(buf.pixel(1, 1).unwrap(), [9, 8, 7, 6]);
        assert_eq!(buf.pixel(0, 1).unwrap(), [0, 0, 0, 255]);
        assert!(buf.set_pixel(2, 0, [0; 4]).is_err());
    }

    #[test]
    fn test_array_round_trip_keeps_layout() {
        let mut img = Array3::<u8>::zeros((2, 3, 4));
        img[[1, 0, 0]] = 200;
        img[[0, 2, 3]] = 50;

        let buf = PixelBuffer::from_array(img.clone()).unwrap();
        assert_eq!((buf.width(), buf.height()), (3, 2));
        assert_eq!(buf.pixel(0, 1).unwrap()[0], 200);
        assert_eq!(buf.pixel(2, 0).unwrap()[3], 50);
        assert_eq!(buf.to_array(), img);
    }

    #[test]
    fn test_from_array_requires_four_channels() {
        let img = Array3::<u8>::zeros((2, 2, 3));
        assert!(matches!(
            PixelBuffer::from_array(img),
            Err(FilterError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_from_array_non_standard_layout() {
        let mut img = Array3::<u8>::zeros((2, 3, 4));
        img[[0, 1, 2]] = 77;
        // Reversed axes force a non-contiguous traversal order.
        let mut flipped = img.clone();
        flipped.invert_axis(ndarray::Axis(1));

        let buf = PixelBuffer::from_array(flipped).unwrap();
        assert_eq!(buf.pixel(1, 0).unwrap()[2], 77);
    }
}
