//! Encoding and decoding between compressed image bytes and [`PixelBuffer`].
//!
//! The pipeline itself only sees raw RGBA8. Anything that loads or saves a
//! file goes through an [`ImageCodec`].

use std::io::Cursor;

use image::{DynamicImage, ImageOutputFormat, RgbaImage};

use crate::buffer::PixelBuffer;
use crate::error::{FilterError, Result};

/// Converts between compressed image bytes and RGBA8 pixel buffers.
pub trait ImageCodec {
    fn decode(&self, bytes: &[u8]) -> Result<PixelBuffer>;
    fn encode(&self, buffer: &PixelBuffer) -> Result<Vec<u8>>;
}

/// Decodes any format the `image` crate is built with, encodes PNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngCodec;

impl ImageCodec for PngCodec {
    fn decode(&self, bytes: &[u8]) -> Result<PixelBuffer> {
        let decoded = image::load_from_memory(bytes).map_err(|e| {
            log::warn!("failed to decode {} bytes: {}", bytes.len(), e);
            FilterError::Codec(e.to_string())
        })?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        log::debug!("decoded {}x{} image", width, height);
        PixelBuffer::new(width, height, rgba.into_raw())
    }

    fn encode(&self, buffer: &PixelBuffer) -> Result<Vec<u8>> {
        if buffer.is_empty() {
            return Err(FilterError::Codec("cannot encode an empty image".to_string()));
        }
        let rgba = RgbaImage::from_raw(buffer.width(), buffer.height(), buffer.as_bytes().to_vec())
            .ok_or_else(|| FilterError::Codec("pixel data does not match dimensions".to_string()))?;

        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(rgba)
            .write_to(&mut out, ImageOutputFormat::Png)
            .map_err(|e| FilterError::Codec(e.to_string()))?;
        Ok(out.into_inner())
    }
}
