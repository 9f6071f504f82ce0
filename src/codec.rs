//! Image persistence boundary
//!
//! The canvas only hands ARGB pixels to a codec and takes ARGB pixels back.
//! File formats live entirely behind [`ImageCodec`].

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use tracing::debug;

use crate::buffer::PixelBuffer;
use crate::color;
use crate::error::{CanvasError, Result};

/// Encoder/decoder for whole images
pub trait ImageCodec {
    fn encode(&self, image: &PixelBuffer) -> Result<Vec<u8>>;

    /// Parse bytes into a new buffer. A failure never touches existing buffers.
    fn decode(&self, bytes: &[u8]) -> Result<PixelBuffer>;
}

/// PNG through the `image` crate, RGBA8 on the wire
#[derive(Debug, Clone, Copy, Default)]
pub struct PngCodec;

impl ImageCodec for PngCodec {
    fn encode(&self, image: &PixelBuffer) -> Result<Vec<u8>> {
        let rgba = to_rgba_image(image);
        let mut out = Cursor::new(Vec::new());
        rgba.write_to(&mut out, ImageFormat::Png)
            .map_err(|e| CanvasError::Encode(e.to_string()))?;
        let bytes = out.into_inner();
        debug!(width = image.width(), height = image.height(), len = bytes.len(), "encoded png");
        Ok(bytes)
    }

    fn decode(&self, bytes: &[u8]) -> Result<PixelBuffer> {
        let decoded = image::load_from_memory_with_format(bytes, ImageFormat::Png)
            .map_err(|e| CanvasError::Decode(e.to_string()))?
            .to_rgba8();
        let (width, height) = decoded.dimensions();
        debug!(width, height, "decoded png");

        let pixels = decoded
            .pixels()
            .map(|&Rgba([r, g, b, a])| color::argb(a, r, g, b))
            .collect();
        PixelBuffer::from_pixels(width, height, pixels)
            .map_err(|e| CanvasError::Decode(e.to_string()))
    }
}

/// Repack ARGB words as an RGBA8 image
pub fn to_rgba_image(image: &PixelBuffer) -> RgbaImage {
    let (width, height) = image.size();
    RgbaImage::from_fn(width, height, |x, y| {
        let c = image.pixels()[(y * width + x) as usize];
        Rgba([color::red(c), color::green(c), color::blue(c), color::alpha(c)])
    })
}
