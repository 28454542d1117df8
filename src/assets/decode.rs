use std::path::Path;

use crate::foundation::error::{HalfblockError, HalfblockResult};
use crate::surface::PixelSurface;

/// Straight-alpha RGBA8 pixels produced by the decode boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8, `width * height * 4` bytes.
    pub rgba: Vec<u8>,
}

/// Decode PNG bytes.
pub fn decode_png(bytes: &[u8]) -> HalfblockResult<DecodedImage> {
    let img = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
        .map_err(|e| HalfblockError::invalid_png_data(e.to_string()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(DecodedImage {
        width,
        height,
        rgba: rgba.into_raw(),
    })
}

/// Read and decode a PNG file.
pub fn load_png(path: impl AsRef<Path>) -> HalfblockResult<DecodedImage> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| {
        HalfblockError::invalid_png_file(format!("read '{}': {e}", path.display()))
    })?;
    decode_png(&bytes)
}

impl PixelSurface {
    /// Surface from a decoded image; alpha becomes opacity verbatim.
    pub fn from_decoded(img: &DecodedImage) -> HalfblockResult<Self> {
        Self::from_rgba(&img.rgba, img.width, img.height)
    }

    /// Decode PNG bytes straight into a surface.
    pub fn from_png_bytes(bytes: &[u8]) -> HalfblockResult<Self> {
        Self::from_decoded(&decode_png(bytes)?)
    }

    /// Load a PNG file straight into a surface.
    pub fn from_png_path(path: impl AsRef<Path>) -> HalfblockResult<Self> {
        Self::from_decoded(&load_png(path)?)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
