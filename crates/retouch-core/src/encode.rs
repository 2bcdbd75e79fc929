//! Image encoding for exports.
//!
//! Intermediate edits round-trip through lossless PNG; final export may opt
//! into lossy JPEG with a caller-chosen quality. Both encoders work purely
//! in memory.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::ImageEncoder;
use thiserror::Error;

use crate::raster::RasterBuffer;

/// Error raised when a raster cannot be serialized.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The raster's buffer does not match its declared dimensions.
    #[error("Invalid image dimensions")]
    InvalidDimensions,

    /// The underlying encoder failed.
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Encode a raster as lossless PNG.
pub fn encode_png(raster: &RasterBuffer) -> Result<Vec<u8>, EncodeError> {
    if raster.is_empty() || raster.pixels.len() != raster.pixel_count() * 4 {
        return Err(EncodeError::InvalidDimensions);
    }

    let mut out = Vec::new();
    let encoder = PngEncoder::new(Cursor::new(&mut out));
    encoder
        .write_image(
            &raster.pixels,
            raster.width,
            raster.height,
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;
    Ok(out)
}

/// Encode a raster as JPEG at the given quality (1-100).
///
/// JPEG has no alpha channel; the raster is flattened against black before
/// encoding. Quality is clamped to the valid range.
pub fn encode_jpeg(raster: &RasterBuffer, quality: u8) -> Result<Vec<u8>, EncodeError> {
    if raster.is_empty() || raster.pixels.len() != raster.pixel_count() * 4 {
        return Err(EncodeError::InvalidDimensions);
    }

    let quality = quality.clamp(1, 100);
    let rgb: Vec<u8> = raster
        .pixels
        .chunks_exact(4)
        .flat_map(|px| {
            let a = px[3] as u16;
            [
                ((px[0] as u16 * a) / 255) as u8,
                ((px[1] as u16 * a) / 255) as u8,
                ((px[2] as u16 * a) / 255) as u8,
            ]
        })
        .collect();

    let mut out = Vec::new();
    let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut out), quality);
    encoder
        .write_image(
            &rgb,
            raster.width,
            raster.height,
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;
    Ok(out)
}
