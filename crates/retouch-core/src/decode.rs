//! Image decoding for session loads.
//!
//! The core accepts encoded bytes (PNG, JPEG) and converts them to an RGBA
//! [`RasterBuffer`]. Format detection is left to the image crate's content
//! sniffing; a failed decode surfaces as [`DecodeError`] and leaves session
//! state untouched.

use thiserror::Error;

use crate::raster::RasterBuffer;

/// Error raised when input bytes cannot be turned into a raster.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The byte stream is not a recognized or supported image format.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The stream was recognized but could not be fully decoded.
    #[error("Corrupted or incomplete image data: {0}")]
    CorruptedData(String),

    /// The decoded image has zero pixels.
    #[error("Decoded image is empty")]
    EmptyImage,
}

/// Decode PNG or JPEG bytes into an RGBA raster.
pub fn decode_image(bytes: &[u8]) -> Result<RasterBuffer, DecodeError> {
    let dynamic = image::load_from_memory(bytes).map_err(|e| match e {
        image::ImageError::Unsupported(_) => DecodeError::InvalidFormat,
        other => DecodeError::CorruptedData(other.to_string()),
    })?;

    let rgba = dynamic.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(DecodeError::EmptyImage);
    }
    Ok(RasterBuffer::from_rgba_image(rgba))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Encode a tiny PNG in memory to feed the decoder.
    fn png_bytes(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
        let raster = RasterBuffer::solid(width, height, color);
        crate::encode::encode_png(&raster).unwrap()
    }

    #[test]
    fn test_decode_png_roundtrip() {
        let bytes = png_bytes(8, 6, [200, 100, 50, 255]);
        let img = decode_image(&bytes).unwrap();
        assert_eq!(img.width, 8);
        assert_eq!(img.height, 6);
        assert_eq!(img.get(4, 3), [200, 100, 50, 255]);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result = decode_image(&[0xDE, 0xAD, 0xBE, 0xEF]);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_truncated_png_fails() {
        let mut bytes = png_bytes(16, 16, [1, 2, 3, 255]);
        bytes.truncate(bytes.len() / 2);
        assert!(decode_image(&bytes).is_err());
    }

    #[test]
    fn test_decode_empty_input_fails() {
        assert!(decode_image(&[]).is_err());
    }
}
