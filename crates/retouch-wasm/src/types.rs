//! WASM-compatible wrapper types for raster data.
//!
//! JavaScript sees a [`JsRaster`] with dimensions and an RGBA byte view;
//! the pixel payload lives in WASM memory until explicitly copied out.

use retouch_core::RasterBuffer;
use wasm_bindgen::prelude::*;

/// An RGBA raster handed across the WASM boundary.
///
/// # Memory Management
///
/// Pixel data stays in WASM memory; `pixels()` copies it out as a
/// `Uint8Array` (RGBA order, 4 bytes per pixel) for canvas upload via
/// `ImageData`. wasm-bindgen's finalizer releases the WASM side, or call
/// `free()` to do it eagerly for large images.
#[wasm_bindgen]
pub struct JsRaster {
    raster: RasterBuffer,
}

#[wasm_bindgen]
impl JsRaster {
    /// Build a raster from dimensions and RGBA bytes (4 per pixel).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsRaster, JsValue> {
        if pixels.len() != (width as usize) * (height as usize) * 4 {
            return Err(JsValue::from_str("pixel buffer must be width*height*4 bytes"));
        }
        Ok(JsRaster {
            raster: RasterBuffer::new(width, height, pixels),
        })
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.raster.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.raster.height
    }

    /// Byte length of the RGBA buffer.
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.raster.pixels.len()
    }

    /// Copy the RGBA pixel data into JavaScript memory.
    pub fn pixels(&self) -> js_sys::Uint8Array {
        js_sys::Uint8Array::from(&self.raster.pixels[..])
    }

    /// Explicitly release WASM memory (optional).
    pub fn free_now(self) {
        // Dropping self releases the buffer
    }
}

impl JsRaster {
    /// Wrap a core raster (internal).
    pub(crate) fn from_raster(raster: RasterBuffer) -> Self {
        Self { raster }
    }

    /// Unwrap into a core raster, cloning the pixels.
    pub(crate) fn to_raster(&self) -> RasterBuffer {
        self.raster.clone()
    }
}
