//! Core raster type shared by every pipeline stage.
//!
//! A [`RasterBuffer`] owns interleaved 8-bit RGBA pixel data in row-major
//! order. It is a plain value type: stages never mutate their input, they
//! build and return a new buffer.

use crate::luminance::luminance_u8;

/// An RGBA raster with 8 bits per channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    /// Length is always width * height * 4.
    pub pixels: Vec<u8>,
}

impl RasterBuffer {
    /// Create a raster from existing pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width as usize) * (height as usize) * 4,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a fully transparent raster of the given size.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; (width as usize) * (height as usize) * 4],
        }
    }

    /// Create an opaque raster filled with a single color.
    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        let mut pixels = Vec::with_capacity((width as usize) * (height as usize) * 4);
        for _ in 0..(width as usize) * (height as usize) {
            pixels.extend_from_slice(&color);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Byte offset of the pixel at (x, y).
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }

    /// Read the pixel at (x, y).
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.index(x, y);
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Write the pixel at (x, y).
    #[inline]
    pub fn put(&mut self, x: u32, y: u32, px: [u8; 4]) {
        let i = self.index(x, y);
        self.pixels[i..i + 4].copy_from_slice(&px);
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// True when the raster holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    /// Convert into the image crate's RGBA buffer for resampling/codecs.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Build a raster from the image crate's RGBA buffer.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Flatten to a single BT.709 luminance plane (one byte per pixel).
    pub fn to_gray(&self) -> Vec<u8> {
        self.pixels
            .chunks_exact(4)
            .map(|px| luminance_u8(px[0], px[1], px[2]))
            .collect()
    }

    /// Extract one channel as a contiguous plane.
    ///
    /// Channel index: 0 = R, 1 = G, 2 = B, 3 = A.
    pub fn channel(&self, c: usize) -> Vec<u8> {
        debug_assert!(c < 4);
        self.pixels.chunks_exact(4).map(|px| px[c]).collect()
    }

    /// Recombine RGB planes with this raster's alpha channel.
    ///
    /// Planes must match this raster's dimensions.
    pub fn with_rgb_channels(&self, r: &[u8], g: &[u8], b: &[u8]) -> Self {
        debug_assert_eq!(r.len(), self.pixel_count());
        debug_assert_eq!(g.len(), self.pixel_count());
        debug_assert_eq!(b.len(), self.pixel_count());
        let mut pixels = Vec::with_capacity(self.pixels.len());
        for (i, px) in self.pixels.chunks_exact(4).enumerate() {
            pixels.push(r[i]);
            pixels.push(g[i]);
            pixels.push(b[i]);
            pixels.push(px[3]);
        }
        Self {
            width: self.width,
            height: self.height,
            pixels,
        }
    }

    /// Build an opaque raster from a single gray plane.
    pub fn from_gray(width: u32, height: u32, gray: &[u8]) -> Self {
        debug_assert_eq!(gray.len(), (width as usize) * (height as usize));
        let mut pixels = Vec::with_capacity(gray.len() * 4);
        for &v in gray {
            pixels.extend_from_slice(&[v, v, v, 255]);
        }
        Self {
            width,
            height,
            pixels,
        }
    }
}
