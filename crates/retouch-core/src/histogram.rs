//! Histogram computation over a raster.
//!
//! The collaborator layer draws the histogram widget; the core only supplies
//! the binned data. Histograms are usually computed over the preview so the
//! display tracks the slider state.

use crate::luminance::luminance_u8;
use crate::raster::RasterBuffer;

/// 256-bin channel and luminance histograms.
#[derive(Debug, Clone)]
pub struct Histogram {
    /// Red channel bins.
    pub red: [u32; 256],
    /// Green channel bins.
    pub green: [u32; 256],
    /// Blue channel bins.
    pub blue: [u32; 256],
    /// BT.709 luminance bins.
    pub luminance: [u32; 256],
}

impl Default for Histogram {
    fn default() -> Self {
        Self {
            red: [0; 256],
            green: [0; 256],
            blue: [0; 256],
            luminance: [0; 256],
        }
    }
}

impl Histogram {
    /// Compute all four histograms in a single pass over the raster.
    ///
    /// Fully transparent pixels still contribute; the histogram reflects
    /// stored channel values, not composited ones.
    pub fn of(raster: &RasterBuffer) -> Self {
        let mut hist = Self::default();
        for px in raster.pixels.chunks_exact(4) {
            hist.red[px[0] as usize] += 1;
            hist.green[px[1] as usize] += 1;
            hist.blue[px[2] as usize] += 1;
            hist.luminance[luminance_u8(px[0], px[1], px[2]) as usize] += 1;
        }
        hist
    }

    /// Largest bin count across the color channels, for display scaling.
    pub fn max_value(&self) -> u32 {
        let max_r = self.red.iter().max().copied().unwrap_or(0);
        let max_g = self.green.iter().max().copied().unwrap_or(0);
        let max_b = self.blue.iter().max().copied().unwrap_or(0);
        max_r.max(max_g).max(max_b)
    }

    /// True when any channel clips at pure white.
    pub fn has_highlight_clipping(&self) -> bool {
        self.red[255] > 0 || self.green[255] > 0 || self.blue[255] > 0
    }

    /// True when any channel clips at pure black.
    pub fn has_shadow_clipping(&self) -> bool {
        self.red[0] > 0 || self.green[0] > 0 || self.blue[0] > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_raster() {
        let hist = Histogram::of(&RasterBuffer::transparent(0, 0));
        assert_eq!(hist.max_value(), 0);
    }

    #[test]
    fn test_solid_gray() {
        let img = RasterBuffer::solid(10, 10, [128, 128, 128, 255]);
        let hist = Histogram::of(&img);
        assert_eq!(hist.red[128], 100);
        assert_eq!(hist.green[128], 100);
        assert_eq!(hist.blue[128], 100);
        assert_eq!(hist.luminance[128], 100);
        assert!(!hist.has_highlight_clipping());
        assert!(!hist.has_shadow_clipping());
    }

    #[test]
    fn test_primaries_bin_correctly() {
        let mut img = RasterBuffer::transparent(3, 1);
        img.put(0, 0, [255, 0, 0, 255]);
        img.put(1, 0, [0, 255, 0, 255]);
        img.put(2, 0, [0, 0, 255, 255]);
        let hist = Histogram::of(&img);
        assert_eq!(hist.red[255], 1);
        assert_eq!(hist.red[0], 2);
        assert_eq!(hist.green[255], 1);
        assert_eq!(hist.blue[255], 1);
        assert!(hist.has_highlight_clipping());
        assert!(hist.has_shadow_clipping());
    }

    #[test]
    fn test_gradient_fills_every_bin() {
        let mut img = RasterBuffer::transparent(256, 1);
        for x in 0..256u32 {
            let v = x as u8;
            img.put(x, 0, [v, v, v, 255]);
        }
        let hist = Histogram::of(&img);
        for i in 0..256 {
            assert_eq!(hist.red[i], 1);
        }
        assert_eq!(hist.max_value(), 1);
    }

    #[test]
    fn test_clipping_flags() {
        let white = RasterBuffer::solid(2, 2, [255, 255, 255, 255]);
        assert!(Histogram::of(&white).has_highlight_clipping());
        assert!(!Histogram::of(&white).has_shadow_clipping());

        let black = RasterBuffer::solid(2, 2, [0, 0, 0, 255]);
        assert!(Histogram::of(&black).has_shadow_clipping());
    }
}
