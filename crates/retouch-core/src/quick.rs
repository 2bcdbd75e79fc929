//! One-click filters: grayscale, sepia, edge detection, emboss, sharpen.
//!
//! The convolution filters use 3x3 kernels with a scale divisor and bias
//! offset, sampling edge pixels by clamping. All five are destructive at
//! the session level.

use crate::luminance::luminance_u8;
use crate::raster::RasterBuffer;

/// The quick filter menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum QuickFilter {
    /// BT.709 luminance grayscale.
    Grayscale,
    /// Warm brown-tone remap.
    Sepia,
    /// Laplacian edge detection.
    EdgeDetect,
    /// Directional relief with mid-gray bias.
    Emboss,
    /// Unsharp-style crispening.
    Sharpen,
}

/// Sepia transform matrix, rows = output R, G, B.
const SEPIA: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// Apply a quick filter.
pub fn apply_quick_filter(src: &RasterBuffer, filter: QuickFilter) -> RasterBuffer {
    if src.is_empty() {
        return src.clone();
    }
    match filter {
        QuickFilter::Grayscale => grayscale(src),
        QuickFilter::Sepia => sepia(src),
        QuickFilter::EdgeDetect => convolve_3x3(
            src,
            &[-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0],
            1.0,
            0.0,
        ),
        QuickFilter::Emboss => convolve_3x3(
            src,
            &[-1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
            1.0,
            128.0,
        ),
        QuickFilter::Sharpen => convolve_3x3(
            src,
            &[-2.0, -2.0, -2.0, -2.0, 32.0, -2.0, -2.0, -2.0, -2.0],
            16.0,
            0.0,
        ),
    }
}

fn grayscale(src: &RasterBuffer) -> RasterBuffer {
    let mut out = src.clone();
    for px in out.pixels.chunks_exact_mut(4) {
        let l = luminance_u8(px[0], px[1], px[2]);
        px[0] = l;
        px[1] = l;
        px[2] = l;
    }
    out
}

fn sepia(src: &RasterBuffer) -> RasterBuffer {
    let mut out = src.clone();
    for px in out.pixels.chunks_exact_mut(4) {
        let (r, g, b) = (px[0] as f32, px[1] as f32, px[2] as f32);
        for (c, row) in SEPIA.iter().enumerate() {
            px[c] = (row[0] * r + row[1] * g + row[2] * b)
                .round()
                .clamp(0.0, 255.0) as u8;
        }
    }
    out
}

/// 3x3 convolution per RGB channel with clamped edge sampling.
///
/// Output = sum(kernel * neighborhood) / scale + offset, clamped to 8 bits.
/// Alpha passes through.
fn convolve_3x3(src: &RasterBuffer, kernel: &[f32; 9], scale: f32, offset: f32) -> RasterBuffer {
    let w = src.width as isize;
    let h = src.height as isize;
    let mut out = src.clone();

    for y in 0..h {
        for x in 0..w {
            let mut acc = [0.0f32; 3];
            for ky in -1..=1isize {
                let sy = (y + ky).clamp(0, h - 1) as u32;
                for kx in -1..=1isize {
                    let sx = (x + kx).clamp(0, w - 1) as u32;
                    let weight = kernel[((ky + 1) * 3 + (kx + 1)) as usize];
                    let px = src.get(sx, sy);
                    for c in 0..3 {
                        acc[c] += px[c] as f32 * weight;
                    }
                }
            }
            let i = src.index(x as u32, y as u32);
            for c in 0..3 {
                out.pixels[i + c] = (acc[c] / scale + offset).round().clamp(0.0, 255.0) as u8;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grayscale_flattens_channels() {
        let img = RasterBuffer::solid(4, 4, [200, 100, 50, 255]);
        let out = apply_quick_filter(&img, QuickFilter::Grayscale);
        let px = out.get(2, 2);
        assert_eq!(px[0], px[1]);
        assert_eq!(px[1], px[2]);
        assert_eq!(px[3], 255);
    }

    #[test]
    fn test_sepia_warms_gray() {
        let img = RasterBuffer::solid(4, 4, [128, 128, 128, 255]);
        let out = apply_quick_filter(&img, QuickFilter::Sepia);
        let px = out.get(0, 0);
        // Sepia orders channels R > G > B
        assert!(px[0] > px[1] && px[1] > px[2], "got {px:?}");
    }

    #[test]
    fn test_sepia_matches_matrix_on_white() {
        let img = RasterBuffer::solid(2, 2, [255, 255, 255, 255]);
        let out = apply_quick_filter(&img, QuickFilter::Sepia);
        let px = out.get(0, 0);
        // Row sums: 1.351, 1.203, 0.937 -> clamped, clamped, 239
        assert_eq!(px[0], 255);
        assert_eq!(px[1], 255);
        assert_eq!(px[2], 239);
    }

    #[test]
    fn test_edge_detect_zeroes_flat_regions() {
        let img = RasterBuffer::solid(8, 8, [120, 120, 120, 255]);
        let out = apply_quick_filter(&img, QuickFilter::EdgeDetect);
        assert_eq!(out.get(4, 4), [0, 0, 0, 255]);
    }

    #[test]
    fn test_edge_detect_fires_on_boundary() {
        let mut img = RasterBuffer::solid(8, 8, [0, 0, 0, 255]);
        for y in 0..8 {
            for x in 4..8 {
                img.put(x, y, [255, 255, 255, 255]);
            }
        }
        let out = apply_quick_filter(&img, QuickFilter::EdgeDetect);
        assert!(out.get(4, 4)[0] > 128, "boundary column lights up");
        assert_eq!(out.get(1, 4)[0], 0, "flat interior stays black");
    }

    #[test]
    fn test_emboss_yields_mid_gray_on_flat() {
        let img = RasterBuffer::solid(8, 8, [90, 90, 90, 255]);
        let out = apply_quick_filter(&img, QuickFilter::Emboss);
        assert_eq!(out.get(4, 4)[0], 128);
    }

    #[test]
    fn test_sharpen_preserves_flat_and_boosts_edges() {
        let flat = RasterBuffer::solid(8, 8, [100, 100, 100, 255]);
        let out = apply_quick_filter(&flat, QuickFilter::Sharpen);
        // Kernel sums to 16, scale 16: flat regions are fixed points
        assert_eq!(out.get(4, 4)[0], 100);

        let mut edged = RasterBuffer::solid(8, 8, [100, 100, 100, 255]);
        for y in 0..8 {
            for x in 4..8 {
                edged.put(x, y, [160, 160, 160, 255]);
            }
        }
        let sharpened = apply_quick_filter(&edged, QuickFilter::Sharpen);
        // Bright side of the edge overshoots
        assert!(sharpened.get(4, 4)[0] > 160);
    }

    #[test]
    fn test_alpha_untouched_by_all_filters() {
        let img = RasterBuffer::solid(6, 6, [10, 200, 30, 77]);
        for f in [
            QuickFilter::Grayscale,
            QuickFilter::Sepia,
            QuickFilter::EdgeDetect,
            QuickFilter::Emboss,
            QuickFilter::Sharpen,
        ] {
            let out = apply_quick_filter(&img, f);
            assert!(
                out.pixels.chunks_exact(4).all(|px| px[3] == 77),
                "{f:?} touched alpha"
            );
        }
    }
}
