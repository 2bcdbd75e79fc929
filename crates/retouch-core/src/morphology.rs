//! Structuring-element morphology and rank/averaging filters.
//!
//! All operations use a square all-ones structuring element of odd size K
//! (even kernel sizes are bumped up by one to keep the element symmetric)
//! and run independently on the R, G, and B planes; alpha passes through
//! untouched. Pixels beyond the border are read by clamping to the nearest
//! edge pixel, so dilation/erosion do not bleed artificial black or white
//! in from outside.
//!
//! Every operation is destructive at the session level: the caller
//! snapshots the working image before applying.

use crate::raster::RasterBuffer;

/// Morphological and rank operations sharing the kernel machinery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MorphOp {
    /// Minimum over the neighborhood; dark regions grow.
    Erode,
    /// Maximum over the neighborhood; bright regions grow.
    Dilate,
    /// Erode then dilate; removes bright specks.
    Open,
    /// Dilate then erode; fills dark pits.
    Close,
    /// Dilate minus erode; edge outline.
    Gradient,
    /// Box-filter average.
    Mean,
    /// Median of the neighborhood; edge-preserving denoise.
    Median,
    /// Alias of Dilate as a plain rank filter.
    Max,
    /// Alias of Erode as a plain rank filter.
    Min,
}

/// Snap a kernel size to the nearest valid value: odd and at least 1.
pub fn normalize_kernel_size(size: u32) -> u32 {
    let size = size.max(1);
    if size % 2 == 0 {
        size + 1
    } else {
        size
    }
}

/// Apply a morphological operation with a KxK all-ones element.
pub fn apply_morphology(src: &RasterBuffer, op: MorphOp, kernel_size: u32) -> RasterBuffer {
    if src.is_empty() {
        return src.clone();
    }
    let k = normalize_kernel_size(kernel_size);

    let w = src.width as usize;
    let h = src.height as usize;

    let r = src.channel(0);
    let g = src.channel(1);
    let b = src.channel(2);

    let run = |plane: &[u8]| -> Vec<u8> { morph_plane(plane, w, h, op, k) };
    let (r, g, b) = (run(&r), run(&g), run(&b));

    src.with_rgb_channels(&r, &g, &b)
}

/// Run one operation over a single channel plane.
fn morph_plane(plane: &[u8], w: usize, h: usize, op: MorphOp, k: u32) -> Vec<u8> {
    match op {
        MorphOp::Erode | MorphOp::Min => rank_filter(plane, w, h, k, Rank::Min),
        MorphOp::Dilate | MorphOp::Max => rank_filter(plane, w, h, k, Rank::Max),
        MorphOp::Open => {
            let eroded = rank_filter(plane, w, h, k, Rank::Min);
            rank_filter(&eroded, w, h, k, Rank::Max)
        }
        MorphOp::Close => {
            let dilated = rank_filter(plane, w, h, k, Rank::Max);
            rank_filter(&dilated, w, h, k, Rank::Min)
        }
        MorphOp::Gradient => {
            let dilated = rank_filter(plane, w, h, k, Rank::Max);
            let eroded = rank_filter(plane, w, h, k, Rank::Min);
            dilated
                .iter()
                .zip(eroded.iter())
                .map(|(&d, &e)| d.saturating_sub(e))
                .collect()
        }
        MorphOp::Mean => box_filter(plane, w, h, k),
        MorphOp::Median => rank_filter(plane, w, h, k, Rank::Median),
    }
}

#[derive(Clone, Copy)]
enum Rank {
    Min,
    Max,
    Median,
}

/// Neighborhood rank filter with edge-clamped sampling.
fn rank_filter(plane: &[u8], w: usize, h: usize, k: u32, rank: Rank) -> Vec<u8> {
    let radius = (k / 2) as isize;
    let mut out = vec![0u8; plane.len()];
    let mut window = Vec::with_capacity((k * k) as usize);

    for y in 0..h as isize {
        for x in 0..w as isize {
            match rank {
                Rank::Min => {
                    let mut best = u8::MAX;
                    for ky in -radius..=radius {
                        let sy = (y + ky).clamp(0, h as isize - 1) as usize;
                        for kx in -radius..=radius {
                            let sx = (x + kx).clamp(0, w as isize - 1) as usize;
                            best = best.min(plane[sy * w + sx]);
                        }
                    }
                    out[y as usize * w + x as usize] = best;
                }
                Rank::Max => {
                    let mut best = u8::MIN;
                    for ky in -radius..=radius {
                        let sy = (y + ky).clamp(0, h as isize - 1) as usize;
                        for kx in -radius..=radius {
                            let sx = (x + kx).clamp(0, w as isize - 1) as usize;
                            best = best.max(plane[sy * w + sx]);
                        }
                    }
                    out[y as usize * w + x as usize] = best;
                }
                Rank::Median => {
                    window.clear();
                    for ky in -radius..=radius {
                        let sy = (y + ky).clamp(0, h as isize - 1) as usize;
                        for kx in -radius..=radius {
                            let sx = (x + kx).clamp(0, w as isize - 1) as usize;
                            window.push(plane[sy * w + sx]);
                        }
                    }
                    window.sort_unstable();
                    out[y as usize * w + x as usize] = window[window.len() / 2];
                }
            }
        }
    }
    out
}

/// KxK box average with edge-clamped sampling.
fn box_filter(plane: &[u8], w: usize, h: usize, k: u32) -> Vec<u8> {
    let radius = (k / 2) as isize;
    let norm = (k * k) as u32;
    let mut out = vec![0u8; plane.len()];

    for y in 0..h as isize {
        for x in 0..w as isize {
            let mut sum = 0u32;
            for ky in -radius..=radius {
                let sy = (y + ky).clamp(0, h as isize - 1) as usize;
                for kx in -radius..=radius {
                    let sx = (x + kx).clamp(0, w as isize - 1) as usize;
                    sum += plane[sy * w + sx] as u32;
                }
            }
            out[y as usize * w + x as usize] = ((sum + norm / 2) / norm) as u8;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 64x64 checkerboard with 8px cells, white on black.
    fn checkerboard() -> RasterBuffer {
        let mut img = RasterBuffer::solid(64, 64, [0, 0, 0, 255]);
        for y in 0..64 {
            for x in 0..64 {
                if ((x / 8) + (y / 8)) % 2 == 0 {
                    img.put(x, y, [255, 255, 255, 255]);
                }
            }
        }
        img
    }

    fn white_area(img: &RasterBuffer) -> usize {
        img.pixels.chunks_exact(4).filter(|px| px[0] == 255).count()
    }

    #[test]
    fn test_kernel_size_snapping() {
        assert_eq!(normalize_kernel_size(0), 1);
        assert_eq!(normalize_kernel_size(1), 1);
        assert_eq!(normalize_kernel_size(2), 3);
        assert_eq!(normalize_kernel_size(3), 3);
        assert_eq!(normalize_kernel_size(4), 5);
        assert_eq!(normalize_kernel_size(15), 15);
    }

    #[test]
    fn test_dilation_grows_one_pixel_ring() {
        // 3x3 dilation on a checkerboard grows each white cell by one
        // pixel on every exposed side.
        let img = checkerboard();
        let before = white_area(&img);
        let out = apply_morphology(&img, MorphOp::Dilate, 3);
        let after = white_area(&out);

        // An isolated 8x8 cell grows to at most 10x10; cells meeting at
        // corners overlap, and border cells clamp, so the ratio lands
        // between those bounds.
        assert!(after > before, "dilation must grow white area");
        assert!(
            after <= before * 100 / 64 + 64 * 4,
            "growth exceeded a one-pixel ring: {before} -> {after}"
        );
        // Check a concrete ring pixel: the black pixel at x=8 adjacent to
        // the first white cell becomes white.
        assert_eq!(out.get(8, 0)[0], 255);
        assert_eq!(out.get(9, 0)[0], 0, "two pixels away stays black");
    }

    #[test]
    fn test_erosion_shrinks_white() {
        let img = checkerboard();
        let before = white_area(&img);
        let out = apply_morphology(&img, MorphOp::Erode, 3);
        assert!(white_area(&out) < before);
    }

    #[test]
    fn test_erode_dilate_duality() {
        // Min/Max are aliases for erode/dilate
        let img = checkerboard();
        assert_eq!(
            apply_morphology(&img, MorphOp::Erode, 3),
            apply_morphology(&img, MorphOp::Min, 3)
        );
        assert_eq!(
            apply_morphology(&img, MorphOp::Dilate, 3),
            apply_morphology(&img, MorphOp::Max, 3)
        );
    }

    #[test]
    fn test_open_removes_specks() {
        let mut img = RasterBuffer::solid(32, 32, [0, 0, 0, 255]);
        img.put(16, 16, [255, 255, 255, 255]); // single bright speck
        let out = apply_morphology(&img, MorphOp::Open, 3);
        assert_eq!(out.get(16, 16)[0], 0, "speck removed by opening");
    }

    #[test]
    fn test_close_fills_pits() {
        let mut img = RasterBuffer::solid(32, 32, [255, 255, 255, 255]);
        img.put(16, 16, [0, 0, 0, 255]); // single dark pit
        let out = apply_morphology(&img, MorphOp::Close, 3);
        assert_eq!(out.get(16, 16)[0], 255, "pit filled by closing");
    }

    #[test]
    fn test_gradient_outlines_edges() {
        let img = checkerboard();
        let out = apply_morphology(&img, MorphOp::Gradient, 3);
        // Cell interiors are flat: gradient is 0 there
        assert_eq!(out.get(4, 4)[0], 0);
        // Cell boundaries light up
        assert_eq!(out.get(8, 4)[0], 255);
    }

    #[test]
    fn test_flat_image_is_fixed_point() {
        let img = RasterBuffer::solid(16, 16, [87, 87, 87, 255]);
        for op in [
            MorphOp::Erode,
            MorphOp::Dilate,
            MorphOp::Open,
            MorphOp::Close,
            MorphOp::Mean,
            MorphOp::Median,
        ] {
            let out = apply_morphology(&img, op, 5);
            assert_eq!(out, img, "{op:?} changed a flat image");
        }
    }

    #[test]
    fn test_median_kills_salt_noise() {
        let mut img = RasterBuffer::solid(16, 16, [100, 100, 100, 255]);
        img.put(8, 8, [255, 255, 255, 255]);
        let out = apply_morphology(&img, MorphOp::Median, 3);
        assert_eq!(out.get(8, 8)[0], 100);
    }

    #[test]
    fn test_mean_averages_neighborhood() {
        let mut img = RasterBuffer::solid(9, 9, [0, 0, 0, 255]);
        img.put(4, 4, [90, 90, 90, 255]);
        let out = apply_morphology(&img, MorphOp::Mean, 3);
        // 90 / 9 = 10
        assert_eq!(out.get(4, 4)[0], 10);
    }

    #[test]
    fn test_even_kernel_bumped_to_odd() {
        let img = checkerboard();
        assert_eq!(
            apply_morphology(&img, MorphOp::Dilate, 2),
            apply_morphology(&img, MorphOp::Dilate, 3)
        );
    }

    #[test]
    fn test_alpha_preserved() {
        let mut img = RasterBuffer::solid(8, 8, [50, 60, 70, 200]);
        img.put(4, 4, [255, 255, 255, 123]);
        let out = apply_morphology(&img, MorphOp::Dilate, 3);
        assert_eq!(out.get(4, 4)[3], 123, "alpha plane untouched");
        assert_eq!(out.get(0, 0)[3], 200);
    }
}
