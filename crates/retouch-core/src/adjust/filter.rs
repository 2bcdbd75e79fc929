//! Raster-level filter stages: blur, noise, vignette, threshold.
//!
//! Unlike the per-pixel stages in [`super::color`], these need either
//! spatial context (blur), pixel coordinates (noise, vignette), or a second
//! full pass (threshold), so they operate on whole rasters.

use crate::luminance::luminance_u8;
use crate::raster::RasterBuffer;

/// Seed for the deterministic noise hash. Fixed so previews are
/// reproducible; re-rendering the same state yields the same raster.
const NOISE_SEED: u32 = 0x52_45_54_43;

/// Separable Gaussian blur with sigma in pixels.
///
/// Kernel is truncated at 3 sigma and renormalized; edges sample the
/// nearest pixel. Sigma 0 returns the input unchanged.
pub fn gaussian_blur(src: &RasterBuffer, sigma: f32) -> RasterBuffer {
    if sigma <= 0.0 || src.is_empty() {
        return src.clone();
    }

    let kernel = gaussian_kernel(sigma);
    let radius = (kernel.len() / 2) as isize;
    let w = src.width as usize;
    let h = src.height as usize;

    let input: Vec<f32> = src.pixels.iter().map(|&b| b as f32).collect();

    // Horizontal pass
    let mut horizontal = vec![0.0f32; input.len()];
    for y in 0..h {
        let row = y * w * 4;
        for x in 0..w {
            let mut acc = [0.0f32; 4];
            for (k, &weight) in kernel.iter().enumerate() {
                let sx = (x as isize + k as isize - radius).clamp(0, w as isize - 1) as usize;
                let idx = row + sx * 4;
                for c in 0..4 {
                    acc[c] += input[idx + c] * weight;
                }
            }
            let out = row + x * 4;
            horizontal[out..out + 4].copy_from_slice(&acc);
        }
    }

    // Vertical pass
    let mut vertical = vec![0.0f32; input.len()];
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0.0f32; 4];
            for (k, &weight) in kernel.iter().enumerate() {
                let sy = (y as isize + k as isize - radius).clamp(0, h as isize - 1) as usize;
                let idx = (sy * w + x) * 4;
                for c in 0..4 {
                    acc[c] += horizontal[idx + c] * weight;
                }
            }
            let out = (y * w + x) * 4;
            vertical[out..out + 4].copy_from_slice(&acc);
        }
    }

    let pixels = vertical
        .iter()
        .map(|&v| v.round().clamp(0.0, 255.0) as u8)
        .collect();
    RasterBuffer::new(src.width, src.height, pixels)
}

/// Build a normalized 1-D Gaussian kernel truncated at ceil(3 * sigma).
fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (sigma * 3.0).ceil() as usize;
    if radius == 0 {
        return vec![1.0];
    }
    let len = radius * 2 + 1;
    let s2 = 2.0 * sigma * sigma;
    let mut kernel = vec![0.0f32; len];
    let mut sum = 0.0f32;
    for (i, k) in kernel.iter_mut().enumerate() {
        let x = i as f32 - radius as f32;
        *k = (-x * x / s2).exp();
        sum += *k;
    }
    let inv = 1.0 / sum;
    for k in &mut kernel {
        *k *= inv;
    }
    kernel
}

/// Additive Gaussian noise with the given standard deviation (8-bit units).
///
/// Noise is deterministic: each (x, y, channel) gets an independent sample
/// from a hash-fed Box-Muller transform, so identical inputs always produce
/// identical outputs. Alpha is untouched.
pub fn add_noise(src: &RasterBuffer, stddev: f32) -> RasterBuffer {
    if stddev <= 0.0 || src.is_empty() {
        return src.clone();
    }

    let mut out = src.clone();
    let w = src.width;
    for y in 0..src.height {
        for x in 0..w {
            let i = src.index(x, y);
            for c in 0..3u32 {
                let n = gaussian_sample(x, y, c, NOISE_SEED) * stddev;
                let v = src.pixels[i + c as usize] as f32 + n;
                out.pixels[i + c as usize] = v.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
    out
}

/// Standard normal sample derived from pixel coordinates via Box-Muller.
#[inline]
fn gaussian_sample(x: u32, y: u32, channel: u32, seed: u32) -> f32 {
    let u1 = hash_unit(x, y, seed.wrapping_add(channel)).max(1e-6);
    let u2 = hash_unit(x, y, seed.wrapping_add(channel).wrapping_add(101));
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos()
}

/// Integer hash mixed down to a float in [0, 1).
#[inline]
fn hash_unit(x: u32, y: u32, seed: u32) -> f32 {
    let mut h = x
        .wrapping_mul(374_761_393)
        .wrapping_add(y.wrapping_mul(668_265_263))
        .wrapping_add(seed);
    h = h.wrapping_mul(0x9E37_79B9);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85EB_CA6B);
    h ^= h >> 13;
    h = h.wrapping_mul(0xC2B2_AE35);
    h ^= h >> 16;
    (h & 0x00FF_FFFF) as f32 / 16_777_216.0
}

/// Radial vignette.
///
/// Coordinates are normalized to [-1, 1] on both axes with the origin at the
/// image center; the mask is `clip(1 - radius * strength, 0, 1)` and
/// multiplies RGB only. Strength is `amount / 100` for the 0..=100 slider.
pub fn vignette(src: &RasterBuffer, amount: f32) -> RasterBuffer {
    if amount <= 0.0 || src.is_empty() {
        return src.clone();
    }

    let strength = amount / 100.0;
    let w = src.width.max(1) as f32;
    let h = src.height.max(1) as f32;
    let mut out = src.clone();

    for y in 0..src.height {
        // Map to [-1, 1]; single-pixel axes sit at the center
        let ny = if src.height > 1 {
            y as f32 / (h - 1.0) * 2.0 - 1.0
        } else {
            0.0
        };
        for x in 0..src.width {
            let nx = if src.width > 1 {
                x as f32 / (w - 1.0) * 2.0 - 1.0
            } else {
                0.0
            };
            let radius = (nx * nx + ny * ny).sqrt();
            let mask = (1.0 - radius * strength).clamp(0.0, 1.0);

            let i = src.index(x, y);
            for c in 0..3 {
                out.pixels[i + c] = (src.pixels[i + c] as f32 * mask).round() as u8;
            }
        }
    }
    out
}

/// Luminance threshold: binarize to black/white when level > 0.
///
/// Pixels whose BT.709 luminance reaches `level` become white, the rest
/// black. Alpha is preserved. Level 0 disables the stage.
pub fn threshold(src: &RasterBuffer, level: f32) -> RasterBuffer {
    if level <= 0.0 || src.is_empty() {
        return src.clone();
    }

    let cutoff = level.clamp(0.0, 255.0) as u8;
    let mut out = src.clone();
    for px in out.pixels.chunks_exact_mut(4) {
        let v = if luminance_u8(px[0], px[1], px[2]) >= cutoff {
            255
        } else {
            0
        };
        px[0] = v;
        px[1] = v;
        px[2] = v;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blur_zero_sigma_is_identity() {
        let img = RasterBuffer::solid(8, 8, [100, 150, 200, 255]);
        assert_eq!(gaussian_blur(&img, 0.0), img);
    }

    #[test]
    fn test_blur_preserves_flat_regions() {
        let img = RasterBuffer::solid(16, 16, [77, 77, 77, 255]);
        let blurred = gaussian_blur(&img, 2.0);
        // A constant image is a fixed point of any normalized blur
        for px in blurred.pixels.chunks_exact(4) {
            assert!((px[0] as i32 - 77).abs() <= 1);
        }
    }

    #[test]
    fn test_blur_softens_an_edge() {
        // Left half black, right half white
        let mut img = RasterBuffer::solid(20, 4, [0, 0, 0, 255]);
        for y in 0..4 {
            for x in 10..20 {
                img.put(x, y, [255, 255, 255, 255]);
            }
        }
        let blurred = gaussian_blur(&img, 2.0);
        let edge = blurred.get(10, 2)[0];
        assert!(edge > 20 && edge < 235, "edge should blend, got {edge}");
    }

    #[test]
    fn test_kernel_is_normalized() {
        for sigma in [0.5, 1.0, 3.0, 7.5] {
            let k = gaussian_kernel(sigma);
            let sum: f32 = k.iter().sum();
            assert!((sum - 1.0).abs() < 1e-4, "sigma {sigma} sums to {sum}");
        }
    }

    #[test]
    fn test_noise_zero_is_identity() {
        let img = RasterBuffer::solid(6, 6, [90, 90, 90, 255]);
        assert_eq!(add_noise(&img, 0.0), img);
    }

    #[test]
    fn test_noise_is_deterministic() {
        let img = RasterBuffer::solid(32, 32, [128, 128, 128, 255]);
        let a = add_noise(&img, 25.0);
        let b = add_noise(&img, 25.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_noise_perturbs_and_preserves_alpha() {
        let img = RasterBuffer::solid(32, 32, [128, 128, 128, 200]);
        let noisy = add_noise(&img, 25.0);
        assert_ne!(noisy, img);

        let changed = noisy
            .pixels
            .chunks_exact(4)
            .filter(|px| px[0] != 128)
            .count();
        assert!(changed > 100, "most pixels should move, got {changed}");
        assert!(noisy.pixels.chunks_exact(4).all(|px| px[3] == 200));
    }

    #[test]
    fn test_noise_mean_stays_centered() {
        let img = RasterBuffer::solid(64, 64, [128, 128, 128, 255]);
        let noisy = add_noise(&img, 10.0);
        let sum: u64 = noisy
            .pixels
            .chunks_exact(4)
            .map(|px| px[0] as u64)
            .sum();
        let mean = sum as f64 / (64.0 * 64.0);
        assert!((mean - 128.0).abs() < 2.0, "mean drifted to {mean}");
    }

    #[test]
    fn test_vignette_darkens_corners_not_center() {
        let img = RasterBuffer::solid(101, 101, [128, 128, 128, 255]);
        let out = vignette(&img, 100.0);

        let center = out.get(50, 50);
        let corner = out.get(0, 0);
        assert_eq!(center, [128, 128, 128, 255], "center untouched");
        assert!(corner[0] < 128, "corner darkened, got {}", corner[0]);
        assert_eq!(corner[3], 255, "alpha untouched");
    }

    #[test]
    fn test_vignette_zero_is_identity() {
        let img = RasterBuffer::solid(10, 10, [200, 10, 10, 255]);
        assert_eq!(vignette(&img, 0.0), img);
    }

    #[test]
    fn test_vignette_monotonic_along_diagonal() {
        let img = RasterBuffer::solid(41, 41, [200, 200, 200, 255]);
        let out = vignette(&img, 80.0);
        let mut prev = 0u8;
        // Walk from corner to center: brightness must not decrease
        for i in 0..=20u32 {
            let v = out.get(i, i)[0];
            assert!(v >= prev, "brightness dipped at ({i},{i})");
            prev = v;
        }
    }

    #[test]
    fn test_threshold_binarizes() {
        let mut img = RasterBuffer::solid(2, 1, [40, 40, 40, 255]);
        img.put(1, 0, [220, 220, 220, 255]);
        let out = threshold(&img, 128.0);
        assert_eq!(out.get(0, 0), [0, 0, 0, 255]);
        assert_eq!(out.get(1, 0), [255, 255, 255, 255]);
    }

    #[test]
    fn test_threshold_zero_disabled() {
        let img = RasterBuffer::solid(3, 3, [123, 45, 67, 255]);
        assert_eq!(threshold(&img, 0.0), img);
    }
}
