//! Geometric transforms, always re-derived from the pristine original.
//!
//! # Stage Order
//!
//! [`render_transforms`] applies the chained stages in a fixed order:
//! 1. Resize (uniform)
//! 2. Rotate (canvas expansion)
//! 3. Scale X/Y (non-uniform)
//! 4. Shear
//! 5. Translate
//!
//! The perspective warp is independent of the chain: it always maps the
//! original image directly (see [`perspective`]). Flip and crop are
//! destructive one-shot edits on the working image and never re-run.
//!
//! Every stage skips itself at its identity value, so a default
//! [`TransformState`] returns a plain copy of the original.

pub mod crop;
pub mod flip;
pub mod perspective;
pub mod resize;
pub mod rotation;
pub mod shear;

use crate::raster::RasterBuffer;
use crate::TransformState;

/// Resampling filter used by the geometry stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum ResampleFilter {
    /// Fast bilinear interpolation, good for live previews.
    Bilinear,
    /// High-quality Lanczos3 interpolation, good for committed output.
    #[default]
    Lanczos3,
}

impl ResampleFilter {
    /// Map onto the image crate's resize filters.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            ResampleFilter::Bilinear => image::imageops::FilterType::Triangle,
            ResampleFilter::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Re-derive the working image from the original and the transform state.
///
/// The original is never mutated; each call starts from it, which is what
/// makes individual slider updates non-destructive and idempotent.
pub fn render_transforms(
    original: &RasterBuffer,
    state: &TransformState,
    filter: ResampleFilter,
) -> RasterBuffer {
    let mut img = original.clone();
    if original.is_empty() {
        return img;
    }

    if state.resize != 100.0 {
        img = resize::resize_uniform(&img, state.resize, filter);
    }
    if state.rotate != 0.0 {
        img = rotation::rotate(&img, state.rotate as f64, filter);
    }
    if state.scale_x != 100.0 || state.scale_y != 100.0 {
        img = resize::scale_axes(&img, state.scale_x, state.scale_y, filter);
    }
    if state.shear_x != 0.0 || state.shear_y != 0.0 {
        img = shear::shear(&img, state.shear_x, state.shear_y);
    }
    if state.translate_x != 0.0 || state.translate_y != 0.0 {
        img = shear::translate(&img, state.translate_x, state.translate_y);
    }

    img
}

/// Bilinear RGBA sample at fractional coordinates.
///
/// Out-of-bounds reads return transparent black, which leaves expanded
/// canvas regions empty instead of smearing edge pixels.
pub(crate) fn sample_bilinear(img: &RasterBuffer, x: f64, y: f64) -> [u8; 4] {
    let (w, h) = (img.width as i64, img.height as i64);
    if x < 0.0 || y < 0.0 || x >= (w - 1) as f64 || y >= (h - 1) as f64 {
        // Nearest-pixel fallback keeps the outermost row/column sampled
        let xi = x.round() as i64;
        let yi = y.round() as i64;
        if xi < 0 || yi < 0 || xi >= w || yi >= h {
            return [0, 0, 0, 0];
        }
        return img.get(xi as u32, yi as u32);
    }

    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = img.get(x0, y0);
    let p10 = img.get(x0 + 1, y0);
    let p01 = img.get(x0, y0 + 1);
    let p11 = img.get(x0 + 1, y0 + 1);

    let mut out = [0u8; 4];
    for c in 0..4 {
        let v = p00[c] as f64 * (1.0 - fx) * (1.0 - fy)
            + p10[c] as f64 * fx * (1.0 - fy)
            + p01[c] as f64 * (1.0 - fx) * fy
            + p11[c] as f64 * fx * fy;
        out[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Lanczos3 RGBA sample over a 6x6 neighborhood.
///
/// Falls back to bilinear near the borders where the kernel would run off
/// the image.
pub(crate) fn sample_lanczos3(img: &RasterBuffer, x: f64, y: f64) -> [u8; 4] {
    let (w, h) = (img.width as i64, img.height as i64);
    if x < 2.0 || y < 2.0 || x >= (w - 3) as f64 || y >= (h - 3) as f64 {
        return sample_bilinear(img, x, y);
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut sum = [0.0f64; 4];
    let mut weight_sum = 0.0;
    for ky in -2..=3i64 {
        for kx in -2..=3i64 {
            let px = x0 + kx;
            let py = y0 + ky;
            if px >= 0 && px < w && py >= 0 && py < h {
                let weight = lanczos_weight(x - px as f64, 3.0) * lanczos_weight(y - py as f64, 3.0);
                let p = img.get(px as u32, py as u32);
                for c in 0..4 {
                    sum[c] += p[c] as f64 * weight;
                }
                weight_sum += weight;
            }
        }
    }

    let mut out = [0u8; 4];
    if weight_sum > 0.0 {
        for c in 0..4 {
            out[c] = (sum[c] / weight_sum).round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}

/// Lanczos kernel: `sinc(x) * sinc(x/a)` inside the support, 0 outside.
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }
    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;
    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}

/// Sample with the requested filter.
#[inline]
pub(crate) fn sample(img: &RasterBuffer, x: f64, y: f64, filter: ResampleFilter) -> [u8; 4] {
    match filter {
        ResampleFilter::Bilinear => sample_bilinear(img, x, y),
        ResampleFilter::Lanczos3 => sample_lanczos3(img, x, y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(w: u32, h: u32) -> RasterBuffer {
        let mut img = RasterBuffer::transparent(w, h);
        for y in 0..h {
            for x in 0..w {
                let v = (((x + y) * 8) % 256) as u8;
                img.put(x, y, [v, v, v, 255]);
            }
        }
        img
    }

    #[test]
    fn test_default_state_returns_copy() {
        let img = gradient(40, 30);
        let out = render_transforms(&img, &TransformState::default(), ResampleFilter::Lanczos3);
        assert_eq!(out, img);
    }

    #[test]
    fn test_resize_idempotence_at_100() {
        // Touching resize back to 100 equals never touching it
        let img = gradient(40, 30);
        let mut state = TransformState::default();
        state.rotate = 15.0;

        let with_default_resize =
            render_transforms(&img, &state, ResampleFilter::Bilinear);
        state.resize = 100.0;
        let with_explicit_resize =
            render_transforms(&img, &state, ResampleFilter::Bilinear);
        assert_eq!(with_default_resize, with_explicit_resize);
    }

    #[test]
    fn test_chain_applies_in_order() {
        let img = gradient(60, 40);
        let mut state = TransformState::default();
        state.resize = 50.0;
        state.rotate = 90.0;
        let out = render_transforms(&img, &state, ResampleFilter::Bilinear);
        // 50% resize to 30x20, then 90 degrees swaps to 20x30
        assert_eq!((out.width, out.height), (20, 30));
    }

    #[test]
    fn test_original_untouched() {
        let img = gradient(30, 30);
        let before = img.clone();
        let mut state = TransformState::default();
        state.rotate = 37.0;
        state.shear_x = 10.0;
        let _ = render_transforms(&img, &state, ResampleFilter::Bilinear);
        assert_eq!(img, before);
    }

    #[test]
    fn test_bilinear_sample_exact_on_grid() {
        let img = gradient(10, 10);
        assert_eq!(sample_bilinear(&img, 3.0, 4.0), img.get(3, 4));
    }

    #[test]
    fn test_bilinear_sample_midpoint_blends() {
        let mut img = RasterBuffer::transparent(2, 1);
        img.put(0, 0, [0, 0, 0, 255]);
        img.put(1, 0, [200, 200, 200, 255]);
        let s = sample_bilinear(&img, 0.5, 0.0);
        assert!((s[0] as i32 - 100).abs() <= 1);
    }

    #[test]
    fn test_sample_out_of_bounds_transparent() {
        let img = gradient(5, 5);
        assert_eq!(sample_bilinear(&img, -10.0, 2.0), [0, 0, 0, 0]);
        assert_eq!(sample_bilinear(&img, 2.0, 50.0), [0, 0, 0, 0]);
    }

    #[test]
    fn test_lanczos_weight_properties() {
        assert!((lanczos_weight(0.0, 3.0) - 1.0).abs() < f64::EPSILON);
        assert!(lanczos_weight(3.0, 3.0).abs() < f64::EPSILON);
        assert!((lanczos_weight(1.5, 3.0) - lanczos_weight(-1.5, 3.0)).abs() < 1e-12);
    }
}
