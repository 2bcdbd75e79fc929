//! The adjustment pipeline: working image + slider state -> preview.
//!
//! ## Stage Order
//! 1. Exposure
//! 2. Highlights
//! 3. Shadows
//! 4. Contrast
//! 5. Brightness
//! 6. Blacks/Whites
//! 7. Gamma
//! 8. Hue
//! 9. Tint
//! 10. Vibrance
//! 11. Saturation
//! 12. Temperature
//! 13. Blur
//! 14. Noise
//! 15. Vignette
//! 16. Threshold
//!
//! Tonal stages run before color stages; blur, noise, vignette, and
//! threshold come last so they visually sit on top of everything else.
//! The function is pure: the working image is never mutated, and every
//! stage is a no-op at its identity default.

pub mod color;
pub mod filter;
pub mod hsv;

use crate::raster::RasterBuffer;
use crate::AdjustmentState;

/// Render the full adjustment stack over a working image.
///
/// Returns a new raster; callers decide whether to display it (preview) or
/// bake it in (commit/save). With every slider at its default this returns
/// an unmodified copy.
pub fn render_adjustments(src: &RasterBuffer, adj: &AdjustmentState) -> RasterBuffer {
    if adj.is_default() || src.is_empty() {
        return src.clone();
    }

    let mut out = src.clone();

    // Per-pixel stages share a single pass over the buffer.
    if adj.has_pixel_stages() {
        for px in out.pixels.chunks_exact_mut(4) {
            let mut r = px[0] as f32 / 255.0;
            let mut g = px[1] as f32 / 255.0;
            let mut b = px[2] as f32 / 255.0;

            (r, g, b) = color::apply_exposure(r, g, b, adj.exposure);
            (r, g, b) = color::apply_highlights(r, g, b, adj.highlights);
            (r, g, b) = color::apply_shadows(r, g, b, adj.shadows);
            (r, g, b) = color::apply_contrast(r, g, b, adj.contrast);
            (r, g, b) = color::apply_brightness(r, g, b, adj.brightness);
            (r, g, b) = color::apply_levels(r, g, b, adj.blacks, adj.whites);
            (r, g, b) = color::apply_gamma(r, g, b, adj.gamma);
            (r, g, b) = hsv::shift_hue(r, g, b, adj.hue);
            (r, g, b) = color::apply_tint(r, g, b, adj.tint);
            (r, g, b) = hsv::apply_vibrance(r, g, b, adj.vibrance);
            (r, g, b) = color::apply_saturation(r, g, b, adj.saturation);
            (r, g, b) = color::apply_temperature(r, g, b, adj.temperature);

            px[0] = (r.clamp(0.0, 1.0) * 255.0).round() as u8;
            px[1] = (g.clamp(0.0, 1.0) * 255.0).round() as u8;
            px[2] = (b.clamp(0.0, 1.0) * 255.0).round() as u8;
        }
    }

    // Raster-level stages stack on top, each skipping at its default.
    if adj.blur > 0.0 {
        out = filter::gaussian_blur(&out, adj.blur);
    }
    if adj.noise > 0.0 {
        out = filter::add_noise(&out, adj.noise);
    }
    if adj.vignette > 0.0 {
        out = filter::vignette(&out, adj.vignette);
    }
    if adj.threshold > 0.0 {
        out = filter::threshold(&out, adj.threshold);
    }

    out
}


// ============================================================================
// Property-Based Tests
// ============================================================================
