//! HSV color space conversions and the hue/vibrance stages.
//!
//! Hue is held in degrees with 360-degree wraparound; saturation and value
//! are normalized to 0.0..=1.0. The round trip RGB -> HSV -> RGB is exact up
//! to floating point for all 8-bit inputs.

/// Convert normalized RGB to (hue degrees, saturation, value).
pub fn rgb_to_hsv(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta).rem_euclid(6.0))
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    let s = if max == 0.0 { 0.0 } else { delta / max };

    (h, s, max)
}

/// Convert (hue degrees, saturation, value) back to normalized RGB.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    let h = h.rem_euclid(360.0);
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
    let m = v - c;

    let (r1, g1, b1) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (r1 + m, g1 + m, b1 + m)
}

/// Shift hue by the given number of degrees, wrapping modulo 360.
#[inline]
pub fn shift_hue(r: f32, g: f32, b: f32, degrees: f32) -> (f32, f32, f32) {
    if degrees == 0.0 {
        return (r, g, b);
    }
    let (h, s, v) = rgb_to_hsv(r, g, b);
    hsv_to_rgb((h + degrees).rem_euclid(360.0), s, v)
}

/// Vibrance: saturation boost weighted toward muted colors.
///
/// In HSV space, S gains `factor * (1 - S)^1.5`, so an already-saturated
/// pixel barely moves while a muted one gets the full push. Factor is
/// `amount / 100 * 0.5` for the slider range -100..=100.
#[inline]
pub fn apply_vibrance(r: f32, g: f32, b: f32, amount: f32) -> (f32, f32, f32) {
    if amount == 0.0 {
        return (r, g, b);
    }
    let factor = amount / 100.0 * 0.5;
    let (h, s, v) = rgb_to_hsv(r, g, b);
    let boosted = (s + factor * (1.0 - s).max(0.0).powf(1.5)).clamp(0.0, 1.0);
    hsv_to_rgb(h, boosted, v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_rgb_close(a: (f32, f32, f32), b: (f32, f32, f32)) {
        assert!((a.0 - b.0).abs() < 1e-4, "r: {} vs {}", a.0, b.0);
        assert!((a.1 - b.1).abs() < 1e-4, "g: {} vs {}", a.1, b.1);
        assert!((a.2 - b.2).abs() < 1e-4, "b: {} vs {}", a.2, b.2);
    }

    #[test]
    fn test_primary_hues() {
        assert_eq!(rgb_to_hsv(1.0, 0.0, 0.0).0, 0.0);
        assert_eq!(rgb_to_hsv(0.0, 1.0, 0.0).0, 120.0);
        assert_eq!(rgb_to_hsv(0.0, 0.0, 1.0).0, 240.0);
    }

    #[test]
    fn test_gray_has_no_saturation() {
        let (_, s, v) = rgb_to_hsv(0.5, 0.5, 0.5);
        assert_eq!(s, 0.0);
        assert!((v - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_roundtrip_8bit_lattice() {
        for r in [0u8, 51, 102, 153, 204, 255] {
            for g in [0u8, 51, 102, 153, 204, 255] {
                for b in [0u8, 51, 102, 153, 204, 255] {
                    let rgb = (r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
                    let (h, s, v) = rgb_to_hsv(rgb.0, rgb.1, rgb.2);
                    assert_rgb_close(hsv_to_rgb(h, s, v), rgb);
                }
            }
        }
    }

    #[test]
    fn test_hue_shift_wraps() {
        // Red shifted +360 lands back on red
        let shifted = shift_hue(1.0, 0.0, 0.0, 360.0);
        assert_rgb_close(shifted, (1.0, 0.0, 0.0));

        // Red shifted +120 becomes green
        let shifted = shift_hue(1.0, 0.0, 0.0, 120.0);
        assert_rgb_close(shifted, (0.0, 1.0, 0.0));

        // Negative shifts wrap the other way
        let shifted = shift_hue(1.0, 0.0, 0.0, -240.0);
        assert_rgb_close(shifted, (0.0, 1.0, 0.0));
    }

    #[test]
    fn test_hue_shift_zero_is_identity() {
        let shifted = shift_hue(0.3, 0.7, 0.2, 0.0);
        assert_rgb_close(shifted, (0.3, 0.7, 0.2));
    }

    #[test]
    fn test_vibrance_favors_muted_colors() {
        // Muted color: saturation rises substantially
        let (_, s_before, _) = rgb_to_hsv(0.55, 0.5, 0.45);
        let boosted = apply_vibrance(0.55, 0.5, 0.45, 100.0);
        let (_, s_muted, _) = rgb_to_hsv(boosted.0, boosted.1, boosted.2);

        // Saturated color: nearly unchanged
        let vivid = apply_vibrance(1.0, 0.05, 0.05, 100.0);
        let (_, s_vivid_after, _) = rgb_to_hsv(vivid.0, vivid.1, vivid.2);
        let (_, s_vivid_before, _) = rgb_to_hsv(1.0, 0.05, 0.05);

        assert!(s_muted - s_before > (s_vivid_after - s_vivid_before) * 2.0);
    }

    #[test]
    fn test_vibrance_zero_is_identity() {
        let out = apply_vibrance(0.2, 0.4, 0.6, 0.0);
        assert_rgb_close(out, (0.2, 0.4, 0.6));
    }

    #[test]
    fn test_negative_vibrance_desaturates() {
        let out = apply_vibrance(0.7, 0.4, 0.3, -100.0);
        let (_, s_after, _) = rgb_to_hsv(out.0, out.1, out.2);
        let (_, s_before, _) = rgb_to_hsv(0.7, 0.4, 0.3);
        assert!(s_after < s_before);
    }
}
