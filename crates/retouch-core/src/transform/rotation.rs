//! Rotation with canvas expansion.
//!
//! Uses inverse mapping: each output pixel is traced back through the
//! rotation to a fractional source coordinate and resampled there. The
//! output canvas grows to the rotated bounding box so no content is
//! clipped; uncovered regions stay transparent.
//!
//! For rotation by angle θ around the image center:
//! ```text
//! src_x = (dst_x - dst_cx) * cos(θ) - (dst_y - dst_cy) * sin(θ) + src_cx
//! src_y = (dst_x - dst_cx) * sin(θ) + (dst_y - dst_cy) * cos(θ) + src_cy
//! ```
//!
//! With screen coordinates (y grows downward) this makes a positive angle
//! read as counter-clockwise on screen, matching the slider's arrow.

use super::{sample, ResampleFilter};
use crate::raster::RasterBuffer;

/// Bounding box of a rectangle rotated by the given angle.
///
/// Exact 0/90/180/270 (mod 360) angles take fast paths that avoid floating
/// point drift in the output dimensions.
pub fn rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    let normalized = angle_degrees.rem_euclid(360.0);

    if normalized.abs() < 0.001 || (360.0 - normalized).abs() < 0.001 {
        return (width, height);
    }
    if (normalized - 90.0).abs() < 0.001 || (normalized - 270.0).abs() < 0.001 {
        return (height, width);
    }
    if (normalized - 180.0).abs() < 0.001 {
        return (width, height);
    }

    let rad = angle_degrees.to_radians();
    let (sin, cos) = (rad.sin().abs(), rad.cos().abs());
    let w = width as f64;
    let h = height as f64;

    let new_w = (w * cos + h * sin).round() as u32;
    let new_h = (w * sin + h * cos).round() as u32;
    (new_w.max(1), new_h.max(1))
}

/// Rotate around the image center, expanding the canvas.
///
/// Positive angles rotate counter-clockwise. An angle of (effectively) zero
/// returns an unmodified copy.
pub fn rotate(src: &RasterBuffer, angle_degrees: f64, filter: ResampleFilter) -> RasterBuffer {
    if angle_degrees.abs() < 0.001 || src.is_empty() {
        return src.clone();
    }

    let (dst_w, dst_h) = rotated_bounds(src.width, src.height, angle_degrees);

    // Inverse-mapping with the angle as-is reads counter-clockwise on a
    // y-down screen for positive input
    let rad = angle_degrees.to_radians();
    let (sin, cos) = (rad.sin(), rad.cos());

    let src_cx = src.width as f64 / 2.0;
    let src_cy = src.height as f64 / 2.0;
    let dst_cx = dst_w as f64 / 2.0;
    let dst_cy = dst_h as f64 / 2.0;

    let mut out = RasterBuffer::transparent(dst_w, dst_h);
    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            let dx = dst_x as f64 + 0.5 - dst_cx;
            let dy = dst_y as f64 + 0.5 - dst_cy;

            let src_x = dx * cos - dy * sin + src_cx - 0.5;
            let src_y = dx * sin + dy * cos + src_cy - 0.5;

            out.put(dst_x, dst_y, sample(src, src_x, src_y, filter));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(w: u32, h: u32) -> RasterBuffer {
        let mut img = RasterBuffer::transparent(w, h);
        for y in 0..h {
            for x in 0..w {
                img.put(x, y, [(x * 7 % 256) as u8, (y * 11 % 256) as u8, 0, 255]);
            }
        }
        img
    }

    #[test]
    fn test_zero_rotation_is_identity() {
        let img = gradient(50, 30);
        assert_eq!(rotate(&img, 0.0, ResampleFilter::Bilinear), img);
    }

    #[test]
    fn test_bounds_cardinal_angles() {
        assert_eq!(rotated_bounds(100, 50, 0.0), (100, 50));
        assert_eq!(rotated_bounds(100, 50, 90.0), (50, 100));
        assert_eq!(rotated_bounds(100, 50, 180.0), (100, 50));
        assert_eq!(rotated_bounds(100, 50, 270.0), (50, 100));
        assert_eq!(rotated_bounds(100, 50, 360.0), (100, 50));
        assert_eq!(rotated_bounds(100, 50, 450.0), (50, 100));
        assert_eq!(rotated_bounds(100, 50, -90.0), (50, 100));
    }

    #[test]
    fn test_bounds_45_degrees() {
        let (w, h) = rotated_bounds(100, 100, 45.0);
        // Diagonal of the unit square: ~141.4
        assert!((140..=143).contains(&w), "w = {w}");
        assert!((140..=143).contains(&h), "h = {h}");
    }

    #[test]
    fn test_bounds_sign_symmetric() {
        assert_eq!(rotated_bounds(80, 60, 30.0), rotated_bounds(80, 60, -30.0));
    }

    #[test]
    fn test_90_degrees_swaps_dimensions() {
        // W x H becomes H x W under rotate(90)
        let img = gradient(60, 40);
        let out = rotate(&img, 90.0, ResampleFilter::Bilinear);
        assert_eq!((out.width, out.height), (40, 60));
    }

    #[test]
    fn test_90_degrees_moves_corner_correctly() {
        // Mark the top-left corner; after 90 CCW it lands bottom-left
        let mut img = RasterBuffer::solid(21, 21, [0, 0, 0, 255]);
        img.put(0, 0, [255, 0, 0, 255]);
        let out = rotate(&img, 90.0, ResampleFilter::Bilinear);

        let bottom_left = out.get(0, out.height - 1);
        assert!(bottom_left[0] > 200, "corner should follow the rotation");
        let top_left = out.get(0, 0);
        assert!(top_left[0] < 50, "old corner position should be dark");
    }

    #[test]
    fn test_expansion_at_odd_angle() {
        let img = gradient(50, 50);
        let out = rotate(&img, 30.0, ResampleFilter::Bilinear);
        assert!(out.width > img.width);
        assert!(out.height > img.height);
    }

    #[test]
    fn test_expanded_corners_transparent() {
        let img = RasterBuffer::solid(40, 40, [255, 255, 255, 255]);
        let out = rotate(&img, 45.0, ResampleFilter::Bilinear);
        // The expanded canvas corners lie outside the rotated square
        assert_eq!(out.get(0, 0)[3], 0);
        assert_eq!(out.get(out.width - 1, out.height - 1)[3], 0);
    }

    #[test]
    fn test_180_preserves_dimensions() {
        let img = gradient(33, 17);
        let out = rotate(&img, 180.0, ResampleFilter::Bilinear);
        assert_eq!((out.width, out.height), (33, 17));
    }

    #[test]
    fn test_tiny_images_do_not_panic() {
        let img = RasterBuffer::solid(1, 1, [9, 9, 9, 255]);
        let out = rotate(&img, 45.0, ResampleFilter::Lanczos3);
        assert!(out.width >= 1 && out.height >= 1);

        let thin = RasterBuffer::solid(100, 1, [9, 9, 9, 255]);
        let out = rotate(&thin, 45.0, ResampleFilter::Bilinear);
        assert!(out.width > 0 && out.height > 0);
    }

    #[test]
    fn test_filters_agree_on_dimensions() {
        let img = gradient(30, 30);
        let a = rotate(&img, 15.0, ResampleFilter::Bilinear);
        let b = rotate(&img, 15.0, ResampleFilter::Lanczos3);
        assert_eq!((a.width, a.height), (b.width, b.height));
    }
}
