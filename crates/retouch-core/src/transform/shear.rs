//! Affine shear and translation.
//!
//! Both keep the source canvas size, mirroring the affine-transform
//! behavior of the editing chain: sheared or shifted content that leaves
//! the canvas is lost, uncovered regions become transparent.

use super::sample_bilinear;
use crate::raster::RasterBuffer;

/// Shear by the tangent of the given angles (degrees) on each axis.
///
/// The forward transform is `x' = x + tan(ax) * y`, `y' = tan(ay) * x + y`;
/// output pixels are inverse-mapped through it and bilinearly sampled.
pub fn shear(src: &RasterBuffer, angle_x_deg: f32, angle_y_deg: f32) -> RasterBuffer {
    if (angle_x_deg == 0.0 && angle_y_deg == 0.0) || src.is_empty() {
        return src.clone();
    }

    let bx = (angle_x_deg as f64).to_radians().tan();
    let by = (angle_y_deg as f64).to_radians().tan();

    // Inverse of [[1, bx], [by, 1]]
    let det = 1.0 - bx * by;
    if det.abs() < 1e-9 {
        return src.clone();
    }
    let inv = 1.0 / det;

    let mut out = RasterBuffer::transparent(src.width, src.height);
    for dst_y in 0..src.height {
        for dst_x in 0..src.width {
            let dx = dst_x as f64;
            let dy = dst_y as f64;
            let src_x = (dx - bx * dy) * inv;
            let src_y = (dy - by * dx) * inv;
            out.put(dst_x, dst_y, sample_bilinear(src, src_x, src_y));
        }
    }
    out
}

/// Translate by whole or fractional pixel offsets, same canvas.
pub fn translate(src: &RasterBuffer, dx: f32, dy: f32) -> RasterBuffer {
    if (dx == 0.0 && dy == 0.0) || src.is_empty() {
        return src.clone();
    }

    let mut out = RasterBuffer::transparent(src.width, src.height);
    for y in 0..src.height {
        for x in 0..src.width {
            let src_x = x as f64 - dx as f64;
            let src_y = y as f64 - dy as f64;
            out.put(x, y, sample_bilinear(src, src_x, src_y));
        }
    }
    out
}
