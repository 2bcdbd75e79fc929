//! Four-corner perspective warp.
//!
//! The corner model: the source quad is the image rectangle, the
//! destination quad is each corner displaced by its (dx, dy) offset. The
//! projective transform mapping source to destination is solved through
//! the unit square, inverted, and used to inverse-map every output pixel
//! back into the *original* image. The output canvas keeps the original
//! dimensions; regions the warped image no longer covers stay transparent.
//!
//! Live drags re-run the full warp from the original on every change; only
//! an explicit commit becomes a history snapshot, which the session layer
//! handles.

use super::sample_bilinear;
use crate::raster::RasterBuffer;
use crate::CornerOffsets;

/// 3x3 projective matrix in row-major order.
type Mat3 = [f64; 9];

/// Solve the projective transform mapping the unit square onto `quad`.
///
/// Corners are ordered top-left, top-right, bottom-right, bottom-left.
/// Degenerate parallelogram cases reduce to an affine matrix.
fn unit_square_to_quad(quad: [[f64; 2]; 4]) -> Mat3 {
    let [p0, p1, p2, p3] = quad;
    let px = p0[0] - p1[0] + p2[0] - p3[0];
    let py = p0[1] - p1[1] + p2[1] - p3[1];

    if px == 0.0 && py == 0.0 {
        // Affine: the quad is a parallelogram
        [
            p1[0] - p0[0],
            p2[0] - p1[0],
            p0[0],
            p1[1] - p0[1],
            p2[1] - p1[1],
            p0[1],
            0.0,
            0.0,
            1.0,
        ]
    } else {
        let dx1 = p1[0] - p2[0];
        let dx2 = p3[0] - p2[0];
        let dy1 = p1[1] - p2[1];
        let dy2 = p3[1] - p2[1];
        let den = dx1 * dy2 - dx2 * dy1;

        let g = (px * dy2 - dx2 * py) / den;
        let h = (dx1 * py - px * dy1) / den;

        [
            p1[0] - p0[0] + g * p1[0],
            p3[0] - p0[0] + h * p3[0],
            p0[0],
            p1[1] - p0[1] + g * p1[1],
            p3[1] - p0[1] + h * p3[1],
            p0[1],
            g,
            h,
            1.0,
        ]
    }
}

/// Invert a 3x3 matrix via the adjugate. Returns None when singular.
fn invert(m: &Mat3) -> Option<Mat3> {
    let det = m[0] * (m[4] * m[8] - m[5] * m[7]) - m[1] * (m[3] * m[8] - m[5] * m[6])
        + m[2] * (m[3] * m[7] - m[4] * m[6]);
    if det.abs() < 1e-12 {
        return None;
    }
    let inv = 1.0 / det;
    Some([
        (m[4] * m[8] - m[5] * m[7]) * inv,
        (m[2] * m[7] - m[1] * m[8]) * inv,
        (m[1] * m[5] - m[2] * m[4]) * inv,
        (m[5] * m[6] - m[3] * m[8]) * inv,
        (m[0] * m[8] - m[2] * m[6]) * inv,
        (m[2] * m[3] - m[0] * m[5]) * inv,
        (m[3] * m[7] - m[4] * m[6]) * inv,
        (m[1] * m[6] - m[0] * m[7]) * inv,
        (m[0] * m[4] - m[1] * m[3]) * inv,
    ])
}

fn multiply(a: &Mat3, b: &Mat3) -> Mat3 {
    let mut out = [0.0; 9];
    for row in 0..3 {
        for col in 0..3 {
            out[row * 3 + col] = a[row * 3] * b[col]
                + a[row * 3 + 1] * b[3 + col]
                + a[row * 3 + 2] * b[6 + col];
        }
    }
    out
}

/// Apply a projective matrix to a point.
#[inline]
fn project(m: &Mat3, x: f64, y: f64) -> (f64, f64) {
    let w = m[6] * x + m[7] * y + m[8];
    let w = if w.abs() < 1e-12 { 1e-12 } else { w };
    (
        (m[0] * x + m[1] * y + m[2]) / w,
        (m[3] * x + m[4] * y + m[5]) / w,
    )
}

/// Warp the original image by the four corner offsets.
///
/// Zero offsets return a pixel-identical copy. The output canvas matches
/// the original dimensions.
pub fn warp_perspective(original: &RasterBuffer, offsets: &CornerOffsets) -> RasterBuffer {
    if offsets.is_default() || original.is_empty() {
        return original.clone();
    }

    let w = original.width as f64;
    let h = original.height as f64;

    // Corner order: top-left, top-right, bottom-right, bottom-left
    let src = [[0.0, 0.0], [w, 0.0], [w, h], [0.0, h]];
    let dst = [
        [offsets.top_left[0] as f64, offsets.top_left[1] as f64],
        [w + offsets.top_right[0] as f64, offsets.top_right[1] as f64],
        [
            w + offsets.bottom_right[0] as f64,
            h + offsets.bottom_right[1] as f64,
        ],
        [offsets.bottom_left[0] as f64, h + offsets.bottom_left[1] as f64],
    ];

    let to_src = unit_square_to_quad(src);
    let to_dst = unit_square_to_quad(dst);
    // Inverse mapping: destination pixel -> unit square -> source pixel
    let dst_to_src = match invert(&to_dst) {
        Some(inv) => multiply(&to_src, &inv),
        None => return original.clone(),
    };

    let mut out = RasterBuffer::transparent(original.width, original.height);
    for y in 0..original.height {
        for x in 0..original.width {
            let (sx, sy) = project(&dst_to_src, x as f64, y as f64);
            out.put(x, y, sample_bilinear(original, sx, sy));
        }
    }
    out
}
