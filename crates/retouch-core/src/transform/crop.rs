//! Crop from an interactive display-space selection.
//!
//! The UI reports the drag rectangle in display coordinates together with
//! the size of the displayed image; the core maps it back to pixel space
//! through the display/image scale ratio, normalizes corner order, clamps
//! to bounds, and rejects selections smaller than the minimum.

use thiserror::Error;

use crate::raster::RasterBuffer;

/// Minimum crop extent on each axis, in image pixels.
pub const MIN_CROP_PX: u32 = 10;

/// A drag rectangle in display coordinates; corners may be in any order.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SelectionRect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

/// Error raised for unusable crop selections.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CropError {
    /// Selection maps to fewer than [`MIN_CROP_PX`] pixels on some axis.
    #[error("Crop selection is smaller than {MIN_CROP_PX}x{MIN_CROP_PX} pixels")]
    SelectionTooSmall,

    /// The display dimensions were zero, so no mapping exists.
    #[error("Display size must be non-zero")]
    InvalidDisplaySize,
}

/// Crop using a display-space selection.
///
/// `display_w`/`display_h` are the on-screen dimensions the selection was
/// made against; the image/display ratio maps the rect into pixel space.
pub fn crop_selection(
    src: &RasterBuffer,
    rect: SelectionRect,
    display_w: f32,
    display_h: f32,
) -> Result<RasterBuffer, CropError> {
    if display_w <= 0.0 || display_h <= 0.0 {
        return Err(CropError::InvalidDisplaySize);
    }

    let scale_x = src.width as f32 / display_w;
    let scale_y = src.height as f32 / display_h;

    let left = (rect.x0.min(rect.x1) * scale_x).floor().max(0.0) as u32;
    let top = (rect.y0.min(rect.y1) * scale_y).floor().max(0.0) as u32;
    let right = ((rect.x0.max(rect.x1) * scale_x).ceil() as u32).min(src.width);
    let bottom = ((rect.y0.max(rect.y1) * scale_y).ceil() as u32).min(src.height);

    crop_pixels(src, left, top, right, bottom)
}

/// Crop an already-resolved pixel rectangle (left, top) .. (right, bottom).
pub fn crop_pixels(
    src: &RasterBuffer,
    left: u32,
    top: u32,
    right: u32,
    bottom: u32,
) -> Result<RasterBuffer, CropError> {
    let right = right.min(src.width);
    let bottom = bottom.min(src.height);
    if right.saturating_sub(left) < MIN_CROP_PX || bottom.saturating_sub(top) < MIN_CROP_PX {
        return Err(CropError::SelectionTooSmall);
    }

    let out_w = right - left;
    let out_h = bottom - top;
    let mut pixels = Vec::with_capacity((out_w as usize) * (out_h as usize) * 4);
    for y in top..bottom {
        let row_start = src.index(left, y);
        let row_end = src.index(right - 1, y) + 4;
        pixels.extend_from_slice(&src.pixels[row_start..row_end]);
    }

    Ok(RasterBuffer::new(out_w, out_h, pixels))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
