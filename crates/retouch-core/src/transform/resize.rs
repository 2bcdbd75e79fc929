//! Uniform resize and non-uniform axis scaling.
//!
//! Both stages delegate resampling to the image crate and skip entirely at
//! 100%, keeping the identity path allocation-free beyond the copy the
//! pipeline already made.

use super::ResampleFilter;
use crate::raster::RasterBuffer;

/// Smallest output dimension a scale can produce.
const MIN_DIMENSION: u32 = 1;

/// Scale both axes by `percent / 100`.
pub fn resize_uniform(src: &RasterBuffer, percent: f32, filter: ResampleFilter) -> RasterBuffer {
    scale_axes(src, percent, percent, filter)
}

/// Scale width by `sx / 100` and height by `sy / 100` independently.
pub fn scale_axes(src: &RasterBuffer, sx: f32, sy: f32, filter: ResampleFilter) -> RasterBuffer {
    if (sx == 100.0 && sy == 100.0) || src.is_empty() {
        return src.clone();
    }

    let new_w = ((src.width as f32 * sx / 100.0).round() as u32).max(MIN_DIMENSION);
    let new_h = ((src.height as f32 * sy / 100.0).round() as u32).max(MIN_DIMENSION);
    if new_w == src.width && new_h == src.height {
        return src.clone();
    }

    let rgba = match src.to_rgba_image() {
        Some(img) => img,
        None => return src.clone(),
    };
    let resized = image::imageops::resize(&rgba, new_w, new_h, filter.to_image_filter());
    RasterBuffer::from_rgba_image(resized)
}
