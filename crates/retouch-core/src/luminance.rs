//! BT.709 relative luminance helpers.
//!
//! Tonal adjustments, grayscale conversion, the frequency engine, and the
//! histogram all weight RGB the same way; the coefficients live here so no
//! stage drifts from the others.

/// ITU-R BT.709 red weight.
pub const LUMA_R: f32 = 0.2126;

/// ITU-R BT.709 green weight.
pub const LUMA_G: f32 = 0.7152;

/// ITU-R BT.709 blue weight.
pub const LUMA_B: f32 = 0.0722;

/// Relative luminance of normalized RGB (all values in 0.0..=1.0).
#[inline]
pub fn luminance(r: f32, g: f32, b: f32) -> f32 {
    LUMA_R * r + LUMA_G * g + LUMA_B * b
}

/// Relative luminance of 8-bit RGB, rounded back to 8 bits.
#[inline]
pub fn luminance_u8(r: u8, g: u8, b: u8) -> u8 {
    let l = LUMA_R * r as f32 + LUMA_G * g as f32 + LUMA_B * b as f32;
    l.clamp(0.0, 255.0).round() as u8
}

/// Logistic sigmoid, the transition curve for the shadow/highlight masks.
#[inline]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
