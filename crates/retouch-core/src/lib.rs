//! Retouch Core - Non-destructive image editing pipeline
//!
//! This crate implements the editing engine behind Retouch: a deterministic
//! mapping from (base image, ordered parameter set) to a derived image.
//! Geometric transforms are always re-derived from the pristine original;
//! tonal and color adjustments render a preview from the current working
//! image; discrete destructive edits (morphology, quick filters, frequency
//! operations, flips, crops, perspective commits, draw commits) mutate the
//! working image behind a bounded snapshot history.
//!
//! [`session::EditSession`] is the narrow interface the surrounding UI
//! calls into; everything else is a pure building block.

pub mod adjust;
pub mod decode;
pub mod draw;
pub mod encode;
pub mod frequency;
pub mod histogram;
pub mod history;
pub mod luminance;
pub mod morphology;
pub mod quick;
pub mod raster;
pub mod session;
pub mod transform;

pub use adjust::render_adjustments;
pub use decode::{decode_image, DecodeError};
pub use draw::{DrawLayer, DrawOp};
pub use encode::{encode_jpeg, encode_png, EncodeError};
pub use frequency::FrequencyOp;
pub use histogram::Histogram;
pub use history::{HistoryError, HistoryManager, HISTORY_CAPACITY};
pub use morphology::MorphOp;
pub use quick::QuickFilter;
pub use raster::RasterBuffer;
pub use session::{
    AdjustmentSetting, DestructiveOp, EditError, EditSession, ExportFormat, TransformSetting,
};
pub use transform::crop::SelectionRect;
pub use transform::flip::FlipDirection;
pub use transform::{render_transforms, ResampleFilter};

/// Per-corner pixel displacements for the perspective warp.
///
/// Each corner carries a (dx, dy) offset from its resting position on the
/// image rectangle. All zeros is the identity warp.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct CornerOffsets {
    pub top_left: [f32; 2],
    pub top_right: [f32; 2],
    pub bottom_right: [f32; 2],
    pub bottom_left: [f32; 2],
}

impl CornerOffsets {
    /// True when every offset is zero.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Geometric transform state, re-applied from the original on every change.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransformState {
    /// Uniform resize percentage (10 to 200, identity 100).
    pub resize: f32,
    /// Rotation in degrees (-180 to 180, identity 0).
    pub rotate: f32,
    /// Horizontal scale percentage (10 to 200, identity 100).
    pub scale_x: f32,
    /// Vertical scale percentage (10 to 200, identity 100).
    pub scale_y: f32,
    /// Horizontal shear angle in degrees (-45 to 45, identity 0).
    pub shear_x: f32,
    /// Vertical shear angle in degrees (-45 to 45, identity 0).
    pub shear_y: f32,
    /// Horizontal translation in pixels (-200 to 200, identity 0).
    pub translate_x: f32,
    /// Vertical translation in pixels (-200 to 200, identity 0).
    pub translate_y: f32,
    /// Perspective corner offsets; independent of the stage chain.
    pub perspective: CornerOffsets,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            resize: 100.0,
            rotate: 0.0,
            scale_x: 100.0,
            scale_y: 100.0,
            shear_x: 0.0,
            shear_y: 0.0,
            translate_x: 0.0,
            translate_y: 0.0,
            perspective: CornerOffsets::default(),
        }
    }
}

impl TransformState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when every field sits at its identity value.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Tonal, color, and filter adjustment state.
///
/// Adjustments only shape previews; they are never baked into the working
/// image until an explicit commit. Every default is an exact no-op.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AdjustmentState {
    /// Exposure (-100 to 100); brightness multiplier 2^(v/100).
    pub exposure: f32,
    /// Highlight recovery/boost (-100 to 100).
    pub highlights: f32,
    /// Shadow lift/crush (-100 to 100).
    pub shadows: f32,
    /// Contrast (-100 to 100).
    pub contrast: f32,
    /// Brightness (-100 to 100).
    pub brightness: f32,
    /// Black level (-100 to 100).
    pub blacks: f32,
    /// White level (-100 to 100).
    pub whites: f32,
    /// Gamma (0.1 to 3.0, identity 1.0).
    pub gamma: f32,
    /// Hue rotation in degrees (-180 to 180).
    pub hue: f32,
    /// Green-magenta tint (-100 to 100).
    pub tint: f32,
    /// Vibrance (-100 to 100).
    pub vibrance: f32,
    /// Saturation (-100 to 100).
    pub saturation: f32,
    /// Warm-cool temperature (-100 to 100).
    pub temperature: f32,
    /// Gaussian blur sigma in pixels (0 to 20).
    pub blur: f32,
    /// Gaussian noise standard deviation (0 to 100).
    pub noise: f32,
    /// Vignette strength (0 to 100).
    pub vignette: f32,
    /// Luminance threshold (0 to 255, 0 = disabled).
    pub threshold: f32,
}

impl Default for AdjustmentState {
    fn default() -> Self {
        Self {
            exposure: 0.0,
            highlights: 0.0,
            shadows: 0.0,
            contrast: 0.0,
            brightness: 0.0,
            blacks: 0.0,
            whites: 0.0,
            gamma: 1.0,
            hue: 0.0,
            tint: 0.0,
            vibrance: 0.0,
            saturation: 0.0,
            temperature: 0.0,
            blur: 0.0,
            noise: 0.0,
            vignette: 0.0,
            threshold: 0.0,
        }
    }
}

impl AdjustmentState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when every slider sits at its identity value.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// True when any per-pixel stage (everything except blur, noise,
    /// vignette, threshold) is active.
    pub fn has_pixel_stages(&self) -> bool {
        self.exposure != 0.0
            || self.highlights != 0.0
            || self.shadows != 0.0
            || self.contrast != 0.0
            || self.brightness != 0.0
            || self.blacks != 0.0
            || self.whites != 0.0
            || self.gamma != 1.0
            || self.hue != 0.0
            || self.tint != 0.0
            || self.vibrance != 0.0
            || self.saturation != 0.0
            || self.temperature != 0.0
    }
}
