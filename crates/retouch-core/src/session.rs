//! The editing session: the narrow interface the UI layer calls into.
//!
//! An [`EditSession`] owns exactly one pristine original and one mutable
//! working image. Transform updates re-derive the working image from the
//! original; adjustment updates only produce previews; discrete destructive
//! operations snapshot into history and mutate the working image in place.
//!
//! Everything is synchronous and runs to completion on the calling thread.
//! Debouncing rapid slider updates is the caller's job; the core only
//! guarantees that the latest call's result is correct and deterministic.
//! Operations that cannot complete leave the session untouched and return
//! the specific error kind.

use log::{debug, info};
use thiserror::Error;

use crate::adjust::render_adjustments;
use crate::decode::{decode_image, DecodeError};
use crate::draw::{DrawError, DrawLayer, DrawOp};
use crate::encode::{encode_jpeg, encode_png, EncodeError};
use crate::frequency::{apply_frequency, FrequencyOp};
use crate::histogram::Histogram;
use crate::history::{HistoryError, HistoryManager};
use crate::morphology::{apply_morphology, MorphOp};
use crate::quick::{apply_quick_filter, QuickFilter};
use crate::raster::RasterBuffer;
use crate::transform::crop::{crop_selection, CropError, SelectionRect};
use crate::transform::flip::{flip, FlipDirection};
use crate::transform::perspective::warp_perspective;
use crate::transform::{render_transforms, ResampleFilter};
use crate::{AdjustmentState, CornerOffsets, TransformState};

/// Errors surfaced by session operations.
#[derive(Debug, Error)]
pub enum EditError {
    /// An operation was invoked before any image was loaded or generated.
    #[error("No image loaded")]
    NoImageLoaded,

    /// A structurally invalid input (numeric slider values are clamped
    /// instead, and kernel sizes snapped odd, so they never land here).
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Undo/redo stack exhausted.
    #[error(transparent)]
    History(#[from] HistoryError),

    /// Input bytes could not be decoded; session state is unchanged.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Export encoding failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

impl From<CropError> for EditError {
    fn from(e: CropError) -> Self {
        EditError::InvalidParameter(e.to_string())
    }
}

impl From<DrawError> for EditError {
    fn from(e: DrawError) -> Self {
        EditError::InvalidParameter(e.to_string())
    }
}

/// One named transform field update.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum TransformSetting {
    Resize(f32),
    Rotate(f32),
    ScaleX(f32),
    ScaleY(f32),
    ShearX(f32),
    ShearY(f32),
    TranslateX(f32),
    TranslateY(f32),
    /// Replace all four corner offsets (live perspective drag).
    Perspective(CornerOffsets),
}

/// One named adjustment field update.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum AdjustmentSetting {
    Exposure(f32),
    Highlights(f32),
    Shadows(f32),
    Contrast(f32),
    Brightness(f32),
    Blacks(f32),
    Whites(f32),
    Gamma(f32),
    Hue(f32),
    Tint(f32),
    Vibrance(f32),
    Saturation(f32),
    Temperature(f32),
    Blur(f32),
    Noise(f32),
    Vignette(f32),
    Threshold(f32),
}

/// Discrete destructive edits; each snapshots before mutating.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum DestructiveOp {
    /// Structuring-element morphology with a kernel size (snapped odd).
    Morphology { op: MorphOp, kernel_size: u32 },
    /// One-click filter.
    QuickFilter(QuickFilter),
    /// Frequency-domain operation.
    Frequency(FrequencyOp),
    /// Mirror or flip.
    Flip(FlipDirection),
    /// Crop from an interactive display-space selection.
    Crop {
        rect: SelectionRect,
        display_w: f32,
        display_h: f32,
    },
    /// Bake the current perspective offsets and reset them.
    CommitPerspective,
    /// Composite the draw overlay onto the working image and clear it.
    CommitDraw,
}

/// Output encoding for [`EditSession::export`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ExportFormat {
    /// Lossless, for intermediate edits.
    Png,
    /// Lossy final export at the given quality (1-100).
    Jpeg { quality: u8 },
}

/// The session object owning all editing state.
pub struct EditSession {
    original: Option<RasterBuffer>,
    working: Option<RasterBuffer>,
    transforms: TransformState,
    adjustments: AdjustmentState,
    draw_layer: Option<DrawLayer>,
    history: HistoryManager,
    filter: ResampleFilter,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditSession {
    /// Create an empty session; operations fail with [`EditError::NoImageLoaded`]
    /// until an image arrives.
    pub fn new() -> Self {
        Self {
            original: None,
            working: None,
            transforms: TransformState::default(),
            adjustments: AdjustmentState::default(),
            draw_layer: None,
            history: HistoryManager::new(),
            filter: ResampleFilter::Lanczos3,
        }
    }

    /// Use a different resampling filter for the geometry stages
    /// (bilinear keeps live previews cheap).
    pub fn with_resample_filter(mut self, filter: ResampleFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Decode and load an image, replacing all session state.
    pub fn load(&mut self, bytes: &[u8]) -> Result<(), EditError> {
        let raster = decode_image(bytes)?;
        self.install(raster, "load");
        Ok(())
    }

    /// Load an already-decoded raster, replacing all session state.
    pub fn load_raster(&mut self, raster: RasterBuffer) {
        self.install(raster, "load_raster");
    }

    /// Install a generated image (same lifecycle as a load).
    pub fn generate(&mut self, raster: RasterBuffer) {
        self.install(raster, "generate");
    }

    fn install(&mut self, raster: RasterBuffer, source: &str) {
        info!(
            "session {}: {}x{} image installed",
            source, raster.width, raster.height
        );
        self.transforms = TransformState::default();
        self.adjustments = AdjustmentState::default();
        self.draw_layer = Some(DrawLayer::new(raster.width, raster.height));
        self.history.reset(&raster);
        self.original = Some(raster.clone());
        self.working = Some(raster);
    }

    pub fn is_loaded(&self) -> bool {
        self.working.is_some()
    }

    /// The current working image.
    pub fn working(&self) -> Result<&RasterBuffer, EditError> {
        self.working.as_ref().ok_or(EditError::NoImageLoaded)
    }

    /// The pristine original.
    pub fn original(&self) -> Result<&RasterBuffer, EditError> {
        self.original.as_ref().ok_or(EditError::NoImageLoaded)
    }

    pub fn transforms(&self) -> &TransformState {
        &self.transforms
    }

    pub fn adjustments(&self) -> &AdjustmentState {
        &self.adjustments
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Update one transform field and re-derive the working image from the
    /// original. Out-of-range values clamp; non-finite values are rejected.
    pub fn set_transform(&mut self, setting: TransformSetting) -> Result<&RasterBuffer, EditError> {
        let original = self.original.as_ref().ok_or(EditError::NoImageLoaded)?;

        match setting {
            TransformSetting::Resize(v) => {
                self.transforms.resize = checked(v, 10.0, 200.0)?;
            }
            TransformSetting::Rotate(v) => {
                self.transforms.rotate = checked(v, -180.0, 180.0)?;
            }
            TransformSetting::ScaleX(v) => {
                self.transforms.scale_x = checked(v, 10.0, 200.0)?;
            }
            TransformSetting::ScaleY(v) => {
                self.transforms.scale_y = checked(v, 10.0, 200.0)?;
            }
            TransformSetting::ShearX(v) => {
                self.transforms.shear_x = checked(v, -45.0, 45.0)?;
            }
            TransformSetting::ShearY(v) => {
                self.transforms.shear_y = checked(v, -45.0, 45.0)?;
            }
            TransformSetting::TranslateX(v) => {
                self.transforms.translate_x = checked(v, -200.0, 200.0)?;
            }
            TransformSetting::TranslateY(v) => {
                self.transforms.translate_y = checked(v, -200.0, 200.0)?;
            }
            TransformSetting::Perspective(offsets) => {
                for d in [
                    offsets.top_left,
                    offsets.top_right,
                    offsets.bottom_right,
                    offsets.bottom_left,
                ] {
                    if !d[0].is_finite() || !d[1].is_finite() {
                        return Err(EditError::InvalidParameter(
                            "corner offset is not finite".into(),
                        ));
                    }
                }
                self.transforms.perspective = offsets;
                // Preview path: always warped straight from the original,
                // never snapshotted.
                let warped = warp_perspective(original, &offsets);
                self.replace_working(warped);
                return Ok(self.working.as_ref().expect("just replaced"));
            }
        }

        debug!("transform update: {:?}", setting);
        let derived = render_transforms(original, &self.transforms, self.filter);
        self.replace_working(derived);
        Ok(self.working.as_ref().expect("just replaced"))
    }

    /// Update one adjustment field and return the resulting preview.
    ///
    /// The working image is never mutated by this path.
    pub fn set_adjustment(&mut self, setting: AdjustmentSetting) -> Result<RasterBuffer, EditError> {
        if self.working.is_none() {
            return Err(EditError::NoImageLoaded);
        }

        match setting {
            AdjustmentSetting::Exposure(v) => self.adjustments.exposure = checked(v, -100.0, 100.0)?,
            AdjustmentSetting::Highlights(v) => {
                self.adjustments.highlights = checked(v, -100.0, 100.0)?
            }
            AdjustmentSetting::Shadows(v) => self.adjustments.shadows = checked(v, -100.0, 100.0)?,
            AdjustmentSetting::Contrast(v) => self.adjustments.contrast = checked(v, -100.0, 100.0)?,
            AdjustmentSetting::Brightness(v) => {
                self.adjustments.brightness = checked(v, -100.0, 100.0)?
            }
            AdjustmentSetting::Blacks(v) => self.adjustments.blacks = checked(v, -100.0, 100.0)?,
            AdjustmentSetting::Whites(v) => self.adjustments.whites = checked(v, -100.0, 100.0)?,
            AdjustmentSetting::Gamma(v) => self.adjustments.gamma = checked(v, 0.1, 3.0)?,
            AdjustmentSetting::Hue(v) => self.adjustments.hue = checked(v, -180.0, 180.0)?,
            AdjustmentSetting::Tint(v) => self.adjustments.tint = checked(v, -100.0, 100.0)?,
            AdjustmentSetting::Vibrance(v) => self.adjustments.vibrance = checked(v, -100.0, 100.0)?,
            AdjustmentSetting::Saturation(v) => {
                self.adjustments.saturation = checked(v, -100.0, 100.0)?
            }
            AdjustmentSetting::Temperature(v) => {
                self.adjustments.temperature = checked(v, -100.0, 100.0)?
            }
            AdjustmentSetting::Blur(v) => self.adjustments.blur = checked(v, 0.0, 20.0)?,
            AdjustmentSetting::Noise(v) => self.adjustments.noise = checked(v, 0.0, 100.0)?,
            AdjustmentSetting::Vignette(v) => self.adjustments.vignette = checked(v, 0.0, 100.0)?,
            AdjustmentSetting::Threshold(v) => self.adjustments.threshold = checked(v, 0.0, 255.0)?,
        }

        self.preview()
    }

    /// Render the adjustment stack over the current working image.
    pub fn preview(&self) -> Result<RasterBuffer, EditError> {
        let working = self.working.as_ref().ok_or(EditError::NoImageLoaded)?;
        Ok(render_adjustments(working, &self.adjustments))
    }

    /// Bake the current preview into the working image and reset the
    /// adjustment sliders. No-op when everything is at its default.
    pub fn commit_adjustments(&mut self) -> Result<&RasterBuffer, EditError> {
        let working = self.working.as_ref().ok_or(EditError::NoImageLoaded)?;
        if self.adjustments.is_default() {
            return Ok(self.working.as_ref().expect("checked above"));
        }

        let baked = render_adjustments(working, &self.adjustments);
        self.history.snapshot(working);
        self.adjustments = AdjustmentState::default();
        self.replace_working(baked);
        info!("adjustments committed into working image");
        Ok(self.working.as_ref().expect("just replaced"))
    }

    /// Accumulate a draw operation on the annotation overlay.
    ///
    /// Non-destructive until [`DestructiveOp::CommitDraw`].
    pub fn draw(&mut self, op: &DrawOp) -> Result<(), EditError> {
        let working = self.working.as_ref().ok_or(EditError::NoImageLoaded)?;
        let layer = self.draw_layer.as_mut().ok_or(EditError::NoImageLoaded)?;
        layer.apply(op, working)?;
        Ok(())
    }

    /// Rasterize text onto the annotation overlay.
    pub fn draw_text(
        &mut self,
        font_bytes: &[u8],
        text: &str,
        size: f32,
        origin: (f32, f32),
        color: [u8; 4],
    ) -> Result<(), EditError> {
        if self.working.is_none() {
            return Err(EditError::NoImageLoaded);
        }
        let layer = self.draw_layer.as_mut().ok_or(EditError::NoImageLoaded)?;
        layer.draw_text(font_bytes, text, size, origin, color)?;
        Ok(())
    }

    /// Read access to the annotation overlay for live compositing.
    pub fn draw_layer(&self) -> Option<&DrawLayer> {
        self.draw_layer.as_ref()
    }

    /// Apply a discrete destructive operation: snapshot, mutate, return the
    /// new working image. The result is computed before any state changes,
    /// so a failure leaves the session exactly as it was.
    pub fn apply_destructive(&mut self, op: DestructiveOp) -> Result<&RasterBuffer, EditError> {
        let working = self.working.as_ref().ok_or(EditError::NoImageLoaded)?;

        let next = match &op {
            DestructiveOp::Morphology { op, kernel_size } => {
                apply_morphology(working, *op, *kernel_size)
            }
            DestructiveOp::QuickFilter(filter) => apply_quick_filter(working, *filter),
            DestructiveOp::Frequency(freq_op) => apply_frequency(working, *freq_op),
            DestructiveOp::Flip(direction) => flip(working, *direction),
            DestructiveOp::Crop {
                rect,
                display_w,
                display_h,
            } => crop_selection(working, *rect, *display_w, *display_h)?,
            DestructiveOp::CommitPerspective => {
                let original = self.original.as_ref().ok_or(EditError::NoImageLoaded)?;
                warp_perspective(original, &self.transforms.perspective)
            }
            DestructiveOp::CommitDraw => {
                let layer = self.draw_layer.as_ref().ok_or(EditError::NoImageLoaded)?;
                if layer.is_blank() {
                    // Nothing drawn: avoid burning a history slot
                    return Ok(self.working.as_ref().expect("checked above"));
                }
                layer.composite_over(working)
            }
        };

        debug!("destructive op: {:?}", op);
        self.history.snapshot(working);
        match op {
            DestructiveOp::CommitPerspective => {
                self.transforms.perspective = CornerOffsets::default();
            }
            DestructiveOp::CommitDraw => {
                if let Some(layer) = self.draw_layer.as_mut() {
                    layer.clear();
                }
            }
            _ => {}
        }
        self.replace_working(next);
        Ok(self.working.as_ref().expect("just replaced"))
    }

    /// Step back one destructive edit.
    pub fn undo(&mut self) -> Result<&RasterBuffer, EditError> {
        let working = self.working.as_ref().ok_or(EditError::NoImageLoaded)?;
        let restored = self.history.undo(working)?;
        debug!("undo: restored {}x{} raster", restored.width, restored.height);
        self.replace_working(restored);
        Ok(self.working.as_ref().expect("just replaced"))
    }

    /// Step forward one undone edit.
    pub fn redo(&mut self) -> Result<&RasterBuffer, EditError> {
        let working = self.working.as_ref().ok_or(EditError::NoImageLoaded)?;
        let restored = self.history.redo(working)?;
        debug!("redo: restored {}x{} raster", restored.width, restored.height);
        self.replace_working(restored);
        Ok(self.working.as_ref().expect("just replaced"))
    }

    /// Return to the pristine original: parameter states reset, history
    /// cleared down to the new baseline.
    pub fn reset(&mut self) -> Result<(), EditError> {
        let original = self.original.clone().ok_or(EditError::NoImageLoaded)?;
        info!("session reset to original image");
        self.transforms = TransformState::default();
        self.adjustments = AdjustmentState::default();
        self.draw_layer = Some(DrawLayer::new(original.width, original.height));
        self.history.reset(&original);
        self.working = Some(original);
        Ok(())
    }

    /// Encode the current preview (working image + live adjustments).
    pub fn export(&self, format: ExportFormat) -> Result<Vec<u8>, EditError> {
        let preview = self.preview()?;
        let bytes = match format {
            ExportFormat::Png => encode_png(&preview)?,
            ExportFormat::Jpeg { quality } => encode_jpeg(&preview, quality)?,
        };
        Ok(bytes)
    }

    /// Histogram of the current preview, for the UI's widget.
    pub fn histogram(&self) -> Result<Histogram, EditError> {
        Ok(Histogram::of(&self.preview()?))
    }

    /// Swap in a new working image, keeping the overlay dimensions in sync.
    fn replace_working(&mut self, next: RasterBuffer) {
        let dims_changed = match self.draw_layer.as_ref() {
            Some(layer) => layer.width() != next.width || layer.height() != next.height,
            None => true,
        };
        if dims_changed {
            self.draw_layer = Some(DrawLayer::new(next.width, next.height));
        }
        self.working = Some(next);
    }
}

/// Clamp a slider value into its declared range; reject non-finite input.
fn checked(v: f32, lo: f32, hi: f32) -> Result<f32, EditError> {
    if !v.is_finite() {
        return Err(EditError::InvalidParameter(format!(
            "value must be finite, got {v}"
        )));
    }
    Ok(v.clamp(lo, hi))
}
