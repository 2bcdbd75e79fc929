//! WASM bindings for the editing session.
//!
//! Operation payloads cross the boundary as plain JavaScript objects and
//! deserialize into the core's typed enums through serde-wasm-bindgen, so
//! the JS side writes `{ Rotate: 45 }` or `{ Morphology: { op: "Dilate",
//! kernel_size: 3 } }` and dispatch stays exhaustive on the Rust side.

use retouch_core::{
    AdjustmentSetting, DestructiveOp, DrawOp, EditError, EditSession, ExportFormat,
    TransformSetting,
};
use wasm_bindgen::prelude::*;

use crate::types::JsRaster;

/// Map core errors onto JavaScript exceptions.
fn to_js(err: EditError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse<T: serde::de::DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("invalid {what}: {e}")))
}

/// The stateful editing session exposed to JavaScript.
#[wasm_bindgen]
pub struct JsEditSession {
    inner: EditSession,
}

impl Default for JsEditSession {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl JsEditSession {
    /// Create an empty session.
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsEditSession {
        JsEditSession {
            inner: EditSession::new(),
        }
    }

    /// Decode and load PNG or JPEG bytes, replacing all state.
    pub fn load(&mut self, bytes: &[u8]) -> Result<(), JsValue> {
        self.inner.load(bytes).map_err(to_js)
    }

    /// Install an already-decoded raster (e.g. from a canvas or a
    /// generation service), same lifecycle as a load.
    pub fn generate(&mut self, raster: &JsRaster) {
        self.inner.generate(raster.to_raster());
    }

    #[wasm_bindgen(getter)]
    pub fn is_loaded(&self) -> bool {
        self.inner.is_loaded()
    }

    #[wasm_bindgen(getter)]
    pub fn can_undo(&self) -> bool {
        self.inner.can_undo()
    }

    #[wasm_bindgen(getter)]
    pub fn can_redo(&self) -> bool {
        self.inner.can_redo()
    }

    /// The current working image.
    pub fn working(&self) -> Result<JsRaster, JsValue> {
        Ok(JsRaster::from_raster(self.inner.working().map_err(to_js)?.clone()))
    }

    /// Update a transform field, e.g. `{ Rotate: 45 }` or
    /// `{ Perspective: { top_left: [10, 0], ... } }`. Returns the
    /// re-derived working image.
    pub fn set_transform(&mut self, setting: JsValue) -> Result<JsRaster, JsValue> {
        let setting: TransformSetting = parse(setting, "transform setting")?;
        let working = self.inner.set_transform(setting).map_err(to_js)?;
        Ok(JsRaster::from_raster(working.clone()))
    }

    /// Update an adjustment field, e.g. `{ Exposure: 40 }`. Returns the
    /// preview; the working image is untouched.
    pub fn set_adjustment(&mut self, setting: JsValue) -> Result<JsRaster, JsValue> {
        let setting: AdjustmentSetting = parse(setting, "adjustment setting")?;
        let preview = self.inner.set_adjustment(setting).map_err(to_js)?;
        Ok(JsRaster::from_raster(preview))
    }

    /// Render the current preview without changing any state.
    pub fn preview(&self) -> Result<JsRaster, JsValue> {
        Ok(JsRaster::from_raster(self.inner.preview().map_err(to_js)?))
    }

    /// Bake the preview into the working image and reset the sliders.
    pub fn commit_adjustments(&mut self) -> Result<JsRaster, JsValue> {
        let working = self.inner.commit_adjustments().map_err(to_js)?;
        Ok(JsRaster::from_raster(working.clone()))
    }

    /// Accumulate a draw operation on the overlay, e.g.
    /// `{ Line: { from: [0, 0], to: [50, 50], color: [255, 0, 0, 255], thickness: 3 } }`.
    pub fn draw(&mut self, op: JsValue) -> Result<(), JsValue> {
        let op: DrawOp = parse(op, "draw operation")?;
        self.inner.draw(&op).map_err(to_js)
    }

    /// Rasterize a line of text onto the overlay with caller-supplied font
    /// bytes.
    pub fn draw_text(
        &mut self,
        font_bytes: &[u8],
        text: &str,
        size: f32,
        x: f32,
        y: f32,
        color: Vec<u8>,
    ) -> Result<(), JsValue> {
        if color.len() != 4 {
            return Err(JsValue::from_str("color must be [r, g, b, a]"));
        }
        self.inner
            .draw_text(
                font_bytes,
                text,
                size,
                (x, y),
                [color[0], color[1], color[2], color[3]],
            )
            .map_err(to_js)
    }

    /// Apply a destructive operation, e.g.
    /// `{ Morphology: { op: "Dilate", kernel_size: 3 } }`,
    /// `{ QuickFilter: "Sepia" }`, `{ Frequency: "LowPass" }`,
    /// `{ Flip: "Horizontal" }`, `"CommitDraw"`. Returns the new working
    /// image.
    pub fn apply_destructive(&mut self, op: JsValue) -> Result<JsRaster, JsValue> {
        let op: DestructiveOp = parse(op, "destructive operation")?;
        let working = self.inner.apply_destructive(op).map_err(to_js)?;
        Ok(JsRaster::from_raster(working.clone()))
    }

    pub fn undo(&mut self) -> Result<JsRaster, JsValue> {
        let working = self.inner.undo().map_err(to_js)?;
        Ok(JsRaster::from_raster(working.clone()))
    }

    pub fn redo(&mut self) -> Result<JsRaster, JsValue> {
        let working = self.inner.redo().map_err(to_js)?;
        Ok(JsRaster::from_raster(working.clone()))
    }

    /// Return to the pristine original.
    pub fn reset(&mut self) -> Result<(), JsValue> {
        self.inner.reset().map_err(to_js)
    }

    /// Encode the current preview as lossless PNG.
    pub fn export_png(&self) -> Result<Vec<u8>, JsValue> {
        self.inner.export(ExportFormat::Png).map_err(to_js)
    }

    /// Encode the current preview as JPEG at the given quality (1-100).
    pub fn export_jpeg(&self, quality: u8) -> Result<Vec<u8>, JsValue> {
        self.inner
            .export(ExportFormat::Jpeg { quality })
            .map_err(to_js)
    }

    /// Histogram of the current preview as 1024 bins: 256 each for red,
    /// green, blue, and luminance, concatenated in that order.
    pub fn histogram(&self) -> Result<Vec<u32>, JsValue> {
        let hist = self.inner.histogram().map_err(to_js)?;
        let mut bins = Vec::with_capacity(1024);
        bins.extend_from_slice(&hist.red);
        bins.extend_from_slice(&hist.green);
        bins.extend_from_slice(&hist.blue);
        bins.extend_from_slice(&hist.luminance);
        Ok(bins)
    }
}
