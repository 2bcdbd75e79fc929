//! Retouch WASM - WebAssembly bindings for the Retouch editing pipeline
//!
//! This crate exposes the retouch-core session interface to
//! JavaScript/TypeScript applications. The browser UI owns widgets,
//! debouncing, and file pickers; every actual edit funnels through the
//! [`session::JsEditSession`] wrapper into the core.
//!
//! # Module Structure
//!
//! - `session` - The stateful editing session (load, transform, adjust,
//!   destructive ops, undo/redo, export)
//! - `types` - WASM-compatible wrapper types for raster data
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsEditSession } from '@retouch/wasm';
//!
//! await init();
//!
//! const session = new JsEditSession();
//! session.load(new Uint8Array(await file.arrayBuffer()));
//! const preview = session.set_adjustment({ Exposure: 40 });
//! console.log(`Preview ${preview.width}x${preview.height}`);
//! ```

use wasm_bindgen::prelude::*;

mod session;
mod types;

pub use session::JsEditSession;
pub use types::JsRaster;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&"retouch-wasm initialized".into());
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
