//! PhotoFX WASM - WebAssembly bindings for PhotoFX
//!
//! This crate provides WASM bindings to expose the photofx-core filter
//! pipeline to JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper for pixel buffers
//! - `pipeline` - Request processing, single filters, upload downscaling
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsPixelBuffer, fit_to_width, apply_filter } from '@photofx/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! // RGB bytes decoded by the browser (drop the alpha channel first)
//! const image = fit_to_width(new JsPixelBuffer(width, height, rgb), 800);
//! const cartoon = apply_filter(image, "Cartoon Effect");
//! console.log(`Filtered ${cartoon.width}x${cartoon.height}`);
//! ```

use photofx_core::FilterError;
use wasm_bindgen::prelude::*;

mod pipeline;
mod types;

// Re-export public types
pub use pipeline::{apply_filter, filter_names, fit_to_width, process_image};
pub use types::JsPixelBuffer;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Future: Set up panic hook for better error messages in browser console
    // when console_error_panic_hook feature is added
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    photofx_core::VERSION.to_string()
}

/// Convert a core error into the string value thrown to JavaScript.
pub(crate) fn to_js_error(err: FilterError) -> JsValue {
    log_error(err.to_string())
}

/// Log a message to the browser console and wrap it for throwing.
pub(crate) fn log_error(message: String) -> JsValue {
    let value = JsValue::from_str(&message);
    web_sys::console::error_1(&value);
    value
}
