//! Pipeline WASM bindings.
//!
//! Exposes the filter pipeline to the web UI: full requests as plain
//! JavaScript objects, single filters by name, and the upload downscale.

use crate::types::JsPixelBuffer;
use photofx_core::{Filter, FilterRequest, Pipeline, FILTER_NAMES};
use wasm_bindgen::prelude::*;

/// Run a full request (pre-stage plus stylistic filters) on an image.
///
/// The request object mirrors the core `FilterRequest`; every field is
/// optional.
///
/// # Example (TypeScript)
/// ```typescript
/// const result = process_image(image, {
///   pre_stage: { rotation: 90, flip: "horizontal", contrast: 1.2, denoise: "median" },
///   filters: ["sepia", { "gaussian-blur": { intensity: 7 } }],
/// });
/// ctx.putImageData(new ImageData(new Uint8ClampedArray(result.rgba_pixels()), result.width), 0, 0);
/// result.free();
/// ```
#[wasm_bindgen]
pub fn process_image(image: &JsPixelBuffer, request: JsValue) -> Result<JsPixelBuffer, JsValue> {
    let request: FilterRequest = serde_wasm_bindgen::from_value(request)
        .map_err(|e| crate::log_error(format!("Invalid filter request: {}", e)))?;
    run_request(image, &request).map_err(crate::to_js_error)
}

/// Apply one stylistic filter by name (e.g. `"Gaussian Blur"`, `"sepia"`).
#[wasm_bindgen]
pub fn apply_filter(image: &JsPixelBuffer, name: &str) -> Result<JsPixelBuffer, JsValue> {
    apply_named(image, name).map_err(crate::to_js_error)
}

/// Downscale an upload so its width is at most `max_width`, keeping aspect ratio.
#[wasm_bindgen]
pub fn fit_to_width(image: &JsPixelBuffer, max_width: u32) -> Result<JsPixelBuffer, JsValue> {
    photofx_core::transform::fit_to_width(image.to_buffer(), max_width)
        .map(JsPixelBuffer::from_buffer)
        .map_err(crate::to_js_error)
}

/// Canonical filter names, in menu order.
#[wasm_bindgen]
pub fn filter_names() -> Vec<String> {
    FILTER_NAMES.iter().map(|name| name.to_string()).collect()
}

fn run_request(image: &JsPixelBuffer, request: &FilterRequest) -> photofx_core::Result<JsPixelBuffer> {
    Pipeline::default()
        .run(image.to_buffer(), request)
        .map(JsPixelBuffer::from_buffer)
}

fn apply_named(image: &JsPixelBuffer, name: &str) -> photofx_core::Result<JsPixelBuffer> {
    let filter: Filter = name.parse()?;
    Pipeline::default()
        .run_filters(image.to_buffer(), &[filter])
        .map(JsPixelBuffer::from_buffer)
}
