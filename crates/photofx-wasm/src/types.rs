//! WASM-compatible wrapper types for image data.
//!
//! This module provides JavaScript-friendly types that wrap the core PhotoFX
//! buffer, handling the conversion between Rust and JavaScript data
//! representations.

use photofx_core::{FilterError, PixelBuffer, PixelLayout};
use wasm_bindgen::prelude::*;

/// A pixel buffer wrapper for JavaScript.
///
/// Images enter as RGB bytes (3 per pixel, row-major). After a grayscale
/// filter the buffer holds a single channel; check `channels` before
/// interpreting `pixels()`, or use `rgba_pixels()` which always returns four
/// bytes per pixel.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy is made
/// to JavaScript memory as a `Uint8Array`.
///
/// The `free()` method can be called to explicitly release WASM memory, but this is
/// optional as wasm-bindgen's finalizer will handle cleanup automatically.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsPixelBuffer {
    inner: PixelBuffer,
}

#[wasm_bindgen]
impl JsPixelBuffer {
    /// Create a buffer from dimensions and RGB pixel data.
    ///
    /// # Errors
    /// Returns an error string if the byte count is not `width * height * 3`
    /// or a dimension is zero.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsPixelBuffer, JsValue> {
        Self::from_rgb(width, height, pixels).map_err(crate::to_js_error)
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Samples per pixel: 3 for color, 1 after grayscale.
    #[wasm_bindgen(getter)]
    pub fn channels(&self) -> usize {
        self.inner.channels()
    }

    /// Get the number of bytes in the pixel buffer
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.byte_size()
    }

    /// Returns the raw samples as Uint8Array (RGB or gray).
    ///
    /// Note: This creates a copy of the pixel data.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.samples().to_vec()
    }

    /// Returns opaque RGBA samples, ready for `new ImageData(...)`.
    pub fn rgba_pixels(&self) -> Vec<u8> {
        self.inner.to_rgba()
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup automatically.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsPixelBuffer {
    /// Build from RGB bytes without touching `JsValue`.
    pub(crate) fn from_rgb(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, FilterError> {
        PixelBuffer::new(width, height, PixelLayout::Rgb, pixels).map(Self::from_buffer)
    }

    pub(crate) fn from_buffer(inner: PixelBuffer) -> Self {
        Self { inner }
    }

    /// Clone the core buffer so the JavaScript-side image stays valid.
    pub(crate) fn to_buffer(&self) -> PixelBuffer {
        self.inner.clone()
    }
}
