//! Resizing to exact dimensions and to a maximum width.
//!
//! Resampling is delegated to the `image` crate. Bilinear (triangle)
//! filtering is used throughout, which is the usual default for interactive
//! editing previews.

use image::imageops::{self, FilterType};
use tracing::debug;

use crate::buffer::PixelBuffer;
use crate::error::{FilterError, Result};

/// Resize a buffer to exact dimensions, ignoring aspect ratio.
///
/// Resampling is channel-independent, so Bgr buffers are resized in place
/// without reordering and keep their layout.
///
/// # Errors
///
/// Returns [`FilterError::InvalidParameter`] if `width` or `height` is zero.
pub fn resize(buffer: PixelBuffer, width: u32, height: u32) -> Result<PixelBuffer> {
    if width == 0 {
        return Err(zero_dimension("width"));
    }
    if height == 0 {
        return Err(zero_dimension("height"));
    }

    // Fast path: if dimensions match, nothing to do
    if buffer.width() == width && buffer.height() == height {
        return Ok(buffer);
    }

    debug!(
        from_w = buffer.width(),
        from_h = buffer.height(),
        to_w = width,
        to_h = height,
        "Resizing buffer"
    );

    buffer.map_image(
        |img| imageops::resize(img, width, height, FilterType::Triangle),
        |img| imageops::resize(img, width, height, FilterType::Triangle),
    )
}

/// Downscale a buffer so it is at most `max_width` pixels wide.
///
/// Aspect ratio is preserved. Buffers already narrow enough are returned
/// unchanged; this never upscales.
///
/// # Errors
///
/// Returns [`FilterError::InvalidParameter`] if `max_width` is zero.
pub fn fit_to_width(buffer: PixelBuffer, max_width: u32) -> Result<PixelBuffer> {
    if max_width == 0 {
        return Err(FilterError::InvalidParameter {
            operator: "fit-to-width",
            name: "max_width",
            value: 0.0,
            min: 1.0,
            max: f64::from(u32::MAX),
        });
    }

    if buffer.width() <= max_width {
        return Ok(buffer);
    }

    let (width, height) = calculate_fit_width(buffer.width(), buffer.height(), max_width);
    resize(buffer, width, height)
}

/// Dimensions scaled so the width equals `max_width`.
///
/// Height is truncated, as when multiplying both sides by the scale factor
/// and converting back to integers, but never drops below one pixel.
fn calculate_fit_width(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    let scale = max_width as f64 / width as f64;
    let new_height = (height as f64 * scale) as u32;
    (max_width, new_height.max(1))
}

fn zero_dimension(name: &'static str) -> FilterError {
    FilterError::InvalidParameter {
        operator: "resize",
        name,
        value: 0.0,
        min: 1.0,
        max: f64::from(u32::MAX),
    }
}
