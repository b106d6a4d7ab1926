//! Tonal adjustments applied in the pre-stage.
//!
//! ## Adjustment Order
//! 1. Brightness / contrast
//! 2. Noise removal

use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::error::{FilterError, Result};
use crate::filters::gaussian_blur;
use crate::kernel::{median, validate_kernel_size};

/// Kernel side length used by both denoise modes.
pub const DENOISE_KERNEL_SIZE: u32 = 5;

/// Largest kernel side accepted by [`denoise`].
pub const MAX_DENOISE_KERNEL_SIZE: u32 = 31;

/// Noise removal applied after brightness/contrast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DenoiseMode {
    #[default]
    None,
    /// Small Gaussian blur; softens fine grain.
    Gaussian,
    /// Median filter; removes salt-and-pepper noise while keeping edges.
    Median,
}

/// Scale and offset every sample.
///
/// Formula: `output = clamp(round(contrast * input + brightness), 0, 255)`
///
/// `contrast` is the multiplier and `brightness` the offset. Bounds are
/// checked by the pipeline against its configuration; this function accepts
/// any finite values and only guarantees the clamp.
///
/// # Example
/// ```
/// use photofx_core::adjustments::adjust_brightness_contrast;
/// use photofx_core::{PixelBuffer, PixelLayout};
///
/// let img = PixelBuffer::filled(1, 1, PixelLayout::Rgb, &[100, 100, 100]).unwrap();
/// let out = adjust_brightness_contrast(img, 1.5, 10.0);
/// assert_eq!(out.samples(), &[160, 160, 160]);
/// ```
pub fn adjust_brightness_contrast(buffer: PixelBuffer, contrast: f32, brightness: f32) -> PixelBuffer {
    // Early exit if no adjustment
    if contrast == 1.0 && brightness == 0.0 {
        return buffer;
    }

    let (width, height, layout) = (buffer.width(), buffer.height(), buffer.layout());
    let mut samples = buffer.into_samples();

    // Every u8 input maps through the same affine function, so build a LUT.
    let mut lut = [0u8; 256];
    for (v, out) in lut.iter_mut().enumerate() {
        *out = (contrast * v as f32 + brightness).round().clamp(0.0, 255.0) as u8;
    }
    for s in &mut samples {
        *s = lut[*s as usize];
    }

    PixelBuffer::from_parts(width, height, layout, samples)
}

/// Remove noise with a `kernel_size x kernel_size` window.
///
/// # Errors
///
/// Returns [`crate::FilterError::InvalidKernelSize`] if `kernel_size` is
/// zero or even and `mode` is not `None`, and
/// [`FilterError::InvalidParameter`] if it exceeds
/// [`MAX_DENOISE_KERNEL_SIZE`].
pub fn denoise(buffer: PixelBuffer, mode: DenoiseMode, kernel_size: u32) -> Result<PixelBuffer> {
    if mode != DenoiseMode::None && kernel_size > MAX_DENOISE_KERNEL_SIZE {
        return Err(FilterError::InvalidParameter {
            operator: "denoise",
            name: "kernel_size",
            value: f64::from(kernel_size),
            min: 1.0,
            max: f64::from(MAX_DENOISE_KERNEL_SIZE),
        });
    }

    match mode {
        DenoiseMode::None => Ok(buffer),
        DenoiseMode::Gaussian => gaussian_blur(buffer, kernel_size),
        DenoiseMode::Median => {
            validate_kernel_size("denoise", kernel_size)?;
            let samples = median(
                buffer.samples(),
                buffer.width() as usize,
                buffer.height() as usize,
                buffer.channels(),
                kernel_size,
            );
            Ok(PixelBuffer::from_parts(
                buffer.width(),
                buffer.height(),
                buffer.layout(),
                samples,
            ))
        }
    }
}
