//! Parameter bounds and defaults for the pipeline.
//!
//! The configuration is plain data with serde support, so a front end can
//! ship its own bounds as JSON. Missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::adjustments::{DENOISE_KERNEL_SIZE, MAX_DENOISE_KERNEL_SIZE};
use crate::error::{FilterError, Result};
use crate::filters::DEFAULT_BLUR_INTENSITY;

/// Default lower bound for resize targets, in pixels.
pub const DEFAULT_MIN_DIMENSION: u32 = 50;

/// Default maximum width of an uploaded image before editing.
pub const DEFAULT_MAX_PREVIEW_WIDTH: u32 = 800;

/// Largest blur kernel a configuration may use as its default.
pub const MAX_DEFAULT_BLUR_INTENSITY: u32 = 255;

/// Bounds and defaults used by [`crate::Pipeline`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Smallest width or height a resize may target.
    pub min_dimension: u32,
    /// Upper bound for the contrast multiplier; the lower bound is exclusive zero.
    pub max_contrast: f32,
    /// Brightness offset must lie in `[-max_brightness, max_brightness]`.
    pub max_brightness: f32,
    /// Kernel size for a Gaussian blur requested without parameters.
    pub default_blur_intensity: u32,
    /// Kernel size used by the denoise step.
    pub denoise_kernel: u32,
    /// Width uploads are reduced to by [`crate::transform::fit_to_width`].
    pub max_preview_width: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_dimension: DEFAULT_MIN_DIMENSION,
            max_contrast: 3.0,
            max_brightness: 100.0,
            default_blur_intensity: DEFAULT_BLUR_INTENSITY,
            denoise_kernel: DENOISE_KERNEL_SIZE,
            max_preview_width: DEFAULT_MAX_PREVIEW_WIDTH,
        }
    }
}

impl PipelineConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the configuration itself for values no request could satisfy.
    pub fn validate(&self) -> Result<()> {
        if !(self.max_contrast.is_finite() && self.max_contrast > 0.0) {
            return Err(config_error("max_contrast", self.max_contrast as f64));
        }
        if !(self.max_brightness.is_finite() && self.max_brightness >= 0.0) {
            return Err(config_error("max_brightness", self.max_brightness as f64));
        }
        if self.default_blur_intensity == 0 || self.default_blur_intensity % 2 == 0 {
            return Err(FilterError::InvalidKernelSize {
                operator: "config",
                size: self.default_blur_intensity,
            });
        }
        if self.denoise_kernel == 0 || self.denoise_kernel % 2 == 0 {
            return Err(FilterError::InvalidKernelSize {
                operator: "config",
                size: self.denoise_kernel,
            });
        }
        if self.default_blur_intensity > MAX_DEFAULT_BLUR_INTENSITY {
            return Err(kernel_bound_error(
                "default_blur_intensity",
                self.default_blur_intensity,
                MAX_DEFAULT_BLUR_INTENSITY,
            ));
        }
        if self.denoise_kernel > MAX_DENOISE_KERNEL_SIZE {
            return Err(kernel_bound_error(
                "denoise_kernel",
                self.denoise_kernel,
                MAX_DENOISE_KERNEL_SIZE,
            ));
        }
        if self.max_preview_width == 0 {
            return Err(config_error("max_preview_width", 0.0));
        }
        Ok(())
    }

    /// Contrast must be in `(0, max_contrast]`.
    pub(crate) fn check_contrast(&self, contrast: f32) -> Result<()> {
        if contrast.is_finite() && contrast > 0.0 && contrast <= self.max_contrast {
            Ok(())
        } else {
            Err(FilterError::InvalidParameter {
                operator: "brightness-contrast",
                name: "contrast",
                value: contrast as f64,
                min: 0.0,
                max: self.max_contrast as f64,
            })
        }
    }

    /// Brightness must be in `[-max_brightness, max_brightness]`.
    pub(crate) fn check_brightness(&self, brightness: f32) -> Result<()> {
        if brightness.is_finite() && brightness.abs() <= self.max_brightness {
            Ok(())
        } else {
            Err(FilterError::InvalidParameter {
                operator: "brightness-contrast",
                name: "brightness",
                value: brightness as f64,
                min: -self.max_brightness as f64,
                max: self.max_brightness as f64,
            })
        }
    }

    /// A resize target must lie in `[min_dimension, original]`.
    ///
    /// The original size itself is always accepted, so images smaller than
    /// `min_dimension` can still pass through unchanged.
    pub(crate) fn check_dimension(&self, name: &'static str, target: u32, original: u32) -> Result<()> {
        if target == original || (target >= self.min_dimension && target <= original) {
            Ok(())
        } else {
            Err(FilterError::InvalidParameter {
                operator: "resize",
                name,
                value: target as f64,
                min: self.min_dimension.min(original) as f64,
                max: original as f64,
            })
        }
    }
}

fn config_error(name: &'static str, value: f64) -> FilterError {
    FilterError::InvalidParameter {
        operator: "config",
        name,
        value,
        min: 0.0,
        max: f64::MAX,
    }
}

fn kernel_bound_error(name: &'static str, size: u32, max: u32) -> FilterError {
    FilterError::InvalidParameter {
        operator: "config",
        name,
        value: f64::from(size),
        min: 1.0,
        max: f64::from(max),
    }
}
