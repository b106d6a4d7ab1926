//! PhotoFX Core - Image filter library
//!
//! This crate provides the pixel processing behind PhotoFX: an in-memory
//! pixel buffer, five stylistic filters (grayscale, Gaussian blur, sepia,
//! sharpen, cartoon), a geometric/tonal pre-stage, and the pipeline that
//! chains them.
//!
//! Decoding and encoding image files is left to the caller; everything here
//! works on raw 8-bit samples.

pub mod adjustments;
pub mod buffer;
pub mod config;
pub mod error;
pub mod filters;
mod kernel;
pub mod luminance;
pub mod pipeline;
pub mod transform;

pub use adjustments::DenoiseMode;
pub use buffer::{PixelBuffer, PixelLayout};
pub use config::PipelineConfig;
pub use error::{FilterError, Result};
pub use pipeline::{Filter, FilterRequest, Pipeline, PreStage, Size, FILTER_NAMES};
pub use transform::{FlipMode, Rotation};

/// Crate version, reported to front ends.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
