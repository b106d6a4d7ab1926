//! Pipeline executor.
//!
//! A request is processed in two stages:
//!
//! 1. **Pre-stage** (always applied): rotate, flip, resize,
//!    brightness/contrast, denoise. With default parameters every step is a
//!    no-op and the buffer passes through untouched.
//! 2. **Stylistic stage**: the caller's ordered list of [`Filter`]s, each
//!    fed the previous output. No reordering, deduplication or fusion.
//!
//! Execution is fail-fast: the first error aborts the remaining steps and is
//! returned unchanged. No partial result is produced.
//!
//! # Example
//!
//! ```ignore
//! use photofx_core::{Filter, FilterRequest, Pipeline, PipelineConfig};
//!
//! let pipeline = Pipeline::new(PipelineConfig::default())?;
//! let request = FilterRequest::new()
//!     .with_filter(Filter::Sepia)
//!     .with_filter(Filter::GaussianBlur { intensity: Some(7) });
//! let output = pipeline.run(buffer, &request)?;
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::adjustments::{adjust_brightness_contrast, denoise, DenoiseMode};
use crate::buffer::PixelBuffer;
use crate::config::PipelineConfig;
use crate::error::{FilterError, Result};
use crate::filters::{cartoon, gaussian_blur, grayscale, sepia, sharpen};
use crate::transform::{fit_to_width, flip, resize, rotate, FlipMode, Rotation};

/// Canonical names of the stylistic filters, in menu order.
pub const FILTER_NAMES: [&str; 5] = ["grayscale", "gaussian-blur", "sepia", "sharpen", "cartoon"];

/// One stylistic operator and its parameters.
///
/// Serialized either as a bare name (`"sepia"`) or as a single-entry map
/// carrying parameters (`{"gaussian-blur": {"intensity": 7}}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FilterEntry", into = "FilterRepr")]
pub enum Filter {
    Grayscale,
    /// `intensity` is the kernel side; `None` uses the configured default.
    GaussianBlur { intensity: Option<u32> },
    Sepia,
    Sharpen,
    Cartoon,
}

impl Filter {
    /// Canonical identifier, also used in error messages and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Filter::Grayscale => FILTER_NAMES[0],
            Filter::GaussianBlur { .. } => FILTER_NAMES[1],
            Filter::Sepia => FILTER_NAMES[2],
            Filter::Sharpen => FILTER_NAMES[3],
            Filter::Cartoon => FILTER_NAMES[4],
        }
    }

    /// Apply this filter to a buffer.
    pub fn apply(&self, buffer: PixelBuffer, config: &PipelineConfig) -> Result<PixelBuffer> {
        match *self {
            Filter::Grayscale => grayscale(buffer),
            Filter::GaussianBlur { intensity } => {
                gaussian_blur(buffer, intensity.unwrap_or(config.default_blur_intensity))
            }
            Filter::Sepia => sepia(buffer),
            Filter::Sharpen => sharpen(buffer),
            Filter::Cartoon => cartoon(buffer),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Filter {
    type Err = FilterError;

    /// Parse a filter name.
    ///
    /// Case-insensitive; spaces and underscores are treated as hyphens, so
    /// menu labels such as `"Gaussian Blur"` and `"Cartoon Effect"` parse too.
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '_' => '-',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        match normalized.as_str() {
            "grayscale" | "greyscale" => Ok(Filter::Grayscale),
            "gaussian-blur" | "blur" => Ok(Filter::GaussianBlur { intensity: None }),
            "sepia" => Ok(Filter::Sepia),
            "sharpen" | "sharpening" => Ok(Filter::Sharpen),
            "cartoon" | "cartoon-effect" => Ok(Filter::Cartoon),
            _ => Err(FilterError::UnknownFilter(s.to_string())),
        }
    }
}

/// Wire form of [`Filter`] as read from a request.
///
/// Parameters stay loose here and are checked key by key in `TryFrom`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum FilterEntry {
    Name(String),
    WithParams(BTreeMap<String, Option<BTreeMap<String, f64>>>),
}

/// Wire form of [`Filter`] as written.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
enum FilterRepr {
    Name(&'static str),
    WithParams(BTreeMap<&'static str, FilterParams>),
}

#[derive(Debug, Clone, Serialize)]
struct FilterParams {
    intensity: u32,
}

impl TryFrom<FilterEntry> for Filter {
    type Error = FilterError;

    fn try_from(entry: FilterEntry) -> Result<Self> {
        let map = match entry {
            FilterEntry::Name(name) => return name.parse(),
            FilterEntry::WithParams(map) => map,
        };

        let mut entries = map.into_iter();
        let (name, params) = match (entries.next(), entries.next()) {
            (Some(entry), None) => entry,
            _ => {
                return Err(FilterError::InvalidRequest(
                    "expected exactly one filter per entry".to_string(),
                ))
            }
        };

        let mut filter: Filter = name.parse()?;
        for (key, value) in params.unwrap_or_default() {
            filter = match (filter, key.as_str()) {
                (Filter::GaussianBlur { .. }, "intensity") => Filter::GaussianBlur {
                    intensity: Some(blur_intensity(value)?),
                },
                _ => {
                    return Err(FilterError::InvalidRequest(format!(
                        "{} does not take parameter `{}`",
                        filter.name(),
                        key
                    )))
                }
            };
        }
        Ok(filter)
    }
}

/// Blur intensity from a wire number: a whole number in `[1, u32::MAX]`.
fn blur_intensity(value: f64) -> Result<u32> {
    if value.fract() == 0.0 && value >= 1.0 && value <= f64::from(u32::MAX) {
        Ok(value as u32)
    } else {
        Err(FilterError::InvalidParameter {
            operator: "gaussian-blur",
            name: "intensity",
            value,
            min: 1.0,
            max: f64::from(u32::MAX),
        })
    }
}

impl From<Filter> for FilterRepr {
    fn from(filter: Filter) -> Self {
        match filter {
            Filter::GaussianBlur {
                intensity: Some(intensity),
            } => {
                let mut map = BTreeMap::new();
                map.insert(filter.name(), FilterParams { intensity });
                FilterRepr::WithParams(map)
            }
            other => FilterRepr::Name(other.name()),
        }
    }
}

/// Target dimensions for the resize step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Geometric and tonal parameters applied before the stylistic filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreStage {
    /// Quarter-turn rotation, in clockwise degrees on the wire.
    pub rotation: Rotation,
    pub flip: FlipMode,
    /// Target size; `None` keeps the current dimensions.
    pub resize: Option<Size>,
    /// Contrast multiplier (1.0 = unchanged).
    pub contrast: f32,
    /// Brightness offset (0 = unchanged).
    pub brightness: f32,
    pub denoise: DenoiseMode,
}

impl Default for PreStage {
    fn default() -> Self {
        Self {
            rotation: Rotation::None,
            flip: FlipMode::None,
            resize: None,
            contrast: 1.0,
            brightness: 0.0,
            denoise: DenoiseMode::None,
        }
    }
}

impl PreStage {
    /// Check if every step is a no-op.
    pub fn is_identity(&self) -> bool {
        self.rotation == Rotation::None
            && self.flip == FlipMode::None
            && self.resize.is_none()
            && self.contrast == 1.0
            && self.brightness == 0.0
            && self.denoise == DenoiseMode::None
    }
}

/// Everything the caller asks for in one invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterRequest {
    pub pre_stage: PreStage,
    /// Stylistic filters, applied in this order.
    pub filters: Vec<Filter>,
}

impl FilterRequest {
    /// An empty request: no-op pre-stage, no filters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pre-stage parameters.
    pub fn with_pre_stage(mut self, pre_stage: PreStage) -> Self {
        self.pre_stage = pre_stage;
        self
    }

    /// Append a filter to the stylistic list.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Build a request from filter names, e.g. the selections of a menu.
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let filters = names
            .into_iter()
            .map(|name| name.as_ref().parse())
            .collect::<Result<Vec<Filter>>>()?;
        Ok(Self {
            pre_stage: PreStage::default(),
            filters,
        })
    }
}

/// Stateless executor holding the parameter bounds.
///
/// Cheap to clone and safe to share across threads; each call owns its
/// buffer from start to finish.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline after checking the configuration.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The bounds this pipeline enforces.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Downscale a freshly decoded upload to the configured preview width.
    pub fn fit_upload(&self, buffer: PixelBuffer) -> Result<PixelBuffer> {
        fit_to_width(buffer, self.config.max_preview_width)
    }

    /// Run the pre-stage and then the stylistic filters.
    #[instrument(skip_all, fields(width = buffer.width(), height = buffer.height(), filters = request.filters.len()))]
    pub fn run(&self, buffer: PixelBuffer, request: &FilterRequest) -> Result<PixelBuffer> {
        info!("Pipeline started");
        let buffer = self.apply_pre_stage(buffer, &request.pre_stage)?;
        let buffer = self.run_filters(buffer, &request.filters)?;
        info!(
            out_width = buffer.width(),
            out_height = buffer.height(),
            channels = buffer.channels(),
            "Pipeline finished"
        );
        Ok(buffer)
    }

    /// Apply the geometric/tonal pre-stage.
    ///
    /// All parameters are validated before any pixel work. Resize bounds
    /// refer to the dimensions of the buffer passed in, i.e. before rotation.
    pub fn apply_pre_stage(&self, buffer: PixelBuffer, pre: &PreStage) -> Result<PixelBuffer> {
        self.validate_pre_stage(&buffer, pre)
            .inspect_err(|err| warn!(error = %err, "Pre-stage rejected"))?;

        if pre.is_identity() {
            debug!("Pre-stage is a no-op");
            return Ok(buffer);
        }

        debug!(degrees = pre.rotation.degrees(), "Rotate");
        let buffer = rotate(buffer, pre.rotation)?;

        debug!(mode = ?pre.flip, "Flip");
        let buffer = flip(buffer, pre.flip)?;

        let buffer = match pre.resize {
            Some(size) => {
                debug!(width = size.width, height = size.height, "Resize");
                resize(buffer, size.width, size.height)?
            }
            None => buffer,
        };

        debug!(contrast = pre.contrast, brightness = pre.brightness, "Brightness/contrast");
        let buffer = adjust_brightness_contrast(buffer, pre.contrast, pre.brightness);

        debug!(mode = ?pre.denoise, "Denoise");
        denoise(buffer, pre.denoise, self.config.denoise_kernel)
    }

    /// Apply stylistic filters in order, stopping at the first failure.
    pub fn run_filters(&self, buffer: PixelBuffer, filters: &[Filter]) -> Result<PixelBuffer> {
        filters
            .iter()
            .enumerate()
            .try_fold(buffer, |buffer, (step, filter)| {
                debug!(step, filter = filter.name(), channels = buffer.channels(), "Applying filter");
                filter
                    .apply(buffer, &self.config)
                    .inspect_err(|err| warn!(step, filter = filter.name(), error = %err, "Filter failed"))
            })
    }

    fn validate_pre_stage(&self, buffer: &PixelBuffer, pre: &PreStage) -> Result<()> {
        self.config.check_contrast(pre.contrast)?;
        self.config.check_brightness(pre.brightness)?;
        if let Some(size) = pre.resize {
            self.config
                .check_dimension("width", size.width, buffer.width())?;
            self.config
                .check_dimension("height", size.height, buffer.height())?;
        }
        Ok(())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::buffer::PixelLayout;
    use proptest::prelude::*;

    /// Strategy for generating small RGB buffers (keep small for speed).
    fn buffer_strategy() -> impl Strategy<Value = PixelBuffer> {
        (1u32..=12, 1u32..=12).prop_flat_map(|(w, h)| {
            prop::collection::vec(any::<u8>(), (w * h * 3) as usize)
                .prop_map(move |samples| PixelBuffer::new(w, h, PixelLayout::Rgb, samples).unwrap())
        })
    }

    fn shape_preserving_filter() -> impl Strategy<Value = Filter> {
        prop_oneof![
            Just(Filter::GaussianBlur { intensity: Some(3) }),
            Just(Filter::Sepia),
            Just(Filter::Sharpen),
            Just(Filter::Cartoon),
        ]
    }

    proptest! {
        /// Property: color filters other than grayscale keep width, height and channel count.
        #[test]
        fn prop_shape_preserved(buffer in buffer_strategy(), filter in shape_preserving_filter()) {
            let (w, h) = (buffer.width(), buffer.height());
            let out = filter.apply(buffer, &PipelineConfig::default()).unwrap();
            prop_assert_eq!(out.width(), w);
            prop_assert_eq!(out.height(), h);
            prop_assert_eq!(out.channels(), 3);
        }

        /// Property: grayscale always yields one channel of the same size.
        #[test]
        fn prop_grayscale_one_channel(buffer in buffer_strategy()) {
            let (w, h) = (buffer.width(), buffer.height());
            let out = grayscale(buffer).unwrap();
            prop_assert_eq!(out.channels(), 1);
            prop_assert_eq!(out.byte_size(), (w * h) as usize);
        }

        /// Property: identical inputs give byte-identical outputs.
        #[test]
        fn prop_deterministic(buffer in buffer_strategy(), filter in shape_preserving_filter()) {
            let config = PipelineConfig::default();
            let a = filter.apply(buffer.clone(), &config).unwrap();
            let b = filter.apply(buffer, &config).unwrap();
            prop_assert_eq!(a, b);
        }

        /// Property: an empty request returns the input unchanged.
        #[test]
        fn prop_empty_request_identity(buffer in buffer_strategy()) {
            let out = Pipeline::default().run(buffer.clone(), &FilterRequest::new()).unwrap();
            prop_assert_eq!(out, buffer);
        }

        /// Property: in-range brightness/contrast never fails, whatever the pixels.
        #[test]
        fn prop_tonal_in_range_accepted(
            buffer in buffer_strategy(),
            contrast in 0.1f32..=3.0,
            brightness in -100.0f32..=100.0,
        ) {
            let pre = PreStage { contrast, brightness, ..PreStage::default() };
            let out = Pipeline::default().apply_pre_stage(buffer.clone(), &pre).unwrap();
            prop_assert_eq!(out.byte_size(), buffer.byte_size());
        }
    }
}
