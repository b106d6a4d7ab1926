//! Error type shared by every operator and the pipeline executor.

use thiserror::Error;

/// Errors that can occur while building buffers or running operators.
///
/// Every variant is a deterministic function of the input shape or the
/// requested parameters; none of them are transient.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    /// Declared dimensions do not match the sample count, or a dimension is zero.
    #[error(
        "Shape error: {width}x{height} image with {channels} channel(s) cannot hold {actual} samples"
    )]
    Shape {
        width: u32,
        height: u32,
        channels: usize,
        actual: usize,
    },

    /// The operator needs a different number of channels than it was given.
    #[error("{operator}: expected {expected} channel(s), got {actual}")]
    InvalidChannelCount {
        operator: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Kernel side length is zero or even.
    #[error("{operator}: kernel size must be a positive odd integer, got {size}")]
    InvalidKernelSize { operator: &'static str, size: u32 },

    /// A numeric parameter is outside its configured bounds.
    #[error("{operator}: {name} = {value} is outside the allowed range [{min}, {max}]")]
    InvalidParameter {
        operator: &'static str,
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A filter name that is not part of the operator set.
    #[error("Unknown filter: {0}")]
    UnknownFilter(String),

    /// A filter entry that is malformed beyond its name or numeric values.
    #[error("Invalid filter request: {0}")]
    InvalidRequest(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FilterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_error_display() {
        let err = FilterError::Shape {
            width: 10,
            height: 10,
            channels: 3,
            actual: 12,
        };
        assert_eq!(
            err.to_string(),
            "Shape error: 10x10 image with 3 channel(s) cannot hold 12 samples"
        );
    }

    #[test]
    fn test_kernel_size_error_names_operator() {
        let err = FilterError::InvalidKernelSize {
            operator: "gaussian-blur",
            size: 4,
        };
        assert_eq!(
            err.to_string(),
            "gaussian-blur: kernel size must be a positive odd integer, got 4"
        );
    }

    #[test]
    fn test_invalid_parameter_display() {
        let err = FilterError::InvalidParameter {
            operator: "brightness-contrast",
            name: "contrast",
            value: 4.0,
            min: 0.0,
            max: 3.0,
        };
        assert_eq!(
            err.to_string(),
            "brightness-contrast: contrast = 4 is outside the allowed range [0, 3]"
        );
    }

    #[test]
    fn test_invalid_request_display() {
        let err = FilterError::InvalidRequest("sepia does not take parameter `intensity`".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid filter request: sepia does not take parameter `intensity`"
        );
    }
}
