//! Lossless quarter-turn rotation.
//!
//! Only multiples of 90 degrees are supported, so every output sample is a
//! copy of exactly one input sample and no interpolation is involved. The
//! turns themselves are `image::imageops::rotate90/180/270`.
//!
//! For a clockwise quarter turn of a `w x h` image the output is `h x w` and
//! the mapping is:
//! ```text
//! dst(x, y) = src(y, h - 1 - x)
//! ```

use image::imageops;
use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::error::{FilterError, Result};

/// Rotation applied in the pre-stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Rotation {
    /// No rotation.
    #[default]
    None,
    /// 90 degrees clockwise.
    Clockwise90,
    /// 180 degrees.
    Half,
    /// 90 degrees counter-clockwise (270 clockwise).
    CounterClockwise90,
}

impl Rotation {
    /// Angle in clockwise degrees.
    pub fn degrees(self) -> u32 {
        match self {
            Rotation::None => 0,
            Rotation::Clockwise90 => 90,
            Rotation::Half => 180,
            Rotation::CounterClockwise90 => 270,
        }
    }

    /// Returns true if this rotation swaps width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Rotation::Clockwise90 | Rotation::CounterClockwise90)
    }
}

impl TryFrom<u32> for Rotation {
    type Error = FilterError;

    fn try_from(degrees: u32) -> Result<Self> {
        match degrees {
            0 => Ok(Rotation::None),
            90 => Ok(Rotation::Clockwise90),
            180 => Ok(Rotation::Half),
            270 => Ok(Rotation::CounterClockwise90),
            other => Err(FilterError::InvalidParameter {
                operator: "rotate",
                name: "angle",
                value: other as f64,
                min: 0.0,
                max: 270.0,
            }),
        }
    }
}

impl From<Rotation> for u32 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

/// Rotate a buffer by a quarter-turn multiple.
///
/// Works on any layout. `Rotation::None` returns the input unchanged.
pub fn rotate(buffer: PixelBuffer, rotation: Rotation) -> Result<PixelBuffer> {
    match rotation {
        Rotation::None => Ok(buffer),
        Rotation::Clockwise90 => buffer.map_image(|img| imageops::rotate90(img), |img| imageops::rotate90(img)),
        Rotation::Half => buffer.map_image(|img| imageops::rotate180(img), |img| imageops::rotate180(img)),
        Rotation::CounterClockwise90 => {
            buffer.map_image(|img| imageops::rotate270(img), |img| imageops::rotate270(img))
        }
    }
}
