//! Luma calculation using ITU-R BT.601 coefficients.
//!
//! These are the weights used for the grayscale operator and for the edge
//! mask stage of the cartoon operator.

use crate::buffer::{PixelBuffer, PixelLayout};
use crate::error::{FilterError, Result};

/// ITU-R BT.601 coefficient for red channel in luma calculation.
pub const LUMA_R: f32 = 0.299;

/// ITU-R BT.601 coefficient for green channel in luma calculation.
pub const LUMA_G: f32 = 0.587;

/// ITU-R BT.601 coefficient for blue channel in luma calculation.
pub const LUMA_B: f32 = 0.114;

/// Calculate luma from u8 RGB values (0 to 255), rounded to nearest.
#[inline]
pub fn luma_u8(r: u8, g: u8, b: u8) -> u8 {
    let y = LUMA_R * r as f32 + LUMA_G * g as f32 + LUMA_B * b as f32;
    y.clamp(0.0, 255.0).round() as u8
}

/// Reduce a color buffer to one luma sample per pixel.
///
/// Red and blue are located through the buffer's layout, so Rgb and Bgr
/// inputs holding the same colors produce the same plane.
pub(crate) fn luma_plane(buffer: &PixelBuffer, operator: &'static str) -> Result<Vec<u8>> {
    let (ri, gi, bi) = buffer
        .layout()
        .rgb_indices()
        .ok_or(FilterError::InvalidChannelCount {
            operator,
            expected: 3,
            actual: buffer.channels(),
        })?;

    Ok(buffer
        .samples()
        .chunks_exact(PixelLayout::Rgb.channels())
        .map(|px| luma_u8(px[ri], px[gi], px[bi]))
        .collect())
}
