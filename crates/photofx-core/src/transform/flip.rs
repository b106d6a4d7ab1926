//! Mirror flips.

use image::imageops;
use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::error::Result;

/// Flip applied in the pre-stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlipMode {
    #[default]
    None,
    /// Mirror left-right.
    Horizontal,
    /// Mirror top-bottom.
    Vertical,
    /// Both axes (equivalent to a half turn).
    Both,
}

/// Mirror a buffer. Works on any layout and never changes dimensions.
pub fn flip(buffer: PixelBuffer, mode: FlipMode) -> Result<PixelBuffer> {
    match mode {
        FlipMode::None => Ok(buffer),
        FlipMode::Horizontal => {
            buffer.map_image(|img| imageops::flip_horizontal(img), |img| imageops::flip_horizontal(img))
        }
        FlipMode::Vertical => {
            buffer.map_image(|img| imageops::flip_vertical(img), |img| imageops::flip_vertical(img))
        }
        FlipMode::Both => buffer.map_image(|img| imageops::rotate180(img), |img| imageops::rotate180(img)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::PixelLayout;
    use crate::transform::{rotate, Rotation};

    /// 3x2 gray image:
    /// ```text
    /// 1 2 3
    /// 4 5 6
    /// ```
    fn small() -> PixelBuffer {
        PixelBuffer::new(3, 2, PixelLayout::Gray, vec![1, 2, 3, 4, 5, 6]).unwrap()
    }

    #[test]
    fn test_flip_none() {
        assert_eq!(flip(small(), FlipMode::None).unwrap(), small());
    }

    #[test]
    fn test_flip_horizontal() {
        assert_eq!(flip(small(), FlipMode::Horizontal).unwrap().samples(), &[3, 2, 1, 6, 5, 4]);
    }

    #[test]
    fn test_flip_vertical() {
        assert_eq!(flip(small(), FlipMode::Vertical).unwrap().samples(), &[4, 5, 6, 1, 2, 3]);
    }

    #[test]
    fn test_flip_both_equals_half_turn() {
        assert_eq!(
            flip(small(), FlipMode::Both).unwrap(),
            rotate(small(), Rotation::Half).unwrap()
        );
    }

    #[test]
    fn test_flip_keeps_rgb_triplets() {
        let img = PixelBuffer::new(2, 1, PixelLayout::Rgb, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(flip(img, FlipMode::Horizontal).unwrap().samples(), &[4, 5, 6, 1, 2, 3]);
    }

    #[test]
    fn test_flips_are_involutions() {
        let mut samples = Vec::new();
        for i in 0..(5 * 7 * 3) {
            samples.push((i * 37 % 256) as u8);
        }
        let img = PixelBuffer::new(5, 7, PixelLayout::Rgb, samples).unwrap();
        for mode in [FlipMode::Horizontal, FlipMode::Vertical, FlipMode::Both] {
            let twice = flip(flip(img.clone(), mode).unwrap(), mode).unwrap();
            assert_eq!(twice, img, "{:?}", mode);
        }
    }

    #[test]
    fn test_flip_mode_serde() {
        let mode: FlipMode = serde_json::from_str("\"vertical\"").unwrap();
        assert_eq!(mode, FlipMode::Vertical);
    }
}
