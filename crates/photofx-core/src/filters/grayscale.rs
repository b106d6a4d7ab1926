//! Color to single-channel luma.

use crate::buffer::{PixelBuffer, PixelLayout};
use crate::error::Result;
use crate::luminance::luma_plane;

/// Reduce an Rgb or Bgr buffer to a Gray buffer of the same size.
///
/// Uses BT.601 weights (see [`crate::luminance`]), reading red and blue
/// according to the input's layout.
///
/// # Errors
///
/// Returns [`crate::FilterError::InvalidChannelCount`] if the input is
/// already Gray. Applying grayscale twice is therefore an error rather than a
/// silent no-op.
pub fn grayscale(buffer: PixelBuffer) -> Result<PixelBuffer> {
    let plane = luma_plane(&buffer, "grayscale")?;
    Ok(PixelBuffer::from_parts(
        buffer.width(),
        buffer.height(),
        PixelLayout::Gray,
        plane,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FilterError;

    #[test]
    fn test_grayscale_reduces_to_one_channel() {
        let buffer = PixelBuffer::filled(20, 10, PixelLayout::Rgb, &[10, 200, 30]).unwrap();
        let gray = grayscale(buffer).unwrap();

        assert_eq!(gray.layout(), PixelLayout::Gray);
        assert_eq!(gray.channels(), 1);
        assert_eq!(gray.width(), 20);
        assert_eq!(gray.height(), 10);
        assert_eq!(gray.byte_size(), 200);
    }

    #[test]
    fn test_grayscale_value() {
        // 0.299*10 + 0.587*200 + 0.114*30 = 2.99 + 117.4 + 3.42 = 123.81
        let buffer = PixelBuffer::filled(2, 2, PixelLayout::Rgb, &[10, 200, 30]).unwrap();
        let gray = grayscale(buffer).unwrap();
        assert!(gray.samples().iter().all(|&v| v == 124));
    }

    #[test]
    fn test_grayscale_same_for_rgb_and_bgr() {
        let rgb = PixelBuffer::filled(3, 3, PixelLayout::Rgb, &[250, 40, 5]).unwrap();
        let bgr = rgb.clone().to_layout(PixelLayout::Bgr).unwrap();

        assert_eq!(grayscale(rgb).unwrap().samples(), grayscale(bgr).unwrap().samples());
    }

    #[test]
    fn test_grayscale_twice_fails() {
        let buffer = PixelBuffer::filled(4, 4, PixelLayout::Rgb, &[1, 2, 3]).unwrap();
        let once = grayscale(buffer).unwrap();
        let err = grayscale(once).unwrap_err();

        assert_eq!(
            err,
            FilterError::InvalidChannelCount {
                operator: "grayscale",
                expected: 3,
                actual: 1,
            }
        );
    }
}
