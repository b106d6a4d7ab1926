//! 3x3 sharpening convolution.

use crate::buffer::PixelBuffer;
use crate::error::Result;
use crate::kernel::convolve_3x3;

/// Sharpening kernel: the center tap boosts the pixel, the four
/// edge-adjacent taps subtract their neighbors. Weights sum to 1, so flat
/// regions pass through unchanged.
pub const SHARPEN_KERNEL: [[i32; 3]; 3] = [[0, -1, 0], [-1, 5, -1], [0, -1, 0]];

/// Sharpen every channel independently.
///
/// Accepts any layout and preserves it. Results are clamped to `[0, 255]`.
/// This operator cannot fail; it returns `Result` to share the operator
/// signature.
pub fn sharpen(buffer: PixelBuffer) -> Result<PixelBuffer> {
    let samples = convolve_3x3(
        buffer.samples(),
        buffer.width() as usize,
        buffer.height() as usize,
        buffer.channels(),
        &SHARPEN_KERNEL,
    );
    Ok(PixelBuffer::from_parts(
        buffer.width(),
        buffer.height(),
        buffer.layout(),
        samples,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::PixelLayout;

    #[test]
    fn test_kernel_weights_sum_to_one() {
        let sum: i32 = SHARPEN_KERNEL.iter().flatten().sum();
        assert_eq!(sum, 1);
    }

    #[test]
    fn test_uniform_unchanged() {
        let buffer = PixelBuffer::filled(9, 7, PixelLayout::Rgb, &[40, 128, 220]).unwrap();
        assert_eq!(sharpen(buffer.clone()).unwrap(), buffer);
    }

    #[test]
    fn test_isolated_bright_pixel_clamps() {
        // A white dot on black: center = 5 * 255 -> clamps to 255,
        // neighbors = -255 -> clamp to 0.
        let mut samples = vec![0u8; 5 * 5];
        samples[2 * 5 + 2] = 255;
        let buffer = PixelBuffer::new(5, 5, PixelLayout::Gray, samples).unwrap();

        let sharp = sharpen(buffer).unwrap();
        assert_eq!(sharp.pixel(2, 2), &[255]);
        assert_eq!(sharp.pixel(1, 2), &[0]);
        assert_eq!(sharp.pixel(2, 1), &[0]);
    }

    #[test]
    fn test_step_edge_overshoots() {
        // Left half 100, right half 150: the dark side of the edge gets
        // darker, the bright side brighter.
        let mut samples = Vec::new();
        for _y in 0..4 {
            for x in 0..6 {
                samples.push(if x < 3 { 100 } else { 150 });
            }
        }
        let buffer = PixelBuffer::new(6, 4, PixelLayout::Gray, samples).unwrap();
        let sharp = sharpen(buffer).unwrap();

        assert_eq!(sharp.pixel(2, 1), &[50]);
        assert_eq!(sharp.pixel(3, 1), &[200]);
        assert_eq!(sharp.pixel(0, 1), &[100]);
    }

    #[test]
    fn test_preserves_shape_and_layout() {
        let buffer = PixelBuffer::filled(13, 4, PixelLayout::Bgr, &[1, 2, 3]).unwrap();
        let sharp = sharpen(buffer).unwrap();
        assert_eq!(sharp.width(), 13);
        assert_eq!(sharp.height(), 4);
        assert_eq!(sharp.layout(), PixelLayout::Bgr);
    }
}
