//! Separable Gaussian blur.

use crate::buffer::PixelBuffer;
use crate::error::Result;
use crate::kernel::{gaussian_kernel, separable_convolve, validate_kernel_size};

/// Kernel side length used when the caller does not pick one.
pub const DEFAULT_BLUR_INTENSITY: u32 = 15;

/// Blur a buffer with an `intensity x intensity` Gaussian kernel.
///
/// Sigma is derived from the kernel size. Works on any layout; the output
/// has the same shape and layout as the input.
///
/// # Errors
///
/// Returns [`crate::FilterError::InvalidKernelSize`] if `intensity` is zero
/// or even. Sizes are rejected rather than rounded to the next odd value.
pub fn gaussian_blur(buffer: PixelBuffer, intensity: u32) -> Result<PixelBuffer> {
    validate_kernel_size("gaussian-blur", intensity)?;
    Ok(blur_unchecked(&buffer, intensity))
}

/// Blur with a size the caller has already validated.
pub(crate) fn blur_unchecked(buffer: &PixelBuffer, size: u32) -> PixelBuffer {
    if size == 1 {
        return buffer.clone();
    }
    let extent = buffer.width().max(buffer.height()) as usize;
    let kernel = gaussian_kernel(size, extent);
    let samples = separable_convolve(
        buffer.samples(),
        buffer.width() as usize,
        buffer.height() as usize,
        buffer.channels(),
        &kernel,
    );
    PixelBuffer::from_parts(buffer.width(), buffer.height(), buffer.layout(), samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::PixelLayout;
    use crate::error::FilterError;

    fn checkerboard(width: u32, height: u32) -> PixelBuffer {
        let mut samples = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = if (x + y) % 2 == 0 { 255 } else { 0 };
                samples.extend_from_slice(&[v, v, v]);
            }
        }
        PixelBuffer::new(width, height, PixelLayout::Rgb, samples).unwrap()
    }

    #[test]
    fn test_even_intensity_rejected() {
        let buffer = checkerboard(10, 10);
        let err = gaussian_blur(buffer, 4).unwrap_err();
        assert_eq!(
            err,
            FilterError::InvalidKernelSize {
                operator: "gaussian-blur",
                size: 4
            }
        );
    }

    #[test]
    fn test_zero_intensity_rejected() {
        let buffer = checkerboard(10, 10);
        assert!(matches!(
            gaussian_blur(buffer, 0),
            Err(FilterError::InvalidKernelSize { size: 0, .. })
        ));
    }

    #[test]
    fn test_blur_preserves_shape() {
        let buffer = checkerboard(31, 17);
        let blurred = gaussian_blur(buffer, DEFAULT_BLUR_INTENSITY).unwrap();
        assert_eq!(blurred.width(), 31);
        assert_eq!(blurred.height(), 17);
        assert_eq!(blurred.layout(), PixelLayout::Rgb);
    }

    #[test]
    fn test_blur_smooths_checkerboard() {
        let blurred = gaussian_blur(checkerboard(20, 20), 5).unwrap();
        // Every interior pixel should be pulled toward mid-gray.
        let v = blurred.pixel(10, 10)[0];
        assert!(v > 64 && v < 192, "interior value {} not smoothed", v);
    }

    #[test]
    fn test_blur_uniform_unchanged() {
        let buffer = PixelBuffer::filled(16, 16, PixelLayout::Rgb, &[12, 130, 240]).unwrap();
        let blurred = gaussian_blur(buffer.clone(), 15).unwrap();
        assert_eq!(blurred, buffer);
    }

    #[test]
    fn test_blur_gray_buffer() {
        let buffer = PixelBuffer::filled(8, 8, PixelLayout::Gray, &[90]).unwrap();
        let blurred = gaussian_blur(buffer, 3).unwrap();
        assert_eq!(blurred.layout(), PixelLayout::Gray);
        assert!(blurred.samples().iter().all(|&v| v == 90));
    }

    #[test]
    fn test_blur_is_deterministic() {
        let a = gaussian_blur(checkerboard(15, 9), 7).unwrap();
        let b = gaussian_blur(checkerboard(15, 9), 7).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_huge_intensity_on_tiny_buffer() {
        let buffer = PixelBuffer::filled(2, 2, PixelLayout::Rgb, &[10, 20, 30]).unwrap();
        for intensity in [92_683, 1_000_001] {
            let blurred = gaussian_blur(buffer.clone(), intensity).unwrap();
            assert_eq!(blurred, buffer, "intensity {}", intensity);
        }
    }

    #[test]
    fn test_huge_intensity_averages_toward_mean() {
        let buffer = PixelBuffer::new(2, 1, PixelLayout::Gray, vec![0, 200]).unwrap();
        let blurred = gaussian_blur(buffer, 100_001).unwrap();
        // Sigma dwarfs the image, so both pixels land near the midpoint.
        for &v in blurred.samples() {
            assert!((95..=105).contains(&v), "value {} not averaged", v);
        }
    }

    #[test]
    fn test_intensity_one_is_identity() {
        let buffer = checkerboard(6, 6);
        assert_eq!(gaussian_blur(buffer.clone(), 1).unwrap(), buffer);
    }
}
