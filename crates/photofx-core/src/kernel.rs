//! Neighborhood primitives shared by the blur, sharpen, denoise and cartoon
//! operators.
//!
//! All functions work on row-major interleaved `u8` samples and use an
//! edge-replicate border: a neighbor coordinate outside the image is clamped
//! to the nearest edge pixel instead of being treated as zero.

use crate::error::{FilterError, Result};

/// Clamp a possibly out-of-range coordinate into `0..len`.
#[inline]
pub(crate) fn replicate(coord: i64, len: usize) -> usize {
    coord.clamp(0, len as i64 - 1) as usize
}

/// Reject kernel sizes that are zero or even.
pub(crate) fn validate_kernel_size(operator: &'static str, size: u32) -> Result<()> {
    if size == 0 || size % 2 == 0 {
        return Err(FilterError::InvalidKernelSize { operator, size });
    }
    Ok(())
}

/// Standard deviation implied by a Gaussian kernel side length.
///
/// Matches the usual convention for "sigma = 0, derive from size":
/// `0.3 * ((size - 1) * 0.5 - 1) + 0.8`.
#[inline]
pub(crate) fn sigma_for_size(size: u32) -> f64 {
    0.3 * ((f64::from(size) - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalized 1-D Gaussian weights for an odd `size`, applied along axes of
/// at most `extent` samples.
///
/// With an edge-replicate border every tap at offset `|i| >= extent - 1`
/// reads the same edge sample, so those taps are folded into the outermost
/// weight. The result has `min(size, 2 * extent - 1)` entries and gives the
/// same convolution as the full kernel.
pub(crate) fn gaussian_kernel(size: u32, extent: usize) -> Vec<f32> {
    let sigma = sigma_for_size(size);
    let radius = i64::from(size / 2);
    let cap = radius.min(i64::try_from(extent.saturating_sub(1)).unwrap_or(i64::MAX));
    let denom = 2.0 * sigma * sigma;

    let mut weights = vec![0.0f64; (2 * cap + 1) as usize];
    for i in -radius..=radius {
        let x = i as f64;
        weights[(i.clamp(-cap, cap) + cap) as usize] += (-(x * x) / denom).exp();
    }
    let sum: f64 = weights.iter().sum();
    weights.iter().map(|w| (w / sum) as f32).collect()
}

/// Convolve with the outer product of `kernel` with itself.
///
/// Runs a horizontal pass into an `f32` scratch plane, then a vertical pass,
/// so the cost is `O(k)` per sample instead of `O(k^2)`.
pub(crate) fn separable_convolve(
    samples: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    kernel: &[f32],
) -> Vec<u8> {
    let radius = (kernel.len() / 2) as i64;
    let stride = width * channels;

    let mut horizontal = vec![0.0f32; samples.len()];
    for y in 0..height {
        let row = &samples[y * stride..(y + 1) * stride];
        for x in 0..width {
            for c in 0..channels {
                let mut acc = 0.0f32;
                for (k, w) in kernel.iter().enumerate() {
                    let sx = replicate(x as i64 + k as i64 - radius, width);
                    acc += row[sx * channels + c] as f32 * w;
                }
                horizontal[y * stride + x * channels + c] = acc;
            }
        }
    }

    let mut output = vec![0u8; samples.len()];
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let mut acc = 0.0f32;
                for (k, w) in kernel.iter().enumerate() {
                    let sy = replicate(y as i64 + k as i64 - radius, height);
                    acc += horizontal[sy * stride + x * channels + c] * w;
                }
                output[y * stride + x * channels + c] = acc.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
    output
}

/// Convolve each channel with an integer 3x3 kernel, clamping to `[0, 255]`.
pub(crate) fn convolve_3x3(
    samples: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    kernel: &[[i32; 3]; 3],
) -> Vec<u8> {
    let stride = width * channels;
    let mut output = vec![0u8; samples.len()];

    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let mut acc = 0i32;
                for (ky, row) in kernel.iter().enumerate() {
                    let sy = replicate(y as i64 + ky as i64 - 1, height);
                    for (kx, &weight) in row.iter().enumerate() {
                        if weight == 0 {
                            continue;
                        }
                        let sx = replicate(x as i64 + kx as i64 - 1, width);
                        acc += samples[sy * stride + sx * channels + c] as i32 * weight;
                    }
                }
                output[y * stride + x * channels + c] = acc.clamp(0, 255) as u8;
            }
        }
    }
    output
}

/// Rounded mean of the `size x size` neighborhood of every sample of a
/// single-channel plane.
pub(crate) fn box_mean(plane: &[u8], width: usize, height: usize, size: u32) -> Vec<u8> {
    let radius = (size / 2) as i64;
    let area = size.saturating_mul(size);

    // Horizontal window sums, then vertical sums of those.
    let mut row_sums = vec![0u32; plane.len()];
    for y in 0..height {
        let row = &plane[y * width..(y + 1) * width];
        for x in 0..width {
            row_sums[y * width + x] = (-radius..=radius)
                .map(|d| row[replicate(x as i64 + d, width)] as u32)
                .sum();
        }
    }

    let mut output = vec![0u8; plane.len()];
    for y in 0..height {
        for x in 0..width {
            let sum: u32 = (-radius..=radius)
                .map(|d| row_sums[replicate(y as i64 + d, height) * width + x])
                .sum();
            output[y * width + x] = ((sum + area / 2) / area) as u8;
        }
    }
    output
}

/// Per-channel median of every `size x size` neighborhood.
pub(crate) fn median(
    samples: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    size: u32,
) -> Vec<u8> {
    let radius = (size / 2) as i64;
    let stride = width * channels;
    let side = size as usize;
    let mut window = Vec::with_capacity(side * side);
    let mut output = vec![0u8; samples.len()];

    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                window.clear();
                for dy in -radius..=radius {
                    let sy = replicate(y as i64 + dy, height);
                    for dx in -radius..=radius {
                        let sx = replicate(x as i64 + dx, width);
                        window.push(samples[sy * stride + sx * channels + c]);
                    }
                }
                let mid = window.len() / 2;
                let (_, value, _) = window.select_nth_unstable(mid);
                output[y * stride + x * channels + c] = *value;
            }
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replicate_clamps_both_sides() {
        assert_eq!(replicate(-3, 10), 0);
        assert_eq!(replicate(4, 10), 4);
        assert_eq!(replicate(12, 10), 9);
    }

    #[test]
    fn test_validate_kernel_size() {
        assert!(validate_kernel_size("blur", 1).is_ok());
        assert!(validate_kernel_size("blur", 15).is_ok());
        assert!(validate_kernel_size("blur", 0).is_err());
        assert!(validate_kernel_size("blur", 4).is_err());
    }

    #[test]
    fn test_sigma_for_standard_sizes() {
        assert!((sigma_for_size(5) - 1.1).abs() < 1e-6);
        assert!((sigma_for_size(15) - 2.6).abs() < 1e-6);
    }

    #[test]
    fn test_gaussian_kernel_normalized_and_symmetric() {
        for size in [1u32, 3, 5, 15] {
            let k = gaussian_kernel(size, 100);
            assert_eq!(k.len(), size as usize);
            let sum: f32 = k.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5, "size {} sums to {}", size, sum);
            for i in 0..k.len() / 2 {
                assert!((k[i] - k[k.len() - 1 - i]).abs() < 1e-7);
            }
        }
    }

    #[test]
    fn test_gaussian_kernel_peaks_at_center() {
        let k = gaussian_kernel(7, 100);
        let center = k[3];
        assert!(k.iter().all(|&w| w <= center));
    }

    #[test]
    fn test_gaussian_kernel_folds_taps_past_the_edge() {
        let folded = gaussian_kernel(9, 3);
        assert_eq!(folded.len(), 5);
        let sum: f32 = folded.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);

        // A 3-sample axis sees the same result either way.
        let samples = vec![0u8, 90, 255, 30, 200, 10, 60, 120, 180];
        assert_eq!(
            separable_convolve(&samples, 3, 3, 1, &folded),
            separable_convolve(&samples, 3, 3, 1, &gaussian_kernel(9, 100))
        );
    }

    #[test]
    fn test_gaussian_kernel_huge_size_on_tiny_axis() {
        for size in [92_683u32, 1_000_001] {
            let k = gaussian_kernel(size, 2);
            assert_eq!(k.len(), 3);
            assert!(k.iter().all(|w| w.is_finite() && *w > 0.0));
            let sum: f32 = k.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_separable_convolve_uniform_unchanged() {
        let samples = vec![77u8; 8 * 6 * 3];
        let out = separable_convolve(&samples, 8, 6, 3, &gaussian_kernel(5, 8));
        assert_eq!(out, samples);
    }

    #[test]
    fn test_identity_3x3_kernel() {
        let samples: Vec<u8> = (0..5 * 4).map(|v| (v * 11) as u8).collect();
        let identity = [[0, 0, 0], [0, 1, 0], [0, 0, 0]];
        assert_eq!(convolve_3x3(&samples, 5, 4, 1, &identity), samples);
    }

    #[test]
    fn test_box_mean_uniform() {
        let plane = vec![200u8; 12 * 12];
        assert_eq!(box_mean(&plane, 12, 12, 9), plane);
    }

    #[test]
    fn test_box_mean_rounds() {
        // 3x1 plane, 3x3 window with replicate border.
        // Center window: columns [0, 0, 1] -> values [0, 0, 1] in each of 3 rows.
        let plane = vec![0u8, 0, 1];
        let mean = box_mean(&plane, 3, 1, 3);
        // Right pixel window = [0, 1, 1] x 3 rows = 6 / 9 = 0.67 -> 1
        assert_eq!(mean, vec![0, 0, 1]);
    }

    #[test]
    fn test_median_removes_isolated_spike() {
        let mut plane = vec![10u8; 7 * 7];
        plane[3 * 7 + 3] = 255;
        let out = median(&plane, 7, 7, 1, 5);
        assert!(out.iter().all(|&v| v == 10));
    }
}
