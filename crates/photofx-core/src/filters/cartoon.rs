//! Cartoon effect: flattened color regions with thin dark outlines.
//!
//! # Algorithm
//!
//! 1. Reduce the image to luma.
//! 2. Build a binary mask with an adaptive mean threshold: a pixel stays
//!    (255) when it is brighter than the mean of its 9x9 neighborhood minus
//!    a small constant, otherwise it becomes an outline (0). This is a local
//!    threshold, not a gradient edge detector, which is what gives the thin,
//!    ink-like lines.
//! 3. Smooth the color image with a wide bilateral filter so color regions
//!    flatten while strong edges survive.
//! 4. Keep the smoothed color where the mask is 255 and paint black where it
//!    is 0.

use tracing::debug;

use crate::buffer::PixelBuffer;
use crate::error::{FilterError, Result};
use crate::kernel::{box_mean, replicate};
use crate::luminance::luma_plane;

/// Side length of the adaptive threshold neighborhood.
pub const CARTOON_BLOCK_SIZE: u32 = 9;

/// Constant subtracted from the neighborhood mean before comparison.
pub const CARTOON_THRESHOLD_C: i32 = 9;

/// Diameter of the bilateral filter support.
pub const CARTOON_BILATERAL_DIAMETER: u32 = 9;

/// Bilateral color and spatial sigma.
const CARTOON_BILATERAL_SIGMA: f32 = 250.0;

/// Apply the cartoon effect to a color buffer.
///
/// The output keeps the input's layout and dimensions.
///
/// # Errors
///
/// Returns [`FilterError::InvalidChannelCount`] for Gray input, e.g. when
/// cartoon follows grayscale in a pipeline.
pub fn cartoon(buffer: PixelBuffer) -> Result<PixelBuffer> {
    if !buffer.layout().is_color() {
        return Err(FilterError::InvalidChannelCount {
            operator: "cartoon",
            expected: 3,
            actual: buffer.channels(),
        });
    }

    let width = buffer.width() as usize;
    let height = buffer.height() as usize;

    let luma = luma_plane(&buffer, "cartoon")?;
    let mask = adaptive_mean_threshold(&luma, width, height, CARTOON_BLOCK_SIZE, CARTOON_THRESHOLD_C);
    debug!(
        outline_pixels = mask.iter().filter(|&&m| m == 0).count(),
        "Cartoon edge mask computed"
    );

    let mut color = bilateral_filter(
        buffer.samples(),
        width,
        height,
        CARTOON_BILATERAL_DIAMETER,
        CARTOON_BILATERAL_SIGMA,
        CARTOON_BILATERAL_SIGMA,
    );

    for (px, &m) in color.chunks_exact_mut(3).zip(mask.iter()) {
        if m == 0 {
            px.fill(0);
        }
    }

    Ok(PixelBuffer::from_parts(
        buffer.width(),
        buffer.height(),
        buffer.layout(),
        color,
    ))
}

/// Binary threshold against the local mean: 255 where
/// `value - mean > -c`, 0 elsewhere.
fn adaptive_mean_threshold(plane: &[u8], width: usize, height: usize, block: u32, c: i32) -> Vec<u8> {
    let mean = box_mean(plane, width, height, block);
    plane
        .iter()
        .zip(mean.iter())
        .map(|(&v, &m)| if v as i32 - m as i32 > -c { 255 } else { 0 })
        .collect()
}

/// Edge-preserving smoothing of a 3-channel plane.
///
/// Neighbors within a circle of diameter `diameter` contribute with weight
/// `exp(-d^2 / 2 sigma_space^2) * exp(-delta^2 / 2 sigma_color^2)`, where
/// `d` is the spatial distance and `delta` the sum of absolute channel
/// differences to the center pixel.
fn bilateral_filter(
    samples: &[u8],
    width: usize,
    height: usize,
    diameter: u32,
    sigma_color: f32,
    sigma_space: f32,
) -> Vec<u8> {
    let radius = (diameter / 2) as i64;
    let space_coeff = -0.5 / (sigma_space * sigma_space);
    let color_coeff = -0.5 / (sigma_color * sigma_color);

    let mut offsets = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let r2 = (dx * dx + dy * dy) as f32;
            if r2 <= (radius * radius) as f32 {
                offsets.push((dx, dy, (r2 * space_coeff).exp()));
            }
        }
    }

    // delta ranges over 0..=3*255
    let color_weights: Vec<f32> = (0..=3 * 255)
        .map(|d| ((d * d) as f32 * color_coeff).exp())
        .collect();

    let stride = width * 3;
    let mut output = vec![0u8; samples.len()];

    for y in 0..height {
        for x in 0..width {
            let center = &samples[y * stride + x * 3..y * stride + x * 3 + 3];
            let mut sum = [0.0f32; 3];
            let mut weight_sum = 0.0f32;

            for &(dx, dy, space_weight) in &offsets {
                let sx = replicate(x as i64 + dx, width);
                let sy = replicate(y as i64 + dy, height);
                let idx = sy * stride + sx * 3;
                let neighbor = &samples[idx..idx + 3];

                let delta: usize = center
                    .iter()
                    .zip(neighbor.iter())
                    .map(|(&a, &b)| a.abs_diff(b) as usize)
                    .sum();
                let weight = space_weight * color_weights[delta];

                for c in 0..3 {
                    sum[c] += neighbor[c] as f32 * weight;
                }
                weight_sum += weight;
            }

            let out = &mut output[y * stride + x * 3..y * stride + x * 3 + 3];
            for c in 0..3 {
                out[c] = (sum[c] / weight_sum).round().clamp(0.0, 255.0) as u8;
            }
        }
    }
    output
}
