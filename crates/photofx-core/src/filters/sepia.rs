//! Sepia toning via a fixed 3x3 color matrix.

use crate::buffer::{PixelBuffer, PixelLayout};
use crate::error::{FilterError, Result};

/// Sepia matrix in RGB order: row `i` gives output channel `i` as a
/// combination of input (R, G, B).
pub const SEPIA_MATRIX: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// [`SEPIA_MATRIX`] re-indexed for (B, G, R) inputs and outputs.
const fn bgr_matrix() -> [[f32; 3]; 3] {
    let m = SEPIA_MATRIX;
    [
        [m[2][2], m[2][1], m[2][0]],
        [m[1][2], m[1][1], m[1][0]],
        [m[0][2], m[0][1], m[0][0]],
    ]
}

/// Apply the sepia matrix to a color buffer.
///
/// Each output channel is clamped to `[0, 255]` and truncated. The result
/// is always Rgb; a Bgr input is accepted and reordered at the boundary.
///
/// Internally the samples are brought into Bgr order and multiplied by the
/// matrix in that order before being flipped back to Rgb.
///
/// # Errors
///
/// Returns [`FilterError::InvalidChannelCount`] for Gray input.
pub fn sepia(buffer: PixelBuffer) -> Result<PixelBuffer> {
    if !buffer.layout().is_color() {
        return Err(FilterError::InvalidChannelCount {
            operator: "sepia",
            expected: 3,
            actual: buffer.channels(),
        });
    }

    let bgr = buffer.to_layout(PixelLayout::Bgr)?;
    let (width, height) = (bgr.width(), bgr.height());
    let mut samples = bgr.into_samples();

    let matrix = bgr_matrix();
    for px in samples.chunks_exact_mut(3) {
        let (b, g, r) = (px[0] as f32, px[1] as f32, px[2] as f32);
        for (out, row) in px.iter_mut().zip(matrix.iter()) {
            let v = row[0] * b + row[1] * g + row[2] * r;
            *out = v.clamp(0.0, 255.0) as u8;
        }
    }

    PixelBuffer::from_parts(width, height, PixelLayout::Bgr, samples).to_layout(PixelLayout::Rgb)
}
