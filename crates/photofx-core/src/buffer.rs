//! In-memory raster image used by every operator.

use serde::{Deserialize, Serialize};

use crate::error::{FilterError, Result};

/// Channel order of a buffer's interleaved samples.
///
/// The layout fixes the channel count: `Gray` is one channel, `Rgb` and
/// `Bgr` are three. Operators that care about which sample is red read the
/// layout instead of assuming an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelLayout {
    /// Single luma channel.
    Gray,
    /// Red, green, blue.
    #[default]
    Rgb,
    /// Blue, green, red.
    Bgr,
}

impl PixelLayout {
    /// Number of interleaved samples per pixel.
    #[inline]
    pub fn channels(self) -> usize {
        match self {
            PixelLayout::Gray => 1,
            PixelLayout::Rgb | PixelLayout::Bgr => 3,
        }
    }

    /// Indices of the red, green and blue samples within a pixel, if any.
    #[inline]
    pub fn rgb_indices(self) -> Option<(usize, usize, usize)> {
        match self {
            PixelLayout::Gray => None,
            PixelLayout::Rgb => Some((0, 1, 2)),
            PixelLayout::Bgr => Some((2, 1, 0)),
        }
    }

    /// Whether this layout carries color.
    #[inline]
    pub fn is_color(self) -> bool {
        self != PixelLayout::Gray
    }
}

/// A decoded image: dimensions, channel order and row-major samples.
///
/// The sample vector always holds exactly `width * height * channels`
/// bytes and neither dimension is zero. Both are checked on construction,
/// so code that receives a `PixelBuffer` can index without bounds worries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PixelBufferParts", into = "PixelBufferParts")]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    layout: PixelLayout,
    samples: Vec<u8>,
}

/// Unchecked wire form of [`PixelBuffer`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PixelBufferParts {
    width: u32,
    height: u32,
    layout: PixelLayout,
    samples: Vec<u8>,
}

impl TryFrom<PixelBufferParts> for PixelBuffer {
    type Error = FilterError;

    fn try_from(parts: PixelBufferParts) -> Result<Self> {
        PixelBuffer::new(parts.width, parts.height, parts.layout, parts.samples)
    }
}

impl From<PixelBuffer> for PixelBufferParts {
    fn from(buffer: PixelBuffer) -> Self {
        PixelBufferParts {
            width: buffer.width,
            height: buffer.height,
            layout: buffer.layout,
            samples: buffer.samples,
        }
    }
}

impl PixelBuffer {
    /// Create a buffer, validating that the samples fit the dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Shape`] if either dimension is zero or the
    /// sample count differs from `width * height * layout.channels()`.
    pub fn new(width: u32, height: u32, layout: PixelLayout, samples: Vec<u8>) -> Result<Self> {
        let channels = layout.channels();
        let fits = match sample_len(width, height, channels) {
            Some(expected) => width != 0 && height != 0 && samples.len() == expected,
            None => false,
        };
        if !fits {
            return Err(FilterError::Shape {
                width,
                height,
                channels,
                actual: samples.len(),
            });
        }
        Ok(Self {
            width,
            height,
            layout,
            samples,
        })
    }

    /// Create a buffer where every pixel has the same value.
    ///
    /// `pixel` must have exactly `layout.channels()` entries.
    pub fn filled(width: u32, height: u32, layout: PixelLayout, pixel: &[u8]) -> Result<Self> {
        if pixel.len() != layout.channels() {
            return Err(FilterError::InvalidChannelCount {
                operator: "fill",
                expected: layout.channels(),
                actual: pixel.len(),
            });
        }
        let total = sample_len(width, height, pixel.len()).ok_or(FilterError::Shape {
            width,
            height,
            channels: pixel.len(),
            actual: 0,
        })?;
        let samples = pixel.repeat(total / pixel.len());
        Self::new(width, height, layout, samples)
    }

    /// Build a buffer from parts the caller already knows to be consistent.
    ///
    /// Used by operators whose output shape is derived from a validated input.
    pub(crate) fn from_parts(width: u32, height: u32, layout: PixelLayout, samples: Vec<u8>) -> Self {
        debug_assert_eq!(
            samples.len(),
            (width as usize) * (height as usize) * layout.channels(),
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            layout,
            samples,
        }
    }

    /// Run a channel-independent `image` operation, keeping the layout.
    ///
    /// Gray buffers go through `GrayImage`, Rgb and Bgr through `RgbImage`.
    /// Bgr samples are not reordered: rotations, flips and resampling treat
    /// every channel alike, so the layout tag stays valid.
    pub(crate) fn map_image<G, C>(self, gray_op: G, color_op: C) -> Result<Self>
    where
        G: FnOnce(&image::GrayImage) -> image::GrayImage,
        C: FnOnce(&image::RgbImage) -> image::RgbImage,
    {
        let (width, height, layout) = (self.width, self.height, self.layout);
        let shape_error = FilterError::Shape {
            width,
            height,
            channels: layout.channels(),
            actual: self.samples.len(),
        };

        let (out_width, out_height, samples) = match layout {
            PixelLayout::Gray => {
                let img = image::GrayImage::from_raw(width, height, self.samples).ok_or(shape_error)?;
                let out = gray_op(&img);
                (out.width(), out.height(), out.into_raw())
            }
            PixelLayout::Rgb | PixelLayout::Bgr => {
                let img = image::RgbImage::from_raw(width, height, self.samples).ok_or(shape_error)?;
                let out = color_op(&img);
                (out.width(), out.height(), out.into_raw())
            }
        };

        Self::new(out_width, out_height, layout, samples)
    }

    /// Wrap an `image::RgbImage`.
    pub fn from_rgb_image(img: image::RgbImage) -> Result<Self> {
        let (width, height) = img.dimensions();
        Self::new(width, height, PixelLayout::Rgb, img.into_raw())
    }

    /// Wrap an `image::GrayImage`.
    pub fn from_gray_image(img: image::GrayImage) -> Result<Self> {
        let (width, height) = img.dimensions();
        Self::new(width, height, PixelLayout::Gray, img.into_raw())
    }

    /// Convert into an `image::RgbImage`, reordering Bgr samples on the way.
    pub fn into_rgb_image(self) -> Result<image::RgbImage> {
        let rgb = self.to_layout(PixelLayout::Rgb)?;
        let (width, height, channels, actual) =
            (rgb.width, rgb.height, rgb.channels(), rgb.samples.len());
        image::RgbImage::from_raw(width, height, rgb.samples).ok_or(FilterError::Shape {
            width,
            height,
            channels,
            actual,
        })
    }

    /// Convert a Gray buffer into an `image::GrayImage`.
    pub fn into_gray_image(self) -> Result<image::GrayImage> {
        if self.layout != PixelLayout::Gray {
            return Err(FilterError::InvalidChannelCount {
                operator: "into-gray-image",
                expected: 1,
                actual: self.channels(),
            });
        }
        let (width, height, actual) = (self.width, self.height, self.samples.len());
        image::GrayImage::from_raw(width, height, self.samples).ok_or(FilterError::Shape {
            width,
            height,
            channels: 1,
            actual,
        })
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Channel order of the samples.
    #[inline]
    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// Samples per pixel (1 or 3).
    #[inline]
    pub fn channels(&self) -> usize {
        self.layout.channels()
    }

    /// Row-major interleaved samples.
    #[inline]
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Consume the buffer and return its samples.
    pub fn into_samples(self) -> Vec<u8> {
        self.samples
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Get the size of the sample buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.samples.len()
    }

    /// Samples of the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the image.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let channels = self.channels();
        let idx = ((y as usize) * (self.width as usize) + x as usize) * channels;
        &self.samples[idx..idx + channels]
    }

    /// Reorder a color buffer to the requested color layout.
    ///
    /// Converting between `Rgb` and `Bgr` swaps the first and third sample of
    /// every pixel. Requesting the current layout returns the buffer as is.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidChannelCount`] when either side of the
    /// conversion is `Gray`, since channel reordering cannot add or drop
    /// channels.
    pub fn to_layout(self, layout: PixelLayout) -> Result<Self> {
        if self.layout == layout {
            return Ok(self);
        }
        if !self.layout.is_color() || !layout.is_color() {
            return Err(FilterError::InvalidChannelCount {
                operator: "convert-layout",
                expected: layout.channels(),
                actual: self.channels(),
            });
        }

        let mut samples = self.samples;
        for chunk in samples.chunks_exact_mut(3) {
            chunk.swap(0, 2);
        }
        Ok(Self {
            width: self.width,
            height: self.height,
            layout,
            samples,
        })
    }

    /// Expand to opaque RGBA samples, the layout of a canvas `ImageData`.
    ///
    /// Gray samples are replicated into all three color channels.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.pixel_count() * 4);
        match self.layout.rgb_indices() {
            Some((r, g, b)) => {
                for px in self.samples.chunks_exact(3) {
                    rgba.extend_from_slice(&[px[r], px[g], px[b], 255]);
                }
            }
            None => {
                for &v in &self.samples {
                    rgba.extend_from_slice(&[v, v, v, 255]);
                }
            }
        }
        rgba
    }
}

/// `width * height * channels`, or `None` if it cannot be allocated.
fn sample_len(width: u32, height: u32, channels: usize) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(channels)
        .filter(|&len| len <= isize::MAX as usize)
}
