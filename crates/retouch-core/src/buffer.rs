//! The RGBA8 raster every engine operation consumes and produces.

use crate::error::EngineError;

/// Bytes per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// A rectangular RGBA8 pixel buffer.
///
/// Samples are stored row-major, four bytes per pixel in R, G, B, A order.
/// The length of `samples` is always `width * height * 4`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    samples: Vec<u8>,
}

impl PixelBuffer {
    /// Create a buffer from raw RGBA samples.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::BufferSizeMismatch` if `samples.len()` is not
    /// `width * height * 4`.
    pub fn new(width: u32, height: u32, samples: Vec<u8>) -> Result<Self, EngineError> {
        let expected = byte_len(width, height);
        if samples.len() != expected {
            return Err(EngineError::BufferSizeMismatch {
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Create a buffer where every pixel has the same RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let mut samples = Vec::with_capacity(count * CHANNELS);
        for _ in 0..count {
            samples.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            samples,
        }
    }

    /// Create a fully transparent buffer.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            samples: vec![0; byte_len(width, height)],
        }
    }

    /// Create a PixelBuffer from an `image::RgbaImage`.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            samples: img.into_raw(),
        }
    }

    /// Convert to an `image::RgbaImage` for use with `image::imageops`.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.samples.clone())
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA samples.
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Mutable access to the samples. The length cannot change through this.
    pub fn samples_mut(&mut self) -> &mut [u8] {
        &mut self.samples
    }

    /// Consume the buffer and return its samples.
    pub fn into_samples(self) -> Vec<u8> {
        self.samples
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// True for a zero-area buffer.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Byte offset of pixel `(x, y)`.
    #[inline]
    pub(crate) fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// Read the pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        Some([
            self.samples[i],
            self.samples[i + 1],
            self.samples[i + 2],
            self.samples[i + 3],
        ])
    }

    /// Write the pixel at `(x, y)`. Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = self.offset(x, y);
        self.samples[i..i + CHANNELS].copy_from_slice(&rgba);
    }
}

#[inline]
fn byte_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * CHANNELS
}
