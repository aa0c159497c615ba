//! Resizing to a target box.
//!
//! Scaling goes through `image::imageops::resize` with the Triangle
//! (bilinear) filter. Resizes never enlarge: every fit mode caps its scale
//! factor at 1.

use serde::{Deserialize, Serialize};

use crate::buffer::{PixelBuffer, CHANNELS};
use crate::error::EngineError;

/// How the image is fitted into the `width x height` target box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fit {
    /// Keep aspect ratio, cover the box, crop the overflow around the center.
    #[default]
    Cover,
    /// Keep aspect ratio, fit inside the box, pad to the box with transparency.
    Contain,
    /// Stretch to the exact box, ignoring aspect ratio.
    Fill,
    /// Keep aspect ratio, fit inside the box, no padding.
    Inside,
    /// Keep aspect ratio, cover the box, no cropping.
    Outside,
}

/// Resize `image` into a `width x height` box according to `fit`.
///
/// A zero-area source is returned unchanged.
///
/// # Errors
///
/// Returns `EngineError::InvalidParameter` if `width` or `height` is zero.
pub fn resize(
    image: &PixelBuffer,
    width: u32,
    height: u32,
    fit: Fit,
) -> Result<PixelBuffer, EngineError> {
    if width == 0 || height == 0 {
        return Err(EngineError::invalid(format!(
            "resize requires a non-zero width and height, got {}x{}",
            width, height
        )));
    }
    if image.is_empty() {
        return Ok(image.clone());
    }

    let (src_w, src_h) = (image.width() as f64, image.height() as f64);
    let (box_w, box_h) = (width as f64, height as f64);
    let inside = (box_w / src_w).min(box_h / src_h).min(1.0);
    let outside = (box_w / src_w).max(box_h / src_h).min(1.0);

    match fit {
        Fit::Fill => scale_to(image, width.min(image.width()), height.min(image.height())),
        Fit::Inside => scale_by(image, inside),
        Fit::Outside => scale_by(image, outside),
        Fit::Cover => {
            let scaled = scale_by(image, outside)?;
            let crop_w = width.min(scaled.width());
            let crop_h = height.min(scaled.height());
            crop_center(&scaled, crop_w, crop_h)
        }
        Fit::Contain => {
            let scaled = scale_by(image, inside)?;
            pad_center(&scaled, width, height)
        }
    }
}

fn scale_by(image: &PixelBuffer, factor: f64) -> Result<PixelBuffer, EngineError> {
    let w = ((image.width() as f64 * factor).round() as u32).max(1);
    let h = ((image.height() as f64 * factor).round() as u32).max(1);
    scale_to(image, w, h)
}

fn scale_to(image: &PixelBuffer, width: u32, height: u32) -> Result<PixelBuffer, EngineError> {
    // Fast path: if dimensions match, just clone
    if image.width() == width && image.height() == height {
        return Ok(image.clone());
    }

    let rgba = image
        .to_rgba_image()
        .ok_or_else(|| EngineError::invalid("pixel buffer could not be viewed as RGBA"))?;
    let resized =
        image::imageops::resize(&rgba, width, height, image::imageops::FilterType::Triangle);

    Ok(PixelBuffer::from_rgba_image(resized))
}

/// Copy the centered `width x height` region of `image`.
fn crop_center(image: &PixelBuffer, width: u32, height: u32) -> Result<PixelBuffer, EngineError> {
    if image.width() == width && image.height() == height {
        return Ok(image.clone());
    }

    let left = (image.width() - width) / 2;
    let top = (image.height() - height) / 2;
    let row_bytes = width as usize * CHANNELS;

    let mut samples = Vec::with_capacity(row_bytes * height as usize);
    for y in top..top + height {
        let start = image.offset(left, y);
        samples.extend_from_slice(&image.samples()[start..start + row_bytes]);
    }

    PixelBuffer::new(width, height, samples)
}

/// Center `image` on a transparent `width x height` canvas.
fn pad_center(image: &PixelBuffer, width: u32, height: u32) -> Result<PixelBuffer, EngineError> {
    if image.width() == width && image.height() == height {
        return Ok(image.clone());
    }

    let top_layer = image
        .to_rgba_image()
        .ok_or_else(|| EngineError::invalid("pixel buffer could not be viewed as RGBA"))?;
    let mut canvas = image::RgbaImage::new(width, height);
    let x = (width as i64 - image.width() as i64) / 2;
    let y = (height as i64 - image.height() as i64) / 2;
    image::imageops::replace(&mut canvas, &top_layer, x, y);

    Ok(PixelBuffer::from_rgba_image(canvas))
}
