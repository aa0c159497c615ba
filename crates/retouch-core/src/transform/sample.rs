//! Pixel sampling shared by the inverse-mapping transforms.

use super::InterpolationFilter;
use crate::buffer::PixelBuffer;

const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

/// `(cos, sin)` of an angle in degrees.
///
/// Quarter turns return exact values so that inverse mapping lands on
/// exact pixel coordinates instead of `6.1e-17` away from them.
pub(super) fn rotation_trig(degrees: f64) -> (f64, f64) {
    let d = degrees.rem_euclid(360.0);
    if d == 0.0 {
        (1.0, 0.0)
    } else if d == 90.0 {
        (0.0, 1.0)
    } else if d == 180.0 {
        (-1.0, 0.0)
    } else if d == 270.0 {
        (0.0, -1.0)
    } else {
        let rad = d.to_radians();
        (rad.cos(), rad.sin())
    }
}

/// Sample `image` at continuous coordinates `(x, y)`.
///
/// Points outside `[0, width) x [0, height)` are transparent.
#[inline]
pub(super) fn sample(image: &PixelBuffer, x: f64, y: f64, filter: InterpolationFilter) -> [u8; 4] {
    match filter {
        InterpolationFilter::Nearest => sample_nearest(image, x, y),
        InterpolationFilter::Bilinear => sample_bilinear(image, x, y),
    }
}

#[inline]
fn in_bounds(image: &PixelBuffer, x: f64, y: f64) -> bool {
    x >= 0.0 && y >= 0.0 && x < image.width() as f64 && y < image.height() as f64
}

fn sample_nearest(image: &PixelBuffer, x: f64, y: f64) -> [u8; 4] {
    if !in_bounds(image, x, y) {
        return TRANSPARENT;
    }
    image
        .pixel(x.floor() as u32, y.floor() as u32)
        .unwrap_or(TRANSPARENT)
}

/// Get a pixel as [f64; 4] from an image at the given coordinates.
#[inline]
fn get_pixel_f64(image: &PixelBuffer, px: u32, py: u32) -> [f64; 4] {
    let p = image.pixel(px, py).unwrap_or(TRANSPARENT);
    [p[0] as f64, p[1] as f64, p[2] as f64, p[3] as f64]
}

/// Bilinear interpolation between the four nearest pixel centers.
///
/// Inside the image but within half a pixel of its edge, the edge pixels are
/// repeated rather than blending with transparency.
fn sample_bilinear(image: &PixelBuffer, x: f64, y: f64) -> [u8; 4] {
    if !in_bounds(image, x, y) {
        return TRANSPARENT;
    }

    let max_x = (image.width() - 1) as f64;
    let max_y = (image.height() - 1) as f64;
    let cx = (x - 0.5).clamp(0.0, max_x);
    let cy = (y - 0.5).clamp(0.0, max_y);

    let x0 = cx.floor() as u32;
    let y0 = cy.floor() as u32;
    let x1 = (x0 + 1).min(image.width() - 1);
    let y1 = (y0 + 1).min(image.height() - 1);

    // Fractional distances
    let fx = cx - x0 as f64;
    let fy = cy - y0 as f64;

    let p00 = get_pixel_f64(image, x0, y0);
    let p10 = get_pixel_f64(image, x1, y0);
    let p01 = get_pixel_f64(image, x0, y1);
    let p11 = get_pixel_f64(image, x1, y1);

    let mut result = [0u8; 4];
    for i in 0..4 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    result
}
