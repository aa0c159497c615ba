//! Rotation onto an expanded canvas.
//!
//! Unlike [`super::compose`], which keeps the source dimensions and clips,
//! this grows the canvas to the rotated bounding box so nothing is lost.
//! It backs the stateless `rotate` operation.
//!
//! # Algorithm
//!
//! Inverse mapping: for each output pixel center, rotate back by `-θ` about
//! the output center and sample the source around its own center:
//! ```text
//! src_x = src_cx + dx·cos θ + dy·sin θ
//! src_y = src_cy - dx·sin θ + dy·cos θ
//! ```

use super::sample::{rotation_trig, sample};
use super::InterpolationFilter;
use crate::buffer::PixelBuffer;

/// Compute the dimensions of the bounding box for a rotated image.
///
/// # Arguments
///
/// * `width` - Original image width
/// * `height` - Original image height
/// * `angle_degrees` - Rotation angle in degrees (positive = clockwise)
///
/// # Returns
///
/// Tuple of (new_width, new_height). Quarter turns swap or keep the
/// dimensions exactly.
pub fn compute_rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    let angle = angle_degrees.rem_euclid(360.0);

    // Fast path: no rotation needed (including near-zero and multiples of 360)
    if angle < 0.001 || (360.0 - angle) < 0.001 {
        return (width, height);
    }

    // Fast path: exact 90/270 degree rotations (swap dimensions)
    if (angle - 90.0).abs() < 0.001 || (angle - 270.0).abs() < 0.001 {
        return (height, width);
    }

    // Fast path: exact 180 degree rotation (same dimensions)
    if (angle - 180.0).abs() < 0.001 {
        return (width, height);
    }

    let (cos, sin) = rotation_trig(angle);
    let (cos, sin) = (cos.abs(), sin.abs());

    let w = width as f64;
    let h = height as f64;

    // new_w = |w*cos| + |h*sin|, new_h = |w*sin| + |h*cos|
    let new_w = (w * cos + h * sin).round() as u32;
    let new_h = (w * sin + h * cos).round() as u32;

    (new_w.max(1), new_h.max(1))
}

/// Rotate an image about its center onto an expanded canvas.
///
/// # Arguments
///
/// * `image` - Source image to rotate
/// * `angle_degrees` - Rotation angle in degrees (positive = clockwise)
/// * `filter` - Interpolation method
///
/// # Returns
///
/// New `PixelBuffer` sized to the rotated bounding box. Corners not covered
/// by the source are transparent.
pub fn rotate_expand(
    image: &PixelBuffer,
    angle_degrees: f64,
    filter: InterpolationFilter,
) -> PixelBuffer {
    let angle = angle_degrees.rem_euclid(360.0);

    // Fast path: no rotation needed
    if angle < 0.001 || (360.0 - angle) < 0.001 || image.is_empty() {
        return image.clone();
    }

    let (dst_w, dst_h) = compute_rotated_bounds(image.width(), image.height(), angle);
    let (cos, sin) = rotation_trig(angle);

    // Center of source and destination images
    let src_cx = image.width() as f64 / 2.0;
    let src_cy = image.height() as f64 / 2.0;
    let dst_cx = dst_w as f64 / 2.0;
    let dst_cy = dst_h as f64 / 2.0;

    let mut output = PixelBuffer::transparent(dst_w, dst_h);

    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            // Translate destination pixel center to origin at center
            let dx = dst_x as f64 + 0.5 - dst_cx;
            let dy = dst_y as f64 + 0.5 - dst_cy;

            // Apply inverse rotation to find source coordinates
            let src_x = src_cx + dx * cos + dy * sin;
            let src_y = src_cy - dx * sin + dy * cos;

            output.set_pixel(dst_x, dst_y, sample(image, src_x, src_y, filter));
        }
    }

    output
}
