//! Luminance weights shared by the grayscale filter and edge detection.
//!
//! These are the classic NTSC-style weights (0.3, 0.59, 0.11), not BT.709.
//! Grayscale output and Sobel input must agree on them.

/// Weight of the red channel in luminance calculation.
pub const LUMA_R: f32 = 0.3;

/// Weight of the green channel in luminance calculation.
pub const LUMA_G: f32 = 0.59;

/// Weight of the blue channel in luminance calculation.
pub const LUMA_B: f32 = 0.11;

/// Calculate luminance from u8 RGB values, unrounded (0.0 to 255.0).
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> f32 {
    LUMA_R * r as f32 + LUMA_G * g as f32 + LUMA_B * b as f32
}

/// Calculate luminance from u8 RGB values, rounded to u8.
#[inline]
pub fn luma_u8(r: u8, g: u8, b: u8) -> u8 {
    luma(r, g, b).clamp(0.0, 255.0).round() as u8
}
