//! Per-pixel color adjustment.
//!
//! Applies brightness, contrast and hue/saturation to RGBA pixel data.
//! Alpha passes through untouched.
//!
//! ## Adjustment Order
//! 1. Brightness
//! 2. Contrast
//! 3. Hue / Saturation (one HSL round trip)
//!
//! Every step works on the unclamped floating point output of the previous
//! one. Values are clamped to 0..=255 and rounded once, at the end.

use crate::buffer::{PixelBuffer, CHANNELS};
use crate::Adjustments;

/// Apply the color adjustments to a buffer in place.
///
/// Geometry fields (scale, rotation, flips) are ignored here; see
/// [`crate::transform::compose`].
pub fn apply_adjustments(buffer: &mut PixelBuffer, adjustments: &Adjustments) {
    // Early exit if no adjustments
    if !adjustments.has_color() {
        return;
    }

    let contrast_factor = contrast_factor(adjustments.contrast);
    let hsl = adjustments.saturation != 0 || adjustments.hue != 0;

    for chunk in buffer.samples_mut().chunks_exact_mut(CHANNELS) {
        let mut r = chunk[0] as f32;
        let mut g = chunk[1] as f32;
        let mut b = chunk[2] as f32;

        (r, g, b) = apply_brightness(r, g, b, adjustments.brightness);
        if let Some(factor) = contrast_factor {
            (r, g, b) = apply_contrast(r, g, b, factor);
        }
        if hsl {
            (r, g, b) = adjust_hsl(r, g, b, adjustments.hue, adjustments.saturation);
        }

        chunk[0] = to_channel(r);
        chunk[1] = to_channel(g);
        chunk[2] = to_channel(b);
    }
}

/// Clamp to the 0..=255 range and round to the nearest byte.
#[inline]
pub(crate) fn to_channel(v: f32) -> u8 {
    v.clamp(0.0, 255.0).round() as u8
}

/// Apply brightness adjustment.
///
/// Brightness ranges from -100 to +100 and maps linearly onto +-255.
///
/// Formula: `output = input + brightness * 2.55`
#[inline]
fn apply_brightness(r: f32, g: f32, b: f32, brightness: i32) -> (f32, f32, f32) {
    if brightness == 0 {
        return (r, g, b);
    }
    let offset = brightness.clamp(-100, 100) as f32 * 2.55;
    (r + offset, g + offset, b + offset)
}

/// Contrast multiplier, or `None` when contrast is zero.
///
/// Formula: `factor = 259 * (contrast + 255) / (255 * (259 - contrast))`
///
/// Contrast is clamped to -100..=100 first, so the denominator is at least
/// `255 * 159` even for values assigned without [`Adjustments::set`].
fn contrast_factor(contrast: i32) -> Option<f32> {
    let contrast = contrast.clamp(-100, 100);
    if contrast == 0 {
        return None;
    }
    let c = contrast as f32;
    Some((259.0 * (c + 255.0)) / (255.0 * (259.0 - c)))
}

/// Apply contrast adjustment around the 128 midpoint.
#[inline]
fn apply_contrast(r: f32, g: f32, b: f32, factor: f32) -> (f32, f32, f32) {
    (
        factor * (r - 128.0) + 128.0,
        factor * (g - 128.0) + 128.0,
        factor * (b - 128.0) + 128.0,
    )
}

/// Shift hue and saturation through an HSL round trip.
///
/// `hue` is in degrees, `saturation` is an additive delta in percent.
/// Inputs are on the 0..=255 scale and may be out of range from earlier
/// steps; the result is on the same scale.
fn adjust_hsl(r: f32, g: f32, b: f32, hue: i32, saturation: i32) -> (f32, f32, f32) {
    let (h, s, l) = rgb_to_hsl(r / 255.0, g / 255.0, b / 255.0);

    let h = (h + hue as f32 / 360.0).rem_euclid(1.0);
    // rem_euclid can return exactly 1.0 for tiny negative inputs
    let h = if h >= 1.0 { 0.0 } else { h };
    let s = (s + saturation as f32 / 100.0).clamp(0.0, 1.0);

    let (r, g, b) = hsl_to_rgb(h, s, l);
    (r * 255.0, g * 255.0, b * 255.0)
}

/// Convert RGB (0.0 to 1.0) to HSL, all components in 0.0 to 1.0.
///
/// Achromatic input (`max == min`) yields hue and saturation of zero. When
/// several channels share the maximum, the first of R, G, B picks the hue
/// sector.
pub fn rgb_to_hsl(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return (0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if max == r {
        ((g - b) / d + if g < b { 6.0 } else { 0.0 }) / 6.0
    } else if max == g {
        ((b - r) / d + 2.0) / 6.0
    } else {
        ((r - g) / d + 4.0) / 6.0
    };

    (h, s, l)
}

/// Convert HSL (all 0.0 to 1.0) back to RGB (0.0 to 1.0).
///
/// Uses the chroma form: `c = (1 - |2l - 1|) * s`,
/// `x = c * (1 - |(6h mod 2) - 1|)`, `m = l - c/2`, with the sector
/// chosen by `6h`.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let h6 = h * 6.0;
    let x = c * (1.0 - ((h6 % 2.0) - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = if h6 < 1.0 {
        (c, x, 0.0)
    } else if h6 < 2.0 {
        (x, c, 0.0)
    } else if h6 < 3.0 {
        (0.0, c, x)
    } else if h6 < 4.0 {
        (0.0, x, c)
    } else if h6 < 5.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    (r + m, g + m, b + m)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to build a one pixel buffer.
    fn pixel(r: u8, g: u8, b: u8) -> PixelBuffer {
        PixelBuffer::filled(1, 1, [r, g, b, 255])
    }

    /// Helper to apply adjustments and return the resulting RGBA value.
    fn apply(buffer: &PixelBuffer, adj: &Adjustments) -> [u8; 4] {
        let mut result = buffer.clone();
        apply_adjustments(&mut result, adj);
        result.pixel(0, 0).unwrap()
    }

    // ===== Identity Tests =====

    #[test]
    fn test_identity_no_adjustments() {
        let buffer = pixel(128, 64, 192);
        let result = apply(&buffer, &Adjustments::default());
        assert_eq!(result, [128, 64, 192, 255]);
    }

    #[test]
    fn test_geometry_fields_ignored() {
        let buffer = pixel(10, 20, 30);
        let mut adj = Adjustments::default();
        adj.scale = 50;
        adj.rotation = 90;
        assert_eq!(apply(&buffer, &adj), [10, 20, 30, 255]);
    }

    // ===== Brightness Tests =====

    #[test]
    fn test_brightness_clamps_at_white() {
        let buffer = pixel(250, 250, 250);
        let mut adj = Adjustments::default();
        adj.brightness = 100;
        assert_eq!(apply(&buffer, &adj), [255, 255, 255, 255]);
    }

    #[test]
    fn test_brightness_offset() {
        let buffer = pixel(100, 100, 100);
        let mut adj = Adjustments::default();
        adj.brightness = 20; // +51
        assert_eq!(apply(&buffer, &adj), [151, 151, 151, 255]);

        adj.brightness = -100; // -255
        assert_eq!(apply(&buffer, &adj), [0, 0, 0, 255]);
    }

    #[test]
    fn test_alpha_untouched() {
        let buffer = PixelBuffer::filled(1, 1, [100, 100, 100, 37]);
        let mut adj = Adjustments::default();
        adj.brightness = 50;
        adj.contrast = 30;
        adj.hue = 90;
        assert_eq!(apply(&buffer, &adj)[3], 37);
    }

    // ===== Contrast Tests =====

    #[test]
    fn test_contrast_factor_formula() {
        // contrast 100: 259 * 355 / (255 * 159)
        let factor = contrast_factor(100).unwrap();
        assert!((factor - 2.2677).abs() < 1e-3, "factor was {}", factor);
        assert!(contrast_factor(0).is_none());
    }

    #[test]
    fn test_contrast_positive() {
        let buffer = pixel(64, 128, 192);
        let mut adj = Adjustments::default();
        adj.contrast = 100;
        let result = apply(&buffer, &adj);
        assert!(result[0] < 64, "Dark channel should get darker");
        assert_eq!(result[1], 128, "Midpoint is a fixed point");
        assert_eq!(result[2], 255, "Bright channel should clip at white");
    }

    #[test]
    fn test_contrast_negative() {
        let buffer = pixel(0, 128, 255);
        let mut adj = Adjustments::default();
        adj.contrast = -50;
        let result = apply(&buffer, &adj);
        assert!(result[0] > 0, "Black should move toward gray");
        assert_eq!(result[1], 128);
        assert!(result[2] < 255, "White should move toward gray");
    }

    // ===== HSL Tests =====

    #[test]
    fn test_hsl_known_values() {
        let (h, s, l) = rgb_to_hsl(1.0, 0.0, 0.0);
        assert!(h.abs() < 1e-6);
        assert!((s - 1.0).abs() < 1e-6);
        assert!((l - 0.5).abs() < 1e-6);

        let (h, _, _) = rgb_to_hsl(0.0, 1.0, 0.0);
        assert!((h - 1.0 / 3.0).abs() < 1e-6);

        let (h, _, _) = rgb_to_hsl(0.0, 0.0, 1.0);
        assert!((h - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_hsl_gray_is_achromatic() {
        let (h, s, l) = rgb_to_hsl(0.5, 0.5, 0.5);
        assert_eq!(h, 0.0);
        assert_eq!(s, 0.0);
        assert!((l - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_hsl_round_trip() {
        for &(r, g, b) in &[(0.2, 0.4, 0.6), (0.9, 0.1, 0.3), (0.5, 0.5, 0.1)] {
            let (h, s, l) = rgb_to_hsl(r, g, b);
            let (r2, g2, b2) = hsl_to_rgb(h, s, l);
            assert!((r - r2).abs() < 1e-4);
            assert!((g - g2).abs() < 1e-4);
            assert!((b - b2).abs() < 1e-4);
        }
    }

    #[test]
    fn test_hue_rotation_red_to_green() {
        let buffer = pixel(255, 0, 0);
        let mut adj = Adjustments::default();
        adj.hue = 120;
        assert_eq!(apply(&buffer, &adj), [0, 255, 0, 255]);
    }

    #[test]
    fn test_negative_hue_wraps() {
        let buffer = pixel(255, 0, 0);
        let mut adj = Adjustments::default();
        adj.hue = -120;
        assert_eq!(apply(&buffer, &adj), [0, 0, 255, 255]);
    }

    #[test]
    fn test_full_turn_hue_is_identity() {
        let buffer = pixel(200, 90, 40);
        let mut adj = Adjustments::default();
        adj.hue = 360;
        let result = apply(&buffer, &adj);
        for (got, want) in result.iter().zip([200u8, 90, 40]) {
            assert!((*got as i32 - want as i32).abs() <= 1);
        }
    }

    #[test]
    fn test_desaturate_to_gray() {
        let buffer = pixel(200, 100, 50);
        let mut adj = Adjustments::default();
        adj.saturation = -100;
        let result = apply(&buffer, &adj);
        assert_eq!(result[0], result[1]);
        assert_eq!(result[1], result[2]);
        // Lightness is (200 + 50) / 2 = 125
        assert_eq!(result[0], 125);
    }

    #[test]
    fn test_saturation_increase() {
        let buffer = pixel(160, 128, 100);
        let mut adj = Adjustments::default();
        adj.saturation = 50;
        let result = apply(&buffer, &adj);
        let orig_diff = 160 - 100;
        let new_diff = result[0] as i32 - result[2] as i32;
        assert!(new_diff > orig_diff, "Color difference should increase");
    }

    #[test]
    fn test_saturation_on_gray_keeps_lightness() {
        let buffer = pixel(90, 90, 90);
        let mut adj = Adjustments::default();
        adj.saturation = 100;
        // Gray has hue 0 and saturation becomes 1, so the pixel turns red-ish;
        // lightness is kept.
        let result = apply(&buffer, &adj);
        let (_, _, l) = rgb_to_hsl(
            result[0] as f32 / 255.0,
            result[1] as f32 / 255.0,
            result[2] as f32 / 255.0,
        );
        assert!((l * 255.0 - 90.0).abs() < 1.5);
    }

    // ===== Combined Tests =====

    /// Red, green, blue and mid gray in one row.
    fn primaries() -> PixelBuffer {
        PixelBuffer::new(
            4,
            1,
            vec![
                255, 0, 0, 255, //
                0, 255, 0, 255, //
                0, 0, 255, 255, //
                128, 128, 128, 255,
            ],
        )
        .unwrap()
    }

    fn row(buffer: &PixelBuffer) -> Vec<[u8; 4]> {
        (0..buffer.width()).filter_map(|x| buffer.pixel(x, 0)).collect()
    }

    #[test]
    fn test_extreme_values_saturate() {
        let mut adj = Adjustments::default();
        adj.brightness = 100;
        adj.contrast = 100;
        let mut buffer = primaries();
        apply_adjustments(&mut buffer, &adj);
        assert_eq!(row(&buffer), vec![[255, 255, 255, 255]; 4]);

        adj.brightness = -100;
        let mut buffer = primaries();
        apply_adjustments(&mut buffer, &adj);
        assert_eq!(row(&buffer), vec![[0, 0, 0, 255]; 4]);
    }

    #[test]
    fn test_extreme_hue_and_saturation() {
        // Hue +200 degrees; gray gains full saturation at hue 200
        let mut adj = Adjustments::default();
        adj.saturation = 100;
        adj.hue = 200;
        let mut buffer = primaries();
        apply_adjustments(&mut buffer, &adj);
        assert_eq!(
            row(&buffer),
            vec![
                [0, 170, 255, 255],
                [255, 0, 170, 255],
                [170, 255, 0, 255],
                [1, 170, 255, 255],
            ]
        );
    }

    #[test]
    fn test_contrast_outside_domain_is_clamped() {
        let buffer = pixel(200, 128, 50);
        let mut adj = Adjustments::default();

        adj.contrast = 100;
        let full = apply(&buffer, &adj);
        assert_eq!(full, [255, 128, 0, 255]);
        for contrast in [259, 1000, i32::MAX] {
            adj.contrast = contrast;
            assert_eq!(apply(&buffer, &adj), full, "contrast {}", contrast);
        }

        adj.contrast = -1000;
        assert_eq!(apply(&buffer, &adj), [160, 128, 94, 255]);
    }

    #[test]
    fn test_brightness_outside_domain_is_clamped() {
        let buffer = pixel(100, 100, 100);
        let mut adj = Adjustments::default();
        adj.brightness = i32::MIN;
        assert_eq!(apply(&buffer, &adj), [0, 0, 0, 255]);
    }

    #[test]
    fn test_empty_buffer() {
        let mut buffer = PixelBuffer::transparent(0, 0);
        let mut adj = Adjustments::default();
        adj.brightness = 50;
        apply_adjustments(&mut buffer, &adj);
        assert!(buffer.is_empty());
    }
}
