//! Kernel convolution over RGBA buffers.
//!
//! All operations here share one edge policy: an output pixel is computed
//! only where the whole 3x3 footprint lies inside the buffer. The outer
//! one-pixel border is copied through unchanged (no padding, no clamped
//! sampling). Buffers with fewer than three rows or columns come back as an
//! unchanged copy.
//!
//! Each output row depends only on input rows, so rows are computed in
//! parallel with rayon.

mod edge;
pub mod kernel;

pub use edge::sobel_edges;
pub use kernel::{Kernel, BOX_BLUR, SHARPEN, SOBEL_X, SOBEL_Y};

use rayon::prelude::*;

use crate::adjustments::to_channel;
use crate::buffer::{PixelBuffer, CHANNELS};

/// Convolve R, G and B with `kernel`, leaving alpha and the border intact.
///
/// Each channel sum is divided by the kernel divisor, clamped to 0..=255 and
/// rounded.
pub fn convolve(buffer: &PixelBuffer, kernel: &Kernel) -> PixelBuffer {
    let (w, h) = (buffer.width() as usize, buffer.height() as usize);
    let radius = kernel.radius();
    if w < 2 * radius + 1 || h < 2 * radius + 1 {
        return buffer.clone();
    }

    let src = buffer.samples();
    let stride = w * CHANNELS;
    let divisor = kernel.divisor() as f32;
    let mut output = buffer.clone();

    output
        .samples_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .skip(radius)
        .take(h - 2 * radius)
        .for_each(|(y, row_out)| {
            for x in radius..w - radius {
                let mut sum = [0i32; 3];
                for ky in -1isize..=1 {
                    let row_start = (y as isize + ky) as usize * stride;
                    for kx in -1isize..=1 {
                        let weight = kernel.at(kx, ky);
                        if weight == 0 {
                            continue;
                        }
                        let i = row_start + (x as isize + kx) as usize * CHANNELS;
                        sum[0] += src[i] as i32 * weight;
                        sum[1] += src[i + 1] as i32 * weight;
                        sum[2] += src[i + 2] as i32 * weight;
                    }
                }

                let o = x * CHANNELS;
                row_out[o] = to_channel(sum[0] as f32 / divisor);
                row_out[o + 1] = to_channel(sum[1] as f32 / divisor);
                row_out[o + 2] = to_channel(sum[2] as f32 / divisor);
            }
        });

    output
}

/// Apply the 3x3 box blur `passes` times.
///
/// Repeated small passes are not equivalent to one larger kernel (the border
/// policy and per-pass rounding differ), so callers that want a stronger blur
/// raise `passes`.
pub fn box_blur(buffer: &PixelBuffer, passes: u32) -> PixelBuffer {
    let mut current = buffer.clone();
    for _ in 0..passes {
        current = convolve(&current, &BOX_BLUR);
    }
    current
}

/// Sharpen with the 4-neighbour kernel.
pub fn sharpen(buffer: &PixelBuffer) -> PixelBuffer {
    convolve(buffer, &SHARPEN)
}


#[cfg(test)]
mod tests {
    use super::test_support::{border_equal, pattern};
    use super::*;

    #[test]
    fn test_uniform_buffer_unchanged() {
        let buffer = PixelBuffer::filled(6, 5, [90, 120, 30, 255]);
        assert_eq!(box_blur(&buffer, 3), buffer);
        assert_eq!(sharpen(&buffer), buffer);
    }

    #[test]
    fn test_border_preserved() {
        let buffer = pattern(7, 6);
        assert!(border_equal(&buffer, &box_blur(&buffer, 1)));
        assert!(border_equal(&buffer, &sharpen(&buffer)));
    }

    #[test]
    fn test_alpha_preserved() {
        let mut buffer = pattern(5, 5);
        buffer.set_pixel(2, 2, [255, 255, 255, 17]);
        let blurred = box_blur(&buffer, 1);
        assert_eq!(blurred.pixel(2, 2).unwrap()[3], 17);
    }

    #[test]
    fn test_box_blur_spreads_single_pixel() {
        let mut buffer = PixelBuffer::filled(5, 5, [0, 0, 0, 255]);
        buffer.set_pixel(2, 2, [90, 180, 9, 255]);
        let blurred = box_blur(&buffer, 1);

        // Each 3x3 window containing the bright pixel averages it over 9
        assert_eq!(blurred.pixel(2, 2), Some([10, 20, 1, 255]));
        assert_eq!(blurred.pixel(1, 1), Some([10, 20, 1, 255]));
        assert_eq!(blurred.pixel(3, 3), Some([10, 20, 1, 255]));
        // Border untouched even though its window would include the pixel
        assert_eq!(blurred.pixel(0, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_repeated_blur_differs_from_single_pass() {
        let buffer = pattern(9, 9);
        let once = box_blur(&buffer, 1);
        let thrice = box_blur(&buffer, 3);
        assert_ne!(once, thrice);
        assert_eq!(box_blur(&buffer, 0), buffer);
    }

    #[test]
    fn test_sharpen_clamps() {
        let mut buffer = PixelBuffer::filled(3, 3, [100, 100, 100, 255]);
        buffer.set_pixel(1, 1, [250, 10, 100, 255]);
        let sharpened = sharpen(&buffer);
        // 5 * 250 - 4 * 100 = 850 -> 255; 5 * 10 - 400 = -350 -> 0
        assert_eq!(sharpened.pixel(1, 1), Some([255, 0, 100, 255]));
    }

    #[test]
    fn test_small_buffers_are_noop() {
        for (w, h) in [(0, 0), (1, 1), (2, 5), (5, 2)] {
            let buffer = pattern(w, h);
            assert_eq!(box_blur(&buffer, 3), buffer);
            assert_eq!(sharpen(&buffer), buffer);
            assert_eq!(sobel_edges(&buffer), buffer);
        }
    }

    #[test]
    fn test_parallel_matches_row_by_row() {
        // A tall buffer exercises many rayon chunks; compare against a
        // single-row reconstruction of the same center.
        let buffer = pattern(4, 64);
        let blurred = box_blur(&buffer, 1);
        for y in 1..63 {
            let window = PixelBuffer::new(
                4,
                3,
                buffer.samples()[((y - 1) * 16) as usize..((y + 2) * 16) as usize].to_vec(),
            )
            .unwrap();
            let local = box_blur(&window, 1);
            assert_eq!(local.pixel(1, 1), blurred.pixel(1, y));
            assert_eq!(local.pixel(2, 1), blurred.pixel(2, y));
        }
    }
}
