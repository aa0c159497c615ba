//! Sobel edge detection.

use rayon::prelude::*;

use super::kernel::{SOBEL_X, SOBEL_Y};
use crate::adjustments::to_channel;
use crate::buffer::{PixelBuffer, CHANNELS};
use crate::luminance::luma_u8;

/// Replace R, G and B with the Sobel gradient magnitude of the luminance.
///
/// The buffer is first reduced to an 8-bit luminance plane. The magnitude
/// `sqrt(gx² + gy²)` can reach about 1442 on a hard black/white edge; it
/// saturates at 255. Alpha and the one-pixel border are left untouched.
pub fn sobel_edges(buffer: &PixelBuffer) -> PixelBuffer {
    let (w, h) = (buffer.width() as usize, buffer.height() as usize);
    if w < 3 || h < 3 {
        return buffer.clone();
    }

    let gray: Vec<u8> = buffer
        .samples()
        .chunks_exact(CHANNELS)
        .map(|p| luma_u8(p[0], p[1], p[2]))
        .collect();

    let stride = w * CHANNELS;
    let mut output = buffer.clone();

    output
        .samples_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .skip(1)
        .take(h - 2)
        .for_each(|(y, row_out)| {
            for x in 1..w - 1 {
                let mut gx = 0i32;
                let mut gy = 0i32;
                for ky in -1isize..=1 {
                    for kx in -1isize..=1 {
                        let i = (y as isize + ky) as usize * w + (x as isize + kx) as usize;
                        let v = gray[i] as i32;
                        gx += v * SOBEL_X.at(kx, ky);
                        gy += v * SOBEL_Y.at(kx, ky);
                    }
                }

                let magnitude = to_channel(((gx * gx + gy * gy) as f32).sqrt());
                let o = x * CHANNELS;
                row_out[o] = magnitude;
                row_out[o + 1] = magnitude;
                row_out[o + 2] = magnitude;
            }
        });

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_image_has_no_edges() {
        let buffer = PixelBuffer::filled(5, 4, [77, 77, 77, 255]);
        let edges = sobel_edges(&buffer);
        for y in 1..3 {
            for x in 1..4 {
                assert_eq!(edges.pixel(x, y), Some([0, 0, 0, 255]));
            }
        }
    }

    #[test]
    fn test_hard_edge_saturates() {
        // Left two columns black, right two white
        let mut buffer = PixelBuffer::filled(4, 3, [0, 0, 0, 255]);
        for y in 0..3 {
            buffer.set_pixel(2, y, [255, 255, 255, 255]);
            buffer.set_pixel(3, y, [255, 255, 255, 255]);
        }
        let edges = sobel_edges(&buffer);
        // gx = 4 * 255 = 1020, well past 255
        assert_eq!(edges.pixel(1, 1), Some([255, 255, 255, 255]));
        assert_eq!(edges.pixel(2, 1), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_weak_edge_magnitude() {
        // Column step of 10 levels: gx = 4 * 10 = 40, gy = 0
        let mut buffer = PixelBuffer::filled(3, 3, [100, 100, 100, 255]);
        for y in 0..3 {
            buffer.set_pixel(2, y, [110, 110, 110, 255]);
        }
        let edges = sobel_edges(&buffer);
        assert_eq!(edges.pixel(1, 1), Some([40, 40, 40, 255]));
    }

    #[test]
    fn test_alpha_and_border_untouched() {
        let mut buffer = PixelBuffer::filled(3, 3, [10, 200, 30, 99]);
        buffer.set_pixel(0, 0, [255, 0, 0, 5]);
        let edges = sobel_edges(&buffer);
        assert_eq!(edges.pixel(0, 0), Some([255, 0, 0, 5]));
        assert_eq!(edges.pixel(1, 1).unwrap()[3], 99);
    }
}
