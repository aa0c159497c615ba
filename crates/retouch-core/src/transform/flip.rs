//! Mirror operations.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::buffer::{PixelBuffer, CHANNELS};
use crate::error::EngineError;

/// Axis to mirror across.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlipDirection {
    /// Left becomes right.
    Horizontal,
    /// Top becomes bottom.
    Vertical,
}

impl FromStr for FlipDirection {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "horizontal" => Ok(FlipDirection::Horizontal),
            "vertical" => Ok(FlipDirection::Vertical),
            other => Err(EngineError::invalid(format!(
                "flip direction must be horizontal or vertical, got {:?}",
                other
            ))),
        }
    }
}

/// Mirror `buffer` across the given axis.
pub fn flip(buffer: &PixelBuffer, direction: FlipDirection) -> PixelBuffer {
    match direction {
        FlipDirection::Horizontal => flip_horizontal(buffer),
        FlipDirection::Vertical => flip_vertical(buffer),
    }
}

/// Reverse the pixel order of every row.
pub fn flip_horizontal(buffer: &PixelBuffer) -> PixelBuffer {
    let mut output = buffer.clone();
    let stride = buffer.width() as usize * CHANNELS;
    if stride == 0 {
        return output;
    }
    for (dst, src) in output
        .samples_mut()
        .chunks_exact_mut(stride)
        .zip(buffer.samples().chunks_exact(stride))
    {
        for (d, s) in dst
            .chunks_exact_mut(CHANNELS)
            .zip(src.chunks_exact(CHANNELS).rev())
        {
            d.copy_from_slice(s);
        }
    }
    output
}

/// Reverse the order of the rows.
pub fn flip_vertical(buffer: &PixelBuffer) -> PixelBuffer {
    let mut output = buffer.clone();
    let stride = buffer.width() as usize * CHANNELS;
    if stride == 0 {
        return output;
    }
    for (dst, src) in output
        .samples_mut()
        .chunks_exact_mut(stride)
        .zip(buffer.samples().chunks_exact(stride).rev())
    {
        dst.copy_from_slice(src);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 3x2 image with R encoding the position: row 0 = 0,1,2; row 1 = 3,4,5.
    fn indexed() -> PixelBuffer {
        let samples = (0u8..6).flat_map(|i| [i, 0, 0, 255]).collect();
        PixelBuffer::new(3, 2, samples).unwrap()
    }

    fn reds(buffer: &PixelBuffer) -> Vec<u8> {
        buffer.samples().chunks_exact(4).map(|p| p[0]).collect()
    }

    #[test]
    fn test_flip_horizontal() {
        assert_eq!(reds(&flip_horizontal(&indexed())), vec![2, 1, 0, 5, 4, 3]);
    }

    #[test]
    fn test_flip_vertical() {
        assert_eq!(reds(&flip_vertical(&indexed())), vec![3, 4, 5, 0, 1, 2]);
    }

    #[test]
    fn test_double_flip_is_identity() {
        let image = indexed();
        for direction in [FlipDirection::Horizontal, FlipDirection::Vertical] {
            assert_eq!(flip(&flip(&image, direction), direction), image);
        }
    }

    #[test]
    fn test_flip_empty() {
        let image = PixelBuffer::transparent(0, 3);
        assert_eq!(flip_horizontal(&image), image);
        assert_eq!(flip_vertical(&image), image);
    }

    #[test]
    fn test_direction_from_str() {
        assert_eq!(
            "horizontal".parse::<FlipDirection>().unwrap(),
            FlipDirection::Horizontal
        );
        assert!("diagonal".parse::<FlipDirection>().is_err());
    }
}
