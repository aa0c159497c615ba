//! Render-time scale and rotation about the buffer center.
//!
//! The output canvas always has the source's dimensions. Scaling down leaves
//! a transparent margin; scaling up or rotating crops whatever falls outside.
//!
//! For scale `s` and angle `θ` about center `c`, the forward transform is
//! `p' = c + s·R(θ)·(p - c)`. Each output pixel center is mapped back with
//! the inverse:
//! ```text
//! dx = (dst_x - cx) / s,  dy = (dst_y - cy) / s
//! src_x = cx + dx·cos θ + dy·sin θ
//! src_y = cy - dx·sin θ + dy·cos θ
//! ```

use std::borrow::Cow;

use super::flip::{flip_horizontal, flip_vertical};
use super::sample::{rotation_trig, sample};
use super::InterpolationFilter;
use crate::buffer::PixelBuffer;
use crate::Adjustments;

/// Render the geometric part of `adjustments` from `source`.
///
/// Only `scale`, `rotation`, `flip_horizontal` and `flip_vertical` are read.
/// Identity geometry returns a copy of the source.
pub fn compose(
    source: &PixelBuffer,
    adjustments: &Adjustments,
    filter: InterpolationFilter,
) -> PixelBuffer {
    let mut base = Cow::Borrowed(source);
    if adjustments.flip_horizontal {
        base = Cow::Owned(flip_horizontal(&base));
    }
    if adjustments.flip_vertical {
        base = Cow::Owned(flip_vertical(&base));
    }

    let rotation = adjustments.rotation.rem_euclid(360);
    if (adjustments.scale == 100 && rotation == 0) || base.is_empty() {
        return base.into_owned();
    }

    let (w, h) = (base.width(), base.height());
    let scale = adjustments.scale.max(1) as f64 / 100.0;
    let (cos, sin) = rotation_trig(rotation as f64);
    let cx = w as f64 / 2.0;
    let cy = h as f64 / 2.0;

    let mut output = PixelBuffer::transparent(w, h);

    for dst_y in 0..h {
        for dst_x in 0..w {
            let dx = (dst_x as f64 + 0.5 - cx) / scale;
            let dy = (dst_y as f64 + 0.5 - cy) / scale;

            let src_x = cx + dx * cos + dy * sin;
            let src_y = cy - dx * sin + dy * cos;

            output.set_pixel(dst_x, dst_y, sample(&base, src_x, src_y, filter));
        }
    }

    output
}
