//! Geometric operations: render-time scale/rotate/flip, rotation onto an
//! expanded canvas, and resizing.
//!
//! # Render Transform
//!
//! [`compose`] re-derives the displayed image from the untouched source every
//! time. Flips are applied to the source first, then, about the buffer's
//! center:
//! 1. Translate to center
//! 2. Scale by `scale / 100`
//! 3. Rotate by `rotation` degrees
//! 4. Translate back
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner, y grows downward
//! - Pixel `(x, y)` covers the square `[x, x+1) x [y, y+1)`; sampling happens
//!   at pixel centers
//! - Positive angles rotate clockwise on screen
//! - Areas not covered by the source are transparent black

mod compose;
mod flip;
mod resize;
mod rotation;
mod sample;

pub use compose::compose;
pub use flip::{flip, flip_horizontal, flip_vertical, FlipDirection};
pub use resize::{resize, Fit};
pub use rotation::{compute_rotated_bounds, rotate_expand};

use serde::{Deserialize, Serialize};

/// Interpolation filter for scale and rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationFilter {
    /// Take the source pixel whose cell contains the mapped point.
    /// Exact for quarter turns, used for deterministic output.
    Nearest,
    /// Weighted average of the four nearest pixel centers.
    #[default]
    Bilinear,
}
