//! Retouch Core - in-memory pixel editing engine
//!
//! This crate provides the pixel transformation engine behind the Retouch
//! editor: color adjustments, convolution filters, geometric transforms and
//! an undo/redo history over RGBA8 buffers. Decoding, encoding, storage and
//! UI concerns live outside this crate; callers hand in a [`PixelBuffer`] and
//! read one back.
//!
//! # Module Structure
//!
//! - `buffer` - The [`PixelBuffer`] container
//! - `adjustments` - Brightness, contrast and hue/saturation
//! - `convolve` - Kernel convolution: box blur, sharpen, Sobel edges
//! - `transform` - Scale/rotate/flip rendering, rotation, resize
//! - `filters` - Named, intensity-blended filters
//! - `history` - Bounded undo/redo stack
//! - `operation` - Operation descriptors and stateless processing
//! - `session` - [`EditSession`], the stateful editing entry point

pub mod adjustments;
pub mod buffer;
pub mod config;
pub mod convolve;
pub mod error;
pub mod filters;
pub mod history;
pub mod luminance;
pub mod operation;
pub mod session;
pub mod transform;

pub use adjustments::apply_adjustments;
pub use buffer::PixelBuffer;
pub use config::EngineConfig;
pub use error::EngineError;
pub use filters::{apply_filter, Filter, FilterApplication};
pub use history::{History, HistoryEntry};
pub use operation::{process, process_batch, BatchOutcome, Operation};
pub use session::EditSession;
pub use transform::{compose, FlipDirection, InterpolationFilter};

use serde::{Deserialize, Serialize};

/// The adjustable quantities of an edit.
///
/// This is cumulative transform state: every render starts from the source
/// buffer and applies the whole struct. It resets to [`Adjustments::default`]
/// whenever a new source image is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Adjustments {
    /// Brightness (-100 to 100)
    pub brightness: i32,
    /// Contrast (-100 to 100)
    pub contrast: i32,
    /// Saturation delta (-100 to 100)
    pub saturation: i32,
    /// Hue shift in degrees (-360 exclusive to 360 inclusive)
    pub hue: i32,
    /// Scale in percent (at least 1)
    pub scale: u32,
    /// Rotation in degrees, kept in 0..360
    pub rotation: i32,
    /// Mirror the source left to right before scaling/rotating
    pub flip_horizontal: bool,
    /// Mirror the source top to bottom before scaling/rotating
    pub flip_vertical: bool,
}

impl Default for Adjustments {
    fn default() -> Self {
        Self {
            brightness: 0,
            contrast: 0,
            saturation: 0,
            hue: 0,
            scale: 100,
            rotation: 0,
            flip_horizontal: false,
            flip_vertical: false,
        }
    }
}

/// Selects a single numeric field of [`Adjustments`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentKind {
    Brightness,
    Contrast,
    Saturation,
    Hue,
    Scale,
    Rotation,
}

impl AdjustmentKind {
    pub fn name(self) -> &'static str {
        match self {
            AdjustmentKind::Brightness => "brightness",
            AdjustmentKind::Contrast => "contrast",
            AdjustmentKind::Saturation => "saturation",
            AdjustmentKind::Hue => "hue",
            AdjustmentKind::Scale => "scale",
            AdjustmentKind::Rotation => "rotation",
        }
    }
}

impl Adjustments {
    /// Create a new Adjustments with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if all values are at their defaults
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// True when any of the per-pixel color adjustments is non-zero.
    pub fn has_color(&self) -> bool {
        self.brightness != 0 || self.contrast != 0 || self.saturation != 0 || self.hue != 0
    }

    /// True when rendering leaves the source geometry untouched.
    pub fn is_identity_geometry(&self) -> bool {
        self.scale == 100
            && self.rotation.rem_euclid(360) == 0
            && !self.flip_horizontal
            && !self.flip_vertical
    }

    /// Set one field after checking it against its domain.
    ///
    /// Rotation accepts any value and is stored reduced to `0..360`.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidParameter` when the value is out of range;
    /// the adjustments are left unchanged in that case.
    pub fn set(&mut self, kind: AdjustmentKind, value: i32) -> Result<(), EngineError> {
        match kind {
            AdjustmentKind::Brightness => self.brightness = check_percent(kind, value)?,
            AdjustmentKind::Contrast => self.contrast = check_percent(kind, value)?,
            AdjustmentKind::Saturation => self.saturation = check_percent(kind, value)?,
            AdjustmentKind::Hue => {
                if value <= -360 || value > 360 {
                    return Err(EngineError::invalid(format!(
                        "hue must be within -359..=360, got {}",
                        value
                    )));
                }
                self.hue = value;
            }
            AdjustmentKind::Scale => {
                if value < 1 {
                    return Err(EngineError::invalid(format!(
                        "scale must be at least 1 percent, got {}",
                        value
                    )));
                }
                self.scale = value as u32;
            }
            AdjustmentKind::Rotation => self.rotation = value.rem_euclid(360),
        }
        Ok(())
    }

    /// Read one field as an `i32`.
    pub fn get(&self, kind: AdjustmentKind) -> i32 {
        match kind {
            AdjustmentKind::Brightness => self.brightness,
            AdjustmentKind::Contrast => self.contrast,
            AdjustmentKind::Saturation => self.saturation,
            AdjustmentKind::Hue => self.hue,
            AdjustmentKind::Scale => self.scale.min(i32::MAX as u32) as i32,
            AdjustmentKind::Rotation => self.rotation,
        }
    }

    /// Add `degrees` to the rotation, wrapping into `0..360`.
    ///
    /// Any stored rotation is accepted, including one assigned directly.
    pub fn rotate_by(&mut self, degrees: i32) {
        self.rotation = (i64::from(self.rotation) + i64::from(degrees)).rem_euclid(360) as i32;
    }

    /// Toggle the mirror flag for `direction`.
    pub fn toggle_flip(&mut self, direction: FlipDirection) {
        match direction {
            FlipDirection::Horizontal => self.flip_horizontal = !self.flip_horizontal,
            FlipDirection::Vertical => self.flip_vertical = !self.flip_vertical,
        }
    }
}

fn check_percent(kind: AdjustmentKind, value: i32) -> Result<i32, EngineError> {
    if !(-100..=100).contains(&value) {
        return Err(EngineError::invalid(format!(
            "{} must be within -100..=100, got {}",
            kind.name(),
            value
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjustments_default() {
        let adj = Adjustments::new();
        assert!(adj.is_default());
        assert!(!adj.has_color());
        assert!(adj.is_identity_geometry());
        assert_eq!(adj.scale, 100);
    }

    #[test]
    fn test_adjustments_not_default() {
        let mut adj = Adjustments::new();
        adj.brightness = 10;
        assert!(!adj.is_default());
        assert!(adj.has_color());
        assert!(adj.is_identity_geometry());
    }

    #[test]
    fn test_set_rejects_out_of_range() {
        let mut adj = Adjustments::new();
        assert!(adj.set(AdjustmentKind::Brightness, 101).is_err());
        assert!(adj.set(AdjustmentKind::Contrast, -101).is_err());
        assert!(adj.set(AdjustmentKind::Saturation, 250).is_err());
        assert!(adj.set(AdjustmentKind::Hue, -360).is_err());
        assert!(adj.set(AdjustmentKind::Hue, 361).is_err());
        assert!(adj.set(AdjustmentKind::Scale, 0).is_err());
        assert!(adj.is_default(), "Rejected values must not be stored");
    }

    #[test]
    fn test_set_accepts_boundaries() {
        let mut adj = Adjustments::new();
        adj.set(AdjustmentKind::Brightness, -100).unwrap();
        adj.set(AdjustmentKind::Contrast, 100).unwrap();
        adj.set(AdjustmentKind::Hue, 360).unwrap();
        adj.set(AdjustmentKind::Scale, 1).unwrap();

        assert_eq!(adj.get(AdjustmentKind::Brightness), -100);
        assert_eq!(adj.get(AdjustmentKind::Contrast), 100);
        assert_eq!(adj.get(AdjustmentKind::Hue), 360);
        assert_eq!(adj.get(AdjustmentKind::Scale), 1);
    }

    #[test]
    fn test_rotation_wraps() {
        let mut adj = Adjustments::new();
        adj.rotate_by(-90);
        assert_eq!(adj.rotation, 270);
        adj.rotate_by(450);
        assert_eq!(adj.rotation, 0);
        assert!(adj.is_identity_geometry());

        adj.set(AdjustmentKind::Rotation, -720 - 45).unwrap();
        assert_eq!(adj.rotation, 315);
    }

    #[test]
    fn test_rotate_by_from_unreduced_rotation() {
        let mut adj = Adjustments::new();
        adj.rotation = i32::MAX;
        adj.rotate_by(10);
        assert_eq!(adj.rotation, 137);

        adj.rotation = i32::MIN;
        adj.rotate_by(-10);
        assert_eq!(adj.rotation, 222);

        adj.rotation = 0;
        adj.rotate_by(i32::MIN);
        assert_eq!(adj.rotation, 232);
    }

    #[test]
    fn test_toggle_flip() {
        let mut adj = Adjustments::new();
        adj.toggle_flip(FlipDirection::Horizontal);
        assert!(adj.flip_horizontal);
        assert!(!adj.is_identity_geometry());
        adj.toggle_flip(FlipDirection::Horizontal);
        assert!(adj.is_identity_geometry());
    }

    #[test]
    fn test_adjustments_deserialize_partial() {
        let adj: Adjustments = serde_json::from_str(r#"{"brightness": 20}"#).unwrap();
        assert_eq!(adj.brightness, 20);
        assert_eq!(adj.scale, 100);
    }
}
