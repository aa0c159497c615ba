//! Named filters with intensity blending.
//!
//! Per-pixel filters (grayscale, sepia, vintage, cool) scale their effect by
//! an intensity in `0.0..=1.0`. Invert always applies at full strength.
//! The structural filters (blur, sharpen, edge) delegate to
//! [`crate::convolve`] and ignore intensity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::adjustments::to_channel;
use crate::buffer::{PixelBuffer, CHANNELS};
use crate::config::EngineConfig;
use crate::convolve::{box_blur, sharpen, sobel_edges};
use crate::error::EngineError;
use crate::luminance::luma;

/// A filter from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    Grayscale,
    Sepia,
    Invert,
    Vintage,
    Cool,
    Blur,
    Sharpen,
    Edge,
}

impl Filter {
    /// Every filter, in catalog order.
    pub const ALL: [Filter; 8] = [
        Filter::Grayscale,
        Filter::Sepia,
        Filter::Invert,
        Filter::Vintage,
        Filter::Cool,
        Filter::Blur,
        Filter::Sharpen,
        Filter::Edge,
    ];

    /// Catalog name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Filter::Grayscale => "grayscale",
            Filter::Sepia => "sepia",
            Filter::Invert => "invert",
            Filter::Vintage => "vintage",
            Filter::Cool => "cool",
            Filter::Blur => "blur",
            Filter::Sharpen => "sharpen",
            Filter::Edge => "edge",
        }
    }

    /// Whether the intensity argument changes the result.
    pub fn uses_intensity(self) -> bool {
        matches!(
            self,
            Filter::Grayscale | Filter::Sepia | Filter::Vintage | Filter::Cool
        )
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Filter {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Filter::ALL
            .into_iter()
            .find(|filter| filter.name() == s)
            .ok_or_else(|| EngineError::unsupported(format!("unknown filter {:?}", s)))
    }
}

/// A filter applied at a given intensity, as recorded by an edit session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterApplication {
    pub filter: Filter,
    pub intensity: f32,
    /// Box blur pass count; only meaningful for [`Filter::Blur`]. `None`
    /// uses [`EngineConfig::blur_passes`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passes: Option<u32>,
}

impl FilterApplication {
    pub fn new(filter: Filter, intensity: f32) -> Self {
        Self {
            filter,
            intensity,
            passes: None,
        }
    }

    /// A blur with an explicit number of passes.
    pub fn blur(passes: u32) -> Self {
        Self {
            filter: Filter::Blur,
            intensity: 1.0,
            passes: Some(passes),
        }
    }

    /// Apply this recorded filter to `buffer`.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidParameter` for an out-of-range intensity.
    pub fn apply(&self, buffer: &mut PixelBuffer, config: &EngineConfig) -> Result<(), EngineError> {
        validate_intensity(self.intensity)?;
        self.replay(buffer, config);
        Ok(())
    }

    /// Apply without validation, clamping the intensity into `0.0..=1.0`
    /// (NaN counts as zero).
    pub(crate) fn replay(&self, buffer: &mut PixelBuffer, config: &EngineConfig) {
        match (self.filter, self.passes) {
            (Filter::Blur, Some(passes)) => *buffer = box_blur(buffer, passes),
            (filter, _) => {
                let intensity = if self.intensity.is_nan() {
                    0.0
                } else {
                    self.intensity.clamp(0.0, 1.0)
                };
                filter_in_place(buffer, filter, intensity, config);
            }
        }
    }
}

/// Check that `intensity` is a finite value in `0.0..=1.0`.
pub fn validate_intensity(intensity: f32) -> Result<(), EngineError> {
    if !intensity.is_finite() || !(0.0..=1.0).contains(&intensity) {
        return Err(EngineError::invalid(format!(
            "intensity must be within 0.0..=1.0, got {}",
            intensity
        )));
    }
    Ok(())
}

/// Apply `filter` to `buffer` in place.
///
/// # Errors
///
/// Returns `EngineError::InvalidParameter` for an out-of-range intensity,
/// before the buffer is touched. The intensity is validated even for filters
/// that ignore it.
pub fn apply_filter(
    buffer: &mut PixelBuffer,
    filter: Filter,
    intensity: f32,
    config: &EngineConfig,
) -> Result<(), EngineError> {
    validate_intensity(intensity)?;
    filter_in_place(buffer, filter, intensity, config);
    Ok(())
}

/// Apply `filter` with an intensity already known to be within `0.0..=1.0`.
fn filter_in_place(buffer: &mut PixelBuffer, filter: Filter, intensity: f32, config: &EngineConfig) {
    match filter {
        Filter::Grayscale => map_pixels(buffer, |r, g, b| {
            let gray = luma(r, g, b);
            (
                blend(r as f32, gray, intensity),
                blend(g as f32, gray, intensity),
                blend(b as f32, gray, intensity),
            )
        }),
        Filter::Sepia => map_pixels(buffer, |r, g, b| {
            let (rf, gf, bf) = (r as f32, g as f32, b as f32);
            let sr = 0.393 * rf + 0.769 * gf + 0.189 * bf;
            let sg = 0.349 * rf + 0.686 * gf + 0.168 * bf;
            let sb = 0.272 * rf + 0.534 * gf + 0.131 * bf;
            (
                blend(rf, sr, intensity).min(255.0),
                blend(gf, sg, intensity).min(255.0),
                blend(bf, sb, intensity).min(255.0),
            )
        }),
        Filter::Invert => map_pixels(buffer, |r, g, b| {
            ((255 - r) as f32, (255 - g) as f32, (255 - b) as f32)
        }),
        Filter::Vintage => map_pixels(buffer, |r, g, b| {
            (
                r as f32 + 30.0 * intensity,
                g as f32 + 10.0 * intensity,
                b as f32 - 20.0 * intensity,
            )
        }),
        Filter::Cool => map_pixels(buffer, |r, g, b| {
            (
                r as f32 - 20.0 * intensity,
                g as f32 + 10.0 * intensity,
                b as f32 + 20.0 * intensity,
            )
        }),
        Filter::Blur => *buffer = box_blur(buffer, config.blur_passes),
        Filter::Sharpen => *buffer = sharpen(buffer),
        Filter::Edge => *buffer = sobel_edges(buffer),
    }
}

/// `original * (1 - intensity) + filtered * intensity`
#[inline]
fn blend(original: f32, filtered: f32, intensity: f32) -> f32 {
    original * (1.0 - intensity) + filtered * intensity
}

/// Run `f` over every pixel's RGB, storing clamped, rounded results.
fn map_pixels<F>(buffer: &mut PixelBuffer, f: F)
where
    F: Fn(u8, u8, u8) -> (f32, f32, f32),
{
    for chunk in buffer.samples_mut().chunks_exact_mut(CHANNELS) {
        let (r, g, b) = f(chunk[0], chunk[1], chunk[2]);
        chunk[0] = to_channel(r);
        chunk[1] = to_channel(g);
        chunk[2] = to_channel(b);
    }
}
