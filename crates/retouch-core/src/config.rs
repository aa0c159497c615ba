//! Engine configuration.
//!
//! Callers usually take [`EngineConfig::default`]; the struct derives serde so a
//! host application can embed it in its own settings file.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::transform::InterpolationFilter;

/// Tunables shared by [`crate::EditSession`] and [`crate::process`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of history entries kept per session.
    pub history_limit: usize,
    /// Number of 3x3 box passes the `blur` filter performs.
    pub blur_passes: u32,
    /// Upper bound applied to blur radii from operation descriptors.
    pub max_blur_radius: f32,
    /// Largest accepted scale, in percent.
    pub max_scale: u32,
    /// Sampling used when rendering scale/rotation.
    pub interpolation: InterpolationFilter,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_limit: 50,
            blur_passes: 3,
            max_blur_radius: 50.0,
            max_scale: 500,
            interpolation: InterpolationFilter::Bilinear,
        }
    }
}

impl EngineConfig {
    /// Check that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidParameter` naming the first bad field.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.history_limit == 0 {
            return Err(EngineError::invalid("history_limit must be at least 1"));
        }
        if !self.max_blur_radius.is_finite() || self.max_blur_radius <= 0.0 {
            return Err(EngineError::invalid(format!(
                "max_blur_radius must be positive, got {}",
                self.max_blur_radius
            )));
        }
        if self.max_scale == 0 {
            return Err(EngineError::invalid("max_scale must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.blur_passes, 3);
        assert_eq!(config.interpolation, InterpolationFilter::Bilinear);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"history_limit": 5, "interpolation": "nearest"}"#).unwrap();
        assert_eq!(config.history_limit, 5);
        assert_eq!(config.interpolation, InterpolationFilter::Nearest);
        assert_eq!(config.max_scale, 500);
    }

    #[test]
    fn test_invalid_config() {
        let mut config = EngineConfig::default();
        config.history_limit = 0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.max_blur_radius = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.max_scale = 0;
        assert!(config.validate().is_err());
    }
}
