//! Operation descriptors and stateless processing.
//!
//! An [`Operation`] is the wire form of a single edit:
//!
//! ```json
//! { "kind": "resize", "parameters": { "width": 800, "height": 600, "fit": "inside" } }
//! ```
//!
//! [`process`] applies one to a buffer with no session state, the way a batch
//! worker would. [`crate::EditSession::apply`] gives the same descriptors
//! editor semantics (accumulated rotation, undoable history).
//!
//! Required parameters are modelled as `Option` so that a missing field is
//! reported as [`EngineError::InvalidParameter`] rather than a parse error.

use std::fmt;

use rayon::prelude::*;
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

use crate::adjustments::apply_adjustments;
use crate::buffer::PixelBuffer;
use crate::config::EngineConfig;
use crate::convolve::box_blur;
use crate::error::EngineError;
use crate::filters::{apply_filter, Filter};
use crate::transform::{compose, flip, resize, rotate_expand, Fit, FlipDirection};
use crate::{AdjustmentKind, Adjustments};

/// One edit, tagged by `kind` with its `parameters`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "parameters", rename_all = "lowercase")]
pub enum Operation {
    Resize(ResizeParams),
    Blur(BlurParams),
    Grayscale(IntensityParams),
    Compress(CompressParams),
    Rotate(RotateParams),
    Watermark(WatermarkParams),
    Brightness(ValueParams),
    Contrast(ValueParams),
    Saturation(ValueParams),
    Hue(ValueParams),
    Scale(ValueParams),
    Flip(FlipParams),
    Invert(NoParams),
    Sepia(IntensityParams),
    Vintage(IntensityParams),
    Cool(IntensityParams),
    Sharpen(NoParams),
    Edge(NoParams),
}

/// Parameters of a kind that takes none.
///
/// Accepts an object (its keys are ignored), `null`, or a missing
/// `parameters` field. Serializes as `{}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct NoParams {}

impl<'de> Deserialize<'de> for NoParams {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NoParamsVisitor;

        impl<'de> Visitor<'de> for NoParamsVisitor {
            type Value = NoParams;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an empty parameter object or null")
            }

            fn visit_none<E: de::Error>(self) -> Result<NoParams, E> {
                Ok(NoParams {})
            }

            fn visit_unit<E: de::Error>(self) -> Result<NoParams, E> {
                Ok(NoParams {})
            }

            fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<NoParams, D::Error> {
                deserializer.deserialize_map(self)
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<NoParams, A::Error> {
                while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
                Ok(NoParams {})
            }
        }

        deserializer.deserialize_option(NoParamsVisitor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeParams {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fit: Fit,
}

impl ResizeParams {
    /// The requested `(width, height)`, both required and non-zero.
    pub fn dimensions(&self) -> Result<(u32, u32), EngineError> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Ok((w, h)),
            _ => Err(EngineError::invalid(
                "width and height are required for resize",
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurParams {
    pub radius: f32,
}

impl Default for BlurParams {
    fn default() -> Self {
        Self { radius: 5.0 }
    }
}

impl BlurParams {
    /// Box blur passes for this radius: `ceil(min(radius, max_blur_radius))`.
    pub fn passes(&self, config: &EngineConfig) -> Result<u32, EngineError> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(EngineError::invalid(format!(
                "blur radius must be positive, got {}",
                self.radius
            )));
        }
        Ok(self.radius.min(config.max_blur_radius).ceil() as u32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntensityParams {
    pub intensity: f32,
}

impl Default for IntensityParams {
    fn default() -> Self {
        Self { intensity: 1.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressParams {
    pub quality: u32,
    pub format: String,
}

impl Default for CompressParams {
    fn default() -> Self {
        Self {
            quality: 80,
            format: "jpeg".to_string(),
        }
    }
}

impl CompressParams {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.quality == 0 {
            return Err(EngineError::invalid("compress quality must be at least 1"));
        }
        if !matches!(self.format.as_str(), "jpeg" | "webp") {
            return Err(EngineError::invalid(format!(
                "compress format must be jpeg or webp, got {:?}",
                self.format
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotateParams {
    pub angle: f64,
}

impl Default for RotateParams {
    fn default() -> Self {
        Self { angle: 90.0 }
    }
}

impl RotateParams {
    /// The angle reduced to `0..360`.
    pub fn degrees(&self) -> Result<f64, EngineError> {
        if !self.angle.is_finite() {
            return Err(EngineError::invalid(format!(
                "rotation angle must be finite, got {}",
                self.angle
            )));
        }
        Ok(self.angle.rem_euclid(360.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkParams {
    pub opacity: f32,
}

impl Default for WatermarkParams {
    fn default() -> Self {
        Self { opacity: 0.5 }
    }
}

impl WatermarkParams {
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.opacity.is_finite() || self.opacity < 0.0 {
            return Err(EngineError::invalid(format!(
                "watermark opacity must be non-negative, got {}",
                self.opacity
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueParams {
    pub value: Option<i32>,
}

impl ValueParams {
    pub fn new(value: i32) -> Self {
        Self { value: Some(value) }
    }

    pub fn value(&self, kind: AdjustmentKind) -> Result<i32, EngineError> {
        self.value
            .ok_or_else(|| EngineError::invalid(format!("{} requires a value", kind.name())))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlipParams {
    pub direction: Option<FlipDirection>,
}

impl FlipParams {
    pub fn direction(&self) -> Result<FlipDirection, EngineError> {
        self.direction
            .ok_or_else(|| EngineError::invalid("flip requires a direction"))
    }
}

impl Operation {
    /// The descriptor's `kind` string.
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::Resize(_) => "resize",
            Operation::Blur(_) => "blur",
            Operation::Grayscale(_) => "grayscale",
            Operation::Compress(_) => "compress",
            Operation::Rotate(_) => "rotate",
            Operation::Watermark(_) => "watermark",
            Operation::Brightness(_) => "brightness",
            Operation::Contrast(_) => "contrast",
            Operation::Saturation(_) => "saturation",
            Operation::Hue(_) => "hue",
            Operation::Scale(_) => "scale",
            Operation::Flip(_) => "flip",
            Operation::Invert(_) => "invert",
            Operation::Sepia(_) => "sepia",
            Operation::Vintage(_) => "vintage",
            Operation::Cool(_) => "cool",
            Operation::Sharpen(_) => "sharpen",
            Operation::Edge(_) => "edge",
        }
    }

    /// The adjustment a value-carrying kind sets, with its parameters.
    pub fn adjustment(&self) -> Option<(AdjustmentKind, &ValueParams)> {
        match self {
            Operation::Brightness(p) => Some((AdjustmentKind::Brightness, p)),
            Operation::Contrast(p) => Some((AdjustmentKind::Contrast, p)),
            Operation::Saturation(p) => Some((AdjustmentKind::Saturation, p)),
            Operation::Hue(p) => Some((AdjustmentKind::Hue, p)),
            Operation::Scale(p) => Some((AdjustmentKind::Scale, p)),
            _ => None,
        }
    }

    /// The catalog filter and intensity for filter kinds other than blur.
    pub fn filter(&self) -> Option<(Filter, f32)> {
        match self {
            Operation::Grayscale(p) => Some((Filter::Grayscale, p.intensity)),
            Operation::Sepia(p) => Some((Filter::Sepia, p.intensity)),
            Operation::Vintage(p) => Some((Filter::Vintage, p.intensity)),
            Operation::Cool(p) => Some((Filter::Cool, p.intensity)),
            Operation::Invert(_) => Some((Filter::Invert, 1.0)),
            Operation::Sharpen(_) => Some((Filter::Sharpen, 1.0)),
            Operation::Edge(_) => Some((Filter::Edge, 1.0)),
            _ => None,
        }
    }

    /// Validate a kind that belongs to an encoder or compositor, then refuse it.
    pub(crate) fn reject_collaborator(&self) -> Result<(), EngineError> {
        match self {
            Operation::Compress(p) => p.validate()?,
            Operation::Watermark(p) => p.validate()?,
            _ => return Ok(()),
        }
        Err(EngineError::unsupported(format!(
            "{} is handled outside the pixel engine",
            self.kind()
        )))
    }
}

/// Apply `operation` to `buffer` with no surrounding session.
///
/// Color kinds apply a one-shot adjustment with every other field at its
/// default. `rotate` grows the canvas to fit; `scale` keeps the canvas size.
///
/// # Errors
///
/// `InvalidParameter` for missing or out-of-range parameters and
/// `UnsupportedOperation` for `compress` and `watermark`. The input buffer
/// is consumed either way.
pub fn process(
    buffer: PixelBuffer,
    operation: &Operation,
    config: &EngineConfig,
) -> Result<PixelBuffer, EngineError> {
    tracing::trace!(
        target: "retouch_core::operation",
        kind = operation.kind(),
        width = buffer.width(),
        height = buffer.height(),
        "processing operation"
    );

    operation.reject_collaborator()?;

    if let Some((kind, params)) = operation.adjustment() {
        let value = params.value(kind)?;
        if kind == AdjustmentKind::Scale && value > config.max_scale as i32 {
            return Err(EngineError::invalid(format!(
                "scale must be at most {} percent, got {}",
                config.max_scale, value
            )));
        }
        let mut adjustments = Adjustments::default();
        adjustments.set(kind, value)?;
        return Ok(if kind == AdjustmentKind::Scale {
            compose(&buffer, &adjustments, config.interpolation)
        } else {
            let mut buffer = buffer;
            apply_adjustments(&mut buffer, &adjustments);
            buffer
        });
    }

    if let Some((filter, intensity)) = operation.filter() {
        let mut buffer = buffer;
        apply_filter(&mut buffer, filter, intensity, config)?;
        return Ok(buffer);
    }

    match operation {
        Operation::Resize(params) => {
            let (width, height) = params.dimensions()?;
            resize(&buffer, width, height, params.fit)
        }
        Operation::Blur(params) => Ok(box_blur(&buffer, params.passes(config)?)),
        Operation::Rotate(params) => {
            Ok(rotate_expand(&buffer, params.degrees()?, config.interpolation))
        }
        Operation::Flip(params) => Ok(flip(&buffer, params.direction()?)),
        other => Err(EngineError::unsupported(other.kind())),
    }
}

/// Result of one operation on one image of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    /// Index of the image in the input slice.
    pub image: usize,
    /// The operation's `kind`.
    pub kind: &'static str,
    pub result: Result<PixelBuffer, EngineError>,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Apply every operation independently to every image.
///
/// Failures are recorded in their outcome and never stop the batch.
/// Outcomes are ordered by image, then by operation.
pub fn process_batch(
    images: &[PixelBuffer],
    operations: &[Operation],
    config: &EngineConfig,
) -> Vec<BatchOutcome> {
    let outcomes: Vec<BatchOutcome> = images
        .par_iter()
        .enumerate()
        .flat_map_iter(|(index, image)| {
            operations.iter().map(move |operation| BatchOutcome {
                image: index,
                kind: operation.kind(),
                result: process(image.clone(), operation, config),
            })
        })
        .collect();

    let failed = outcomes.iter().filter(|o| !o.is_success()).count();
    tracing::debug!(
        target: "retouch_core::operation",
        images = images.len(),
        operations = operations.len(),
        failed,
        "batch processed"
    );
    if failed > 0 {
        tracing::warn!(target: "retouch_core::operation", "{} batch operations failed", failed);
    }

    outcomes
}
