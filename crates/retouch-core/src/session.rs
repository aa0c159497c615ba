//! Stateful editing over a single source image.
//!
//! An [`EditSession`] owns the source, the current [`Adjustments`], the list
//! of filters applied so far and a [`History`]. Geometric and color edits
//! re-render from the untouched source:
//!
//! ```text
//! source -> compose (flip, scale, rotate) -> apply_adjustments -> filters
//! ```
//!
//! Filters layer on top of the render and are replayed whenever it is
//! redone, so changing an adjustment keeps earlier filters. Every successful
//! edit commits one history entry. A rejected edit returns its error before
//! any state changes and commits nothing.

use std::sync::Arc;

use crate::adjustments::apply_adjustments;
use crate::buffer::PixelBuffer;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::filters::{validate_intensity, Filter, FilterApplication};
use crate::history::{History, HistoryEntry};
use crate::operation::Operation;
use crate::transform::{compose, resize, FlipDirection};
use crate::{AdjustmentKind, Adjustments};

/// An editing session.
#[derive(Debug, Clone)]
pub struct EditSession {
    source: Arc<PixelBuffer>,
    current: PixelBuffer,
    adjustments: Adjustments,
    filters: Vec<FilterApplication>,
    history: History,
    config: EngineConfig,
}

impl EditSession {
    /// Start a session on `source` with the default configuration.
    pub fn new(source: PixelBuffer) -> Self {
        Self::start(source, EngineConfig::default())
    }

    /// Start a session on `source` with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidParameter` if `config` fails
    /// [`EngineConfig::validate`].
    pub fn with_config(source: PixelBuffer, config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self::start(source, config))
    }

    fn start(source: PixelBuffer, config: EngineConfig) -> Self {
        // Identity adjustments and no filters: the render is the source itself.
        let current = source.clone();
        let mut session = Self {
            source: Arc::new(source),
            current,
            adjustments: Adjustments::default(),
            filters: Vec::new(),
            history: History::new(config.history_limit),
            config,
        };
        session.commit("load");
        session
    }

    /// Replace the source image, dropping all edits and history.
    pub fn load(&mut self, source: PixelBuffer) {
        self.source = Arc::new(source);
        self.restart("load");
    }

    /// Discard all edits and history, keeping the current source.
    pub fn reset(&mut self) {
        self.restart("reset");
    }

    fn restart(&mut self, action: &'static str) {
        self.adjustments = Adjustments::default();
        self.filters.clear();
        self.current = (*self.source).clone();
        self.history.clear();
        self.commit(action);
    }

    /// Set one adjustment and re-render.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidParameter` if `value` is outside the
    /// adjustment's domain, or a scale exceeds `config.max_scale`.
    pub fn set_adjustment(&mut self, kind: AdjustmentKind, value: i32) -> Result<(), EngineError> {
        let result = self.try_set_adjustment(kind, value);
        self.log_rejection(kind.name(), result)
    }

    fn try_set_adjustment(&mut self, kind: AdjustmentKind, value: i32) -> Result<(), EngineError> {
        if kind == AdjustmentKind::Scale && value > 0 && value as u32 > self.config.max_scale {
            return Err(EngineError::invalid(format!(
                "scale must be at most {} percent, got {}",
                self.config.max_scale, value
            )));
        }
        let mut adjustments = self.adjustments;
        adjustments.set(kind, value)?;
        self.rerender(Arc::clone(&self.source), adjustments, kind.name());
        Ok(())
    }

    /// Add `degrees` to the rotation (positive is clockwise) and re-render.
    pub fn rotate(&mut self, degrees: i32) {
        let mut adjustments = self.adjustments;
        adjustments.rotate_by(degrees);
        self.rerender(Arc::clone(&self.source), adjustments, "rotate");
    }

    /// Set the scale in percent and re-render.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidParameter` for zero or a value above
    /// `config.max_scale`.
    pub fn set_scale(&mut self, percent: u32) -> Result<(), EngineError> {
        let value = i32::try_from(percent).unwrap_or(i32::MAX);
        self.set_adjustment(AdjustmentKind::Scale, value)
    }

    /// Toggle mirroring across `direction` and re-render.
    ///
    /// Flips are part of the transform state, so flipping twice restores the
    /// previous render exactly.
    pub fn flip(&mut self, direction: FlipDirection) {
        let mut adjustments = self.adjustments;
        adjustments.toggle_flip(direction);
        self.rerender(Arc::clone(&self.source), adjustments, "flip");
    }

    /// Apply `filter` to the current buffer and record it.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidParameter` for an intensity outside
    /// `0.0..=1.0`.
    pub fn apply_filter(&mut self, filter: Filter, intensity: f32) -> Result<(), EngineError> {
        let result = validate_intensity(intensity)
            .and_then(|()| self.push_filter(FilterApplication::new(filter, intensity)));
        self.log_rejection(filter.name(), result)
    }

    /// Apply a filter by catalog name.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::UnsupportedOperation` for an unknown name, and
    /// the errors of [`EditSession::apply_filter`].
    pub fn apply_filter_named(&mut self, name: &str, intensity: f32) -> Result<(), EngineError> {
        let filter = self.log_rejection(name, name.parse::<Filter>())?;
        self.apply_filter(filter, intensity)
    }

    fn push_filter(&mut self, application: FilterApplication) -> Result<(), EngineError> {
        let mut buffer = self.current.clone();
        application.apply(&mut buffer, &self.config)?;
        self.current = buffer;
        self.filters.push(application);
        self.commit(application.filter.name());
        Ok(())
    }

    /// Apply an operation descriptor with editor semantics.
    ///
    /// Unlike [`crate::process`], `rotate` accumulates into the rotation
    /// (rounded to whole degrees) and keeps the canvas size, and `resize`
    /// replaces the source so that later edits render from the resized
    /// image. `compress` and `watermark` are refused.
    pub fn apply(&mut self, operation: &Operation) -> Result<(), EngineError> {
        let result = self.try_apply(operation);
        self.log_rejection(operation.kind(), result)
    }

    fn try_apply(&mut self, operation: &Operation) -> Result<(), EngineError> {
        operation.reject_collaborator()?;

        if let Some((kind, params)) = operation.adjustment() {
            return self.try_set_adjustment(kind, params.value(kind)?);
        }
        if let Some((filter, intensity)) = operation.filter() {
            validate_intensity(intensity)?;
            return self.push_filter(FilterApplication::new(filter, intensity));
        }

        match operation {
            Operation::Resize(params) => {
                let (width, height) = params.dimensions()?;
                let resized = resize(&self.source, width, height, params.fit)?;
                self.rerender(Arc::new(resized), self.adjustments, "resize");
                Ok(())
            }
            Operation::Blur(params) => {
                let passes = params.passes(&self.config)?;
                self.push_filter(FilterApplication::blur(passes))
            }
            Operation::Rotate(params) => {
                let degrees = params.degrees()?.round() as i32;
                let mut adjustments = self.adjustments;
                adjustments.rotate_by(degrees);
                self.rerender(Arc::clone(&self.source), adjustments, "rotate");
                Ok(())
            }
            Operation::Flip(params) => {
                let mut adjustments = self.adjustments;
                adjustments.toggle_flip(params.direction()?);
                self.rerender(Arc::clone(&self.source), adjustments, "flip");
                Ok(())
            }
            other => Err(EngineError::unsupported(other.kind())),
        }
    }

    /// Step back one edit. Returns `false` if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.history.undo().cloned() else {
            return false;
        };
        self.restore(entry);
        tracing::debug!(
            target: "retouch_core::session",
            cursor = self.history.cursor(),
            len = self.history.len(),
            "undo"
        );
        true
    }

    /// Re-apply the last undone edit. Returns `false` if there is none.
    pub fn redo(&mut self) -> bool {
        let Some(entry) = self.history.redo().cloned() else {
            return false;
        };
        self.restore(entry);
        tracing::debug!(
            target: "retouch_core::session",
            cursor = self.history.cursor(),
            len = self.history.len(),
            "redo"
        );
        true
    }

    fn restore(&mut self, entry: HistoryEntry) {
        self.current = entry.buffer;
        self.adjustments = entry.adjustments;
        self.filters = entry.filters;
        self.source = entry.source;
    }

    /// Render `source` with `adjustments` and replay the recorded filters,
    /// then commit. Callers validate everything beforehand; the recorded
    /// filters were validated when they were pushed.
    fn rerender(&mut self, source: Arc<PixelBuffer>, adjustments: Adjustments, action: &'static str) {
        let mut buffer = compose(&source, &adjustments, self.config.interpolation);
        apply_adjustments(&mut buffer, &adjustments);
        for application in &self.filters {
            application.replay(&mut buffer, &self.config);
        }

        self.source = source;
        self.adjustments = adjustments;
        self.current = buffer;
        self.commit(action);
    }

    fn commit(&mut self, action: &'static str) {
        self.history.commit(HistoryEntry {
            buffer: self.current.clone(),
            adjustments: self.adjustments,
            filters: self.filters.clone(),
            source: Arc::clone(&self.source),
        });
        tracing::debug!(
            target: "retouch_core::session",
            action,
            width = self.current.width(),
            height = self.current.height(),
            history = self.history.len(),
            "committed edit"
        );
    }

    fn log_rejection<T>(&self, action: &str, result: Result<T, EngineError>) -> Result<T, EngineError> {
        if let Err(e) = &result {
            tracing::warn!(target: "retouch_core::session", "Rejected {}: {}", action, e);
        }
        result
    }

    /// The rendered buffer.
    pub fn current(&self) -> &PixelBuffer {
        &self.current
    }

    /// Consume the session, returning the rendered buffer.
    pub fn into_current(self) -> PixelBuffer {
        self.current
    }

    /// The image renders start from.
    pub fn source(&self) -> &PixelBuffer {
        &self.source
    }

    pub fn adjustments(&self) -> &Adjustments {
        &self.adjustments
    }

    /// Filters applied on top of the render, oldest first.
    pub fn filters(&self) -> &[FilterApplication] {
        &self.filters
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
}
