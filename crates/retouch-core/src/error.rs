//! Error types for engine operations.

use thiserror::Error;

/// Error types for pixel engine operations.
///
/// Every operation validates its inputs before touching a buffer, so an
/// `Err` always means nothing was mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A required parameter is missing or outside its declared domain.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The operation or filter name is not recognized, or the operation
    /// belongs to a collaborator (encoding, compositing) rather than the engine.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Sample data does not match the declared dimensions.
    #[error("Pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch {
        /// `width * height * 4`
        expected: usize,
        /// Length of the sample data that was supplied.
        actual: usize,
    },
}

impl EngineError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        EngineError::InvalidParameter(message.into())
    }

    pub(crate) fn unsupported(message: impl Into<String>) -> Self {
        EngineError::UnsupportedOperation(message.into())
    }
}
