//! Error types for folio-canvas.

use thiserror::Error;

/// Result type alias using CanvasError.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors raised by the geometry kernel and canvas backends.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Attempted to invert a transform whose determinant is zero.
    #[error("Transform is not invertible (determinant {determinant})")]
    NonInvertibleTransform { determinant: f64 },

    /// `restore` was called without a matching `save`.
    ///
    /// This is a programming-contract failure, never a data problem.
    #[error("Graphics state stack underflow: expected depth {expected}, found {actual}")]
    StackUnderflow { expected: usize, actual: usize },

    /// Handle locations and on-curve flags differ in length.
    #[error("Malformed handle data: {locations} locations but {flags} on-curve flags")]
    MalformedHandles { locations: usize, flags: usize },

    /// Invalid canvas dimensions (must be positive and within limits).
    #[error("Invalid dimensions: width={width}, height={height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Failed to parse color value.
    #[error("Failed to parse color: {0}")]
    ColorParseError(String),

    /// Invalid gradient stop offset (must be 0.0-1.0).
    #[error("Invalid gradient stop offset: {0} (must be 0.0-1.0)")]
    InvalidGradientStop(f64),

    /// Failed to parse CSS font string.
    #[error("Failed to parse font string: {0}")]
    FontParseError(String),

    /// Unrecognized keyword or out-of-range argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Path construction error (e.g. malformed SVG path data).
    #[error("Path error: {0}")]
    PathError(String),

    /// Field declaration rejected during validation.
    #[error("Field error: {0}")]
    FieldError(String),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngError(String),
}

impl From<png::EncodingError> for CanvasError {
    fn from(err: png::EncodingError) -> Self {
        CanvasError::PngError(err.to_string())
    }
}
