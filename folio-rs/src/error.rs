//! Error types for folio-rs.

use folio_canvas::CanvasError;
use thiserror::Error;

/// Result type alias using RenderError.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors raised while reading or drawing a document.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Geometry, paint or state error from the canvas layer.
    #[error(transparent)]
    Canvas(#[from] CanvasError),

    /// An element whose geometry can not be drawn.
    #[error("Invalid element {id}: {reason}")]
    InvalidElement { id: String, reason: String },

    /// The document is not valid JSON or does not match the element model.
    #[error("Invalid document: {0}")]
    Json(#[from] serde_json::Error),
}

impl RenderError {
    pub(crate) fn invalid(id: &str, reason: impl Into<String>) -> Self {
        RenderError::InvalidElement {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}
