//! Editor errors.

use crate::text_box::BoxId;
use thiserror::Error;

/// Errors returned by editor operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    /// An operation needing a selected box ran with nothing selected.
    #[error("Select a text box first.")]
    NothingSelected,
    /// The box is not part of the document.
    #[error("Unknown text box: {0}")]
    UnknownBox(BoxId),
}

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;
