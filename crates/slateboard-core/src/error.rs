//! Error types for the board core.

use thiserror::Error;

/// Errors surfaced to callers. Only document import can fail; everything
/// else in the core either succeeds or is silently ignored.
#[derive(Debug, Error)]
pub enum BoardError {
    /// Unparseable JSON or a structurally invalid document.
    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// An object record carried a `type` tag this version does not know.
    #[error("unknown object type `{0}`")]
    UnknownVariant(String),

    /// An object record without a `type` tag.
    #[error("object record missing `type` tag")]
    MissingTag,
}
