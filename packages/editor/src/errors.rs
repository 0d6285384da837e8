//! Error types for the editor

use formcraft_blocks::{DeserializeError, ValidationError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    /// The stored document cannot be turned into a tree. Fatal for the
    /// session, unlike [`EditorError::Io`].
    #[error("Invalid document: {0}")]
    Deserialize(#[from] DeserializeError),

    #[error("Cannot write document: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Document is not file-backed")]
    NotFileBacked,

    #[error("Document is published and read-only")]
    ReadOnly,

    #[error("Edit session is closed")]
    SessionClosed,

    #[error("Generation failed: {0}")]
    Generation(String),
}
