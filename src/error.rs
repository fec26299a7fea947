//! Error types for store operations and persistence.

use thiserror::Error;

use crate::task::TaskId;

/// A caller-supplied draft or patch failed field constraints.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("task text cannot be empty")]
    EmptyText,
}

/// Errors reported by the collection store's mutating operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("task {0} not found")]
    NotFound(TaskId),
}

/// The storage medium failed to save, or held data that does not decode
/// into a valid collection.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode tasks: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("stored tasks are not valid JSON records: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("stored tasks are invalid: {0}")]
    Invalid(String),
}
