//! Store error taxonomy
//!
//! User-facing operations (list / mark-read / delete) propagate these so the
//! API layer can map them to response codes. Background fan-out never
//! propagates them; the engine logs and moves on.

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Malformed notification fields
    #[error("validation failed: {0}")]
    Validation(String),

    /// No notification with the given id
    #[error("notification not found")]
    NotFound,

    /// The notification belongs to another user
    #[error("no permission to modify this notification")]
    Forbidden,

    /// Underlying storage failure
    #[error("persistence failure: {0}")]
    Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Persistence(err.into())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Persistence(err.into())
    }
}
