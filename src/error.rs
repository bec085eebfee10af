//! Error types for progress queries.

use thiserror::Error;

/// Coarse failure category, for mapping onto a boundary status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    Unavailable,
}

/// Errors returned by the PR and volume queries.
#[derive(Debug, Error)]
pub enum ProgressError {
    /// Query parameters rejected before any aggregation
    #[error("{0}")]
    BadRequest(String),

    /// The day-record source failed; passed through as-is
    #[error(transparent)]
    Unavailable(#[from] anyhow::Error),
}

impl ProgressError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProgressError::BadRequest(_) => ErrorKind::BadRequest,
            ProgressError::Unavailable(_) => ErrorKind::Unavailable,
        }
    }
}
