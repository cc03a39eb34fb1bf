//! Error types for the request store

use thiserror::Error;

use crate::models::ValidationError;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure of a store operation.
///
/// Every variant carries the underlying message; nothing is retried.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Caller-supplied data failed a check; the database was not touched
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A connection could not be obtained, or the health round-trip failed
    #[error("connection error: {0}")]
    Connectivity(#[source] sqlx::Error),

    /// A statement failed after a connection was obtained
    #[error("database error: {0}")]
    Persistence(#[source] sqlx::Error),

    /// Table not bootstrapped, or (strict updates) no row with the id
    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}

impl StoreError {
    /// Short machine-readable tag, used in logs and JSON bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Connectivity(_) => "connectivity_error",
            Self::Persistence(_) => "persistence_error",
            Self::NotFound { .. } => "not_found",
        }
    }
}
