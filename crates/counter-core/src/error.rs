//! Shared error type across counter crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, CounterError>;

/// Rejections produced while parsing and validating request parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Query string could not be decoded.
    #[error("{0}")]
    Malformed(String),
    /// Label does not contain an alphanumeric run.
    #[error("invalid label")]
    InvalidLabel,
}

/// Failures of the remote counter store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Transport-level failure: refused, dropped, timed out.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// The store answered, but rejected the operation.
    #[error("store operation failed: {0}")]
    OperationFailed(String),
}

/// Unified error type used by core and service.
#[derive(Debug, Error)]
pub enum CounterError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("startup failed: {0}")]
    Startup(String),
    #[error("shutdown failed: {0}")]
    Shutdown(String),
}

impl CounterError {
    /// Stable, low-cardinality name of the error, used as a metrics label.
    pub fn kind(&self) -> &'static str {
        match self {
            CounterError::Validation(ValidationError::Malformed(_)) => "malformed",
            CounterError::Validation(ValidationError::InvalidLabel) => "invalid_label",
            CounterError::Store(StoreError::Unavailable(_)) => "store_unavailable",
            CounterError::Store(StoreError::OperationFailed(_)) => "store_failed",
            CounterError::Config(_) => "config",
            CounterError::Startup(_) => "startup",
            CounterError::Shutdown(_) => "shutdown",
        }
    }
}
