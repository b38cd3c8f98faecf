//! Employee store error types.

use thiserror::Error;

/// Errors raised by the employee store.
///
/// Only persistence problems are errors; missing optional columns and
/// alternate value encodings are handled as data, not failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("employee not found: {0}")]
    NotFound(String),

    #[error("required column missing: {0}")]
    MissingColumn(String),
}

/// Convenience alias for store results.
pub type StoreResult<T> = Result<T, StoreError>;
