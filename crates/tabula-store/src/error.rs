//! Error types for the store.

use thiserror::Error;

/// Errors that can occur during store operations.
///
/// Storage-engine faults travel unmodified inside [`Database`]; the store
/// neither retries nor translates them. Absence of a record is never an
/// error — lookups return `None`, empty lists, or zero rows affected.
///
/// [`Database`]: StoreError::Database
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored row does not decode into the declared record shape.
    #[error("shape error: {0}")]
    Shape(#[from] tabula_core::ShapeError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record with the same identity already exists.
    #[error("duplicate identity: {0}")]
    DuplicateKey(String),

    /// The connection mutex was poisoned by a panicking task.
    #[error("connection mutex poisoned")]
    Poisoned,

    /// The blocking task running the operation failed to complete.
    #[error("blocking task failed: {0}")]
    Runtime(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
