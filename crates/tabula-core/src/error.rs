//! Error types for shape decoding.

use thiserror::Error;

/// Errors raised when a stored row does not match the declared record shape.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    /// The row ended before the shape was fully decoded.
    #[error("row ended before column {index}")]
    MissingColumn { index: usize },

    /// A column held a value of the wrong storage class.
    #[error("column {index} is not {expected}")]
    TypeMismatch {
        index: usize,
        expected: &'static str,
    },
}
