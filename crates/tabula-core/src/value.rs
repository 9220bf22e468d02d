//! Scalar field values exchanged between a record shape and storage.

use crate::error::ShapeError;

/// A single scalar value, storage-agnostic.
///
/// This is the currency between [`Entity::values`](crate::Entity::values) /
/// [`Entity::from_values`](crate::Entity::from_values) and whatever engine
/// persists the record. The store crate maps it onto the engine's own value
/// representation.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Absent value (unset identity, null column).
    Null,
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit float.
    Real(f64),
    /// UTF-8 text.
    Text(String),
    /// Raw bytes.
    Blob(Vec<u8>),
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<Option<i64>> for FieldValue {
    fn from(v: Option<i64>) -> Self {
        v.map_or(Self::Null, Self::Integer)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<Option<String>> for FieldValue {
    fn from(v: Option<String>) -> Self {
        v.map_or(Self::Null, Self::Text)
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Blob(v)
    }
}

/// Positional decoder over a row of [`FieldValue`]s.
///
/// `Entity::from_values` consumes columns in declaration order; the cursor
/// tracks the position so shape mismatches report the offending column.
pub struct ValueCursor {
    values: std::vec::IntoIter<FieldValue>,
    index: usize,
}

impl ValueCursor {
    /// Wrap a row for positional decoding.
    pub fn new(values: Vec<FieldValue>) -> Self {
        Self {
            values: values.into_iter(),
            index: 0,
        }
    }

    fn next(&mut self) -> Result<FieldValue, ShapeError> {
        let index = self.index;
        self.index += 1;
        self.values
            .next()
            .ok_or(ShapeError::MissingColumn { index })
    }

    fn mismatch(&self, expected: &'static str) -> ShapeError {
        ShapeError::TypeMismatch {
            index: self.index - 1,
            expected,
        }
    }

    /// Decode the next column as a non-null integer.
    pub fn integer(&mut self) -> Result<i64, ShapeError> {
        match self.next()? {
            FieldValue::Integer(v) => Ok(v),
            _ => Err(self.mismatch("integer")),
        }
    }

    /// Decode the next column as a nullable integer.
    pub fn integer_opt(&mut self) -> Result<Option<i64>, ShapeError> {
        match self.next()? {
            FieldValue::Integer(v) => Ok(Some(v)),
            FieldValue::Null => Ok(None),
            _ => Err(self.mismatch("integer")),
        }
    }

    /// Decode the next column as a non-null float.
    ///
    /// Integral values are widened; SQLite hands back an integer for a REAL
    /// column when the stored value has no fractional part.
    pub fn real(&mut self) -> Result<f64, ShapeError> {
        match self.next()? {
            FieldValue::Real(v) => Ok(v),
            FieldValue::Integer(v) => Ok(v as f64),
            _ => Err(self.mismatch("real")),
        }
    }

    /// Decode the next column as non-null text.
    pub fn text(&mut self) -> Result<String, ShapeError> {
        match self.next()? {
            FieldValue::Text(v) => Ok(v),
            _ => Err(self.mismatch("text")),
        }
    }

    /// Decode the next column as nullable text.
    pub fn text_opt(&mut self) -> Result<Option<String>, ShapeError> {
        match self.next()? {
            FieldValue::Text(v) => Ok(Some(v)),
            FieldValue::Null => Ok(None),
            _ => Err(self.mismatch("text")),
        }
    }

    /// Decode the next column as a non-null blob.
    pub fn blob(&mut self) -> Result<Vec<u8>, ShapeError> {
        match self.next()? {
            FieldValue::Blob(v) => Ok(v),
            _ => Err(self.mismatch("blob")),
        }
    }
}
