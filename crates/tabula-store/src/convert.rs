//! Mapping between [`FieldValue`] and rusqlite's value types.

use rusqlite::types::{Value, ValueRef};
use rusqlite::Row;
use tabula_core::{Entity, FieldValue};

/// Convert a field value into an owned SQLite value for binding.
pub(crate) fn to_sql(value: FieldValue) -> Value {
    match value {
        FieldValue::Null => Value::Null,
        FieldValue::Integer(v) => Value::Integer(v),
        FieldValue::Real(v) => Value::Real(v),
        FieldValue::Text(v) => Value::Text(v),
        FieldValue::Blob(v) => Value::Blob(v),
    }
}

/// Convert a borrowed SQLite value into a field value.
pub(crate) fn from_sql(value: ValueRef<'_>) -> FieldValue {
    match value {
        ValueRef::Null => FieldValue::Null,
        ValueRef::Integer(v) => FieldValue::Integer(v),
        ValueRef::Real(v) => FieldValue::Real(v),
        ValueRef::Text(v) => FieldValue::Text(String::from_utf8_lossy(v).into_owned()),
        ValueRef::Blob(v) => FieldValue::Blob(v.to_vec()),
    }
}

/// Read one row as the shape's column values, in declaration order.
///
/// The statement must have selected exactly `T::columns()` in order.
pub(crate) fn row_values<T: Entity>(row: &Row<'_>) -> rusqlite::Result<Vec<FieldValue>> {
    (0..T::columns().len())
        .map(|index| row.get_ref(index).map(from_sql))
        .collect()
}
