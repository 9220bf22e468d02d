//! The record shape contract.
//!
//! An [`Entity`] describes one persisted record kind: its table name, its
//! columns, which column is the identity, and how a record converts to and
//! from a positional row of [`FieldValue`]s. Everything is declared
//! statically; there is no runtime type introspection.

use std::fmt;

use crate::error::ShapeError;
use crate::value::FieldValue;

/// Storage class of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Real,
    Text,
    Blob,
}

impl FieldKind {
    /// The SQL type name for this storage class.
    pub fn sql_type(self) -> &'static str {
        match self {
            FieldKind::Integer => "INTEGER",
            FieldKind::Real => "REAL",
            FieldKind::Text => "TEXT",
            FieldKind::Blob => "BLOB",
        }
    }
}

/// One column of a record shape.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    /// Column name as it appears in the table.
    pub name: &'static str,
    /// Storage class.
    pub kind: FieldKind,
    /// Whether this column is the identity (primary key).
    pub primary_key: bool,
    /// Whether storage assigns the identity on insert.
    ///
    /// Only meaningful on the identity column, and only for integer keys.
    pub auto_increment: bool,
}

impl ColumnSpec {
    /// A plain data column.
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            primary_key: false,
            auto_increment: false,
        }
    }

    /// A caller-assigned identity column.
    pub const fn identity(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            primary_key: true,
            auto_increment: false,
        }
    }

    /// A storage-assigned integer identity column.
    pub const fn auto_identity(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Integer,
            primary_key: true,
            auto_increment: true,
        }
    }
}

/// A value usable as a record identity.
///
/// The `Display` form is the key's textual representation, used when a key
/// set is reported in logs or errors. `from_rowid` converts the engine's
/// rowid into a key for auto-assigned identities; key types that cannot be
/// auto-assigned return `None`.
pub trait KeyValue: Clone + PartialEq + Send + Sync + fmt::Display + 'static {
    /// The key as a scalar field value, for binding into queries.
    fn to_field(&self) -> FieldValue;

    /// Build a key from a storage-assigned rowid, if this key type supports
    /// auto-assignment.
    fn from_rowid(rowid: i64) -> Option<Self>;
}

impl KeyValue for i64 {
    fn to_field(&self) -> FieldValue {
        FieldValue::Integer(*self)
    }

    fn from_rowid(rowid: i64) -> Option<Self> {
        Some(rowid)
    }
}

impl KeyValue for String {
    fn to_field(&self) -> FieldValue {
        FieldValue::Text(self.clone())
    }

    fn from_rowid(_rowid: i64) -> Option<Self> {
        None
    }
}

/// Descriptor for one writable string field of a record.
///
/// Drives [`trim_strings`](crate::normalize::trim_strings): fields marked
/// `exempt` are left alone by normalization.
pub struct StringField<T> {
    /// Field name, for diagnostics.
    pub name: &'static str,
    /// Read the current value.
    pub get: fn(&T) -> Option<&str>,
    /// Replace the value.
    pub set: fn(&mut T, String),
    /// Excluded from normalization.
    pub exempt: bool,
}

/// A record shape: the contract between a record type and the repository.
///
/// Invariants:
/// - exactly one column in [`columns`](Entity::columns) has `primary_key`
///   set;
/// - [`values`](Entity::values) yields one [`FieldValue`] per declared
///   column, in declaration order, with `Null` for an unset identity;
/// - [`from_values`](Entity::from_values) consumes a row in the same order.
///
/// A record whose [`key`](Entity::key) is `None` has not been persisted yet.
pub trait Entity: Clone + Send + Sync + 'static {
    /// The identity type.
    type Key: KeyValue;

    /// Table name for this shape.
    fn table() -> &'static str;

    /// Column descriptors, in declaration order.
    fn columns() -> &'static [ColumnSpec];

    /// Writable string fields, for normalization. Empty by default.
    fn string_fields() -> &'static [StringField<Self>] {
        &[]
    }

    /// The identity, if assigned.
    fn key(&self) -> Option<Self::Key>;

    /// Assign the identity (used to copy back a storage-assigned key).
    fn set_key(&mut self, key: Self::Key);

    /// Encode the record as one value per declared column.
    fn values(&self) -> Vec<FieldValue>;

    /// Decode a record from one value per declared column.
    fn from_values(values: Vec<FieldValue>) -> Result<Self, ShapeError>;

    /// The identity column descriptor.
    ///
    /// Panics if the shape declares no identity column, which violates the
    /// trait contract.
    fn key_column() -> &'static ColumnSpec {
        Self::columns()
            .iter()
            .find(|c| c.primary_key)
            .expect("record shape declares no identity column")
    }
}
