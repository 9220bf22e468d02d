//! Test fixtures and helpers.
//!
//! Common setup code for repository tests.

use tabula_core::{
    ColumnSpec, Entity, FieldKind, FieldValue, ShapeError, StringField, ValueCursor,
};
use tabula_store::{MemoryRepository, SqliteRepository, StorageOptions};

/// A sample record shape for tests.
///
/// Covers every shape feature: a storage-assigned identity, integer fields,
/// a normalized string field (`summary`), and a string field exempt from
/// normalization (`station_tag`).
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub id: Option<i64>,
    /// Measurement time, Unix milliseconds.
    pub recorded_at_ms: i64,
    pub temperature_c: i64,
    pub summary: Option<String>,
    /// Operator-assigned tag, stored verbatim.
    pub station_tag: Option<String>,
}

fn reading_summary(r: &Reading) -> Option<&str> {
    r.summary.as_deref()
}

fn set_reading_summary(r: &mut Reading, v: String) {
    r.summary = Some(v);
}

fn reading_station_tag(r: &Reading) -> Option<&str> {
    r.station_tag.as_deref()
}

fn set_reading_station_tag(r: &mut Reading, v: String) {
    r.station_tag = Some(v);
}

impl Entity for Reading {
    type Key = i64;

    fn table() -> &'static str {
        "reading"
    }

    fn columns() -> &'static [ColumnSpec] {
        const COLUMNS: &[ColumnSpec] = &[
            ColumnSpec::auto_identity("id"),
            ColumnSpec::new("recorded_at_ms", FieldKind::Integer),
            ColumnSpec::new("temperature_c", FieldKind::Integer),
            ColumnSpec::new("summary", FieldKind::Text),
            ColumnSpec::new("station_tag", FieldKind::Text),
        ];
        COLUMNS
    }

    fn string_fields() -> &'static [StringField<Self>] {
        const FIELDS: &[StringField<Reading>] = &[
            StringField {
                name: "summary",
                get: reading_summary,
                set: set_reading_summary,
                exempt: false,
            },
            StringField {
                name: "station_tag",
                get: reading_station_tag,
                set: set_reading_station_tag,
                exempt: true,
            },
        ];
        FIELDS
    }

    fn key(&self) -> Option<i64> {
        self.id
    }

    fn set_key(&mut self, key: i64) {
        self.id = Some(key);
    }

    fn values(&self) -> Vec<FieldValue> {
        vec![
            self.id.into(),
            self.recorded_at_ms.into(),
            self.temperature_c.into(),
            self.summary.clone().into(),
            self.station_tag.clone().into(),
        ]
    }

    fn from_values(values: Vec<FieldValue>) -> Result<Self, ShapeError> {
        let mut cursor = ValueCursor::new(values);
        Ok(Self {
            id: cursor.integer_opt()?,
            recorded_at_ms: cursor.integer()?,
            temperature_c: cursor.integer()?,
            summary: cursor.text_opt()?,
            station_tag: cursor.text_opt()?,
        })
    }
}

/// Build an unpersisted reading.
pub fn reading(recorded_at_ms: i64, temperature_c: i64, summary: &str) -> Reading {
    Reading {
        id: None,
        recorded_at_ms,
        temperature_c,
        summary: Some(summary.to_string()),
        station_tag: None,
    }
}

/// Build `count` readings with ascending timestamps.
pub fn sequence(count: usize) -> Vec<Reading> {
    (0..count)
        .map(|i| reading(1_000 * (i as i64 + 1), 10 + (i as i64 % 12), &format!("r{i}")))
        .collect()
}

/// A test fixture owning a temp directory and the storage options into it.
///
/// The directory lives as long as the fixture; repositories opened from it
/// share one database file.
pub struct TestStore {
    // Held for its Drop: removes the directory when the fixture goes away.
    _dir: tempfile::TempDir,
    pub options: StorageOptions,
}

impl TestStore {
    /// Create a fresh temp-dir-backed fixture.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let options = StorageOptions::new(dir.path(), "readings.db");
        Self { _dir: dir, options }
    }

    /// Open a SQLite repository over the fixture's database file.
    pub fn open(&self) -> SqliteRepository<Reading> {
        SqliteRepository::open(&self.options).expect("open sqlite repository")
    }

    /// An in-memory repository with the same record shape.
    pub fn memory() -> MemoryRepository<Reading> {
        MemoryRepository::new()
    }
}

impl Default for TestStore {
    fn default() -> Self {
        Self::new()
    }
}
