//! # Tabula Store
//!
//! Storage layer for Tabula. Provides a trait-based interface for typed CRUD
//! over one record shape, with SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! The store abstracts record persistence behind the [`Repository`] trait,
//! allowing callers to be storage-agnostic. The primary implementation is
//! [`SqliteRepository`], with [`MemoryRepository`] for testing. A
//! [`StorageHandle`] owns the single SQLite connection and ensures the
//! shape's table exists before any caller can touch it.
//!
//! ## Key Types
//!
//! - [`Repository`] - The async trait for all record operations
//! - [`SqliteRepository`] - SQLite-based persistent storage
//! - [`MemoryRepository`] - In-memory storage for tests
//! - [`StorageHandle`] - Connection owner and raw execution channel
//! - [`StorageOptions`] - File location and open-mode configuration
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tabula_store::{Repository, SqliteRepository, StorageOptions};
//! # use tabula_core::{ColumnSpec, Entity, FieldKind, FieldValue, ShapeError, ValueCursor};
//! # #[derive(Clone)]
//! # struct Reading { id: Option<i64>, celsius: i64 }
//! # impl Entity for Reading {
//! #     type Key = i64;
//! #     fn table() -> &'static str { "reading" }
//! #     fn columns() -> &'static [ColumnSpec] {
//! #         const C: &[ColumnSpec] = &[
//! #             ColumnSpec::auto_identity("id"),
//! #             ColumnSpec::new("celsius", FieldKind::Integer),
//! #         ];
//! #         C
//! #     }
//! #     fn key(&self) -> Option<i64> { self.id }
//! #     fn set_key(&mut self, key: i64) { self.id = Some(key); }
//! #     fn values(&self) -> Vec<FieldValue> { vec![self.id.into(), self.celsius.into()] }
//! #     fn from_values(values: Vec<FieldValue>) -> Result<Self, ShapeError> {
//! #         let mut cursor = ValueCursor::new(values);
//! #         Ok(Self { id: cursor.integer_opt()?, celsius: cursor.integer()? })
//! #     }
//! # }
//!
//! async fn example() {
//!     // Opening ensures the table exists before returning.
//!     let options = StorageOptions::new("./data", "app.db");
//!     let repo = SqliteRepository::<Reading>::open(&options).unwrap();
//!
//!     // Insert a record; the assigned identity is copied back.
//!     let mut reading = Reading { id: None, celsius: 16 };
//!     repo.add(&mut reading).await.unwrap();
//!     assert!(reading.id.is_some());
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Absence is not an error**: missing records yield `None`, empty lists,
//!   or zero rows affected.
//! - **Trim asymmetry**: update and bulk-insert normalize string fields in
//!   place; a bare single insert does not.
//! - **Key sets are always bound**: bulk get/delete generate a placeholder
//!   list and bind every key — key text never reaches the statement.
//! - **No cross-statement atomicity**: bulk writes are loops of individual
//!   statements; the engine guarantees per-statement atomicity only.

pub mod error;
pub mod handle;
pub mod keyset;
pub mod memory;
pub mod options;
pub mod schema;
pub mod sqlite;
pub mod traits;

mod convert;

pub use error::{Result, StoreError};
pub use handle::StorageHandle;
pub use memory::MemoryRepository;
pub use options::StorageOptions;
pub use sqlite::SqliteRepository;
pub use traits::Repository;
