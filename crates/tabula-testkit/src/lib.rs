//! # Tabula Testkit
//!
//! Testing utilities for Tabula repositories.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a sample [`Reading`] record shape exercising every shape
//!   feature (auto identity, trimmed and exempt string fields), plus
//!   tempdir-backed stores
//! - **Generators**: proptest strategies for property-based testing
//!
//! ## Fixtures
//!
//! Quickly set up a repository against a real database file:
//!
//! ```rust
//! use tabula_testkit::fixtures::{reading, TestStore};
//!
//! let store = TestStore::new();
//! let repo = store.open();
//! let record = reading(1_000, 16, "crisp");
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use tabula_testkit::generators::padded_string;
//!
//! proptest! {
//!     #[test]
//!     fn trims_to_interior(value in padded_string()) {
//!         // ...
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{reading, sequence, Reading, TestStore};
