//! Repository trait: the abstract interface for typed record persistence.
//!
//! This trait allows callers to be storage-agnostic. Implementations include
//! SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;
use tabula_core::{Entity, Filter, SortKey};

use crate::error::Result;

/// The Repository trait: async CRUD over one record shape.
///
/// All methods are async and fire-to-completion — there is no cancellation
/// token, and a spawned operation runs until it finishes or fails. Every
/// mutation returns a rows-affected count; absence is always an empty
/// result (`None`, empty `Vec`, or `0`), never an error.
///
/// # Design Notes
///
/// - **Trim asymmetry**: [`update`], [`update_range`], and [`add_range`]
///   trim the writable string fields of their arguments in place before
///   writing; a bare [`add`] does not. This mirrors the behavior the layer
///   was built against and is pinned by tests — do not unify it silently.
/// - **Pagination**: a window is applied only when `page` and `page_size`
///   are both supplied; values below 1 are clamped up to 1. With either
///   absent, the full filtered/sorted result is returned.
/// - **Bulk writes are not atomic**: a bulk insert or update is a sequence
///   of per-row statements with per-statement atomicity only.
///
/// [`add`]: Repository::add
/// [`add_range`]: Repository::add_range
/// [`update`]: Repository::update
/// [`update_range`]: Repository::update_range
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────────

    /// Get the record with the given identity, or `None`.
    async fn get(&self, key: T::Key) -> Result<Option<T>>;

    /// Get every record whose identity is in the set; order unspecified.
    ///
    /// An empty key set returns an empty list without touching storage.
    async fn get_many(&self, keys: &[T::Key]) -> Result<Vec<T>>;

    /// Get the first record matching the filter, in storage-native order.
    async fn first(&self, filter: Filter<T>) -> Result<Option<T>>;

    /// List records matching the filter (all records when `None`), ordered
    /// ascending by the sort key when given, windowed to
    /// `[(page-1)*page_size, page*page_size)` when both pagination
    /// parameters are supplied.
    ///
    /// Sorting happens before windowing, so windows are stable across
    /// repeated calls.
    async fn get_all(
        &self,
        filter: Option<Filter<T>>,
        sort: Option<SortKey<T>>,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<Vec<T>>;

    /// Count records matching the filter (all records when `None`).
    ///
    /// Always reflects the full filtered set, independent of pagination.
    async fn count(&self, filter: Option<Filter<T>>) -> Result<usize>;

    // ─────────────────────────────────────────────────────────────────────────
    // Writes
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert one record. Does not trim string fields.
    ///
    /// When the shape's identity is storage-assigned and the record carries
    /// none, the generated key is copied back into the record.
    async fn add(&self, entity: &mut T) -> Result<usize>;

    /// Trim every record's string fields, then insert them all.
    ///
    /// Storage-assigned identities are copied back into the records.
    async fn add_range(&self, entities: &mut [T]) -> Result<usize>;

    /// Trim the record's string fields, then persist its current state.
    ///
    /// A record with no identity, or an identity that matches no row,
    /// yields 0 rows affected.
    async fn update(&self, entity: &mut T) -> Result<usize>;

    /// Trim every record's string fields, then update them all.
    async fn update_range(&self, entities: &mut [T]) -> Result<usize>;

    // ─────────────────────────────────────────────────────────────────────────
    // Deletes
    // ─────────────────────────────────────────────────────────────────────────

    /// Delete the record with the given identity; 0 if absent.
    async fn delete(&self, key: T::Key) -> Result<usize>;

    /// Delete every record whose identity is in the set.
    ///
    /// An empty key set returns 0 without touching storage.
    async fn delete_many(&self, keys: &[T::Key]) -> Result<usize>;

    /// Delete the record by its identity; 0 when the record has none.
    async fn delete_entity(&self, entity: &T) -> Result<usize> {
        match entity.key() {
            Some(key) => self.delete(key).await,
            None => Ok(0),
        }
    }

    /// Delete the given records by their identities (unpersisted records,
    /// which have none, are skipped).
    async fn delete_entities(&self, entities: &[T]) -> Result<usize> {
        let keys: Vec<T::Key> = entities.iter().filter_map(|e| e.key()).collect();
        self.delete_many(&keys).await
    }

    /// Remove every row in the table. Irreversible; the caller is solely
    /// responsible for confirming intent.
    async fn clear_table(&self) -> Result<usize>;
}
