//! In-memory implementation of the Repository trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite —
//! trim rules, pagination clamping, rows-affected counts — but keeps
//! everything in memory with no persistence.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tabula_core::{page_window, trim_strings, Entity, FieldValue, Filter, KeyValue, SortKey};

use crate::error::{Result, StoreError};
use crate::traits::Repository;

/// In-memory repository for one record shape.
///
/// All data is lost when the repository is dropped. Thread-safe via RwLock.
pub struct MemoryRepository<T: Entity> {
    inner: RwLock<MemoryInner<T>>,
}

struct MemoryInner<T> {
    /// Rows in insertion order (the storage-native order).
    rows: Vec<T>,
    /// Next auto-assigned identity.
    next_rowid: i64,
}

impl<T: Entity> MemoryRepository<T> {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryInner {
                rows: Vec::new(),
                next_rowid: 1,
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryInner<T>>> {
        self.inner.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryInner<T>>> {
        self.inner.write().map_err(|_| StoreError::Poisoned)
    }
}

impl<T: Entity> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn insert_row<T: Entity>(inner: &mut MemoryInner<T>, record: &T) -> Result<Option<T::Key>> {
    match record.key() {
        Some(key) => {
            if inner.rows.iter().any(|r| r.key() == Some(key.clone())) {
                return Err(StoreError::DuplicateKey(key.to_string()));
            }
            // Keep auto-assignment ahead of explicit integer keys.
            if let FieldValue::Integer(v) = key.to_field() {
                if v >= inner.next_rowid {
                    inner.next_rowid = v + 1;
                }
            }
            inner.rows.push(record.clone());
            Ok(None)
        }
        None => {
            let assigned = if T::key_column().auto_increment {
                let key = T::Key::from_rowid(inner.next_rowid);
                inner.next_rowid += 1;
                key
            } else {
                None
            };

            let mut row = record.clone();
            if let Some(key) = &assigned {
                row.set_key(key.clone());
            }
            inner.rows.push(row);
            Ok(assigned)
        }
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for MemoryRepository<T> {
    async fn get(&self, key: T::Key) -> Result<Option<T>> {
        let inner = self.read()?;
        Ok(inner
            .rows
            .iter()
            .find(|r| r.key() == Some(key.clone()))
            .cloned())
    }

    async fn get_many(&self, keys: &[T::Key]) -> Result<Vec<T>> {
        let inner = self.read()?;
        Ok(inner
            .rows
            .iter()
            .filter(|r| r.key().is_some_and(|k| keys.contains(&k)))
            .cloned()
            .collect())
    }

    async fn first(&self, filter: Filter<T>) -> Result<Option<T>> {
        let inner = self.read()?;
        Ok(inner.rows.iter().find(|r| filter.matches(r)).cloned())
    }

    async fn get_all(
        &self,
        filter: Option<Filter<T>>,
        sort: Option<SortKey<T>>,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<Vec<T>> {
        let inner = self.read()?;
        let mut records: Vec<T> = inner
            .rows
            .iter()
            .filter(|r| filter.as_ref().map_or(true, |f| f.matches(r)))
            .cloned()
            .collect();

        if let Some(sort) = &sort {
            records.sort_by(|a, b| sort.compare(a, b));
        }
        if let Some((skip, take)) = page_window(page, page_size) {
            records = records.into_iter().skip(skip).take(take).collect();
        }
        Ok(records)
    }

    async fn count(&self, filter: Option<Filter<T>>) -> Result<usize> {
        let inner = self.read()?;
        Ok(inner
            .rows
            .iter()
            .filter(|r| filter.as_ref().map_or(true, |f| f.matches(r)))
            .count())
    }

    async fn add(&self, entity: &mut T) -> Result<usize> {
        let mut inner = self.write()?;
        if let Some(key) = insert_row(&mut inner, entity)? {
            entity.set_key(key);
        }
        Ok(1)
    }

    async fn add_range(&self, entities: &mut [T]) -> Result<usize> {
        let mut inner = self.write()?;
        for entity in entities.iter_mut() {
            trim_strings(entity);
            if let Some(key) = insert_row(&mut inner, entity)? {
                entity.set_key(key);
            }
        }
        Ok(entities.len())
    }

    async fn update(&self, entity: &mut T) -> Result<usize> {
        trim_strings(entity);
        let Some(key) = entity.key() else {
            return Ok(0);
        };

        let mut inner = self.write()?;
        match inner.rows.iter_mut().find(|r| r.key() == Some(key.clone())) {
            Some(row) => {
                *row = entity.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn update_range(&self, entities: &mut [T]) -> Result<usize> {
        let mut affected = 0;
        for entity in entities.iter_mut() {
            affected += self.update(entity).await?;
        }
        Ok(affected)
    }

    async fn delete(&self, key: T::Key) -> Result<usize> {
        let mut inner = self.write()?;
        let before = inner.rows.len();
        inner.rows.retain(|r| r.key() != Some(key.clone()));
        Ok(before - inner.rows.len())
    }

    async fn delete_many(&self, keys: &[T::Key]) -> Result<usize> {
        if keys.is_empty() {
            return Ok(0);
        }

        let mut inner = self.write()?;
        let before = inner.rows.len();
        inner
            .rows
            .retain(|r| !r.key().is_some_and(|k| keys.contains(&k)));
        Ok(before - inner.rows.len())
    }

    async fn clear_table(&self) -> Result<usize> {
        let mut inner = self.write()?;
        let before = inner.rows.len();
        inner.rows.clear();
        Ok(before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_core::{ColumnSpec, FieldKind, ShapeError, StringField, ValueCursor};

    #[derive(Debug, Clone, PartialEq)]
    struct Tag {
        id: Option<i64>,
        label: Option<String>,
    }

    fn tag_label(t: &Tag) -> Option<&str> {
        t.label.as_deref()
    }

    fn set_tag_label(t: &mut Tag, v: String) {
        t.label = Some(v);
    }

    impl Entity for Tag {
        type Key = i64;

        fn table() -> &'static str {
            "tag"
        }

        fn columns() -> &'static [ColumnSpec] {
            const COLUMNS: &[ColumnSpec] = &[
                ColumnSpec::auto_identity("id"),
                ColumnSpec::new("label", FieldKind::Text),
            ];
            COLUMNS
        }

        fn string_fields() -> &'static [StringField<Self>] {
            const FIELDS: &[StringField<Tag>] = &[StringField {
                name: "label",
                get: tag_label,
                set: set_tag_label,
                exempt: false,
            }];
            FIELDS
        }

        fn key(&self) -> Option<i64> {
            self.id
        }

        fn set_key(&mut self, key: i64) {
            self.id = Some(key);
        }

        fn values(&self) -> Vec<FieldValue> {
            vec![self.id.into(), self.label.clone().into()]
        }

        fn from_values(values: Vec<FieldValue>) -> std::result::Result<Self, ShapeError> {
            let mut cursor = ValueCursor::new(values);
            Ok(Self {
                id: cursor.integer_opt()?,
                label: cursor.text_opt()?,
            })
        }
    }

    fn tag(label: &str) -> Tag {
        Tag {
            id: None,
            label: Some(label.to_string()),
        }
    }

    #[tokio::test]
    async fn identities_are_assigned_sequentially() {
        let repo = MemoryRepository::<Tag>::new();
        let mut a = tag("a");
        let mut b = tag("b");
        repo.add(&mut a).await.unwrap();
        repo.add(&mut b).await.unwrap();

        assert_eq!(a.id, Some(1));
        assert_eq!(b.id, Some(2));
    }

    #[tokio::test]
    async fn explicit_key_advances_assignment() {
        let repo = MemoryRepository::<Tag>::new();
        let mut fixed = Tag {
            id: Some(10),
            label: Some("fixed".into()),
        };
        repo.add(&mut fixed).await.unwrap();

        let mut next = tag("next");
        repo.add(&mut next).await.unwrap();
        assert_eq!(next.id, Some(11));
    }

    #[tokio::test]
    async fn duplicate_identity_is_an_error() {
        let repo = MemoryRepository::<Tag>::new();
        let mut a = Tag {
            id: Some(1),
            label: None,
        };
        repo.add(&mut a).await.unwrap();

        let mut b = a.clone();
        assert!(matches!(
            repo.add(&mut b).await,
            Err(StoreError::DuplicateKey(_))
        ));
    }

    #[tokio::test]
    async fn trim_asymmetry_matches_sqlite() {
        let repo = MemoryRepository::<Tag>::new();

        let mut bare = tag("  kept  ");
        repo.add(&mut bare).await.unwrap();
        assert_eq!(
            repo.get(bare.id.unwrap()).await.unwrap().unwrap().label.as_deref(),
            Some("  kept  ")
        );

        let mut bulk = [tag("  trimmed  ")];
        repo.add_range(&mut bulk).await.unwrap();
        assert_eq!(
            repo.get(bulk[0].id.unwrap())
                .await
                .unwrap()
                .unwrap()
                .label
                .as_deref(),
            Some("trimmed")
        );
    }

    #[tokio::test]
    async fn pagination_applies_only_with_both_parameters() {
        let repo = MemoryRepository::<Tag>::new();
        for i in 0..5 {
            repo.add(&mut tag(&format!("t{i}"))).await.unwrap();
        }

        let page = repo.get_all(None, None, Some(2), Some(2)).await.unwrap();
        assert_eq!(page.len(), 2);

        let unpaged = repo.get_all(None, None, Some(2), None).await.unwrap();
        assert_eq!(unpaged.len(), 5);
    }

    #[tokio::test]
    async fn delete_variants_report_rows_affected() {
        let repo = MemoryRepository::<Tag>::new();
        let mut a = tag("a");
        let mut b = tag("b");
        repo.add(&mut a).await.unwrap();
        repo.add(&mut b).await.unwrap();

        assert_eq!(repo.delete(a.id.unwrap()).await.unwrap(), 1);
        assert_eq!(repo.delete(a.id.unwrap()).await.unwrap(), 0);
        assert_eq!(repo.delete_entity(&b).await.unwrap(), 1);
        assert_eq!(repo.clear_table().await.unwrap(), 0);
    }
}
