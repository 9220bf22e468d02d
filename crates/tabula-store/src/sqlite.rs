//! SQLite implementation of the Repository trait.
//!
//! This is the primary storage backend. It uses rusqlite with bundled
//! SQLite, wrapped in async via the handle's blocking-pool runner.
//!
//! SQLite cannot execute caller-supplied Rust closures, so filter- and
//! sort-driven reads load the table and apply the predicate, ordering, and
//! window in memory. Key-addressed operations go through typed statements;
//! key-set operations go through the raw channel with bound placeholder
//! lists.

use std::marker::PhantomData;

use async_trait::async_trait;
use rusqlite::{params_from_iter, Connection};
use tabula_core::{page_window, trim_strings, Entity, Filter, KeyValue, SortKey};
use tracing::warn;

use crate::convert;
use crate::error::Result;
use crate::handle::StorageHandle;
use crate::keyset;
use crate::options::StorageOptions;
use crate::traits::Repository;

/// SQLite-backed repository for one record shape.
///
/// Holds a [`StorageHandle`] whose table was ensured at construction.
pub struct SqliteRepository<T: Entity> {
    handle: StorageHandle,
    _shape: PhantomData<fn() -> T>,
}

impl<T: Entity> SqliteRepository<T> {
    /// Open (or create) the database named by `options`.
    ///
    /// Blocks until the shape's table is confirmed present.
    pub fn open(options: &StorageOptions) -> Result<Self> {
        Ok(Self {
            handle: StorageHandle::open::<T>(options)?,
            _shape: PhantomData,
        })
    }

    /// Open an in-memory database.
    ///
    /// Useful for testing.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            handle: StorageHandle::open_in_memory::<T>()?,
            _shape: PhantomData,
        })
    }

    /// The underlying storage handle.
    pub fn handle(&self) -> &StorageHandle {
        &self.handle
    }
}

/// `"a", "b", "c"` — the shape's columns, quoted, in declaration order.
fn column_list<T: Entity>() -> String {
    T::columns()
        .iter()
        .map(|c| format!("\"{}\"", c.name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn select_sql<T: Entity>() -> String {
    format!("SELECT {} FROM \"{}\"", column_list::<T>(), T::table())
}

/// Load the table and keep the records the filter accepts, in
/// storage-native order.
fn scan<T: Entity>(conn: &Connection, filter: Option<&Filter<T>>) -> Result<Vec<T>> {
    let mut stmt = conn.prepare(&select_sql::<T>())?;
    let rows = stmt.query_map([], convert::row_values::<T>)?;

    let mut out = Vec::new();
    for values in rows {
        let record = T::from_values(values?)?;
        if filter.map_or(true, |f| f.matches(&record)) {
            out.push(record);
        }
    }
    Ok(out)
}

/// Insert one record; returns rows affected and the storage-assigned key,
/// if any.
fn insert_row<T: Entity>(conn: &Connection, record: &T) -> Result<(usize, Option<T::Key>)> {
    // The identity column is omitted when storage assigns it and the record
    // carries none; an explicit key is inserted as given.
    let omit_key = T::key_column().auto_increment && record.key().is_none();

    let mut names = Vec::new();
    let mut params = Vec::new();
    for (column, value) in T::columns().iter().zip(record.values()) {
        if omit_key && column.primary_key {
            continue;
        }
        names.push(format!("\"{}\"", column.name));
        params.push(convert::to_sql(value));
    }

    // A shape can have zero scalar fields; with its identity omitted there
    // is nothing left to bind.
    let sql = if params.is_empty() {
        format!("INSERT INTO \"{}\" DEFAULT VALUES", T::table())
    } else {
        format!(
            "INSERT INTO \"{}\" ({}) VALUES {}",
            T::table(),
            names.join(", "),
            keyset::placeholders(params.len())
        )
    };
    let affected = conn.execute(&sql, params_from_iter(params))?;

    let assigned = if omit_key {
        T::Key::from_rowid(conn.last_insert_rowid())
    } else {
        None
    };
    Ok((affected, assigned))
}

/// Persist a record's current state by its identity; 0 when it has none.
fn update_row<T: Entity>(conn: &Connection, record: &T) -> Result<usize> {
    let Some(key) = record.key() else {
        return Ok(0);
    };

    let mut assignments = Vec::new();
    let mut params = Vec::new();
    for (column, value) in T::columns().iter().zip(record.values()) {
        if column.primary_key {
            continue;
        }
        params.push(convert::to_sql(value));
        assignments.push(format!("\"{}\" = ?{}", column.name, params.len()));
    }
    params.push(convert::to_sql(key.to_field()));

    let sql = format!(
        "UPDATE \"{}\" SET {} WHERE \"{}\" = ?{}",
        T::table(),
        assignments.join(", "),
        T::key_column().name,
        params.len()
    );
    Ok(conn.execute(&sql, params_from_iter(params))?)
}

#[async_trait]
impl<T: Entity> Repository<T> for SqliteRepository<T> {
    async fn get(&self, key: T::Key) -> Result<Option<T>> {
        self.handle
            .run(move |conn| {
                let sql = format!(
                    "{} WHERE \"{}\" = ?1",
                    select_sql::<T>(),
                    T::key_column().name
                );
                let mut stmt = conn.prepare(&sql)?;
                let mut rows =
                    stmt.query_map([convert::to_sql(key.to_field())], convert::row_values::<T>)?;

                match rows.next() {
                    Some(values) => Ok(Some(T::from_values(values?)?)),
                    None => Ok(None),
                }
            })
            .await
    }

    async fn get_many(&self, keys: &[T::Key]) -> Result<Vec<T>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "{} WHERE \"{}\" IN {}",
            select_sql::<T>(),
            T::key_column().name,
            keyset::placeholders(keys.len())
        );
        let params = keys.iter().map(|k| k.to_field()).collect();
        self.handle.query_raw::<T>(sql, params).await
    }

    async fn first(&self, filter: Filter<T>) -> Result<Option<T>> {
        self.handle
            .run(move |conn| {
                let mut stmt = conn.prepare(&select_sql::<T>())?;
                let rows = stmt.query_map([], convert::row_values::<T>)?;

                for values in rows {
                    let record = T::from_values(values?)?;
                    if filter.matches(&record) {
                        return Ok(Some(record));
                    }
                }
                Ok(None)
            })
            .await
    }

    async fn get_all(
        &self,
        filter: Option<Filter<T>>,
        sort: Option<SortKey<T>>,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<Vec<T>> {
        self.handle
            .run(move |conn| {
                let mut records = scan::<T>(conn, filter.as_ref())?;

                if let Some(sort) = &sort {
                    records.sort_by(|a, b| sort.compare(a, b));
                }
                if let Some((skip, take)) = page_window(page, page_size) {
                    records = records.into_iter().skip(skip).take(take).collect();
                }
                Ok(records)
            })
            .await
    }

    async fn count(&self, filter: Option<Filter<T>>) -> Result<usize> {
        self.handle
            .run(move |conn| match filter {
                None => {
                    let n: i64 = conn.query_row(
                        &format!("SELECT COUNT(*) FROM \"{}\"", T::table()),
                        [],
                        |row| row.get(0),
                    )?;
                    Ok(n as usize)
                }
                Some(filter) => Ok(scan::<T>(conn, Some(&filter))?.len()),
            })
            .await
    }

    async fn add(&self, entity: &mut T) -> Result<usize> {
        let row = entity.clone();
        let (affected, assigned) = self.handle.run(move |conn| insert_row(conn, &row)).await?;

        if let Some(key) = assigned {
            entity.set_key(key);
        }
        Ok(affected)
    }

    async fn add_range(&self, entities: &mut [T]) -> Result<usize> {
        for entity in entities.iter_mut() {
            trim_strings(entity);
        }

        let rows = entities.to_vec();
        let (affected, assigned) = self
            .handle
            .run(move |conn| {
                let mut affected = 0;
                let mut assigned = Vec::with_capacity(rows.len());
                for row in &rows {
                    let (n, key) = insert_row(conn, row)?;
                    affected += n;
                    assigned.push(key);
                }
                Ok((affected, assigned))
            })
            .await?;

        for (entity, key) in entities.iter_mut().zip(assigned) {
            if let Some(key) = key {
                entity.set_key(key);
            }
        }
        Ok(affected)
    }

    async fn update(&self, entity: &mut T) -> Result<usize> {
        trim_strings(entity);
        let row = entity.clone();
        self.handle.run(move |conn| update_row(conn, &row)).await
    }

    async fn update_range(&self, entities: &mut [T]) -> Result<usize> {
        for entity in entities.iter_mut() {
            trim_strings(entity);
        }

        let rows = entities.to_vec();
        self.handle
            .run(move |conn| {
                let mut affected = 0;
                for row in &rows {
                    affected += update_row(conn, row)?;
                }
                Ok(affected)
            })
            .await
    }

    async fn delete(&self, key: T::Key) -> Result<usize> {
        self.handle
            .run(move |conn| {
                let sql = format!(
                    "DELETE FROM \"{}\" WHERE \"{}\" = ?1",
                    T::table(),
                    T::key_column().name
                );
                Ok(conn.execute(&sql, [convert::to_sql(key.to_field())])?)
            })
            .await
    }

    async fn delete_many(&self, keys: &[T::Key]) -> Result<usize> {
        if keys.is_empty() {
            return Ok(0);
        }

        let sql = format!(
            "DELETE FROM \"{}\" WHERE \"{}\" IN {}",
            T::table(),
            T::key_column().name,
            keyset::placeholders(keys.len())
        );
        let params = keys.iter().map(|k| k.to_field()).collect();
        self.handle.execute_raw(sql, params).await
    }

    async fn clear_table(&self) -> Result<usize> {
        warn!(table = T::table(), "clearing table");
        self.handle
            .run(move |conn| Ok(conn.execute(&format!("DELETE FROM \"{}\"", T::table()), [])?))
            .await
    }
}
