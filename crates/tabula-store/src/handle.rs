//! The storage handle: one connection per record shape.

use std::sync::{Arc, Mutex};

use rusqlite::{params_from_iter, Connection};
use tabula_core::{Entity, FieldValue};
use tracing::debug;

use crate::convert;
use crate::error::{Result, StoreError};
use crate::options::StorageOptions;
use crate::schema;

/// Owns the SQLite connection backing one repository instance.
///
/// Construction opens (or creates) the database file named by
/// [`StorageOptions`] and synchronously ensures the record shape's table
/// exists — the handle is never observable without its table. A failure here
/// (inaccessible path, table creation error) propagates out of the
/// constructor; it is a startup fault, not a per-request one.
///
/// All async work funnels through [`run`](Self::run), which executes on the
/// blocking thread pool with the connection mutex held. Operations are
/// fire-to-completion: once issued they run until they finish or fail and
/// cannot be cancelled from outside.
pub struct StorageHandle {
    conn: Arc<Mutex<Connection>>,
}

impl StorageHandle {
    /// Open the database named by `options` and ensure the table for `T`.
    pub fn open<T: Entity>(options: &StorageOptions) -> Result<Self> {
        let path = options.path();
        let conn = Connection::open_with_flags(&path, options.flags)?;
        schema::ensure_table::<T>(&conn)?;
        debug!(table = T::table(), path = %path.display(), "storage handle open");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory database and ensure the table for `T`.
    ///
    /// Useful for testing.
    pub fn open_in_memory<T: Entity>() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::ensure_table::<T>(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a closure against the connection on the blocking pool.
    pub(crate) async fn run<R, F>(&self, f: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&Connection) -> Result<R> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| StoreError::Poisoned)?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Runtime(e.to_string()))?
    }

    /// Execute a textual command with bound parameters.
    ///
    /// Returns the number of rows affected. This is the raw execution
    /// channel used by the key-set paths; everything else goes through the
    /// typed statements the repository prepares itself.
    pub async fn execute_raw(&self, sql: String, params: Vec<FieldValue>) -> Result<usize> {
        self.run(move |conn| {
            let affected = conn.execute(
                &sql,
                params_from_iter(params.into_iter().map(convert::to_sql)),
            )?;
            Ok(affected)
        })
        .await
    }

    /// Execute a textual query with bound parameters, yielding typed records.
    ///
    /// The statement must select the shape's columns in declaration order.
    pub async fn query_raw<T: Entity>(
        &self,
        sql: String,
        params: Vec<FieldValue>,
    ) -> Result<Vec<T>> {
        self.run(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(
                params_from_iter(params.into_iter().map(convert::to_sql)),
                convert::row_values::<T>,
            )?;

            let mut out = Vec::new();
            for values in rows {
                out.push(T::from_values(values?)?);
            }
            Ok(out)
        })
        .await
    }
}

impl Clone for StorageHandle {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
        }
    }
}
