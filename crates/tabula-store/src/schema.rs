//! Table DDL generated from a record shape.
//!
//! A shape's table is created implicitly the first time a handle is opened
//! for it. There is no migration support: the schema must match the shape's
//! declared columns at creation time.

use rusqlite::Connection;
use tabula_core::Entity;

use crate::error::Result;

/// Build the `CREATE TABLE IF NOT EXISTS` statement for a record shape.
pub fn create_table_sql<T: Entity>() -> String {
    let columns: Vec<String> = T::columns()
        .iter()
        .map(|column| {
            let mut def = format!("\"{}\" {}", column.name, column.kind.sql_type());
            if column.primary_key {
                def.push_str(" PRIMARY KEY");
                if column.auto_increment {
                    def.push_str(" AUTOINCREMENT");
                }
            }
            def
        })
        .collect();

    format!(
        "CREATE TABLE IF NOT EXISTS \"{}\" ({})",
        T::table(),
        columns.join(", ")
    )
}

/// Ensure the table for a record shape exists.
///
/// Idempotent. Called synchronously at handle construction so the table is
/// confirmed present before any caller sees the handle.
pub fn ensure_table<T: Entity>(conn: &Connection) -> Result<()> {
    conn.execute_batch(&create_table_sql::<T>())?;
    Ok(())
}
