// src/inspect.rs
use duckdb::Connection;
use tracing::debug;

use crate::duck;
use crate::table::RecordTable;

/// Tables in the store, and the full contents of the first one the catalog
/// lists. `None` when the store has no tables.
pub fn first_table(
    conn: &Connection,
) -> duckdb::Result<(Vec<String>, Option<(String, RecordTable)>)> {
    let tables = duck::list_tables(conn)?;
    debug!(?tables, "catalog");
    let first = match tables.first() {
        Some(name) => Some((name.clone(), duck::read_table(conn, name)?)),
        None => None,
    };
    Ok((tables, first))
}
