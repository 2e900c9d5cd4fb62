use chrono::DateTime;
use duckdb::{
    appender_params_from_iter,
    types::{TimeUnit, Value as DuckValue},
    AccessMode, Config, Connection,
};
use std::path::Path;
use tracing::debug;

use crate::table::{ColumnType, RecordTable, Value};

/// Open a DuckDB database on disk at `path`, creating the file if it doesn't exist.
pub fn open_disk_db(path: &Path) -> duckdb::Result<Connection> {
    Connection::open(path)
}

/// Open an existing DuckDB database without write access. Fails if `path`
/// does not exist instead of creating it.
pub fn open_read_only_db(path: &Path) -> duckdb::Result<Connection> {
    let config = Config::default().access_mode(AccessMode::ReadOnly)?;
    Connection::open_with_flags(path, config)
}

/// Open a DuckDB in‐memory database
pub fn open_mem_db() -> duckdb::Result<Connection> {
    Connection::open_in_memory()
}

/// Double-quote an identifier, escaping embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn sql_type(ty: ColumnType) -> &'static str {
    match ty {
        ColumnType::Number => "DOUBLE",
        ColumnType::Timestamp => "TIMESTAMP",
        ColumnType::Boolean => "BOOLEAN",
        ColumnType::Text => "VARCHAR",
    }
}

fn to_duck_value(v: &Value, ty: ColumnType) -> DuckValue {
    match (v, ty) {
        (Value::Absent, _) => DuckValue::Null,
        (Value::Number(n), ColumnType::Number) => DuckValue::Double(*n),
        (Value::Timestamp(ts), ColumnType::Timestamp) => {
            DuckValue::Timestamp(TimeUnit::Microsecond, ts.and_utc().timestamp_micros())
        }
        (Value::Bool(b), ColumnType::Boolean) => DuckValue::Boolean(*b),
        (other, _) => DuckValue::Text(other.to_string()),
    }
}

/// Replace `table_name` with the contents of `table`.
///
/// The table is recreated with column types inferred from the values, then
/// bulk-loaded through an `Appender`. Both happen in one transaction, so
/// readers see either the old rows or the new ones.
#[tracing::instrument(level = "info", skip(conn, table), fields(rows = table.num_rows()))]
pub fn replace_table(
    conn: &mut Connection,
    table_name: &str,
    table: &RecordTable,
) -> duckdb::Result<usize> {
    let types: Vec<ColumnType> = (0..table.num_columns())
        .map(|i| table.column_type(i))
        .collect();
    let column_defs: Vec<String> = table
        .columns()
        .iter()
        .zip(&types)
        .map(|(name, ty)| format!("{} {}", quote_ident(name), sql_type(*ty)))
        .collect();
    let ddl = format!(
        "CREATE OR REPLACE TABLE {} ({});",
        quote_ident(table_name),
        column_defs.join(", ")
    );
    debug!(%ddl, "recreating table");

    let tx = conn.transaction()?;
    tx.execute_batch(&ddl)?;
    {
        let mut appender = tx.appender(table_name)?;
        for row in table.rows() {
            let values: Vec<DuckValue> = row
                .iter()
                .zip(&types)
                .map(|(v, ty)| to_duck_value(v, *ty))
                .collect();
            appender.append_row(appender_params_from_iter(values))?;
        }
        appender.flush()?;
    }
    tx.commit()?;

    Ok(table.num_rows())
}

/// User tables in the order the catalog lists them.
pub fn list_tables(conn: &Connection) -> duckdb::Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT table_name FROM information_schema.tables \
         WHERE table_type = 'BASE TABLE';",
    )?;
    let names = stmt
        .query_map([], |r| r.get::<_, String>(0))?
        .collect::<duckdb::Result<Vec<_>>>()?;
    Ok(names)
}

fn table_columns(conn: &Connection, table_name: &str) -> duckdb::Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT column_name FROM information_schema.columns \
         WHERE table_name = ? ORDER BY ordinal_position;",
    )?;
    let names = stmt
        .query_map([table_name], |r| r.get::<_, String>(0))?
        .collect::<duckdb::Result<Vec<_>>>()?;
    Ok(names)
}

fn from_duck_value(v: DuckValue) -> Value {
    match v {
        DuckValue::Null => Value::Absent,
        DuckValue::Boolean(b) => Value::Bool(b),
        DuckValue::TinyInt(i) => Value::Number(i as f64),
        DuckValue::SmallInt(i) => Value::Number(i as f64),
        DuckValue::Int(i) => Value::Number(i as f64),
        DuckValue::BigInt(i) => Value::Number(i as f64),
        DuckValue::HugeInt(i) => Value::Number(i as f64),
        DuckValue::UTinyInt(i) => Value::Number(i as f64),
        DuckValue::USmallInt(i) => Value::Number(i as f64),
        DuckValue::UInt(i) => Value::Number(i as f64),
        DuckValue::UBigInt(i) => Value::Number(i as f64),
        DuckValue::Float(f) => Value::Number(f as f64),
        DuckValue::Double(f) => Value::Number(f),
        DuckValue::Text(s) => Value::Text(s),
        DuckValue::Timestamp(unit, t) => {
            let micros = match unit {
                TimeUnit::Second => t.saturating_mul(1_000_000),
                TimeUnit::Millisecond => t.saturating_mul(1_000),
                TimeUnit::Microsecond => t,
                TimeUnit::Nanosecond => t / 1_000,
            };
            DateTime::from_timestamp_micros(micros)
                .map(|dt| Value::Timestamp(dt.naive_utc()))
                .unwrap_or(Value::Absent)
        }
        other => Value::Text(format!("{:?}", other)),
    }
}

/// Read every row of `table_name` back into a `RecordTable`.
pub fn read_table(conn: &Connection, table_name: &str) -> duckdb::Result<RecordTable> {
    let columns = table_columns(conn, table_name)?;
    let width = columns.len();

    let mut stmt = conn.prepare(&format!("SELECT * FROM {};", quote_ident(table_name)))?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(width);
        for i in 0..width {
            values.push(from_duck_value(row.get::<_, DuckValue>(i)?));
        }
        out.push(values);
    }
    Ok(RecordTable::new(columns, out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use chrono::NaiveDate;

    fn sample(names: &[&str]) -> RecordTable {
        let added = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let rows = names
            .iter()
            .map(|n| {
                vec![
                    Value::Text(n.to_string()),
                    Value::Number(12.5),
                    Value::Timestamp(added),
                    Value::Bool(false),
                ]
            })
            .collect();
        RecordTable::new(
            vec![
                "product_name".into(),
                "price".into(),
                "date_added".into(),
                "missing_price".into(),
            ],
            rows,
        )
    }

    #[test]
    fn replace_then_read_back() -> Result<()> {
        let mut conn = open_mem_db()?;
        let table = sample(&["Bread", "Milk", "Eggs"]);

        assert_eq!(replace_table(&mut conn, "products", &table)?, 3);
        assert_eq!(list_tables(&conn)?, vec!["products".to_string()]);

        let back = read_table(&conn, "products")?;
        assert_eq!(back, table);
        Ok(())
    }

    #[test]
    fn second_write_discards_first() -> Result<()> {
        let mut conn = open_mem_db()?;
        replace_table(&mut conn, "products", &sample(&["a", "b", "c", "d"]))?;
        replace_table(&mut conn, "products", &sample(&["z"]))?;

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM products;", [], |r| r.get(0))?;
        assert_eq!(count, 1);
        Ok(())
    }

    #[test]
    fn read_only_open_needs_an_existing_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let missing = dir.path().join("typo.duckdb");
        assert!(open_read_only_db(&missing).is_err());
        assert!(!missing.exists());

        let path = dir.path().join("shop.duckdb");
        {
            let mut conn = open_disk_db(&path)?;
            replace_table(&mut conn, "products", &sample(&["Bread"]))?;
        }
        let conn = open_read_only_db(&path)?;
        assert_eq!(read_table(&conn, "products")?.num_rows(), 1);
        assert!(conn.execute_batch("DROP TABLE products;").is_err());
        Ok(())
    }

    #[test]
    fn identifiers_are_quoted() {
        assert_eq!(quote_ident("products"), "\"products\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
