// src/sink/mod.rs
pub mod arrow;
pub mod csv;
pub mod parquet;

use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};
use tracing::{error, info};

use crate::config::OutputPaths;
use crate::duck;
use crate::error::SinkError;
use crate::table::RecordTable;

/// What each destination received.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkReport {
    pub parquet_bytes: u64,
    pub store_rows: usize,
    pub csv_rows: usize,
}

fn ensure_parent(path: &Path) -> Result<(), SinkError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Hidden sibling that an export is written to before it replaces `path`.
pub(crate) fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}

/// Hand `write` a fresh staging file, then rename it over `path`.
///
/// On any failure the staging file is removed and `path` keeps its previous
/// contents.
pub(crate) fn write_atomically<T, F>(path: &Path, write: F) -> Result<T, SinkError>
where
    F: FnOnce(File) -> Result<T, SinkError>,
{
    let tmp = staging_path(path);
    let result = File::create(&tmp)
        .map_err(SinkError::from)
        .and_then(write)
        .and_then(|out| {
            fs::rename(&tmp, path)?;
            Ok(out)
        });
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn write_store(table: &RecordTable, db_path: &Path, table_name: &str) -> Result<usize, SinkError> {
    ensure_parent(db_path)?;
    // Connection lives for this call only; dropped on every path out.
    let mut conn = duck::open_disk_db(db_path)?;
    let rows = duck::replace_table(&mut conn, table_name, table)?;
    Ok(rows)
}

/// Write the cleaned table to the Parquet export, the store and the CSV export.
///
/// Destinations are independent: every one is attempted, failures are logged,
/// and the first failure is returned once all have run. Nothing is rolled back.
#[tracing::instrument(level = "info", skip_all, fields(rows = table.num_rows()))]
pub fn write_outputs(
    table: &RecordTable,
    paths: &OutputPaths,
    table_name: &str,
) -> Result<SinkReport, SinkError> {
    let mut report = SinkReport::default();
    let mut first_err: Option<SinkError> = None;

    match ensure_parent(&paths.cleaned).and_then(|_| parquet::write_parquet(table, &paths.cleaned)) {
        Ok(bytes) => {
            info!("cleaned data saved to: {}", paths.cleaned.display());
            report.parquet_bytes = bytes;
        }
        Err(e) => {
            error!("writing {} failed: {}", paths.cleaned.display(), e);
            first_err.get_or_insert(e);
        }
    }

    match write_store(table, &paths.db, table_name) {
        Ok(rows) => {
            info!(
                "data successfully loaded into table `{}` of {}",
                table_name,
                paths.db.display()
            );
            report.store_rows = rows;
        }
        Err(e) => {
            error!("writing {} failed: {}", paths.db.display(), e);
            first_err.get_or_insert(e);
        }
    }

    match ensure_parent(&paths.csv).and_then(|_| csv::write_csv(table, &paths.csv)) {
        Ok(()) => {
            info!("CSV exported to: {}", paths.csv.display());
            report.csv_rows = table.num_rows();
        }
        Err(e) => {
            error!("writing {} failed: {}", paths.csv.display(), e);
            first_err.get_or_insert(e);
        }
    }

    match first_err {
        Some(e) => Err(e),
        None => Ok(report),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Value;
    use tempfile::tempdir;

    fn small_table() -> RecordTable {
        RecordTable::new(
            vec!["product_name".into(), "price".into()],
            vec![
                vec![Value::Text("Bread".into()), Value::Number(15.0)],
                vec![Value::Text("Milk".into()), Value::Number(0.0)],
            ],
        )
    }

    #[test]
    fn writes_all_three_destinations() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let paths = OutputPaths {
            cleaned: dir.path().join("data/cleaned.parquet"),
            csv: dir.path().join("data/export.csv"),
            db: dir.path().join("db/shop.duckdb"),
        };
        let report = write_outputs(&small_table(), &paths, "products")?;

        assert!(report.parquet_bytes > 0);
        assert_eq!(report.store_rows, 2);
        assert_eq!(report.csv_rows, 2);
        assert!(paths.cleaned.is_file());
        assert!(paths.csv.is_file());
        assert!(paths.db.is_file());
        assert!(!staging_path(&paths.csv).exists());
        assert!(!staging_path(&paths.cleaned).exists());
        Ok(())
    }

    #[test]
    fn staging_file_sits_next_to_the_target() {
        assert_eq!(
            staging_path(Path::new("data/powerbi_products.csv")),
            PathBuf::from("data/.powerbi_products.csv.tmp")
        );
    }

    #[test]
    fn one_failed_destination_does_not_stop_the_others() -> anyhow::Result<()> {
        let dir = tempdir()?;
        // A directory where the parquet file should go makes that write fail.
        let blocked = dir.path().join("cleaned.parquet");
        fs::create_dir_all(&blocked)?;
        let paths = OutputPaths {
            cleaned: blocked,
            csv: dir.path().join("export.csv"),
            db: dir.path().join("shop.duckdb"),
        };

        let err = write_outputs(&small_table(), &paths, "products").unwrap_err();
        assert!(matches!(err, SinkError::Io(_)));
        assert!(paths.csv.is_file());
        assert!(paths.db.is_file());
        assert!(!staging_path(&paths.cleaned).exists());
        Ok(())
    }
}
