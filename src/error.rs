// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Structural problems reading the source file. Always fatal: nothing is written.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("source file not found: {0}")]
    NotFound(PathBuf),

    #[error("unsupported source format: {0} (expected .csv, .xlsx, .xlsm, .xls, .xlsb or .ods)")]
    UnsupportedFormat(PathBuf),

    #[error("workbook {0} contains no worksheets")]
    EmptyWorkbook(PathBuf),

    #[error("source {0} has no columns")]
    NoColumns(PathBuf),

    #[error("reading CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("reading workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("reading source: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("no product name column found in the dataset (columns: {columns:?})")]
    MissingIdentityColumn { columns: Vec<String> },
}

/// A failed write to one output destination.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("filesystem: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV export: {0}")]
    Csv(#[from] csv::Error),

    #[error("arrow batch: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("parquet export: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("store: {0}")]
    Store(#[from] duckdb::Error),
}

#[derive(Debug, Error)]
pub enum CleanError {
    #[error("load failed: {0}")]
    Load(#[from] LoadError),

    #[error("schema check failed: {0}")]
    Schema(#[from] SchemaError),

    #[error("write failed: {0}")]
    Sink(#[from] SinkError),
}
