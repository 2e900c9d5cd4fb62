// src/process/load.rs
use calamine::{open_workbook_auto, Data, DataType, Reader};
use csv::ReaderBuilder;
use std::{fs::File, io::BufReader, path::Path};
use tracing::{info, warn};

use crate::error::LoadError;
use crate::table::{RecordTable, Value};

/// Read `path` into a `RecordTable`, picking the reader from the file extension.
///
/// - `.csv`: header row + text cells
/// - `.xlsx`/`.xlsm`/`.xls`/`.xlsb`/`.ods`: first worksheet, typed cells
///
/// Blank cells become `Value::Absent`. Column names are kept as written; they
/// are canonicalised by the schema normalizer afterwards.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_table<P: AsRef<Path>>(path: P) -> Result<RecordTable, LoadError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let table = match ext.as_str() {
        "csv" => load_csv(path)?,
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => load_workbook(path)?,
        _ => return Err(LoadError::UnsupportedFormat(path.to_path_buf())),
    };

    if table.num_columns() == 0 {
        return Err(LoadError::NoColumns(path.to_path_buf()));
    }

    info!(
        rows = table.num_rows(),
        columns = table.num_columns(),
        "loaded messy data with {} rows and {} columns",
        table.num_rows(),
        table.num_columns()
    );
    Ok(table)
}

fn header_name(idx: usize, raw: String) -> String {
    if raw.trim().is_empty() {
        format!("Unnamed: {}", idx)
    } else {
        raw
    }
}

fn warn_ragged(path: &Path, width: usize, rows: &[Vec<Value>]) {
    let long = rows.iter().filter(|r| r.len() > width).count();
    if long > 0 {
        warn!(
            "{}: {} rows have more cells than headers ({} headers); extra cells dropped",
            path.display(),
            long,
            width
        );
    }
}

fn load_csv(path: &Path) -> Result<RecordTable, LoadError> {
    let file = File::open(path)?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // ragged rows are padded/truncated, not rejected
        .from_reader(BufReader::new(file));

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| header_name(i, h.to_string()))
        .collect();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let row: Vec<Value> = record.iter().map(text_cell).collect();
        rows.push(row);
    }

    warn_ragged(path, headers.len(), &rows);
    Ok(RecordTable::new(headers, rows))
}

fn text_cell(raw: &str) -> Value {
    if raw.trim().is_empty() {
        Value::Absent
    } else {
        Value::Text(raw.to_string())
    }
}

fn load_workbook(path: &Path) -> Result<RecordTable, LoadError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::EmptyWorkbook(path.to_path_buf()))??;

    let mut sheet_rows = range.rows();
    let headers: Vec<String> = match sheet_rows.next() {
        Some(first) => first
            .iter()
            .enumerate()
            .map(|(i, cell)| header_name(i, header_text(cell)))
            .collect(),
        None => Vec::new(),
    };

    let rows: Vec<Vec<Value>> = sheet_rows
        .map(|row| row.iter().map(cell_value).collect())
        .collect();

    warn_ragged(path, headers.len(), &rows);
    Ok(RecordTable::new(headers, rows))
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty | Data::Error(_) => String::new(),
        other => other.to_string(),
    }
}

/// Map a spreadsheet cell onto the table's value model.
pub(crate) fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Absent,
        Data::String(s) => text_cell(s),
        Data::Int(i) => Value::Number(*i as f64),
        Data::Float(f) if f.is_nan() => Value::Absent,
        Data::Float(f) => Value::Number(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_datetime()
            .map(Value::Timestamp)
            .unwrap_or_else(|| Value::Text(cell.to_string())),
        other => Value::Text(other.to_string()),
    }
}
