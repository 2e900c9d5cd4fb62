// src/sink/csv.rs
use csv::WriterBuilder;
use std::path::Path;

use super::write_atomically;
use crate::error::SinkError;
use crate::table::RecordTable;

/// Write the table as comma-delimited text: one header line of column names,
/// one line per record, absent cells as empty fields. A previous export at
/// `output_path` is only replaced once the new one is complete.
pub fn write_csv(table: &RecordTable, output_path: &Path) -> Result<(), SinkError> {
    write_atomically(output_path, |file| {
        let mut wtr = WriterBuilder::new().from_writer(file);
        wtr.write_record(table.columns())?;
        for row in table.rows() {
            wtr.write_record(row.iter().map(|v| v.to_string()))?;
        }
        let file = wtr.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        Ok(())
    })
}
