// src/sink/parquet.rs
use parquet::{arrow::ArrowWriter, basic::Compression, file::properties::WriterProperties};
use std::{fs::File, path::Path};

use super::{arrow::to_record_batch, write_atomically};
use crate::error::SinkError;
use crate::table::RecordTable;

/// Write the table as a single-row-group Parquet file, returning the bytes on disk.
///
/// The file is staged next to `output_path` and renamed into place, so a
/// failed write leaves any previous file as it was.
pub fn write_parquet(table: &RecordTable, output_path: &Path) -> Result<u64, SinkError> {
    let batch = to_record_batch(table)?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();

    write_atomically(output_path, |file: File| {
        let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
        writer.write(&batch)?;
        writer.close()?;
        Ok(())
    })?;

    Ok(std::fs::metadata(output_path)?.len())
}
