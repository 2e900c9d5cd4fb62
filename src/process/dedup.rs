// src/process/dedup.rs
use std::collections::HashSet;
use tracing::info;

use crate::table::{RecordTable, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DedupStats {
    pub duplicates: usize,
    pub empty: usize,
}

/// Drop rows identical to an earlier row (first kept), then rows with no
/// present value at all. Retained rows keep their order.
#[tracing::instrument(level = "info", skip(table), fields(rows = table.num_rows()))]
pub fn dedup_rows(table: RecordTable) -> (RecordTable, DedupStats) {
    let (columns, rows) = table.into_parts();
    let before = rows.len();

    let mut seen: HashSet<Vec<Value>> = HashSet::with_capacity(rows.len());
    let mut unique = Vec::with_capacity(rows.len());
    for row in rows {
        if !seen.contains(&row) {
            seen.insert(row.clone());
            unique.push(row);
        }
    }
    let duplicates = before - unique.len();

    let after_dupes = unique.len();
    unique.retain(|row| !row.iter().all(Value::is_absent));
    let empty = after_dupes - unique.len();

    let stats = DedupStats { duplicates, empty };
    info!(
        duplicates,
        empty,
        remaining = unique.len(),
        "dropped duplicate and empty rows"
    );
    (RecordTable::new(columns, unique), stats)
}
