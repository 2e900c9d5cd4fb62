// src/process/normalize.rs
use tracing::{debug, warn};

use crate::table::{RecordTable, Value};

/// `trim → lowercase → ' ' → '_'`.
pub fn canonical_name(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "_")
}

/// Rename every column to its canonical form.
///
/// If two columns collapse onto the same name, the later column's values win
/// and the merged column stays where the first one was.
pub fn normalize_columns(table: RecordTable) -> RecordTable {
    let (raw_columns, rows) = table.into_parts();

    // For each output column: its name and the source index whose values it keeps.
    let mut columns: Vec<String> = Vec::with_capacity(raw_columns.len());
    let mut sources: Vec<usize> = Vec::with_capacity(raw_columns.len());
    for (src, raw) in raw_columns.iter().enumerate() {
        let name = canonical_name(raw);
        match columns.iter().position(|c| *c == name) {
            Some(slot) => {
                warn!(
                    column = %name,
                    "duplicate column after normalisation; later column overwrites earlier"
                );
                sources[slot] = src;
            }
            None => {
                columns.push(name);
                sources.push(src);
            }
        }
    }

    let rows: Vec<Vec<Value>> = if sources.len() == raw_columns.len() {
        rows
    } else {
        rows.into_iter()
            .map(|mut row| {
                sources
                    .iter()
                    .map(|&src| std::mem::replace(&mut row[src], Value::Absent))
                    .collect()
            })
            .collect()
    };

    debug!(?columns, "columns after cleaning");
    RecordTable::new(columns, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_name_rules() {
        assert_eq!(canonical_name("  Product Name "), "product_name");
        assert_eq!(canonical_name("Stock Qty"), "stock_qty");
        assert_eq!(canonical_name("BARCODE"), "barcode");
        assert_eq!(canonical_name(""), "");
    }

    #[test]
    fn canonical_name_is_idempotent() {
        for raw in ["  Product Name ", "Date Added", "already_clean", "Mixed  Case X"] {
            let once = canonical_name(raw);
            assert_eq!(canonical_name(&once), once);
        }
    }

    #[test]
    fn duplicate_names_keep_later_values_in_first_position() {
        let t = RecordTable::new(
            vec!["Price".into(), "Brand".into(), " price".into()],
            vec![vec![
                Value::Text("1".into()),
                Value::Text("Acme".into()),
                Value::Text("2".into()),
            ]],
        );
        let t = normalize_columns(t);
        assert_eq!(t.columns(), &["price", "brand"]);
        assert_eq!(
            t.rows()[0],
            vec![Value::Text("2".into()), Value::Text("Acme".into())]
        );
    }
}
