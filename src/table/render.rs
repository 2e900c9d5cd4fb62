// src/table/render.rs
use super::RecordTable;
use std::fmt::Write;

const MAX_CELL_WIDTH: usize = 30;

fn clip(s: &str) -> String {
    if s.chars().count() > MAX_CELL_WIDTH {
        let mut out: String = s.chars().take(MAX_CELL_WIDTH - 1).collect();
        out.push('…');
        out
    } else {
        s.to_string()
    }
}

/// Render up to `limit` rows (all rows when `None`) as an aligned text grid,
/// with a leading row-number column and `NaN` standing in for absent cells.
pub fn render_grid(table: &RecordTable, limit: Option<usize>) -> String {
    let shown = limit.unwrap_or(table.num_rows()).min(table.num_rows());

    let header: Vec<String> = table.columns().iter().map(|c| clip(c)).collect();
    let body: Vec<Vec<String>> = table.rows()[..shown]
        .iter()
        .map(|row| {
            row.iter()
                .map(|v| if v.is_absent() { "NaN".to_string() } else { clip(&v.to_string()) })
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &body {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }
    let index_width = shown.saturating_sub(1).to_string().len();

    let mut out = String::new();
    let _ = write!(out, "{:>iw$}", "", iw = index_width);
    for (h, w) in header.iter().zip(&widths) {
        let _ = write!(out, "  {:>w$}", h, w = *w);
    }
    out.push('\n');
    for (i, row) in body.iter().enumerate() {
        let _ = write!(out, "{:<iw$}", i, iw = index_width);
        for (cell, w) in row.iter().zip(&widths) {
            let _ = write!(out, "  {:>w$}", cell, w = *w);
        }
        out.push('\n');
    }
    if shown < table.num_rows() {
        let _ = writeln!(out, "... ({} more rows)", table.num_rows() - shown);
    }
    let _ = write!(
        out,
        "[{} rows x {} columns]",
        table.num_rows(),
        table.num_columns()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Value;

    #[test]
    fn render_grid_limits_rows_and_marks_absent() {
        let t = RecordTable::new(
            vec!["product_name".into(), "price".into()],
            vec![
                vec![Value::Text("Bread".into()), Value::Number(15.0)],
                vec![Value::Text("Milk".into()), Value::Absent],
                vec![Value::Text("Eggs".into()), Value::Number(3.5)],
            ],
        );
        let out = render_grid(&t, Some(2));
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].contains("product_name"));
        assert!(lines[1].starts_with('0') && lines[1].ends_with("15"));
        assert!(lines[2].ends_with("NaN"));
        assert_eq!(lines[3], "... (1 more rows)");
        assert_eq!(lines[4], "[3 rows x 2 columns]");
    }
}
