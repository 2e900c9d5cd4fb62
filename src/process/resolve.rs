// src/process/resolve.rs
//! Missing-value resolution.
//!
//! Rules run in a fixed order over the whole table:
//!
//! 1. identity (product name) column: rows without a value are dropped
//! 2. price: `missing_price` flag, filled per [`FillPolicy`]
//! 3. identifier columns (barcode): cast to text, flag absent or sentinel, fill `UNKNOWN`
//! 4. categorical columns: flag, fill `Unknown`, title-case the whole column
//! 5. stock columns: flag, fill `0`
//!
//! A rule whose column is not in the table is skipped. Only a missing
//! identity column is an error.

use tracing::{debug, info};

use crate::config::{CleaningRules, FillPolicy};
use crate::error::SchemaError;
use crate::process::utils::title_case;
use crate::table::{RecordTable, Value};

/// Name of the flag column recording pre-fill absence of `column`.
pub fn flag_column_name(column: &str) -> String {
    format!("missing_{}", column)
}

/// First column, in table order, whose name contains both `product` and `name`.
pub fn detect_identity_column(columns: &[String]) -> Option<&str> {
    columns
        .iter()
        .map(String::as_str)
        .find(|c| c.contains("product") && c.contains("name"))
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionReport {
    pub identity_column: String,
    /// Rows removed because their identity value was absent.
    pub dropped_rows: usize,
    /// `(flag column, true count)` in the order the flags were added.
    pub flags: Vec<(String, usize)>,
    /// Value used to fill the price column, when it exists.
    pub price_fill: Option<f64>,
}

impl ResolutionReport {
    pub fn flagged(&self, flag_column: &str) -> Option<usize> {
        self.flags
            .iter()
            .find(|(c, _)| c == flag_column)
            .map(|(_, n)| *n)
    }
}

/// Fill every absent cell of `column` with the value `fill` returns, after
/// recording a `missing_<column>` flag. `is_missing` decides what the flag
/// counts; `fill` is only applied to absent cells.
fn flag_and_fill<M, F>(
    table: &mut RecordTable,
    column: &str,
    is_missing: M,
    fill: F,
    report: &mut ResolutionReport,
) where
    M: Fn(&Value) -> bool,
    F: Fn() -> Value,
{
    let Some(idx) = table.column_index(column) else {
        debug!(column, "column not present; rule skipped");
        return;
    };

    let flags: Vec<Value> = table.column(idx).map(|v| Value::Bool(is_missing(v))).collect();
    let count = flags.iter().filter(|f| matches!(f, Value::Bool(true))).count();

    table.map_column(idx, |v| if v.is_absent() { fill() } else { v });

    let flag_name = flag_column_name(column);
    table.set_column(&flag_name, flags);
    debug!(column, missing = count, "flagged and filled");
    report.flags.push((flag_name, count));
}

/// Mean of the finite numbers in column `idx`; `None` if there are none or
/// the sum overflows.
fn column_mean(table: &RecordTable, idx: usize) -> Option<f64> {
    let (sum, n) = table
        .column(idx)
        .filter_map(Value::as_number)
        .filter(|x| x.is_finite())
        .fold((0.0, 0usize), |(s, n), x| (s + x, n + 1));
    (n > 0)
        .then(|| sum / n as f64)
        .filter(|mean| mean.is_finite())
}

/// Present values as text, absent kept absent.
fn to_text(v: Value) -> Value {
    match v {
        Value::Absent | Value::Text(_) => v,
        other => Value::Text(other.to_string()),
    }
}

/// Apply the missing-value rules. See the module docs for the order.
#[tracing::instrument(level = "info", skip_all, fields(rows = table.num_rows()))]
pub fn resolve_missing(
    mut table: RecordTable,
    rules: &CleaningRules,
) -> Result<(RecordTable, ResolutionReport), SchemaError> {
    // 1) identity column
    let identity = detect_identity_column(table.columns())
        .map(str::to_string)
        .ok_or_else(|| SchemaError::MissingIdentityColumn {
            columns: table.columns().to_vec(),
        })?;
    let id_idx = table
        .column_index(&identity)
        .ok_or_else(|| SchemaError::MissingIdentityColumn {
            columns: table.columns().to_vec(),
        })?;

    let before = table.num_rows();
    table.retain_rows(|row| !row[id_idx].is_absent());
    let dropped_rows = before - table.num_rows();
    info!(column = %identity, dropped_rows, "dropped rows without a product name");

    let mut report = ResolutionReport {
        identity_column: identity,
        dropped_rows,
        flags: Vec::new(),
        price_fill: None,
    };

    // 2) price
    if let Some(idx) = table.column_index(&rules.price_column) {
        let fill = match rules.price_fill {
            FillPolicy::Zero => 0.0,
            FillPolicy::Mean => column_mean(&table, idx).unwrap_or(0.0),
        };
        report.price_fill = Some(fill);
        flag_and_fill(
            &mut table,
            &rules.price_column,
            Value::is_absent,
            || Value::Number(fill),
            &mut report,
        );
    }

    // 3) identifiers
    for column in &rules.identifier_columns {
        if let Some(idx) = table.column_index(column) {
            table.map_column(idx, to_text);
        }
        let sentinels = &rules.identifier_sentinels;
        let unknown = &rules.unknown_identifier;
        flag_and_fill(
            &mut table,
            column,
            |v| match v {
                Value::Absent => true,
                Value::Text(s) => sentinels.iter().any(|x| x == s),
                _ => false,
            },
            || Value::Text(unknown.clone()),
            &mut report,
        );
    }

    // 4) categoricals
    for column in &rules.categorical_columns {
        let unknown = &rules.unknown_category;
        flag_and_fill(
            &mut table,
            column,
            Value::is_absent,
            || Value::Text(unknown.clone()),
            &mut report,
        );
        if let Some(idx) = table.column_index(column) {
            table.map_column(idx, |v| match to_text(v) {
                Value::Text(s) => Value::Text(title_case(&s)),
                other => other,
            });
        }
    }

    // 5) stock
    for column in &rules.stock_columns {
        flag_and_fill(
            &mut table,
            column,
            Value::is_absent,
            || Value::Number(0.0),
            &mut report,
        );
    }

    Ok((table, report))
}
