use crate::config::CleaningRules;
use crate::process::{date_parser, utils};
use crate::table::{RecordTable, Value};
use tracing::{debug, warn};

/// Present values that could not be parsed into their column's type,
/// per column, in the order the columns were coerced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoercionReport {
    pub failures: Vec<(String, usize)>,
}

impl CoercionReport {
    pub fn total(&self) -> usize {
        self.failures.iter().map(|(_, n)| n).sum()
    }

    pub fn for_column(&self, name: &str) -> usize {
        self.failures
            .iter()
            .find(|(c, _)| c == name)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}

pub(crate) fn to_number(v: Value) -> Value {
    match v {
        Value::Number(n) if !n.is_finite() => Value::Absent,
        Value::Number(_) => v,
        Value::Text(s) => match utils::clean_str(&s).parse::<f64>() {
            Ok(n) if n.is_finite() => Value::Number(n),
            _ => Value::Absent,
        },
        Value::Bool(b) => Value::Number(if b { 1.0 } else { 0.0 }),
        Value::Timestamp(_) | Value::Absent => Value::Absent,
    }
}

pub(crate) fn to_timestamp(v: Value) -> Value {
    match v {
        Value::Timestamp(_) => v,
        Value::Text(s) => date_parser::parse_timestamp(&utils::clean_str(&s))
            .map(Value::Timestamp)
            .unwrap_or(Value::Absent),
        _ => Value::Absent,
    }
}

/// Cast one column with `convert`, counting present values that turn absent.
fn coerce_column(
    table: &mut RecordTable,
    name: &str,
    convert: fn(Value) -> Value,
) -> Option<usize> {
    let idx = table.column_index(name)?;
    let mut failed = 0;
    table.map_column(idx, |v| {
        let was_present = !v.is_absent();
        let out = convert(v);
        if was_present && out.is_absent() {
            failed += 1;
        }
        out
    });
    Some(failed)
}

/// Convert the configured numeric and date columns to their final types.
///
/// Unparseable cells become `Value::Absent`; this never fails. Columns not in
/// the table are skipped.
#[tracing::instrument(level = "info", skip_all)]
pub fn coerce_types(
    mut table: RecordTable,
    rules: &CleaningRules,
) -> (RecordTable, CoercionReport) {
    let mut report = CoercionReport::default();

    let groups: [(&[String], fn(Value) -> Value); 2] = [
        (&rules.numeric_columns, to_number),
        (&rules.date_columns, to_timestamp),
    ];
    for (names, convert) in groups {
        for name in names {
            match coerce_column(&mut table, name, convert) {
                Some(0) => report.failures.push((name.clone(), 0)),
                Some(failed) => {
                    warn!(column = %name, failed, "values could not be parsed; treated as missing");
                    report.failures.push((name.clone(), failed));
                }
                None => debug!(column = %name, "column not present; skipping"),
            }
        }
    }

    (table, report)
}
