// src/table/mod.rs
pub mod render;

use chrono::NaiveDateTime;
use std::{
    fmt,
    hash::{Hash, Hasher},
};

/// Rendering used for timestamps in exports and console output.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single cell of a `RecordTable`.
#[derive(Debug, Clone)]
pub enum Value {
    Text(String),
    Number(f64),
    Timestamp(NaiveDateTime),
    Bool(bool),
    Absent,
}

impl Value {
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text rendering of a present value; `None` for `Absent`.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Absent => None,
            other => Some(other.to_string()),
        }
    }

    fn kind(&self) -> Option<ColumnType> {
        match self {
            Value::Text(_) => Some(ColumnType::Text),
            Value::Number(_) => Some(ColumnType::Number),
            Value::Timestamp(_) => Some(ColumnType::Timestamp),
            Value::Bool(_) => Some(ColumnType::Boolean),
            Value::Absent => None,
        }
    }
}

/// Integral numbers render without a fractional part (`12`, not `12.0`).
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Timestamp(ts) => write!(f, "{}", ts.format(TIMESTAMP_FORMAT)),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Absent => Ok(()),
        }
    }
}

// Exact comparison: numbers compare by bit pattern so that rows can be hashed.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a.to_bits() == b.to_bits(),
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Absent, Value::Absent) => true,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Text(s) => s.hash(state),
            Value::Number(n) => n.to_bits().hash(state),
            Value::Timestamp(ts) => ts.hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Absent => {}
        }
    }
}

/// Storage type of a whole column, decided at write time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Number,
    Timestamp,
    Boolean,
    Text,
}

/// The kind shared by every present value, or `Text` when kinds are mixed
/// or nothing is present.
pub fn infer_column_type<'a>(values: impl IntoIterator<Item = &'a Value>) -> ColumnType {
    let mut seen: Option<ColumnType> = None;
    for kind in values.into_iter().filter_map(Value::kind) {
        match seen {
            None => seen = Some(kind),
            Some(prev) if prev != kind => return ColumnType::Text,
            Some(_) => {}
        }
    }
    seen.unwrap_or(ColumnType::Text)
}

/// The in-memory table handed from stage to stage.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl RecordTable {
    /// Build a table, padding short rows with `Absent` and truncating long ones.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Value::Absent);
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<Value>>) {
        (self.columns, self.rows)
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Values of column `idx`, top to bottom.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().map(move |row| &row[idx])
    }

    pub fn column_type(&self, idx: usize) -> ColumnType {
        infer_column_type(self.column(idx))
    }

    pub fn count_absent(&self, idx: usize) -> usize {
        self.column(idx).filter(|v| v.is_absent()).count()
    }

    /// Rewrite every cell of column `idx` in place.
    pub fn map_column<F>(&mut self, idx: usize, mut f: F)
    where
        F: FnMut(Value) -> Value,
    {
        for row in &mut self.rows {
            let cell = std::mem::replace(&mut row[idx], Value::Absent);
            row[idx] = f(cell);
        }
    }

    /// Replace column `name` if present, otherwise append it.
    pub fn set_column(&mut self, name: &str, values: Vec<Value>) {
        debug_assert_eq!(values.len(), self.rows.len());
        match self.column_index(name) {
            Some(idx) => {
                for (row, v) in self.rows.iter_mut().zip(values) {
                    row[idx] = v;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, v) in self.rows.iter_mut().zip(values) {
                    row.push(v);
                }
            }
        }
    }

    pub fn retain_rows<F>(&mut self, f: F)
    where
        F: FnMut(&Vec<Value>) -> bool,
    {
        self.rows.retain(f);
    }
}
