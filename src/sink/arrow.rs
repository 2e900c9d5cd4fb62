// src/sink/arrow.rs

use arrow::{
    array::{ArrayRef, BooleanBuilder, Float64Builder, StringBuilder, TimestampMicrosecondBuilder},
    datatypes::{DataType, Field, Schema, TimeUnit},
    error::ArrowError,
    record_batch::RecordBatch,
};
use std::sync::Arc;

use crate::table::{ColumnType, RecordTable, Value};

/// Map a column's storage type onto an Arrow DataType.
///
/// - Number    → Float64
/// - Timestamp → Timestamp(µs, no zone)
/// - Boolean   → Boolean
/// - Text      → Utf8
pub fn map_to_arrow_type(ty: ColumnType) -> DataType {
    match ty {
        ColumnType::Number => DataType::Float64,
        ColumnType::Timestamp => DataType::Timestamp(TimeUnit::Microsecond, None),
        ColumnType::Boolean => DataType::Boolean,
        ColumnType::Text => DataType::Utf8,
    }
}

/// Build an Arrow schema from the table's columns and inferred types.
/// Every field is nullable.
pub fn build_arrow_schema(table: &RecordTable) -> Arc<Schema> {
    let fields: Vec<Field> = table
        .columns()
        .iter()
        .enumerate()
        .map(|(i, name)| Field::new(name, map_to_arrow_type(table.column_type(i)), true))
        .collect();
    Arc::new(Schema::new(fields))
}

fn build_column(table: &RecordTable, idx: usize, ty: ColumnType) -> ArrayRef {
    match ty {
        ColumnType::Number => {
            let mut b = Float64Builder::with_capacity(table.num_rows());
            for v in table.column(idx) {
                b.append_option(v.as_number());
            }
            Arc::new(b.finish())
        }
        ColumnType::Timestamp => {
            let mut b = TimestampMicrosecondBuilder::with_capacity(table.num_rows());
            for v in table.column(idx) {
                b.append_option(match v {
                    Value::Timestamp(ts) => Some(ts.and_utc().timestamp_micros()),
                    _ => None,
                });
            }
            Arc::new(b.finish())
        }
        ColumnType::Boolean => {
            let mut b = BooleanBuilder::with_capacity(table.num_rows());
            for v in table.column(idx) {
                b.append_option(match v {
                    Value::Bool(x) => Some(*x),
                    _ => None,
                });
            }
            Arc::new(b.finish())
        }
        ColumnType::Text => {
            let mut b = StringBuilder::new();
            for v in table.column(idx) {
                b.append_option(v.to_text());
            }
            Arc::new(b.finish())
        }
    }
}

/// Convert the whole table into a single `RecordBatch`.
pub fn to_record_batch(table: &RecordTable) -> Result<RecordBatch, ArrowError> {
    let schema = build_arrow_schema(table);
    let cols: Vec<ArrayRef> = (0..table.num_columns())
        .map(|i| build_column(table, i, table.column_type(i)))
        .collect();
    RecordBatch::try_new(schema, cols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, BooleanArray, Float64Array, StringArray};

    #[test]
    fn batch_types_follow_column_values() -> anyhow::Result<()> {
        let table = RecordTable::new(
            vec!["product_name".into(), "price".into(), "missing_price".into(), "mixed".into()],
            vec![
                vec![
                    Value::Text("Bread".into()),
                    Value::Number(15.0),
                    Value::Bool(false),
                    Value::Number(1.0),
                ],
                vec![
                    Value::Text("Milk".into()),
                    Value::Absent,
                    Value::Bool(true),
                    Value::Text("two".into()),
                ],
            ],
        );
        let batch = to_record_batch(&table)?;

        assert_eq!(batch.num_rows(), 2);
        let schema = batch.schema();
        assert_eq!(schema.field(0).data_type(), &DataType::Utf8);
        assert_eq!(schema.field(1).data_type(), &DataType::Float64);
        assert_eq!(schema.field(2).data_type(), &DataType::Boolean);
        assert_eq!(schema.field(3).data_type(), &DataType::Utf8);

        let price = batch.column(1).as_any().downcast_ref::<Float64Array>().unwrap();
        assert_eq!(price.value(0), 15.0);
        assert!(price.is_null(1));

        let flag = batch.column(2).as_any().downcast_ref::<BooleanArray>().unwrap();
        assert!(flag.value(1));

        let mixed = batch.column(3).as_any().downcast_ref::<StringArray>().unwrap();
        assert_eq!(mixed.value(0), "1");
        Ok(())
    }
}
