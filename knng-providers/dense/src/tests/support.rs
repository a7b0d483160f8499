use std::sync::Arc;

use arrow_array::{Array, ArrayRef, FixedSizeListArray, Float32Array, RecordBatch, types::Float32Type};
use arrow_schema::{DataType, Field, Schema};
use bytes::Bytes;
use parquet::arrow::arrow_writer::ArrowWriter;

/// Builds a list array whose rows are all present.
pub(crate) fn dense_array(rows: &[Vec<f32>], dimension: usize) -> FixedSizeListArray {
    assert!(rows.iter().all(|row| row.len() == dimension));
    let values = Float32Array::from_iter_values(rows.iter().flatten().copied());
    FixedSizeListArray::new(
        Arc::new(Field::new("item", DataType::Float32, false)),
        i32::try_from(dimension).expect("dimension fits in i32"),
        Arc::new(values) as ArrayRef,
        None,
    )
}

/// Builds a list array where `None` rows are null and `None` components are
/// null values.
pub(crate) fn sparse_array(rows: Vec<Option<Vec<Option<f32>>>>, dimension: usize) -> FixedSizeListArray {
    FixedSizeListArray::from_iter_primitive::<Float32Type, _, _>(
        rows,
        i32::try_from(dimension).expect("dimension fits in i32"),
    )
}

pub(crate) fn batch_with_column(column: &str, array: FixedSizeListArray) -> RecordBatch {
    let field = Field::new(column, array.data_type().clone(), true);
    RecordBatch::try_new(Arc::new(Schema::new(vec![field])), vec![Arc::new(array) as ArrayRef])
        .expect("record batch matches schema")
}

/// Serialises `batches` into an in-memory Parquet file.
pub(crate) fn parquet_bytes(batches: &[RecordBatch]) -> Bytes {
    let schema = batches.first().expect("at least one batch").schema();
    let mut buffer = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buffer, schema, None).expect("create writer");
    for batch in batches {
        writer.write(batch).expect("write batch");
    }
    writer.close().expect("close writer");
    Bytes::from(buffer)
}

pub(crate) fn float_batch(column: &str, values: Vec<f32>) -> RecordBatch {
    let field = Field::new(column, DataType::Float32, false);
    RecordBatch::try_new(
        Arc::new(Schema::new(vec![field])),
        vec![Arc::new(Float32Array::from(values)) as ArrayRef],
    )
    .expect("record batch matches schema")
}
