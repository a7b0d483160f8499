use std::sync::Arc;

use arrow_array::{ArrayRef, FixedSizeListArray, Int32Array};
use arrow_schema::{DataType, Field};
use rstest::rstest;

use super::support::{dense_array, sparse_array};
use crate::{
    errors::DenseProviderError,
    ingest::{RowBuffer, append_fixed_size_list_values, validate_fixed_size_list_field},
};

#[rstest]
fn copies_rows_in_order() {
    let array = dense_array(&[vec![1.0, 2.0], vec![3.0, 4.0]], 2);
    let mut buffer = RowBuffer::default();
    let dimension = append_fixed_size_list_values(&array, None, &mut buffer).expect("copy");
    assert_eq!(dimension, 2);
    assert_eq!(buffer.values, vec![1.0, 2.0, 3.0, 4.0]);
    assert_eq!(buffer.present, vec![true, true]);
}

#[rstest]
fn null_rows_are_padded_and_marked_missing() {
    let array = sparse_array(
        vec![Some(vec![Some(1.0), Some(2.0)]), None, Some(vec![Some(5.0), Some(6.0)])],
        2,
    );
    let mut buffer = RowBuffer::default();
    append_fixed_size_list_values(&array, None, &mut buffer).expect("copy");
    assert_eq!(buffer.rows(), 3);
    assert_eq!(buffer.present, vec![true, false, true]);
    assert_eq!(buffer.values.len(), 6);
    assert_eq!(&buffer.values[4..], &[5.0, 6.0]);
}

#[rstest]
fn null_component_reports_absolute_row() {
    let mut buffer = RowBuffer::default();
    let first = dense_array(&[vec![0.0, 0.0]], 2);
    append_fixed_size_list_values(&first, None, &mut buffer).expect("first batch");
    let second = sparse_array(vec![Some(vec![Some(1.0), None])], 2);
    let err = append_fixed_size_list_values(&second, Some(2), &mut buffer)
        .expect_err("null component must fail");
    assert!(matches!(
        err,
        DenseProviderError::NullValue {
            row: 1,
            value_index: 1
        }
    ));
}

#[rstest]
fn batch_dimension_must_match() {
    let array = dense_array(&[vec![1.0, 2.0, 3.0]], 3);
    let mut buffer = RowBuffer::default();
    let err = append_fixed_size_list_values(&array, Some(2), &mut buffer)
        .expect_err("dimension mismatch must fail");
    assert!(matches!(
        err,
        DenseProviderError::InconsistentBatchDimension {
            expected: 2,
            actual: 3
        }
    ));
    assert_eq!(buffer.rows(), 0);
}

#[rstest]
fn non_float_items_are_rejected() {
    let values = Int32Array::from(vec![1, 2]);
    let array = FixedSizeListArray::new(
        Arc::new(Field::new("item", DataType::Int32, false)),
        2,
        Arc::new(values) as ArrayRef,
        None,
    );
    let mut buffer = RowBuffer::default();
    let err = append_fixed_size_list_values(&array, None, &mut buffer)
        .expect_err("int items must fail");
    assert!(matches!(
        err,
        DenseProviderError::InvalidListValueType {
            actual: DataType::Int32
        }
    ));
}

#[rstest]
#[case(true)]
#[case(false)]
fn accepts_float_list_fields(#[case] child_nullable: bool) {
    let field = Field::new(
        "features",
        DataType::FixedSizeList(
            Arc::new(Field::new("item", DataType::Float32, child_nullable)),
            4,
        ),
        true,
    );
    assert_eq!(
        validate_fixed_size_list_field(&field, "features").expect("valid field"),
        4
    );
}

#[rstest]
#[case(DataType::Float32)]
#[case(DataType::Utf8)]
fn rejects_non_list_fields(#[case] data_type: DataType) {
    let field = Field::new("features", data_type, false);
    let err = validate_fixed_size_list_field(&field, "features").expect_err("must fail");
    assert!(matches!(err, DenseProviderError::InvalidColumnType { .. }));
}

#[rstest]
fn rejects_zero_width_lists() {
    let field = Field::new(
        "features",
        DataType::FixedSizeList(Arc::new(Field::new("item", DataType::Float32, false)), 0),
        false,
    );
    let err = validate_fixed_size_list_field(&field, "features").expect_err("must fail");
    assert!(matches!(err, DenseProviderError::InvalidDimension { actual: 0 }));
}
