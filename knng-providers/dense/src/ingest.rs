//! Copies Arrow fixed-size list arrays into row-major buffers.
//!
//! Null rows are recorded as missing vectors and padded with zeros so row
//! offsets stay uniform. Null components inside a present row are errors.

use arrow_array::{Array, FixedSizeListArray, Float32Array};
use arrow_schema::{DataType, Field};

use crate::errors::DenseProviderError;

/// Row-major values plus a presence flag per row.
#[derive(Debug, Default)]
pub(crate) struct RowBuffer {
    pub(crate) values: Vec<f32>,
    pub(crate) present: Vec<bool>,
}

impl RowBuffer {
    pub(crate) fn rows(&self) -> usize {
        self.present.len()
    }
}

pub(crate) fn validate_fixed_size_list_field(
    field: &Field,
    column: &str,
) -> Result<usize, DenseProviderError> {
    match field.data_type() {
        DataType::FixedSizeList(child, width) => {
            if child.data_type() != &DataType::Float32 {
                return Err(DenseProviderError::InvalidListValueType {
                    actual: child.data_type().clone(),
                });
            }
            dimension_from_width(*width)
        }
        other => Err(DenseProviderError::InvalidColumnType {
            column: column.to_owned(),
            actual: other.clone(),
        }),
    }
}

/// Appends every row of `array` to `out` and returns the array's dimension.
pub(crate) fn append_fixed_size_list_values(
    array: &FixedSizeListArray,
    expected_dimension: Option<usize>,
    out: &mut RowBuffer,
) -> Result<usize, DenseProviderError> {
    let value_type = array.value_type();
    if value_type != DataType::Float32 {
        return Err(DenseProviderError::InvalidListValueType { actual: value_type });
    }
    let dimension = dimension_from_width(array.value_length())?;
    if let Some(expected) = expected_dimension.filter(|&expected| expected != dimension) {
        return Err(DenseProviderError::InconsistentBatchDimension {
            expected,
            actual: dimension,
        });
    }
    copy_list_values(array, dimension, out)?;
    Ok(dimension)
}

fn dimension_from_width(width: i32) -> Result<usize, DenseProviderError> {
    usize::try_from(width)
        .ok()
        .filter(|&dimension| dimension > 0)
        .ok_or(DenseProviderError::InvalidDimension { actual: width })
}

pub(crate) fn copy_list_values(
    array: &FixedSizeListArray,
    dimension: usize,
    out: &mut RowBuffer,
) -> Result<(), DenseProviderError> {
    let rows = array.len();
    let additional = rows
        .checked_mul(dimension)
        .ok_or(DenseProviderError::CapacityOverflow { rows, dimension })?;
    out.values.reserve(additional);
    out.present.reserve(rows);
    for row_index in 0..rows {
        let absolute_row = out.rows();
        if array.is_null(row_index) {
            out.values.resize(out.values.len() + dimension, 0.0);
            out.present.push(false);
            continue;
        }
        let row = array.value(row_index);
        let floats = row.as_any().downcast_ref::<Float32Array>().ok_or_else(|| {
            DenseProviderError::InvalidListValueType {
                actual: row.data_type().clone(),
            }
        })?;
        if floats.len() != dimension {
            return Err(DenseProviderError::InvalidRowLength {
                row: absolute_row,
                expected: dimension,
                actual: floats.len(),
            });
        }
        if let Some(value_index) = (0..dimension).find(|&index| floats.is_null(index)) {
            return Err(DenseProviderError::NullValue {
                row: absolute_row,
                value_index,
            });
        }
        out.values.extend(floats.iter().flatten());
        out.present.push(true);
    }
    Ok(())
}
