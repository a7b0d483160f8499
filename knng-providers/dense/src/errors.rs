//! Errors raised while loading dense vectors.

use arrow_schema::{ArrowError, DataType};
use knng_core::define_error_codes;
use thiserror::Error;

/// Failure while ingesting dense vectors from Parquet or text.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DenseProviderError {
    /// The requested column is absent from the Parquet schema.
    #[error("column `{column}` not found in Parquet schema")]
    ColumnNotFound {
        /// Requested column name.
        column: String,
    },
    /// The column is not a fixed-size list.
    #[error("column `{column}` must be a FixedSizeList<Float32, _> but found {actual:?}")]
    InvalidColumnType {
        /// Requested column name.
        column: String,
        /// Type found in the schema.
        actual: DataType,
    },
    /// The list items are not `Float32`.
    #[error("FixedSizeList child type must be Float32 but found {actual:?}")]
    InvalidListValueType {
        /// Item type found in the schema.
        actual: DataType,
    },
    /// The list width cannot be used as a dimension.
    #[error("invalid FixedSizeList dimension {actual}")]
    InvalidDimension {
        /// Width declared by the schema.
        actual: i32,
    },
    /// A present row contains a null component.
    #[error("row {row} contains null value at position {value_index}")]
    NullValue {
        /// Row index across all batches.
        row: usize,
        /// Position of the first null component.
        value_index: usize,
    },
    /// A row's length disagrees with the declared dimension.
    #[error("row {row} has length {actual} but expected {expected}")]
    InvalidRowLength {
        /// Row index across all batches.
        row: usize,
        /// Declared dimension.
        expected: usize,
        /// Observed length.
        actual: usize,
    },
    /// The matrix size overflows `usize`.
    #[error("matrix with {rows} rows and dimension {dimension} exceeds capacity limits")]
    CapacityOverflow {
        /// Row count.
        rows: usize,
        /// Row dimension.
        dimension: usize,
    },
    /// Record batches declare different dimensions.
    #[error("inconsistent dimensions across batches: expected {expected}, got {actual}")]
    InconsistentBatchDimension {
        /// Dimension of the first batch.
        expected: usize,
        /// Dimension of the offending batch.
        actual: usize,
    },
    /// A text component could not be parsed as `f32`.
    #[error("line {line}: cannot parse component {position} `{value}` as a float")]
    InvalidNumber {
        /// One-based line number.
        line: usize,
        /// Zero-based component position.
        position: usize,
        /// Offending text.
        value: String,
    },
    /// A text line's component count disagrees with the first vector.
    #[error("line {line} has {actual} components but expected {expected}")]
    InconsistentLineDimension {
        /// One-based line number.
        line: usize,
        /// Dimension of the first vector.
        expected: usize,
        /// Components on this line.
        actual: usize,
    },
    /// Arrow decoding failed.
    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),
    /// Parquet decoding failed.
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    /// Reading the input failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

define_error_codes! {
    /// Stable codes describing [`DenseProviderError`] variants.
    enum DenseProviderErrorCode for DenseProviderError {
        /// The requested column is absent.
        ColumnNotFound => ColumnNotFound { .. } => "DENSE_COLUMN_NOT_FOUND",
        /// The column is not a fixed-size list.
        InvalidColumnType => InvalidColumnType { .. } => "DENSE_INVALID_COLUMN_TYPE",
        /// The list items are not `Float32`.
        InvalidListValueType => InvalidListValueType { .. } => "DENSE_INVALID_LIST_VALUE_TYPE",
        /// The list width is unusable.
        InvalidDimension => InvalidDimension { .. } => "DENSE_INVALID_DIMENSION",
        /// A present row contains a null component.
        NullValue => NullValue { .. } => "DENSE_NULL_VALUE",
        /// A row's length disagrees with the dimension.
        InvalidRowLength => InvalidRowLength { .. } => "DENSE_INVALID_ROW_LENGTH",
        /// The matrix size overflows.
        CapacityOverflow => CapacityOverflow { .. } => "DENSE_CAPACITY_OVERFLOW",
        /// Record batches disagree on dimension.
        InconsistentBatchDimension => InconsistentBatchDimension { .. } => "DENSE_INCONSISTENT_BATCH_DIMENSION",
        /// A text component is not a float.
        InvalidNumber => InvalidNumber { .. } => "DENSE_INVALID_NUMBER",
        /// A text line disagrees with the dimension.
        InconsistentLineDimension => InconsistentLineDimension { .. } => "DENSE_INCONSISTENT_LINE_DIMENSION",
        /// Arrow decoding failed.
        Arrow => Arrow { .. } => "DENSE_ARROW",
        /// Parquet decoding failed.
        Parquet => Parquet { .. } => "DENSE_PARQUET",
        /// Reading the input failed.
        Io => Io { .. } => "DENSE_IO",
    }
}
