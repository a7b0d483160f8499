//! Dense vector storage and its ingestion entry points.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use arrow_array::{Array, FixedSizeListArray, RecordBatchReader};
use knng_core::VectorMetric;
use parquet::{
    arrow::{ProjectionMask, arrow_reader::ParquetRecordBatchReaderBuilder},
    file::reader::ChunkReader,
};
use tracing::{debug, instrument};

use crate::{
    errors::DenseProviderError,
    ingest::{RowBuffer, append_fixed_size_list_values, validate_fixed_size_list_field},
    similarity::DenseSimilarity,
    text::parse_text_rows,
};

/// Per-node `f32` feature vectors in a contiguous row-major buffer.
///
/// Rows may be missing; a missing row has no vector and every similarity
/// involving it is undefined.
#[derive(Clone, Debug)]
pub struct DenseVectors {
    name: String,
    dimension: usize,
    values: Vec<f32>,
    present: Vec<bool>,
}

impl DenseVectors {
    pub(crate) fn from_buffer(name: impl Into<String>, dimension: usize, buffer: RowBuffer) -> Self {
        debug_assert_eq!(buffer.values.len(), buffer.rows().saturating_mul(dimension));
        Self {
            name: name.into(),
            dimension,
            values: buffer.values,
            present: buffer.present,
        }
    }

    /// Builds vectors from optional rows of equal length.
    ///
    /// # Errors
    /// Returns [`DenseProviderError::InvalidRowLength`] when a present row's
    /// length differs from the first present row.
    ///
    /// # Examples
    /// ```
    /// use knng_providers_dense::DenseVectors;
    ///
    /// let vectors = DenseVectors::try_from_rows("demo", vec![Some(vec![1.0, 2.0]), None])?;
    /// assert_eq!(vectors.len(), 2);
    /// assert_eq!(vectors.row(0), Some(&[1.0, 2.0][..]));
    /// assert_eq!(vectors.row(1), None);
    /// # Ok::<(), knng_providers_dense::DenseProviderError>(())
    /// ```
    pub fn try_from_rows(
        name: impl Into<String>,
        rows: Vec<Option<Vec<f32>>>,
    ) -> Result<Self, DenseProviderError> {
        let dimension = rows.iter().flatten().map(Vec::len).next().unwrap_or(0);
        let mut buffer = RowBuffer::default();
        for (index, row) in rows.into_iter().enumerate() {
            match row {
                Some(values) if values.len() == dimension => {
                    buffer.values.extend(values);
                    buffer.present.push(true);
                }
                Some(values) => {
                    return Err(DenseProviderError::InvalidRowLength {
                        row: index,
                        expected: dimension,
                        actual: values.len(),
                    });
                }
                None => {
                    buffer.values.resize(buffer.values.len() + dimension, 0.0);
                    buffer.present.push(false);
                }
            }
        }
        Ok(Self::from_buffer(name, dimension, buffer))
    }

    /// Loads vectors from an Arrow [`FixedSizeListArray`].
    ///
    /// # Errors
    /// Returns [`DenseProviderError`] when the array is not a list of
    /// `Float32` or contains null components.
    pub fn try_from_fixed_size_list(
        name: impl Into<String>,
        array: &FixedSizeListArray,
    ) -> Result<Self, DenseProviderError> {
        let mut buffer = RowBuffer::default();
        let dimension = append_fixed_size_list_values(array, None, &mut buffer)?;
        Ok(Self::from_buffer(name, dimension, buffer))
    }

    /// Loads a Parquet column of `FixedSizeList<Float32, D>` rows from disk.
    ///
    /// # Errors
    /// Returns [`DenseProviderError`] when the file cannot be opened or the
    /// column is unusable.
    pub fn try_from_parquet_path(
        name: impl Into<String>,
        path: impl AsRef<Path>,
        column: &str,
    ) -> Result<Self, DenseProviderError> {
        let file = File::open(path)?;
        Self::try_from_parquet_reader(name, file, column)
    }

    /// Loads a Parquet column of `FixedSizeList<Float32, D>` rows.
    ///
    /// Null rows become missing vectors.
    ///
    /// # Errors
    /// Returns [`DenseProviderError`] when the column is absent, has the
    /// wrong type, changes dimension between batches or contains null
    /// components.
    #[instrument(name = "dense.parquet", err, skip(name, reader))]
    pub fn try_from_parquet_reader<R>(
        name: impl Into<String>,
        reader: R,
        column: &str,
    ) -> Result<Self, DenseProviderError>
    where
        R: ChunkReader + Send + 'static,
    {
        let builder = ParquetRecordBatchReaderBuilder::try_new(reader)?;
        let mask = ProjectionMask::columns(builder.parquet_schema(), [column]);
        let reader = builder.with_projection(mask).build()?;
        let schema = reader.schema();
        let column_index =
            schema
                .index_of(column)
                .map_err(|_| DenseProviderError::ColumnNotFound {
                    column: column.to_owned(),
                })?;
        let dimension = validate_fixed_size_list_field(schema.field(column_index), column)?;
        let mut buffer = RowBuffer::default();
        for batch in reader {
            let batch = batch?;
            let column_array = batch.column(column_index);
            let list = column_array
                .as_any()
                .downcast_ref::<FixedSizeListArray>()
                .ok_or_else(|| DenseProviderError::InvalidColumnType {
                    column: column.to_owned(),
                    actual: column_array.data_type().clone(),
                })?;
            append_fixed_size_list_values(list, Some(dimension), &mut buffer)?;
        }
        let vectors = Self::from_buffer(name, dimension, buffer);
        debug!(
            rows = vectors.len(),
            dimension,
            missing = vectors.missing_rows(),
            "parquet vectors loaded"
        );
        Ok(vectors)
    }

    /// Loads vectors from a text file with one comma-separated vector per
    /// line.
    ///
    /// # Errors
    /// Returns [`DenseProviderError`] when the file cannot be read or a line
    /// is malformed.
    pub fn try_from_text_path(
        name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Self, DenseProviderError> {
        let file = File::open(path)?;
        Self::try_from_text_reader(name, BufReader::new(file))
    }

    /// Loads vectors from comma- or whitespace-separated text.
    ///
    /// Each line holds one vector. A blank line is a missing vector and
    /// lines starting with `#` are skipped.
    ///
    /// # Errors
    /// Returns [`DenseProviderError::InvalidNumber`] for unparsable
    /// components and [`DenseProviderError::InconsistentLineDimension`] when
    /// a line's length differs from the first vector.
    ///
    /// # Examples
    /// ```
    /// use knng_providers_dense::DenseVectors;
    ///
    /// let text = "1.0, 2.0\n\n3.5 4.5\n";
    /// let vectors = DenseVectors::try_from_text_reader("demo", text.as_bytes())?;
    /// assert_eq!(vectors.len(), 3);
    /// assert_eq!(vectors.missing_rows(), 1);
    /// assert_eq!(vectors.row(2), Some(&[3.5, 4.5][..]));
    /// # Ok::<(), knng_providers_dense::DenseProviderError>(())
    /// ```
    #[instrument(name = "dense.text", err, skip(name, reader))]
    pub fn try_from_text_reader(
        name: impl Into<String>,
        reader: impl BufRead,
    ) -> Result<Self, DenseProviderError> {
        let (dimension, buffer) = parse_text_rows(reader)?;
        let vectors = Self::from_buffer(name, dimension, buffer);
        debug!(
            rows = vectors.len(),
            dimension,
            missing = vectors.missing_rows(),
            "text vectors loaded"
        );
        Ok(vectors)
    }

    /// Name used in logs and error messages.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rows, present or missing.
    #[must_use]
    pub fn len(&self) -> usize {
        self.present.len()
    }

    /// Returns whether there are no rows at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.present.is_empty()
    }

    /// Components per vector.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of rows without a vector.
    #[must_use]
    pub fn missing_rows(&self) -> usize {
        self.present.iter().filter(|present| !**present).count()
    }

    /// Returns the vector of `index`, or `None` when it is missing or out of
    /// range.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[f32]> {
        if !*self.present.get(index)? {
            return None;
        }
        let start = index.checked_mul(self.dimension)?;
        let end = start.checked_add(self.dimension)?;
        self.values.get(start..end)
    }

    /// Wraps the vectors in a similarity computer using `metric`.
    #[must_use]
    pub fn with_metric(self, metric: VectorMetric) -> DenseSimilarity {
        DenseSimilarity::new(self, metric)
    }
}
