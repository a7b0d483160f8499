//! Dense `f32` vector providers for the k-NN graph engine.
//!
//! Vectors are ingested from Parquet `FixedSizeList<Float32, D>` columns or
//! from delimited text and scored with a [`knng_core::VectorMetric`].

mod errors;
mod ingest;
mod similarity;
mod text;
mod vectors;

pub use errors::{DenseProviderError, DenseProviderErrorCode};
pub use similarity::DenseSimilarity;
pub use vectors::DenseVectors;

#[cfg(test)]
mod tests;
