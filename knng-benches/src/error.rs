//! Benchmark setup error type.
//!
//! Lets setup helpers propagate failures with `?` instead of panicking
//! inside Criterion closures.

use knng_core::KnnError;

use crate::source::SyntheticError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic data generation failed.
    #[error("synthetic source generation failed: {0}")]
    Synthetic(#[from] SyntheticError),
    /// Configuring or running NN-Descent failed.
    #[error("k-NN run failed: {0}")]
    Knn(#[from] KnnError),
    /// Writing a quality report failed.
    #[error("failed to write report: {0}")]
    Report(#[from] std::io::Error),
}
