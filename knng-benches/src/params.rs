//! Benchmark parameter types used as Criterion benchmark ids.

use std::fmt;

/// Parameters for an NN-Descent build benchmark.
#[derive(Clone, Debug)]
pub struct KnnBenchParams {
    /// Number of points in the dataset.
    pub point_count: usize,
    /// Neighbours kept per node.
    pub top_k: usize,
    /// Worker threads.
    pub concurrency: usize,
}

impl fmt::Display for KnnBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={},k={},threads={}",
            self.point_count, self.top_k, self.concurrency
        )
    }
}

/// Parameters for one step of the sample-rate sweep.
#[derive(Clone, Debug)]
pub struct SweepBenchParams {
    /// Number of points in the dataset.
    pub point_count: usize,
    /// Sample rate in whole percent, in `1..=100`.
    pub sample_rate_percent: u32,
}

impl SweepBenchParams {
    /// Returns the sample rate as the fraction expected by the engine.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "the engine takes the sample rate as a fraction"
    )]
    pub fn sample_rate(&self) -> f64 {
        f64::from(self.sample_rate_percent) / 100.0
    }
}

impl fmt::Display for SweepBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={},rate={}%",
            self.point_count, self.sample_rate_percent
        )
    }
}
