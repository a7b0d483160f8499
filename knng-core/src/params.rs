//! Validated NN-Descent parameters and the quantities derived from them.

use crate::error::{KnnError, Result};

/// Parameters controlling an NN-Descent run.
///
/// Values are validated by [`crate::KnnBuilder::build`]; a `KnnParams`
/// obtained from a built [`crate::Knn`] is always within range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KnnParams {
    pub(crate) top_k: usize,
    pub(crate) max_iterations: usize,
    pub(crate) sample_rate: f64,
    pub(crate) delta_threshold: f64,
    pub(crate) random_joins: usize,
    pub(crate) concurrency: usize,
    pub(crate) random_seed: Option<u64>,
    pub(crate) similarity_cutoff: f64,
    pub(crate) perturbation_rate: f64,
}

impl Default for KnnParams {
    fn default() -> Self {
        Self {
            top_k: 10,
            max_iterations: 100,
            sample_rate: 0.5,
            delta_threshold: 0.001,
            random_joins: 10,
            concurrency: 4,
            random_seed: None,
            similarity_cutoff: 0.0,
            perturbation_rate: 0.0,
        }
    }
}

impl KnnParams {
    /// Maximum number of neighbours retained per node.
    #[must_use]
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Upper bound on the number of refinement iterations.
    #[must_use]
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Fraction of old and new neighbours sampled per iteration.
    #[must_use]
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Fraction of the maximum update count at or below which the run is
    /// considered converged.
    #[must_use]
    pub fn delta_threshold(&self) -> f64 {
        self.delta_threshold
    }

    /// Random candidate joins attempted per node and iteration.
    #[must_use]
    pub fn random_joins(&self) -> usize {
        self.random_joins
    }

    /// Number of worker threads.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Seed for the run's random streams, when fixed.
    #[must_use]
    pub fn random_seed(&self) -> Option<u64> {
        self.random_seed
    }

    /// Similarities below this value are never stored.
    #[must_use]
    pub fn similarity_cutoff(&self) -> f64 {
        self.similarity_cutoff
    }

    /// Probability that a candidate tying a full list's minimum replaces it.
    #[must_use]
    pub fn perturbation_rate(&self) -> f64 {
        self.perturbation_rate
    }

    /// Returns the neighbour list capacity for a graph of `node_count` nodes.
    ///
    /// # Examples
    /// ```
    /// use knng_core::KnnBuilder;
    ///
    /// let knn = KnnBuilder::new().with_top_k(10).build()?;
    /// assert_eq!(knn.params().effective_k(4), 3);
    /// assert_eq!(knn.params().effective_k(100), 10);
    /// # Ok::<(), knng_core::KnnError>(())
    /// ```
    #[must_use]
    pub fn effective_k(&self, node_count: usize) -> usize {
        self.top_k.min(node_count.saturating_sub(1))
    }

    /// Returns `ceil(sample_rate * k)`, never below one for non-zero `k`.
    ///
    /// # Examples
    /// ```
    /// use knng_core::KnnBuilder;
    ///
    /// let knn = KnnBuilder::new().with_sample_rate(0.5).build()?;
    /// assert_eq!(knn.params().sampled_k(10), 5);
    /// assert_eq!(knn.params().sampled_k(3), 2);
    /// # Ok::<(), knng_core::KnnError>(())
    /// ```
    #[must_use]
    pub fn sampled_k(&self, k: usize) -> usize {
        if k == 0 {
            return 0;
        }
        let sampled = (self.sample_rate * k as f64).ceil() as usize;
        sampled.clamp(1, k)
    }

    pub(crate) fn validate(self) -> Result<Self> {
        if self.max_iterations == 0 {
            return Err(KnnError::invalid(
                "max_iterations",
                "must be at least 1",
            ));
        }
        if !(self.sample_rate > 0.0 && self.sample_rate <= 1.0) {
            return Err(KnnError::invalid(
                "sample_rate",
                format!("must lie in (0, 1], got {}", self.sample_rate),
            ));
        }
        if !(0.0..=1.0).contains(&self.delta_threshold) {
            return Err(KnnError::invalid(
                "delta_threshold",
                format!("must lie in [0, 1], got {}", self.delta_threshold),
            ));
        }
        if !(0.0..=1.0).contains(&self.perturbation_rate) {
            return Err(KnnError::invalid(
                "perturbation_rate",
                format!("must lie in [0, 1], got {}", self.perturbation_rate),
            ));
        }
        if !self.similarity_cutoff.is_finite() {
            return Err(KnnError::invalid(
                "similarity_cutoff",
                format!("must be finite, got {}", self.similarity_cutoff),
            ));
        }
        if self.concurrency == 0 {
            return Err(KnnError::invalid("concurrency", "must be at least 1"));
        }
        Ok(self)
    }
}
