//! Builder for configuring [`Knn`] runs.
//!
//! Every parameter has a default; [`KnnBuilder::build`] validates the
//! combination before any work starts.

use crate::{Result, knn::Knn, params::KnnParams};

/// Configures and constructs [`Knn`] instances.
///
/// # Examples
/// ```
/// use knng_core::KnnBuilder;
///
/// let knn = KnnBuilder::new()
///     .with_top_k(5)
///     .with_concurrency(1)
///     .with_random_seed(7)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(knn.params().top_k(), 5);
/// assert_eq!(knn.params().random_seed(), Some(7));
/// ```
#[derive(Clone, Debug, Default)]
pub struct KnnBuilder {
    params: KnnParams,
}

impl KnnBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use knng_core::KnnBuilder;
    ///
    /// let builder = KnnBuilder::new();
    /// assert_eq!(builder.params().top_k(), 10);
    /// assert_eq!(builder.params().max_iterations(), 100);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of neighbours retained per node. Zero yields an
    /// empty result.
    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.params.top_k = top_k;
        self
    }

    /// Caps the number of refinement iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.params.max_iterations = max_iterations;
        self
    }

    /// Sets the fraction of old and new neighbours sampled per iteration.
    #[must_use]
    pub fn with_sample_rate(mut self, sample_rate: f64) -> Self {
        self.params.sample_rate = sample_rate;
        self
    }

    /// Sets the convergence sensitivity.
    #[must_use]
    pub fn with_delta_threshold(mut self, delta_threshold: f64) -> Self {
        self.params.delta_threshold = delta_threshold;
        self
    }

    /// Sets the number of random candidate joins per node and iteration.
    #[must_use]
    pub fn with_random_joins(mut self, random_joins: usize) -> Self {
        self.params.random_joins = random_joins;
        self
    }

    /// Sets the number of worker threads.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.params.concurrency = concurrency;
        self
    }

    /// Fixes the random seed. Runs with the same seed and a concurrency of
    /// one produce identical results.
    #[must_use]
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.params.random_seed = Some(seed);
        self
    }

    /// Drops candidates whose similarity falls below `cutoff`.
    #[must_use]
    pub fn with_similarity_cutoff(mut self, cutoff: f64) -> Self {
        self.params.similarity_cutoff = cutoff;
        self
    }

    /// Sets the probability with which a candidate tying a full list's
    /// minimum replaces it.
    #[must_use]
    pub fn with_perturbation_rate(mut self, rate: f64) -> Self {
        self.params.perturbation_rate = rate;
        self
    }

    /// Returns the parameters configured so far, unvalidated.
    #[must_use]
    pub fn params(&self) -> &KnnParams {
        &self.params
    }

    /// Validates the configuration and constructs a [`Knn`] instance.
    ///
    /// # Errors
    /// Returns [`crate::KnnError::InvalidParameter`] naming the first
    /// parameter outside its accepted range.
    ///
    /// # Examples
    /// ```
    /// use knng_core::{KnnBuilder, KnnError};
    ///
    /// let err = KnnBuilder::new().with_sample_rate(0.0).build().unwrap_err();
    /// assert!(matches!(err, KnnError::InvalidParameter { parameter: "sample_rate", .. }));
    /// ```
    pub fn build(self) -> Result<Knn> {
        Ok(Knn::new(self.params.validate()?))
    }
}
