//! Similarity computer over [`DenseVectors`].

use knng_core::{MissingDataPolicy, SimilarityComputer, VectorMetric};

use crate::vectors::DenseVectors;

/// Scores rows of a [`DenseVectors`] matrix with a [`VectorMetric`].
///
/// Missing rows and kernel validation failures yield `NaN`.
///
/// # Examples
/// ```
/// use knng_core::{SimilarityComputer, VectorMetric};
/// use knng_providers_dense::DenseVectors;
///
/// let computer = DenseVectors::try_from_rows(
///     "demo",
///     vec![Some(vec![0.0, 0.0]), Some(vec![3.0, 4.0]), None],
/// )?
/// .with_metric(VectorMetric::Euclidean);
/// assert!((computer.similarity(0, 1) - 1.0 / 6.0).abs() < 1e-12);
/// assert!(computer.similarity(0, 2).is_nan());
/// # Ok::<(), knng_providers_dense::DenseProviderError>(())
/// ```
#[derive(Clone, Debug)]
pub struct DenseSimilarity {
    vectors: DenseVectors,
    metric: VectorMetric,
    policy: MissingDataPolicy,
}

impl DenseSimilarity {
    pub(crate) fn new(vectors: DenseVectors, metric: VectorMetric) -> Self {
        Self {
            vectors,
            metric,
            policy: MissingDataPolicy::Tolerate,
        }
    }

    /// Treats a missing vector as fatal on first use.
    #[must_use]
    pub fn require_vectors(mut self) -> Self {
        self.policy = MissingDataPolicy::FailFast;
        self
    }

    /// Returns the wrapped vectors.
    #[must_use]
    pub fn vectors(&self) -> &DenseVectors {
        &self.vectors
    }

    /// Returns the configured metric.
    #[must_use]
    pub fn metric(&self) -> VectorMetric {
        self.metric
    }
}

impl SimilarityComputer for DenseSimilarity {
    fn node_count(&self) -> usize {
        self.vectors.len()
    }

    fn name(&self) -> &str {
        self.vectors.name()
    }

    fn similarity(&self, node: usize, candidate: usize) -> f64 {
        match (self.vectors.row(node), self.vectors.row(candidate)) {
            (Some(left), Some(right)) => self.metric.evaluate(left, right).unwrap_or(f64::NAN),
            _ => f64::NAN,
        }
    }

    fn missing_data_policy(&self) -> MissingDataPolicy {
        self.policy
    }
}
