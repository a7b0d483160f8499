//! Similarity over dense per-node feature vectors.

use super::{MissingDataPolicy, SimilarityComputer, VectorMetric};

/// Scores nodes with a [`VectorMetric`] over optional per-node vectors.
///
/// Absent vectors and any kernel validation failure yield `NaN`.
///
/// # Examples
/// ```
/// use knng_core::{SimilarityComputer, VectorMetric, VectorSimilarity};
///
/// let computer = VectorSimilarity::new(
///     "embeddings",
///     VectorMetric::Cosine,
///     vec![Some(vec![1.0, 0.0]), Some(vec![2.0, 0.0]), None],
/// );
/// assert!((computer.similarity(0, 1) - 1.0).abs() < 1e-12);
/// assert!(computer.similarity(0, 2).is_nan());
/// ```
#[derive(Clone, Debug)]
pub struct VectorSimilarity {
    name: String,
    metric: VectorMetric,
    vectors: Vec<Option<Vec<f32>>>,
    policy: MissingDataPolicy,
}

impl VectorSimilarity {
    /// Creates a computer tolerating missing vectors.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        metric: VectorMetric,
        vectors: Vec<Option<Vec<f32>>>,
    ) -> Self {
        Self {
            name: name.into(),
            metric,
            vectors,
            policy: MissingDataPolicy::Tolerate,
        }
    }

    /// Creates a computer from vectors that are all present.
    #[must_use]
    pub fn from_dense(
        name: impl Into<String>,
        metric: VectorMetric,
        vectors: Vec<Vec<f32>>,
    ) -> Self {
        Self::new(name, metric, vectors.into_iter().map(Some).collect())
    }

    /// Declares every node's vector as required.
    #[must_use]
    pub fn require_vectors(mut self) -> Self {
        self.policy = MissingDataPolicy::FailFast;
        self
    }

    /// Returns the configured metric.
    #[must_use]
    pub fn metric(&self) -> VectorMetric {
        self.metric
    }

    fn vector(&self, node: usize) -> Option<&[f32]> {
        self.vectors.get(node)?.as_deref()
    }
}

impl SimilarityComputer for VectorSimilarity {
    fn node_count(&self) -> usize {
        self.vectors.len()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn similarity(&self, source: usize, target: usize) -> f64 {
        match (self.vector(source), self.vector(target)) {
            (Some(left), Some(right)) => self.metric.evaluate(left, right).unwrap_or(f64::NAN),
            _ => f64::NAN,
        }
    }

    fn missing_data_policy(&self) -> MissingDataPolicy {
        self.policy
    }
}
