//! Similarity abstractions consumed by the NN-Descent engine.
//!
//! A [`SimilarityComputer`] maps an ordered pair of node identifiers to a
//! score where larger means "more alike". Undefined relationships (for
//! example a node without a property value) are reported as `NaN` rather
//! than as errors; the engine never stores an undefined similarity.

mod metric;
mod scalar;
mod vector;

pub use self::metric::{
    MetricError, VectorKind, VectorMetric, cosine_similarity, euclidean_similarity,
    pearson_similarity,
};
pub use self::scalar::ScalarSimilarity;
pub use self::vector::VectorSimilarity;

/// How the engine treats an undefined (`NaN`) similarity.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum MissingDataPolicy {
    /// Skip the candidate pair silently.
    #[default]
    Tolerate,
    /// Abort the run with [`crate::KnnError::MissingSimilarity`] when an
    /// undefined similarity is observed during initialisation or the first
    /// iteration, the point at which every node's inputs are first read.
    FailFast,
}

/// Capability computing pairwise node similarities.
///
/// Implementations must be side-effect free and safe to call from many
/// worker threads at once.
///
/// # Examples
/// ```
/// use knng_core::SimilarityComputer;
///
/// struct Positions(Vec<f64>);
///
/// impl SimilarityComputer for Positions {
///     fn node_count(&self) -> usize { self.0.len() }
///     fn name(&self) -> &str { "positions" }
///     fn similarity(&self, source: usize, target: usize) -> f64 {
///         match (self.0.get(source), self.0.get(target)) {
///             (Some(a), Some(b)) => 1.0 / (1.0 + (a - b).abs()),
///             _ => f64::NAN,
///         }
///     }
/// }
///
/// let positions = Positions(vec![0.0, 1.0, 3.0]);
/// assert_eq!(positions.similarity(0, 1), 0.5);
/// assert!(positions.similarity(0, 9).is_nan());
/// ```
pub trait SimilarityComputer: Sync {
    /// Returns the number of nodes; identifiers are dense in `[0, node_count)`.
    fn node_count(&self) -> usize;

    /// Returns a human-readable name used in logs and errors.
    fn name(&self) -> &str;

    /// Computes the similarity between `source` and `target`.
    ///
    /// Returns `NaN` when the similarity is undefined.
    fn similarity(&self, source: usize, target: usize) -> f64;

    /// Declares whether undefined similarities are fatal on first use.
    fn missing_data_policy(&self) -> MissingDataPolicy {
        MissingDataPolicy::Tolerate
    }
}

impl<T: SimilarityComputer + ?Sized> SimilarityComputer for &T {
    fn node_count(&self) -> usize {
        (**self).node_count()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn similarity(&self, source: usize, target: usize) -> f64 {
        (**self).similarity(source, target)
    }

    fn missing_data_policy(&self) -> MissingDataPolicy {
        (**self).missing_data_policy()
    }
}
