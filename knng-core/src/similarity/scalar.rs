//! Similarity over a single numeric node property.

use super::{MissingDataPolicy, SimilarityComputer};

/// Scores nodes by the distance between one scalar property each:
/// `1 / (1 + |a - b|)`.
///
/// Nodes without a value, or with a non-finite one, have an undefined
/// similarity to every other node.
///
/// # Examples
/// ```
/// use knng_core::{MissingDataPolicy, ScalarSimilarity, SimilarityComputer};
///
/// let computer = ScalarSimilarity::new("age", vec![Some(30.0), Some(31.0), None]);
/// assert_eq!(computer.similarity(0, 1), 0.5);
/// assert!(computer.similarity(0, 2).is_nan());
///
/// let strict = computer.require_values();
/// assert_eq!(strict.missing_data_policy(), MissingDataPolicy::FailFast);
/// ```
#[derive(Clone, Debug)]
pub struct ScalarSimilarity {
    name: String,
    values: Vec<Option<f64>>,
    policy: MissingDataPolicy,
}

impl ScalarSimilarity {
    /// Creates a computer tolerating missing values.
    #[must_use]
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
            policy: MissingDataPolicy::Tolerate,
        }
    }

    /// Declares every node's value as required.
    #[must_use]
    pub fn require_values(mut self) -> Self {
        self.policy = MissingDataPolicy::FailFast;
        self
    }

    fn value(&self, node: usize) -> Option<f64> {
        self.values
            .get(node)
            .copied()
            .flatten()
            .filter(|value| value.is_finite())
    }
}

impl SimilarityComputer for ScalarSimilarity {
    fn node_count(&self) -> usize {
        self.values.len()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn similarity(&self, source: usize, target: usize) -> f64 {
        match (self.value(source), self.value(target)) {
            (Some(left), Some(right)) => 1.0 / (1.0 + (left - right).abs()),
            _ => f64::NAN,
        }
    }

    fn missing_data_policy(&self) -> MissingDataPolicy {
        self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 1, 0.5)]
    #[case(1, 0, 0.5)]
    #[case(0, 0, 1.0)]
    #[case(0, 2, 0.2)]
    fn scores_absolute_difference(#[case] a: usize, #[case] b: usize, #[case] expected: f64) {
        let computer = ScalarSimilarity::new("score", vec![Some(1.0), Some(2.0), Some(5.0)]);
        assert!((computer.similarity(a, b) - expected).abs() < 1e-12);
    }

    #[rstest]
    #[case(vec![Some(1.0), None])]
    #[case(vec![Some(1.0), Some(f64::NAN)])]
    #[case(vec![Some(1.0), Some(f64::INFINITY)])]
    fn missing_or_non_finite_values_are_undefined(#[case] values: Vec<Option<f64>>) {
        let computer = ScalarSimilarity::new("score", values);
        assert!(computer.similarity(0, 1).is_nan());
        assert!(computer.similarity(1, 0).is_nan());
    }

    #[rstest]
    fn out_of_range_nodes_are_undefined() {
        let computer = ScalarSimilarity::new("score", vec![Some(1.0)]);
        assert!(computer.similarity(0, 4).is_nan());
    }

    #[rstest]
    fn policy_defaults_to_tolerate() {
        let computer = ScalarSimilarity::new("score", vec![]);
        assert_eq!(computer.missing_data_policy(), MissingDataPolicy::Tolerate);
        assert_eq!(
            computer.require_values().missing_data_policy(),
            MissingDataPolicy::FailFast
        );
    }
}
