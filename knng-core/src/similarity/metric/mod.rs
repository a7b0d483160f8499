//! Similarity kernels for dense feature vectors.
//!
//! Kernels validate their inputs and surface detailed errors. The
//! [`super::VectorSimilarity`] computer maps every error to an undefined
//! (`NaN`) similarity.

mod cosine;
mod euclidean;
mod helpers;
mod pearson;
mod types;

use std::{fmt, str::FromStr};

pub use self::cosine::cosine_similarity;
pub use self::euclidean::euclidean_similarity;
pub use self::pearson::pearson_similarity;
pub use self::types::{MetricError, Result, VectorKind};

/// Built-in vector metrics.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum VectorMetric {
    /// Cosine of the angle between the vectors.
    Cosine,
    /// `1 / (1 + euclidean distance)`.
    Euclidean,
    /// Pearson correlation coefficient.
    Pearson,
}

impl VectorMetric {
    /// Evaluates the metric for a pair of vectors.
    ///
    /// # Errors
    /// Propagates the validation errors of the selected kernel.
    pub fn evaluate(self, left: &[f32], right: &[f32]) -> Result<f64> {
        match self {
            Self::Cosine => cosine_similarity(left, right),
            Self::Euclidean => euclidean_similarity(left, right),
            Self::Pearson => pearson_similarity(left, right),
        }
    }

    /// Returns the lower-case metric name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cosine => "cosine",
            Self::Euclidean => "euclidean",
            Self::Pearson => "pearson",
        }
    }
}

impl fmt::Display for VectorMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VectorMetric {
    type Err = String;

    fn from_str(raw: &str) -> core::result::Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "cosine" => Ok(Self::Cosine),
            "euclidean" => Ok(Self::Euclidean),
            "pearson" => Ok(Self::Pearson),
            other => Err(format!(
                "unsupported metric `{other}`; expected cosine, euclidean or pearson"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[1.0, 0.0], &[1.0], MetricError::DimensionMismatch { left: 2, right: 1 })]
    #[case(&[], &[1.0], MetricError::ZeroLength)]
    #[case(
        &[1.0, f32::NAN],
        &[1.0, 1.0],
        MetricError::NonFinite { which: VectorKind::Left, index: 1, value: f32::NAN },
    )]
    fn kernels_reject_malformed_vectors(
        #[case] left: &[f32],
        #[case] right: &[f32],
        #[case] expected: MetricError,
    ) {
        for metric in [VectorMetric::Cosine, VectorMetric::Euclidean, VectorMetric::Pearson] {
            let err = metric
                .evaluate(left, right)
                .expect_err("malformed input must fail");
            match (&err, &expected) {
                (
                    MetricError::NonFinite { which, index, value },
                    MetricError::NonFinite {
                        which: expected_which,
                        index: expected_index,
                        ..
                    },
                ) => {
                    assert_eq!(which, expected_which);
                    assert_eq!(index, expected_index);
                    assert!(value.is_nan());
                }
                _ => assert_eq!(err, expected, "metric {metric}"),
            }
        }
    }

    #[rstest]
    fn cosine_rejects_zero_vectors() {
        let err = cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]).expect_err("zero vector");
        assert_eq!(
            err,
            MetricError::ZeroMagnitude {
                which: VectorKind::Left
            }
        );
    }

    #[rstest]
    fn pearson_rejects_constant_vectors() {
        let err = pearson_similarity(&[1.0, 2.0], &[3.0, 3.0]).expect_err("constant vector");
        assert_eq!(
            err,
            MetricError::ZeroVariance {
                which: VectorKind::Right
            }
        );
    }

    #[rstest]
    #[case(VectorMetric::Cosine)]
    #[case(VectorMetric::Euclidean)]
    #[case(VectorMetric::Pearson)]
    fn kernels_are_symmetric(#[case] metric: VectorMetric) {
        let left = [0.3_f32, -1.2, 4.5, 0.0];
        let right = [1.1_f32, 0.7, -2.0, 3.3];
        let forward = metric.evaluate(&left, &right).expect("finite input");
        let backward = metric.evaluate(&right, &left).expect("finite input");
        assert!((forward - backward).abs() < 1e-12);
    }

    #[rstest]
    #[case("cosine", VectorMetric::Cosine)]
    #[case(" Euclidean ", VectorMetric::Euclidean)]
    #[case("PEARSON", VectorMetric::Pearson)]
    fn metric_names_parse(#[case] raw: &str, #[case] expected: VectorMetric) {
        assert_eq!(raw.parse::<VectorMetric>(), Ok(expected));
    }

    #[rstest]
    fn unknown_metric_is_rejected() {
        let err = "manhattan".parse::<VectorMetric>().expect_err("unsupported");
        assert!(err.contains("manhattan"));
    }
}
