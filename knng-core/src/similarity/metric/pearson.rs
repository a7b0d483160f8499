use super::helpers::{accumulate_components, mean, validated_pair};
use super::types::{MetricError, Result, VectorKind};

/// Computes the Pearson correlation coefficient between two vectors.
///
/// # Examples
///
/// ```
/// use knng_core::{MetricError, pearson_similarity};
///
/// fn main() -> Result<(), MetricError> {
///     let rising = pearson_similarity(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0])?;
///     assert!((rising - 1.0).abs() < 1e-12);
///     let falling = pearson_similarity(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0])?;
///     assert!((falling + 1.0).abs() < 1e-12);
///     Ok(())
/// }
/// ```
///
/// # Errors
///
/// - [`MetricError::ZeroLength`] when any input is empty.
/// - [`MetricError::DimensionMismatch`] when input lengths differ.
/// - [`MetricError::NonFinite`] when a value is NaN or infinite.
/// - [`MetricError::ZeroVariance`] when either vector is constant.
pub fn pearson_similarity(left: &[f32], right: &[f32]) -> Result<f64> {
    let (left, right) = validated_pair(left, right)?;
    let centres = (mean(&left), mean(&right));
    let (covariance, left_variance, right_variance) =
        accumulate_components(&left, &right, centres);

    if left_variance == 0.0 {
        return Err(MetricError::ZeroVariance {
            which: VectorKind::Left,
        });
    }
    if right_variance == 0.0 {
        return Err(MetricError::ZeroVariance {
            which: VectorKind::Right,
        });
    }

    Ok((covariance / (left_variance.sqrt() * right_variance.sqrt())).clamp(-1.0, 1.0))
}
