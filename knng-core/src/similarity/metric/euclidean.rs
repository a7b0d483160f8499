use super::helpers::validated_pair;
use super::types::Result;

/// Computes the Euclidean similarity `1 / (1 + ‖left - right‖)`.
///
/// # Examples
///
/// ```
/// use knng_core::{MetricError, euclidean_similarity};
///
/// fn main() -> Result<(), MetricError> {
///     assert_eq!(euclidean_similarity(&[1.0, 2.0], &[1.0, 2.0])?, 1.0);
///     let similarity = euclidean_similarity(&[0.0, 0.0], &[3.0, 4.0])?;
///     assert!((similarity - 1.0 / 6.0).abs() < 1e-12);
///     Ok(())
/// }
/// ```
///
/// # Errors
///
/// - [`super::MetricError::ZeroLength`] when any input is empty.
/// - [`super::MetricError::DimensionMismatch`] when input lengths differ.
/// - [`super::MetricError::NonFinite`] when a value is NaN or infinite.
pub fn euclidean_similarity(left: &[f32], right: &[f32]) -> Result<f64> {
    let (left, right) = validated_pair(left, right)?;

    let mut sum = 0.0f64;
    for (&l, &r) in left.iter().zip(right.iter()) {
        let diff = f64::from(l) - f64::from(r);
        sum += diff * diff;
    }

    Ok(1.0 / (1.0 + sum.sqrt()))
}
