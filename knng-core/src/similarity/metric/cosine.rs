use super::helpers::{accumulate_components, validated_pair};
use super::types::{MetricError, Result, VectorKind};

/// Computes the cosine similarity between two vectors.
///
/// # Examples
///
/// ```
/// use knng_core::{MetricError, cosine_similarity};
///
/// fn main() -> Result<(), MetricError> {
///     let orthogonal = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0])?;
///     assert!(orthogonal.abs() < 1e-12);
///     let parallel = cosine_similarity(&[1.0, 2.0], &[2.0, 4.0])?;
///     assert!((parallel - 1.0).abs() < 1e-12);
///     Ok(())
/// }
/// ```
///
/// # Errors
///
/// - [`MetricError::ZeroLength`] when any input is empty.
/// - [`MetricError::DimensionMismatch`] when input lengths differ.
/// - [`MetricError::NonFinite`] when a value is NaN or infinite.
/// - [`MetricError::ZeroMagnitude`] when either vector has zero L2 norm.
pub fn cosine_similarity(left: &[f32], right: &[f32]) -> Result<f64> {
    let (left, right) = validated_pair(left, right)?;
    let (dot, left_squares, right_squares) = accumulate_components(&left, &right, (0.0, 0.0));

    if left_squares == 0.0 {
        return Err(MetricError::ZeroMagnitude {
            which: VectorKind::Left,
        });
    }
    if right_squares == 0.0 {
        return Err(MetricError::ZeroMagnitude {
            which: VectorKind::Right,
        });
    }

    // Theoretical range is [-1, 1], but numerical noise can spill over.
    Ok((dot / (left_squares.sqrt() * right_squares.sqrt())).clamp(-1.0, 1.0))
}
