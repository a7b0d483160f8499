//! Shared helpers for similarity kernels.

use super::types::{MetricError, Result, Vector, VectorKind};

/// Validates both slices and ensures they share the same dimensionality.
pub(crate) fn validated_pair<'a>(
    left: &'a [f32],
    right: &'a [f32],
) -> Result<(Vector<'a>, Vector<'a>)> {
    let left = Vector::new(left, VectorKind::Left)?;
    let right = Vector::new(right, VectorKind::Right)?;
    if left.dimension() != right.dimension() {
        return Err(MetricError::DimensionMismatch {
            left: left.dimension(),
            right: right.dimension(),
        });
    }
    Ok((left, right))
}

/// Accumulates the dot product and squared magnitudes across both vectors,
/// optionally centring each component first.
pub(crate) fn accumulate_components(
    left: &Vector<'_>,
    right: &Vector<'_>,
    centres: (f64, f64),
) -> (f64, f64, f64) {
    let mut dot = 0.0f64;
    let mut left_squares = 0.0f64;
    let mut right_squares = 0.0f64;

    for (&l, &r) in left.iter().zip(right.iter()) {
        let l = f64::from(l) - centres.0;
        let r = f64::from(r) - centres.1;
        dot += l * r;
        left_squares += l * l;
        right_squares += r * r;
    }

    (dot, left_squares, right_squares)
}

pub(crate) fn mean(vector: &Vector<'_>) -> f64 {
    let sum: f64 = vector.iter().map(|&value| f64::from(value)).sum();
    sum / vector.dimension() as f64
}
