//! Min-normalization of raw rank vectors
//!
//! Raw ranks are tiny fractions of the total mass; dividing by the minimum
//! rescales them so the least important page scores exactly 1.0 and every
//! other score reads as a multiple of it.

use crate::error::RankError;

/// Rescale `scores` so the minimum entry is exactly 1.0.
///
/// The engine's output is strictly positive for any valid graph, so a
/// non-positive minimum indicates a corrupted or foreign vector; it is
/// rejected with `NonPositiveMinimum` rather than propagated. An empty
/// slice is rejected with `EmptyGraph`.
pub fn normalize(scores: &[f64]) -> Result<Vec<f64>, RankError> {
    let min = positive_min(scores)?;
    Ok(scores.iter().map(|&s| s / min).collect())
}

/// The minimum entry of `scores`, validated to be strictly positive.
pub(crate) fn positive_min(scores: &[f64]) -> Result<f64, RankError> {
    if scores.is_empty() {
        return Err(RankError::EmptyGraph);
    }

    let mut min = f64::INFINITY;
    for &s in scores {
        // NaN slips through f64::min; reject it explicitly.
        if s.is_nan() {
            return Err(RankError::NonPositiveMinimum(s));
        }
        min = min.min(s);
    }
    if min <= 0.0 {
        return Err(RankError::NonPositiveMinimum(min));
    }
    Ok(min)
}
