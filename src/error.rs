//! Error taxonomy for graph construction, ranking, and what-if edits.
//!
//! Non-convergence is deliberately *not* represented here: hitting the
//! iteration cap is a reportable outcome carried by
//! [`RankResult`](crate::rank::RankResult) (`converged = false` plus the
//! achieved delta), and callers decide whether the best-effort vector is
//! acceptable.

use thiserror::Error;

/// Errors surfaced by the ranking core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RankError {
    /// The graph has no pages; there is nothing to rank.
    #[error("graph has no pages")]
    EmptyGraph,

    /// The damping factor must lie strictly between 0 and 1.
    #[error("damping factor {0} is outside the open interval (0, 1)")]
    InvalidDamping(f64),

    /// A vector or backlink list does not line up with the graph's page count.
    #[error("dimension mismatch: expected {expected} entries, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A rank vector cannot be min-normalized because its minimum is <= 0.
    #[error("rank vector minimum {0} is not positive")]
    NonPositiveMinimum(f64),

    /// A hypothetical edit referenced a page id outside `[0, num_pages)`.
    #[error("page id {id} is outside the graph ({num_pages} pages)")]
    InvalidEdit { id: u32, num_pages: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RankError::DimensionMismatch {
            expected: 4,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "dimension mismatch: expected 4 entries, got 3"
        );

        let err = RankError::InvalidEdit {
            id: 9,
            num_pages: 5,
        };
        assert_eq!(err.to_string(), "page id 9 is outside the graph (5 pages)");
    }

    #[test]
    fn test_errors_are_comparable() {
        assert_eq!(RankError::EmptyGraph, RankError::EmptyGraph);
        assert_ne!(
            RankError::InvalidDamping(1.5),
            RankError::InvalidDamping(0.0)
        );
    }
}
