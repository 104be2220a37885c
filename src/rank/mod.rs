//! Rank computation: the convergence engine and min-normalization.

pub mod engine;
pub mod normalize;

pub use engine::RankEngine;
pub use normalize::normalize;

use serde::{Deserialize, Serialize};

/// Result of a rank computation.
///
/// Returned even when the iteration cap was hit before the threshold was
/// met; in that case `converged` is `false` and `scores` holds the last
/// vector computed, so callers can accept it as best-effort or retry with
/// a larger cap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankResult {
    /// Raw rank per page (indexed by page id). Strictly positive.
    pub scores: Vec<f64>,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Average absolute per-page change achieved in the final iteration.
    pub delta: f64,
    /// Whether `delta` dropped below the configured threshold.
    pub converged: bool,
}

impl RankResult {
    /// Create a new rank result.
    pub fn new(scores: Vec<f64>, iterations: usize, delta: f64, converged: bool) -> Self {
        Self {
            scores,
            iterations,
            delta,
            converged,
        }
    }

    /// Get top N pages by score.
    pub fn top_n(&self, n: usize) -> Vec<(u32, f64)> {
        let mut indexed: Vec<_> = self
            .scores
            .iter()
            .enumerate()
            .map(|(i, &s)| (i as u32, s))
            .collect();
        indexed.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        indexed.truncate(n);
        indexed
    }

    /// Get the score for a specific page.
    pub fn score(&self, page: u32) -> f64 {
        self.scores.get(page as usize).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_n_orders_by_score() {
        let result = RankResult::new(vec![0.1, 0.5, 0.3], 10, 1e-8, true);

        let top = result.top_n(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].0, 1);
        assert_eq!(top[1].0, 2);
    }

    #[test]
    fn test_top_n_tie_breaks_by_page_id() {
        let result = RankResult::new(vec![0.2, 0.2, 0.2], 10, 1e-8, true);
        let top = result.top_n(3);
        assert_eq!(top.iter().map(|t| t.0).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_score_out_of_range() {
        let result = RankResult::new(vec![0.5], 1, 0.0, true);
        assert_eq!(result.score(0), 0.5);
        assert_eq!(result.score(10), 0.0);
    }

    #[test]
    fn test_serializes() {
        let result = RankResult::new(vec![0.5, 0.5], 3, 1e-9, true);
        let json = serde_json::to_string(&result).unwrap();
        let back: RankResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.scores, result.scores);
        assert_eq!(back.iterations, 3);
    }
}
