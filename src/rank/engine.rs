//! Damped power iteration over a link graph
//!
//! The engine pulls rank along backlinks: each page's new rank is the
//! teleport share plus the damped sum of `prev[b] / outlink_count[b]` over
//! its inbound sources, plus its own self-loop share. Strict double
//! buffering — every new value is computed from a frozen snapshot of the
//! previous vector, never from partially updated state.

use rayon::prelude::*;
use tracing::{debug, warn};

use super::RankResult;
use crate::error::RankError;
use crate::graph::GraphStore;

/// Power-iteration rank engine.
///
/// Holds the full configuration surface; there are no hidden globals. The
/// sequential [`run`](Self::run) is the correctness oracle;
/// [`run_parallel`](Self::run_parallel) distributes the per-page update
/// across a rayon pool and matches it bit-for-bit, since the summation
/// order within each page is identical.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RankEngine {
    /// Damping factor, strictly between 0 and 1 (typically 0.85).
    pub damping: f64,
    /// Convergence threshold on the average absolute per-page change.
    pub threshold: f64,
    /// Iteration cap. Hitting it yields `converged = false`, not an error.
    pub max_iterations: usize,
}

impl Default for RankEngine {
    fn default() -> Self {
        Self {
            damping: 0.85,
            threshold: 1e-7,
            max_iterations: 200,
        }
    }
}

impl RankEngine {
    /// Create an engine with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the damping factor.
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Set the convergence threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Run to convergence from the uniform `1/N` vector.
    pub fn run(&self, graph: &GraphStore) -> Result<RankResult, RankError> {
        let initial = self.uniform_start(graph)?;
        self.converge(graph, initial, false)
    }

    /// Run to convergence from a caller-supplied starting vector.
    ///
    /// Warm starts cut iterations substantially when re-converging a
    /// lightly edited graph from its baseline fixed point.
    pub fn run_from(&self, graph: &GraphStore, initial: &[f64]) -> Result<RankResult, RankError> {
        self.validate(graph)?;
        self.check_len(graph, initial)?;
        self.converge(graph, initial.to_vec(), false)
    }

    /// Like [`run`](Self::run), with the per-page update parallelized.
    pub fn run_parallel(&self, graph: &GraphStore) -> Result<RankResult, RankError> {
        let initial = self.uniform_start(graph)?;
        self.converge(graph, initial, true)
    }

    /// Like [`run_from`](Self::run_from), with the per-page update
    /// parallelized.
    pub fn run_parallel_from(
        &self,
        graph: &GraphStore,
        initial: &[f64],
    ) -> Result<RankResult, RankError> {
        self.validate(graph)?;
        self.check_len(graph, initial)?;
        self.converge(graph, initial.to_vec(), true)
    }

    fn uniform_start(&self, graph: &GraphStore) -> Result<Vec<f64>, RankError> {
        self.validate(graph)?;
        let n = graph.num_pages();
        Ok(vec![1.0 / n as f64; n])
    }

    fn validate(&self, graph: &GraphStore) -> Result<(), RankError> {
        if graph.is_empty() {
            return Err(RankError::EmptyGraph);
        }
        if !(self.damping > 0.0 && self.damping < 1.0) {
            return Err(RankError::InvalidDamping(self.damping));
        }
        Ok(())
    }

    fn check_len(&self, graph: &GraphStore, initial: &[f64]) -> Result<(), RankError> {
        if initial.len() != graph.num_pages() {
            return Err(RankError::DimensionMismatch {
                expected: graph.num_pages(),
                actual: initial.len(),
            });
        }
        Ok(())
    }

    fn converge(
        &self,
        graph: &GraphStore,
        initial: Vec<f64>,
        parallel: bool,
    ) -> Result<RankResult, RankError> {
        let n = graph.num_pages();
        let teleport = (1.0 - self.damping) / n as f64;

        let mut scores = initial;
        let mut new_scores = vec![0.0; n];
        let mut iterations = 0;
        let mut delta = f64::MAX;

        while iterations < self.max_iterations && delta >= self.threshold {
            iterations += 1;

            if parallel {
                (0..n as u32)
                    .into_par_iter()
                    .map(|id| self.page_update(graph, &scores, teleport, id))
                    .collect_into_vec(&mut new_scores);
            } else {
                for id in 0..n as u32 {
                    new_scores[id as usize] = self.page_update(graph, &scores, teleport, id);
                }
            }

            // Average absolute change per page.
            delta = scores
                .iter()
                .zip(new_scores.iter())
                .map(|(old, new)| (old - new).abs())
                .sum::<f64>()
                / n as f64;

            std::mem::swap(&mut scores, &mut new_scores);
            debug!(iterations, delta, "rank iteration");
        }

        let converged = delta < self.threshold;
        if !converged {
            warn!(
                iterations,
                delta,
                threshold = self.threshold,
                "iteration cap reached before convergence"
            );
        }

        Ok(RankResult::new(scores, iterations, delta, converged))
    }

    /// One page's update from a frozen snapshot of the previous vector.
    ///
    /// `prev[id] / out[id]` is the synthetic self-loop's contribution:
    /// every page links to itself once, so a dangling page retains its own
    /// mass instead of leaking it. Division is always safe because
    /// `outlink_count >= 1` by construction.
    fn page_update(&self, graph: &GraphStore, prev: &[f64], teleport: f64, id: u32) -> f64 {
        let mut sum = prev[id as usize] / graph.outlink_count(id) as f64;
        for &source in graph.backlinks(id) {
            sum += prev[source as usize] / graph.outlink_count(source) as f64;
        }
        teleport + self.damping * sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphStore;

    /// 0 -> 1 -> 2 -> 0
    fn build_cycle() -> GraphStore {
        GraphStore::build(vec![vec![2], vec![0], vec![1]]).unwrap()
    }

    /// Page 0 links to page 1; page 1 has no real outlinks.
    fn build_dangling() -> GraphStore {
        GraphStore::build(vec![vec![], vec![0]]).unwrap()
    }

    #[test]
    fn test_cycle_converges_to_uniform() {
        let graph = build_cycle();
        let result = RankEngine::new().run(&graph).unwrap();

        assert!(result.converged);
        for &score in &result.scores {
            assert!((score - 1.0 / 3.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_dangling_page_stays_bounded() {
        let graph = build_dangling();
        let result = RankEngine::new().run(&graph).unwrap();

        assert!(result.converged);
        // No divide-by-zero, no blow-up: ranks stay within (0, 1].
        for &score in &result.scores {
            assert!(score > 0.0);
            assert!(score <= 1.0);
        }
        // Page 1 receives from page 0 and keeps its own mass.
        assert!(result.scores[1] > result.scores[0]);
    }

    #[test]
    fn test_all_scores_positive() {
        // Star: everything links to page 0, nothing links back.
        let graph = GraphStore::build(vec![vec![1, 2, 3], vec![], vec![], vec![]]).unwrap();
        let result = RankEngine::new().run(&graph).unwrap();

        assert_eq!(result.scores.len(), 4);
        for &score in &result.scores {
            assert!(score > 0.0);
        }
        assert!(result.scores[0] > result.scores[1]);
    }

    #[test]
    fn test_empty_graph_is_an_error() {
        let graph = GraphStore::build(vec![]).unwrap();
        let result = RankEngine::new().run(&graph);
        assert!(matches!(result, Err(RankError::EmptyGraph)));
    }

    #[test]
    fn test_invalid_damping() {
        let graph = build_cycle();

        for bad in [0.0, 1.0, -0.3, 1.7] {
            let result = RankEngine::new().with_damping(bad).run(&graph);
            assert!(matches!(result, Err(RankError::InvalidDamping(_))));
        }
    }

    #[test]
    fn test_iteration_cap_reports_non_convergence() {
        let graph = build_dangling();
        let engine = RankEngine::new()
            .with_max_iterations(1)
            .with_threshold(f64::MIN_POSITIVE);

        let result = engine.run(&graph).unwrap();

        assert_eq!(result.iterations, 1);
        assert!(!result.converged);
        assert!(result.delta >= f64::MIN_POSITIVE);
        assert_eq!(result.scores.len(), 2);
    }

    #[test]
    fn test_determinism() {
        let graph = GraphStore::build(vec![vec![1, 2], vec![0], vec![0, 1], vec![2]]).unwrap();
        let engine = RankEngine::new();

        let a = engine.run(&graph).unwrap();
        let b = engine.run(&graph).unwrap();

        assert_eq!(a.scores, b.scores);
        assert_eq!(a.iterations, b.iterations);
    }

    #[test]
    fn test_parallel_matches_sequential_exactly() {
        let graph = GraphStore::build(vec![
            vec![1, 2, 4],
            vec![0, 3],
            vec![0],
            vec![2, 4],
            vec![],
        ])
        .unwrap();
        let engine = RankEngine::new();

        let seq = engine.run(&graph).unwrap();
        let par = engine.run_parallel(&graph).unwrap();

        // Per-page summation order is identical, so results are bit-equal.
        assert_eq!(seq.scores, par.scores);
        assert_eq!(seq.iterations, par.iterations);
        assert_eq!(seq.delta, par.delta);
    }

    #[test]
    fn test_warm_start_from_converged_vector_is_idempotent() {
        let graph = build_cycle();
        let engine = RankEngine::new();

        let baseline = engine.run(&graph).unwrap();
        let rerun = engine.run_from(&graph, &baseline.scores).unwrap();

        assert!(rerun.converged);
        assert!(rerun.iterations <= 2);
        assert!(rerun.delta < engine.threshold);
    }

    #[test]
    fn test_warm_start_dimension_mismatch() {
        let graph = build_cycle();
        let result = RankEngine::new().run_from(&graph, &[0.5, 0.5]);
        assert!(matches!(
            result,
            Err(RankError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_added_backlink_never_decreases_target_rank() {
        let graph = GraphStore::build(vec![vec![1], vec![2, 3], vec![3], vec![]]).unwrap();
        let engine = RankEngine::new();
        let baseline = engine.run(&graph).unwrap();

        for source in 0..4u32 {
            for target in 0..4u32 {
                let edited = graph.with_added_backlink(target, source).unwrap();
                let reranked = engine.run(&edited).unwrap();
                assert!(
                    reranked.scores[target as usize] >= baseline.scores[target as usize] - 1e-9,
                    "adding {source} -> {target} decreased the target's rank"
                );
            }
        }
    }
}
