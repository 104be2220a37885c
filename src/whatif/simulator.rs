//! Hypothetical link-edit evaluation
//!
//! Two operations over a baseline graph and its converged ranks:
//! [`inflate`](WhatIfSimulator::inflate) greedily picks source pages whose
//! added links should lift a target to a desired normalized rank, using a
//! cheap first-order boost estimate; [`evaluate`](WhatIfSimulator::evaluate)
//! checks such an edit list against ground truth by deriving an edited
//! graph and re-running the engine to full convergence. The baseline is
//! never mutated, so many edit lists can be evaluated concurrently from
//! one baseline.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RankError;
use crate::graph::GraphStore;
use crate::rank::normalize::positive_min;
use crate::rank::{normalize, RankEngine};

/// A greedy edit plan produced by [`WhatIfSimulator::inflate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditPlan {
    /// Source pages to add links from, in selection order (best first).
    pub sources: Vec<u32>,
    /// Estimated rank gain for the target, in normalized units.
    pub predicted_boost: f64,
}

/// Ground-truth outcome of re-converging an edited graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    /// The target's rank in the new fixed point, min-normalized.
    pub normalized_rank: f64,
    /// The target's raw rank in the new fixed point.
    pub raw_rank: f64,
    /// Iterations the re-convergence took (warm-started from the baseline).
    pub iterations: usize,
    /// Whether the re-convergence met the threshold within the cap.
    pub converged: bool,
}

/// Evaluates hypothetical backlink additions against a baseline graph.
#[derive(Debug, Clone, Default)]
pub struct WhatIfSimulator {
    engine: RankEngine,
}

impl WhatIfSimulator {
    /// Create a simulator that re-converges edits with the given engine.
    pub fn new(engine: RankEngine) -> Self {
        Self { engine }
    }

    /// Plan a set of link additions lifting `target` to roughly
    /// `desired_normalized` rank.
    ///
    /// Each candidate source `s` is scored by the first-order estimate of
    /// the rank it could lend through one extra outgoing link:
    /// `damping * scores[s] / (outlink_count[s] + 1)`. Candidates are
    /// taken in descending estimate order (ties broken by ascending page
    /// id) until the accumulated estimate covers the raw-rank gap. Sources
    /// that already link to the target are skipped; a link either exists
    /// or it doesn't.
    ///
    /// The estimate is linear and ignores second-order effects, so the
    /// plan should be checked with [`evaluate`](Self::evaluate).
    pub fn inflate(
        &self,
        graph: &GraphStore,
        scores: &[f64],
        target: u32,
        desired_normalized: f64,
    ) -> Result<EditPlan, RankError> {
        let n = graph.num_pages();
        if scores.len() != n {
            return Err(RankError::DimensionMismatch {
                expected: n,
                actual: scores.len(),
            });
        }
        if target as usize >= n {
            return Err(RankError::InvalidEdit {
                id: target,
                num_pages: n,
            });
        }

        let min = positive_min(scores)?;
        // The raw-rank gap implied by the desired normalized rank.
        let raw_delta = desired_normalized * min - scores[target as usize];

        let mut candidates: Vec<(u32, f64)> = (0..n as u32)
            .map(|id| (id, self.boost_estimate(graph, scores, id)))
            .collect();
        candidates.sort_unstable_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        let mut total = 0.0;
        let mut sources = Vec::new();
        for (id, boost) in candidates {
            if total > raw_delta {
                break;
            }
            // The synthetic self-loop means a page already links to itself,
            // so the target is never a candidate source.
            if id == target || graph.contains_backlink(target, id) {
                continue;
            }
            total += boost;
            sources.push(id);
        }

        debug!(
            target,
            desired_normalized,
            edits = sources.len(),
            "planned rank inflation"
        );

        Ok(EditPlan {
            sources,
            predicted_boost: total / min,
        })
    }

    /// Verify an edit list exactly: derive the edited graph, re-converge,
    /// and report the target's new normalized rank.
    ///
    /// Warm-starts from `baseline_scores`, which is both the starting
    /// point the original fixed point provides and a large iteration
    /// saving for small edits. The baseline graph is untouched.
    pub fn evaluate(
        &self,
        graph: &GraphStore,
        baseline_scores: &[f64],
        target: u32,
        sources: &[u32],
    ) -> Result<Evaluation, RankError> {
        if target as usize >= graph.num_pages() {
            return Err(RankError::InvalidEdit {
                id: target,
                num_pages: graph.num_pages(),
            });
        }

        let mut edited = graph.clone();
        for &source in sources {
            edited = edited.with_added_backlink(target, source)?;
        }

        let result = self.engine.run_from(&edited, baseline_scores)?;
        let normalized = normalize(&result.scores)?;

        Ok(Evaluation {
            normalized_rank: normalized[target as usize],
            raw_rank: result.scores[target as usize],
            iterations: result.iterations,
            converged: result.converged,
        })
    }

    /// First-order estimate of the rank one extra link from `source`
    /// would lend to its target.
    fn boost_estimate(&self, graph: &GraphStore, scores: &[f64], source: u32) -> f64 {
        self.engine.damping * scores[source as usize]
            / (graph.outlink_count(source) as f64 + 1.0)
    }
}
