//! # linkrank
//!
//! PageRank over large directed link graphs, plus what-if evaluation of
//! hypothetical link edits.
//!
//! The crate is a library-style computational core with a function-call
//! boundary: an external loader supplies backlink lists (one per dense
//! page id), the [`RankEngine`] converges a damped power iteration over
//! them, and consumers read the resulting scores directly or
//! min-normalized. The [`WhatIfSimulator`] derives copy-on-write graph
//! variants to predict and verify the effect of adding links on a target
//! page's rank, without ever touching the baseline.
//!
//! ```
//! use linkrank::{GraphBuilder, RankEngine, normalize};
//!
//! // 0 -> 1 -> 2 -> 0
//! let mut builder = GraphBuilder::new(3);
//! builder.add_link(0, 1)?;
//! builder.add_link(1, 2)?;
//! builder.add_link(2, 0)?;
//! let graph = builder.finish()?;
//!
//! let result = RankEngine::new().run(&graph)?;
//! assert!(result.converged);
//!
//! let normalized = normalize(&result.scores)?;
//! assert!(normalized.iter().all(|&r| r >= 1.0));
//! # Ok::<(), linkrank::RankError>(())
//! ```

pub mod error;
pub mod graph;
pub mod rank;
pub mod whatif;

pub use error::RankError;
pub use graph::{GraphBuilder, GraphStore};
pub use rank::{normalize, RankEngine, RankResult};
pub use whatif::{EditPlan, Evaluation, WhatIfSimulator};
