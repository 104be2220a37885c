//! Mutable graph accumulator for loaders
//!
//! External loaders decode their storage format into link pairs and feed
//! them here; `finish` produces the immutable [`GraphStore`]. Uses
//! FxHashSet for O(1) duplicate detection during construction.

use rustc_hash::FxHashSet;

use super::store::GraphStore;
use crate::error::RankError;

/// A mutable builder for a fixed-size link graph.
///
/// The page count is fixed up front; links referencing ids outside
/// `[0, num_pages)` are rejected. Duplicate links (same source, same
/// target) are silently collapsed to one, matching the semantics of a
/// link corpus where an edge either exists or doesn't.
#[derive(Debug)]
pub struct GraphBuilder {
    num_pages: usize,
    /// Inbound sources per page, unordered during construction.
    backlinks: Vec<FxHashSet<u32>>,
}

impl GraphBuilder {
    /// Create a builder for a graph with `num_pages` pages and no links.
    pub fn new(num_pages: usize) -> Self {
        Self {
            num_pages,
            backlinks: vec![FxHashSet::default(); num_pages],
        }
    }

    /// Record a link from `source` to `target`.
    ///
    /// Returns `true` if the link was new, `false` if it was already
    /// recorded. Self-links are accepted; they are ordinary edges distinct
    /// from the synthetic self-loop the store adds uniformly.
    pub fn add_link(&mut self, source: u32, target: u32) -> Result<bool, RankError> {
        self.check_page(source)?;
        self.check_page(target)?;
        Ok(self.backlinks[target as usize].insert(source))
    }

    /// Number of pages this builder was created for.
    pub fn num_pages(&self) -> usize {
        self.num_pages
    }

    /// Number of distinct links recorded so far.
    pub fn num_links(&self) -> usize {
        self.backlinks.iter().map(|b| b.len()).sum()
    }

    /// Freeze into an immutable [`GraphStore`].
    ///
    /// Backlink lists come out sorted ascending, so two builders fed the
    /// same links in any order produce identical stores.
    pub fn finish(self) -> Result<GraphStore, RankError> {
        let backlinks_per_page = self
            .backlinks
            .into_iter()
            .map(|sources| sources.into_iter().collect())
            .collect();
        GraphStore::build(backlinks_per_page)
    }

    fn check_page(&self, id: u32) -> Result<(), RankError> {
        if (id as usize) < self.num_pages {
            Ok(())
        } else {
            Err(RankError::InvalidEdit {
                id,
                num_pages: self.num_pages,
            })
        }
    }
}
