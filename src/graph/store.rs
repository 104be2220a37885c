//! Immutable, dense-indexed link graph
//!
//! `GraphStore` keeps the two arrays power iteration actually reads: the
//! backlink list per page and the outlink count per page. Backlink lists are
//! stored behind `Arc` so a hypothetical edit can produce a new store that
//! shares every untouched list with its baseline.

use std::sync::Arc;

use crate::error::RankError;

/// An immutable directed link graph indexed by dense page ids in `[0, N)`.
///
/// Every page carries one synthetic self-loop in its outlink count. This
/// guarantees `outlink_count >= 1` everywhere, so the rank update never
/// divides by zero, and a page with no real outbound links keeps its own
/// rank mass each iteration instead of leaking it.
///
/// The self-loop is accounted for in `outlink_count` only; backlink lists
/// contain real inbound links exclusively.
#[derive(Debug, Clone)]
pub struct GraphStore {
    num_pages: usize,
    /// Inbound sources per page, sorted ascending. Shared by reference with
    /// stores derived via [`with_added_backlink`](Self::with_added_backlink).
    backlinks: Vec<Arc<[u32]>>,
    /// Outbound link count per page, including the synthetic self-loop.
    outlink_count: Vec<u32>,
}

impl GraphStore {
    /// Build a store from one backlink list per page (index = page id).
    ///
    /// Outlink counts are derived by counting, for every id, how often it
    /// appears as a source across all lists, plus 1 for the self-loop. Each
    /// occurrence counts once; de-duplication is the loader's contract (see
    /// [`GraphBuilder`](super::GraphBuilder), which does de-duplicate).
    ///
    /// Fails with `DimensionMismatch` if any listed source id falls outside
    /// `[0, N)` — a dangling-id bug in the input, caught at construction.
    pub fn build(backlinks_per_page: Vec<Vec<u32>>) -> Result<Self, RankError> {
        let num_pages = backlinks_per_page.len();

        // Self-loop baseline: every page has at least one outlink.
        let mut outlink_count = vec![1u32; num_pages];
        for sources in &backlinks_per_page {
            for &source in sources {
                if source as usize >= num_pages {
                    return Err(RankError::DimensionMismatch {
                        expected: num_pages,
                        actual: source as usize + 1,
                    });
                }
                outlink_count[source as usize] += 1;
            }
        }

        let backlinks = backlinks_per_page
            .into_iter()
            .map(|mut sources| {
                sources.sort_unstable();
                Arc::from(sources.into_boxed_slice())
            })
            .collect();

        Ok(Self {
            num_pages,
            backlinks,
            outlink_count,
        })
    }

    /// Derive a new store where `source` links to `target`.
    ///
    /// The returned store gains `source` in `backlinks[target]` (kept
    /// sorted) and increments `outlink_count[source]`. If the link already
    /// exists this is a no-op returning an unchanged clone. The baseline is
    /// never mutated; every untouched backlink list is shared by reference,
    /// so many independent variants can be derived from one baseline.
    pub fn with_added_backlink(&self, target: u32, source: u32) -> Result<Self, RankError> {
        self.check_page(target)?;
        self.check_page(source)?;

        if self.contains_backlink(target, source) {
            return Ok(self.clone());
        }

        let old = &self.backlinks[target as usize];
        let insert_at = old.partition_point(|&s| s < source);
        let mut updated = Vec::with_capacity(old.len() + 1);
        updated.extend_from_slice(&old[..insert_at]);
        updated.push(source);
        updated.extend_from_slice(&old[insert_at..]);

        let mut backlinks = self.backlinks.clone();
        backlinks[target as usize] = Arc::from(updated.into_boxed_slice());

        let mut outlink_count = self.outlink_count.clone();
        outlink_count[source as usize] += 1;

        Ok(Self {
            num_pages: self.num_pages,
            backlinks,
            outlink_count,
        })
    }

    /// Number of pages in the graph.
    pub fn num_pages(&self) -> usize {
        self.num_pages
    }

    /// Check if the graph has no pages.
    pub fn is_empty(&self) -> bool {
        self.num_pages == 0
    }

    /// Inbound sources of `target`, sorted ascending. Self-loops excluded.
    pub fn backlinks(&self, target: u32) -> &[u32] {
        &self.backlinks[target as usize]
    }

    /// Outbound link count of `source`, including the synthetic self-loop.
    /// Always >= 1.
    pub fn outlink_count(&self, source: u32) -> u32 {
        self.outlink_count[source as usize]
    }

    /// Check whether `source` already links to `target`.
    pub fn contains_backlink(&self, target: u32, source: u32) -> bool {
        self.backlinks[target as usize].binary_search(&source).is_ok()
    }

    /// Total number of real edges (self-loops excluded).
    pub fn num_edges(&self) -> usize {
        self.backlinks.iter().map(|b| b.len()).sum()
    }

    /// Check the internal consistency invariant: total backlink entries must
    /// equal total outlinks minus the N synthetic self-loops.
    pub fn is_consistent(&self) -> bool {
        let outlinks: usize = self
            .outlink_count
            .iter()
            .map(|&c| c as usize - 1)
            .sum();
        self.num_edges() == outlinks
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
