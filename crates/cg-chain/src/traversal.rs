//! # Traversal Engine
//!
//! Masked breadth-first fixed-point iteration over a derived adjacency
//! relation (`IO` at occurrence granularity, `SR` at address granularity).
//! Three propagation modes share one loop shape:
//!
//! - **levels**: hop depth of every reachable id,
//! - **parents**: one arbitrary predecessor per reached id, for backward
//!   path reconstruction,
//! - **exposure**: the conservative minimum value transferable from the
//!   sources, min-combined wherever paths meet. Conservative because
//!   transactions commingle inputs fungibly; a strict per-coin trace is not
//!   generally recoverable, so a lower bound is what can be promised.
//!
//! Every mode caps its rounds at `edge_count + 1` — an upper bound on the
//! longest simple path — so an unexpected cycle can never run away. The
//! production graph is acyclic (spends always point forward in block
//! order), which is why the cap is a guard and not a truncation.

use cg_sparse::{Combine, SparseMatrix, SparseVector, MIN_MIN};
use graph_types::Id;
use tracing::debug;

/// Sentinel frontier value for exposure seeds: no bound yet.
pub const UNBOUNDED: u64 = u64::MAX;

/// Why an exposure query produced no result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// The source address has no occurrence in the loaded range.
    NoSourceOccurrences,
    /// The target address has no occurrence in the loaded range.
    NoTargetOccurrences,
    /// Every target occurrence sits in an earlier block than every source
    /// occurrence; value cannot flow backwards.
    TargetsPrecedeSources,
}

/// Outcome of an address-to-address exposure query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExposureOutcome {
    /// `(target occurrence id, minimum transferable value)` for every target
    /// occurrence actually reached.
    Found(Vec<(Id, u64)>),
    /// Nothing to traverse; the reason is part of the answer.
    Empty(EmptyReason),
}

/// Fixed-point traversal over one adjacency matrix.
pub struct Traversal<'a> {
    adjacency: &'a SparseMatrix,
}

impl<'a> Traversal<'a> {
    pub fn new(adjacency: &'a SparseMatrix) -> Self {
        Self { adjacency }
    }

    fn round_bound(&self) -> usize {
        self.adjacency.nvals() + 1
    }

    /// Hop depth of every id reachable from `sources` (sources at 0).
    pub fn levels(&self, sources: &[Id]) -> SparseVector {
        let mut levels = SparseVector::new();
        let mut frontier: Vec<Id> = Vec::with_capacity(sources.len());
        for &s in sources {
            levels.set(s, 0);
            frontier.push(s);
        }

        for round in 1..=self.round_bound() as u64 {
            let mut next = Vec::new();
            for &i in &frontier {
                for (j, _) in self.adjacency.row_iter(i) {
                    // mask: only ids without an assigned depth
                    if !levels.contains(j) {
                        levels.set(j, round);
                        next.push(j);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }
        levels
    }

    /// One predecessor per reachable id; sources map to themselves.
    ///
    /// The combine is first-found: whichever predecessor reaches an id
    /// first in the round keeps it, which is all backward reconstruction
    /// needs.
    pub fn parents(&self, sources: &[Id]) -> SparseVector {
        let mut parents = SparseVector::new();
        let mut frontier: Vec<Id> = Vec::with_capacity(sources.len());
        for &s in sources {
            parents.set(s, s);
            frontier.push(s);
        }

        for _ in 1..=self.round_bound() {
            let mut next = Vec::new();
            for &i in &frontier {
                for (j, _) in self.adjacency.row_iter(i) {
                    if !parents.contains(j) {
                        parents.set(j, i);
                        next.push(j);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }
        parents
    }

    /// Walk a parent vector backwards from `target` to the self-mapped
    /// source. `None` when the target was never reached.
    pub fn path_to(parents: &SparseVector, target: Id) -> Option<Vec<Id>> {
        let mut path = vec![target];
        let mut current = target;
        // the parent chain is at most as long as the assignment itself
        for _ in 0..=parents.nvals() {
            let parent = parents.get(current)?;
            if parent == current {
                path.reverse();
                return Some(path);
            }
            path.push(parent);
            current = parent;
        }
        None
    }

    /// Minimum transferable value from `sources` to every reached id.
    pub fn exposure_vector(&self, sources: &[Id]) -> SparseVector {
        self.exposure_inner(sources, None)
    }

    /// Minimum transferable value from `sources`, restricted to `targets`.
    ///
    /// Stops early once every target occurrence is assigned and stable.
    pub fn exposure(&self, sources: &[Id], targets: &[Id]) -> Vec<(Id, u64)> {
        let target_mask = SparseVector::from_entries(targets.iter().map(|&t| (t, 0)));
        let v = self.exposure_inner(sources, Some(&target_mask));
        v.select(&target_mask).iter().collect()
    }

    fn exposure_inner(&self, sources: &[Id], targets: Option<&SparseVector>) -> SparseVector {
        let mut v = SparseVector::from_entries(sources.iter().map(|&s| (s, UNBOUNDED)));

        for round in 0..self.round_bound() {
            let propagated = v.vxm(self.adjacency, MIN_MIN);
            let next = v.ewise_union(&propagated, Combine::Min);
            if next == v {
                debug!(round, assigned = v.nvals(), "exposure reached fixed point");
                break;
            }
            let stable_targets = match targets {
                Some(mask) => {
                    let before = v.select(mask);
                    let after = next.select(mask);
                    after.nvals() == mask.nvals() && before == after
                }
                None => false,
            };
            v = next;
            if stable_targets {
                debug!(round, "every target assigned and stable");
                break;
            }
        }
        v
    }
}
