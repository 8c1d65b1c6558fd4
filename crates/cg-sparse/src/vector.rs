//! # Sparse Vector
//!
//! Sparse `u64 -> u64` vector used for traversal frontiers and row/column
//! views. Entries stay sorted by id so block-span bounds fall out of the
//! first and last keys.

use crate::algebra::{Combine, Semiring};
use crate::matrix::SparseMatrix;
use std::collections::BTreeMap;

/// A sparse vector over the packed id space.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparseVector {
    entries: BTreeMap<u64, u64>,
}

impl SparseVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (u64, u64)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn nvals(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<u64> {
        self.entries.get(&id).copied()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn set(&mut self, id: u64, value: u64) {
        self.entries.insert(id, value);
    }

    /// Insert combining with any existing entry.
    pub fn accumulate(&mut self, id: u64, value: u64, op: Combine) {
        match self.entries.get_mut(&id) {
            Some(existing) => *existing = op.apply(*existing, value),
            None => {
                self.entries.insert(id, value);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.entries.iter().map(|(&i, &v)| (i, v))
    }

    /// Stored ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.keys().copied()
    }

    pub fn min_id(&self) -> Option<u64> {
        self.entries.keys().next().copied()
    }

    pub fn max_id(&self) -> Option<u64> {
        self.entries.keys().next_back().copied()
    }

    /// Vector-matrix propagation under a semiring:
    /// `w[j] = add-fold over i of mul(v[i], A[i,j])`.
    pub fn vxm(&self, a: &SparseMatrix, ring: Semiring) -> SparseVector {
        let mut out = SparseVector::new();
        for (i, v) in self.iter() {
            for (j, e) in a.row_iter(i) {
                out.accumulate(j, ring.mul.apply(v, e), ring.add);
            }
        }
        out
    }

    /// Elementwise union under `op`.
    pub fn ewise_union(&self, other: &SparseVector, op: Combine) -> SparseVector {
        let mut out = self.clone();
        for (i, v) in other.iter() {
            out.accumulate(i, v, op);
        }
        out
    }

    /// Entries restricted to ids present in `mask`.
    pub fn select(&self, mask: &SparseVector) -> SparseVector {
        SparseVector::from_entries(self.iter().filter(|(i, _)| mask.contains(*i)))
    }
}

impl FromIterator<(u64, u64)> for SparseVector {
    fn from_iter<I: IntoIterator<Item = (u64, u64)>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}
