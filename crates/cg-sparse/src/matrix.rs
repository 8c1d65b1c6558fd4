//! # Sparse Matrix
//!
//! Row-major sparse matrix over the packed id space. Rows and cells are kept
//! sorted so iteration order is deterministic and range extraction walks only
//! the touched span.

use crate::algebra::{Combine, Semiring};
use crate::vector::SparseVector;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

/// A sparse `u64 -> u64` matrix with no stored dimension bound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparseMatrix {
    rows: BTreeMap<u64, BTreeMap<u64, u64>>,
    nvals: usize,
}

impl SparseMatrix {
    /// The empty matrix, identity of the union combine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(row, col, value)` triples; later duplicates overwrite.
    pub fn from_triples<I>(triples: I) -> Self
    where
        I: IntoIterator<Item = (u64, u64, u64)>,
    {
        let mut m = Self::new();
        for (r, c, v) in triples {
            m.set(r, c, v);
        }
        m
    }

    /// Number of stored cells.
    pub fn nvals(&self) -> usize {
        self.nvals
    }

    pub fn is_empty(&self) -> bool {
        self.nvals == 0
    }

    /// Insert or overwrite one cell.
    pub fn set(&mut self, row: u64, col: u64, value: u64) {
        if self.rows.entry(row).or_default().insert(col, value).is_none() {
            self.nvals += 1;
        }
    }

    /// Insert one cell, combining with any existing value.
    pub fn accumulate(&mut self, row: u64, col: u64, value: u64, op: Combine) {
        let cell = self.rows.entry(row).or_default();
        match cell.get_mut(&col) {
            Some(existing) => *existing = op.apply(*existing, value),
            None => {
                cell.insert(col, value);
                self.nvals += 1;
            }
        }
    }

    pub fn get(&self, row: u64, col: u64) -> Option<u64> {
        self.rows.get(&row)?.get(&col).copied()
    }

    /// Iterate stored cells in (row, col) order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, u64, u64)> + '_ {
        self.rows
            .iter()
            .flat_map(|(&r, cells)| cells.iter().map(move |(&c, &v)| (r, c, v)))
    }

    /// Iterate the cells of one row.
    pub fn row_iter(&self, row: u64) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.rows
            .get(&row)
            .into_iter()
            .flat_map(|cells| cells.iter().map(|(&c, &v)| (c, v)))
    }

    /// One row as a sparse vector.
    pub fn row(&self, row: u64) -> SparseVector {
        SparseVector::from_entries(self.row_iter(row))
    }

    /// One column as a sparse vector. Linear scan over stored cells; fine
    /// for the view/attribution lookups it backs.
    pub fn col(&self, col: u64) -> SparseVector {
        SparseVector::from_entries(
            self.rows
                .iter()
                .filter_map(|(&r, cells)| cells.get(&col).map(|&v| (r, v))),
        )
    }

    /// Smallest stored row id.
    pub fn min_row(&self) -> Option<u64> {
        self.rows.keys().next().copied()
    }

    /// Largest stored row id.
    pub fn max_row(&self) -> Option<u64> {
        self.rows.keys().next_back().copied()
    }

    /// Swap rows and columns.
    pub fn transpose(&self) -> SparseMatrix {
        let mut t = SparseMatrix::new();
        for (r, c, v) in self.iter() {
            t.set(c, r, v);
        }
        t
    }

    /// Elementwise union under `op`. Cells present on one side only carry
    /// over unchanged; `op` resolves cells present on both.
    pub fn ewise_union(&self, other: &SparseMatrix, op: Combine) -> SparseMatrix {
        let mut out = self.clone();
        for (r, c, v) in other.iter() {
            out.accumulate(r, c, v, op);
        }
        out
    }

    /// Matrix multiply under a semiring: for each shared inner id `k`,
    /// `C[i,j] = add-fold over k of mul(A[i,k], B[k,j])`.
    pub fn mxm(&self, other: &SparseMatrix, ring: Semiring) -> SparseMatrix {
        let mut out = SparseMatrix::new();
        for (&i, cells) in &self.rows {
            for (&k, &a) in cells {
                if let Some(bk) = other.rows.get(&k) {
                    for (&j, &b) in bk {
                        out.accumulate(i, j, ring.mul.apply(a, b), ring.add);
                    }
                }
            }
        }
        out
    }

    /// Extract the submatrix whose rows *and* columns fall in the inclusive
    /// id ranges.
    pub fn extract(
        &self,
        rows: RangeInclusive<u64>,
        cols: RangeInclusive<u64>,
    ) -> SparseMatrix {
        let mut out = SparseMatrix::new();
        for (&r, cells) in self.rows.range(rows) {
            for (&c, &v) in cells.range(cols.clone()) {
                out.set(r, c, v);
            }
        }
        out
    }

    /// Saturating sum of all stored values.
    pub fn reduce_sum(&self) -> u64 {
        self.iter().fold(0u64, |acc, (_, _, v)| acc.saturating_add(v))
    }

    /// Fold each row into a single value under `op`.
    pub fn reduce_rows(&self, op: Combine) -> SparseVector {
        let mut out = SparseVector::new();
        for (r, _, v) in self.iter() {
            out.accumulate(r, v, op);
        }
        out
    }

    /// All stored cells as owned triples, in (row, col) order.
    pub fn to_triples(&self) -> Vec<(u64, u64, u64)> {
        self.iter().collect()
    }
}

impl FromIterator<(u64, u64, u64)> for SparseMatrix {
    fn from_iter<I: IntoIterator<Item = (u64, u64, u64)>>(iter: I) -> Self {
        Self::from_triples(iter)
    }
}
