//! # Merge-Reduce Engine
//!
//! Combines N per-block matrices of one relation into a single chain-scoped
//! matrix by pairwise tree reduction: pair up the lazy file handles,
//! dispatch each pair-combine onto the session's worker pool, and repeat on
//! the results until one matrix remains. `O(log N)` rounds, and at most two
//! operands are resident per worker at any time.
//!
//! Block id spaces are disjoint, so the union is total; the overwrite
//! combine only matters if a file was missing or half-written. A missing
//! file is the empty matrix, not an error — blocks with zero occurrences of
//! a relation write nothing.

use cg_block_store::{LazyMatrix, MatrixFileStore, StoreError};
use cg_sparse::{SparseMatrix, SECOND};
use graph_types::{BlockRef, Relation};
use rayon::prelude::*;
use tracing::debug;

/// One operand of a reduction round: either a not-yet-loaded file handle or
/// an already-combined matrix.
enum Operand {
    Lazy(LazyMatrix),
    Ready(SparseMatrix),
}

impl Operand {
    fn load(self) -> Result<Option<SparseMatrix>, StoreError> {
        match self {
            Operand::Lazy(handle) => handle.load(),
            Operand::Ready(matrix) => Ok(Some(matrix)),
        }
    }
}

fn combine_pair(pair: (Operand, Option<Operand>)) -> Result<Operand, StoreError> {
    let (left, right) = pair;
    let left = left.load()?;
    let right = match right {
        Some(op) => op.load()?,
        None => None,
    };
    let merged = match (left, right) {
        (Some(l), Some(r)) => l.ewise_union(&r, SECOND),
        (Some(l), None) => l,
        (None, Some(r)) => r,
        (None, None) => SparseMatrix::new(),
    };
    Ok(Operand::Ready(merged))
}

/// Merge one relation across a block range on the given pool.
///
/// An empty range yields the empty matrix.
pub fn merge_relation(
    pool: &rayon::ThreadPool,
    store: &MatrixFileStore,
    blocks: &[BlockRef],
    relation: Relation,
) -> Result<SparseMatrix, StoreError> {
    debug!(blocks = blocks.len(), relation = %relation, "merging per-block matrices");

    let mut operands: Vec<Operand> = blocks
        .iter()
        .map(|block| Operand::Lazy(store.lazy(block, relation)))
        .collect();

    if operands.is_empty() {
        return Ok(SparseMatrix::new());
    }

    // Each round halves the operand count; a round must fully complete
    // before the next one reads its outputs.
    while operands.len() > 1 {
        let mut pairs = Vec::with_capacity(operands.len().div_ceil(2));
        let mut iter = operands.into_iter();
        while let Some(left) = iter.next() {
            pairs.push((left, iter.next()));
        }
        operands = pool.install(|| {
            pairs
                .into_par_iter()
                .map(combine_pair)
                .collect::<Result<Vec<_>, _>>()
        })?;
    }

    let merged = operands
        .pop()
        .expect("non-empty operand list")
        .load()?
        .unwrap_or_default();
    Ok(merged)
}
