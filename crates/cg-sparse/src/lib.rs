//! # CG-Sparse: Sparse Incidence Kernel
//!
//! Sparse `u64 -> u64` matrices and vectors over an unbounded id space, with
//! the small algebra the graph engine composes them under:
//!
//! - **elementwise union** of disjoint per-block matrices (the merge-reduce
//!   combine step),
//! - **semiring matrix multiply** for the derived one-hop adjacencies
//!   (plus-combine over paths, min or plus through the shared dimension),
//! - **masked vector-matrix propagation** for breadth-first fixed-point
//!   traversal,
//! - **inclusive range extraction** on both dimensions, so a traversal can
//!   shrink its working adjacency to the relevant block span,
//! - a lossless `(row, col, value)` triple codec for the per-block files.
//!
//! Rows are kept in sorted order (`BTreeMap`), which makes range extraction
//! and min/max id queries cheap; the id encoding guarantees ids are dense
//! within a block and ordered across blocks, so no dimension bound is ever
//! stored.

pub mod algebra;
pub mod codec;
pub mod matrix;
pub mod vector;

pub use algebra::{Combine, Semiring, MIN_MIN, PLUS_MIN, PLUS_PLUS, SECOND};
pub use codec::CodecError;
pub use matrix::SparseMatrix;
pub use vector::SparseVector;
