//! # CG-Chain: Chain-Scope Graph Engine
//!
//! Loads an arbitrary block range into chain-scoped incidence matrices and
//! answers provenance questions over them.
//!
//! ## Pipeline
//!
//! ```text
//! per-block files ──┐
//!                   ├─ Merge-Reduce ──→ BT IT TO SI OR ST TR   (base)
//! block range ──────┘        │
//!                            └─ Derive ──→ IO  SR  TT          (adjacency)
//!                                      │
//!                                      └─ Traverse ──→ levels, parents,
//!                                                      exposure
//! ```
//!
//! A [`ChainSession`] owns the loaded range, a bounded worker pool for the
//! pairwise tree reduction, and a compute-once cache per relation. Sessions
//! are independent; nothing is cached globally.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Union Totality | Per-block id spaces are disjoint, so the merge never sees a value conflict |
//! | 2 | Pairing Independence | The reduction result is the same for every pairing order |
//! | 3 | Conservative Exposure | Min-combine everywhere: adding an edge can never raise a reported exposure |
//! | 4 | Bounded Iteration | Every traversal stops within `edge_count + 1` rounds, cycles or not |

pub mod errors;
pub mod reduce;
pub mod session;
pub mod summary;
pub mod traversal;
pub mod view;

pub use errors::ChainError;
pub use session::{ChainSession, SessionConfig};
pub use summary::Summary;
pub use traversal::{EmptyReason, ExposureOutcome, Traversal, UNBOUNDED};
pub use view::{AddressView, SpendView, TxView};
