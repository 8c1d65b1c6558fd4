//! # Block Store
//!
//! Per-block ingestion for the ledger graph: the **Block Graph Builder**
//! turns an ordered stream of parsed transaction records into one block's
//! incidence matrices, and the **Per-Block Store** persists those matrices
//! as write-once binary files fanned out by block-hash suffix.
//!
//! ## Crate Structure (Hexagonal)
//!
//! - `domain/` - the builder and its pending-buffer lifecycle
//! - `ports/` - outbound traits: the relational `Catalog` and the upstream
//!   `LedgerSource`
//! - `adapters/` - filesystem matrix store and in-memory port adapters
//! - `service.rs` - span ingestion: retry, group-by-block, idempotent skip
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Exactly-Once Indices | Each (tx, input index) and (tx, output index) is recorded once, however often the upstream join repeats rows |
//! | 2 | Resolved Attribution | SI/OR/ST/TR cells only ever reference catalog-resolved address ids, never raw labels |
//! | 3 | Write-Once Files | A block's matrix files are immutable once its completion marker is committed |
//! | 4 | Atomic Commit | Tx ids, address rows and the completion marker land in one catalog commit; a crash before the marker makes re-processing a safe no-op |
//! | 5 | Coinbase Distinct | The synthetic coinbase input (`id == block_id`) is never conflated with an unresolvable predecessor |

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::fs::{LazyMatrix, MatrixFileStore};
pub use adapters::memory::{InMemoryCatalog, MemoryLedgerSource};
pub use domain::builder::{BlockGraph, FinalizedBlock};
pub use domain::errors::{BuildError, CatalogError, IngestError, SourceError, StoreError};
pub use ports::outbound::{BlockCommit, Catalog, LedgerSource};
pub use service::IngestService;
