//! # Graph Types
//!
//! Shared vocabulary for the CoinGraph engine: the identifier scheme that
//! packs block / transaction / spend identity into `u64` ids, the seven base
//! incidence relations, and the typed ledger records consumed by the block
//! graph builder.
//!
//! ## Identifier Scheme
//!
//! ```text
//! 63                              31              15             0
//! +-------------------------------+---------------+--------------+
//! |          block number         |   tx index    |  local index |
//! +-------------------------------+---------------+--------------+
//! ```
//!
//! - `block_id = number << 32`
//! - `tx_id    = block_id + (tx_index << 16)`, tx index is 1-based
//! - `spend_id = tx_id + local_index`
//!
//! An *input's* spend id equals the id of the output it consumes, so inputs
//! and outputs share one "coin occurrence" namespace and the owning block of
//! any id is recoverable by shifting.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Id Monotonicity | All ids minted under block b1 < b2 are strictly ordered |
//! | 2 | Bounded Indices | tx index and local index each fit in 16 bits; overflow is fatal |
//! | 3 | Coinbase Slot | `id == block_id(id)` marks the synthetic coinbase occurrence |

pub mod entities;
pub mod id;
pub mod relation;

pub use entities::{BlockMeta, BlockRef, InputRecord, LedgerRow, OutputRecord};
pub use id::{block_id, block_number, is_coinbase, spend_id, tx_id, tx_of, Id, IdError};
pub use relation::Relation;
