//! # Identifier Scheme
//!
//! Deterministic, collision-free packing of block / transaction / spend
//! identity into `u64` ids. The encoding doubles as the value-storage key
//! space and lets any consumer recover ancestry (owning tx, owning block)
//! without a catalog round trip.

use thiserror::Error;

/// A packed block, transaction or spend identifier.
pub type Id = u64;

/// Width of the per-transaction local index field.
pub const LOCAL_INDEX_BITS: u32 = 16;

/// Width of the in-block transaction index field.
pub const TX_INDEX_BITS: u32 = 16;

/// Maximum transactions per block (1-based indices; index 0 is the
/// synthetic coinbase slot).
pub const MAX_TX_INDEX: u32 = (1 << TX_INDEX_BITS) - 1;

/// Maximum inputs or outputs per transaction.
pub const MAX_LOCAL_INDEX: u32 = (1 << LOCAL_INDEX_BITS) - 1;

/// Errors raised when the ledger's observed density breaks the id encoding.
///
/// These are fatal configuration errors: the offending block's ingestion
/// must abort rather than silently truncate an id field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// A block carries more transactions than the 16-bit index allows.
    #[error("block {block} transaction index {index} exceeds {MAX_TX_INDEX}")]
    TxIndexOverflow { block: u64, index: u32 },

    /// A transaction carries more inputs/outputs than the 16-bit index allows.
    #[error("tx {tx:#x} local index {index} exceeds {MAX_LOCAL_INDEX}")]
    LocalIndexOverflow { tx: Id, index: u32 },
}

/// Id of a block, also the id of its synthetic coinbase occurrence.
#[inline]
pub fn block_id(number: u64) -> Id {
    number << 32
}

/// Id of the `tx_index`-th transaction of block `number`.
///
/// Transaction indices are 1-based; index 0 is reserved for the block's
/// synthetic coinbase occurrence so a real output id can never alias it.
pub fn tx_id(number: u64, tx_index: u32) -> Result<Id, IdError> {
    if tx_index > MAX_TX_INDEX {
        return Err(IdError::TxIndexOverflow {
            block: number,
            index: tx_index,
        });
    }
    Ok(block_id(number) + ((tx_index as u64) << 16))
}

/// Id of the `local_index`-th input/output occurrence of transaction `tx`.
pub fn spend_id(tx: Id, local_index: u32) -> Result<Id, IdError> {
    if local_index > MAX_LOCAL_INDEX {
        return Err(IdError::LocalIndexOverflow {
            tx,
            index: local_index,
        });
    }
    Ok(tx + local_index as u64)
}

/// Owning block number of any id minted beneath that block.
#[inline]
pub fn block_number(id: Id) -> u64 {
    id >> 32
}

/// Owning transaction id of a spend id (masks the local index).
#[inline]
pub fn tx_of(id: Id) -> Id {
    id & !((1u64 << 16) - 1)
}

/// True exactly for the synthetic coinbase occurrence of a block.
#[inline]
pub fn is_coinbase(id: Id) -> bool {
    id == block_id(block_number(id))
}
