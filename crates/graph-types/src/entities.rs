//! # Entities
//!
//! Catalog-facing block metadata and the typed ledger records the block
//! graph builder consumes. Each `LedgerRow` describes one
//! (transaction, input, output) combination of the upstream join, grouped by
//! transaction hash with inputs and outputs ordered by local index.

use serde::{Deserialize, Serialize};

/// Block metadata as recorded by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockMeta {
    /// Block height.
    pub number: u64,
    /// Hex block hash; the last two characters drive the file fan-out.
    pub hash: String,
    /// Block timestamp, seconds since epoch.
    pub timestamp: u64,
}

/// A `(number, hash)` pair selecting one block of a queried range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRef {
    pub number: u64,
    pub hash: String,
}

impl BlockRef {
    pub fn new(number: u64, hash: impl Into<String>) -> Self {
        Self {
            number,
            hash: hash.into(),
        }
    }
}

/// One input occurrence of the upstream join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecord {
    /// Local index of the input within its transaction.
    pub index: u32,
    /// Input amount in satoshi (equals the spent output's value).
    pub value: u64,
    /// Hash of the transaction that produced the spent output.
    pub spent_tx_hash: String,
    /// Output index within the spent transaction.
    pub spent_index: u32,
    /// Addresses attributed to the spent output (the senders).
    pub addresses: Vec<String>,
}

/// One output occurrence of the upstream join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    /// Local index of the output within its transaction.
    pub index: u32,
    /// Output amount in satoshi.
    pub value: u64,
    /// Addresses attributed to the output (the receivers). Multi-address
    /// outputs list every cooperating address.
    pub addresses: Vec<String>,
}

/// One row of the parsed transaction stream for a single block.
///
/// The upstream join repeats rows per (input, output) combination; the
/// builder dedupes on first-seen local indices. `input == None` marks a
/// coinbase transaction row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub block_number: u64,
    pub block_hash: String,
    pub block_timestamp: u64,
    pub tx_hash: String,
    pub input: Option<InputRecord>,
    pub output: Option<OutputRecord>,
}
