//! # Outbound Ports (Driven Ports)
//!
//! The relational catalog and the raw ledger-data source are external
//! collaborators; the engine only ever talks to them through these traits.
//!
//! Production adapters wrap a database connection and a bulk analytical
//! query client. Testing/embedding: `InMemoryCatalog` and
//! `MemoryLedgerSource` (adapters module).

use crate::domain::errors::{CatalogError, SourceError};
use graph_types::{BlockMeta, BlockRef, Id, LedgerRow};

/// Everything ingested for one block, committed atomically together with the
/// completion marker.
#[derive(Debug, Clone)]
pub struct BlockCommit {
    pub meta: BlockMeta,
    /// Minted tx ids in first-seen order.
    pub tx_ids: Vec<(String, Id)>,
}

/// Abstract interface to the relational catalog.
///
/// The catalog owns the label <-> compact-id mappings; the engine consumes
/// lookups and produces newly minted ids plus per-block completion markers.
///
/// A handle is not meant to be shared across ingest workers — each worker
/// opens its own (the trait stays `Send + Sync` so read-side query sessions
/// can share one behind an `Arc`).
pub trait Catalog: Send + Sync {
    /// Compact id of a transaction hash, if the catalog has seen it.
    fn tx_id(&self, hash: &str) -> Result<Option<Id>, CatalogError>;

    /// Hash of a minted transaction id.
    fn tx_hash(&self, id: Id) -> Result<Option<String>, CatalogError>;

    /// Batch insert-or-fetch of address labels.
    ///
    /// Labels never seen before are inserted with freshly minted ids; the
    /// returned pairs cover every requested label. This is the second phase
    /// of the builder's resolve-then-attribute sequence (Invariant 2).
    fn resolve_addresses(&self, labels: &[String]) -> Result<Vec<(String, u64)>, CatalogError>;

    /// Id of an address label, without inserting.
    fn address_id(&self, label: &str) -> Result<Option<u64>, CatalogError>;

    /// Label of an address id.
    fn address_label(&self, id: u64) -> Result<Option<String>, CatalogError>;

    /// Metadata of a committed block.
    fn block_meta(&self, number: u64) -> Result<Option<BlockMeta>, CatalogError>;

    /// Committed blocks with `first <= number <= last`, ordered by number.
    fn blocks_in_span(&self, first: u64, last: u64) -> Result<Vec<BlockRef>, CatalogError>;

    /// Committed blocks with `start <= timestamp < end`, ordered by number.
    fn blocks_in_timespan(&self, start: u64, end: u64) -> Result<Vec<BlockRef>, CatalogError>;

    /// Whether the block's completion marker exists (ingestion idempotence).
    fn is_block_committed(&self, number: u64) -> Result<bool, CatalogError>;

    /// Atomically record a block's rows and its completion marker.
    ///
    /// All-or-nothing (Invariant 4): partial per-block state must never be
    /// observable. Re-committing an already-committed block is a no-op so a
    /// crash-then-retry never duplicates markers.
    fn commit_block(&self, commit: BlockCommit) -> Result<(), CatalogError>;
}

/// Abstract interface to the upstream ledger-data source.
///
/// Yields the parsed (transaction, input, output) join for a block span,
/// grouped by transaction hash, inputs and outputs ordered by local index.
pub trait LedgerSource: Send + Sync {
    fn rows_for_span(&self, first: u64, last: u64) -> Result<Vec<LedgerRow>, SourceError>;
}
