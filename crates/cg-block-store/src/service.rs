//! # Ingest Service
//!
//! Span ingestion over the outbound ports: pull the parsed row stream with
//! bounded retry, group it by block, skip blocks whose completion marker
//! already exists, and build + finalize the rest. Already-committed blocks
//! stay untouched on a retried run, so a crashed ingest resumes cleanly.

use crate::adapters::fs::MatrixFileStore;
use crate::domain::builder::{BlockGraph, FinalizedBlock};
use crate::domain::errors::{IngestError, SourceError};
use crate::ports::outbound::{Catalog, LedgerSource};
use graph_types::{BlockMeta, LedgerRow};
use std::time::Instant;
use tracing::{info, warn};

/// Retry budget for transient source failures.
const SOURCE_ATTEMPTS: u32 = 3;

/// Drives per-block ingestion for a block span.
pub struct IngestService<'a> {
    catalog: &'a dyn Catalog,
    source: &'a dyn LedgerSource,
    store: MatrixFileStore,
}

impl<'a> IngestService<'a> {
    pub fn new(
        catalog: &'a dyn Catalog,
        source: &'a dyn LedgerSource,
        store: MatrixFileStore,
    ) -> Self {
        Self {
            catalog,
            source,
            store,
        }
    }

    /// Ingest every block in `first..=last`, returning the blocks finalized
    /// by this run (skipped blocks are not repeated in the result).
    pub fn load_span(&self, first: u64, last: u64) -> Result<Vec<FinalizedBlock>, IngestError> {
        let rows = self.fetch_rows(first, last)?;
        let mut finalized = Vec::new();

        let mut group: Vec<LedgerRow> = Vec::new();
        for row in rows {
            if let Some(prev) = group.last() {
                if prev.block_number != row.block_number {
                    if let Some(block) = self.ingest_block(&group)? {
                        finalized.push(block);
                    }
                    group.clear();
                }
            }
            group.push(row);
        }
        if !group.is_empty() {
            if let Some(block) = self.ingest_block(&group)? {
                finalized.push(block);
            }
        }

        Ok(finalized)
    }

    /// Build and finalize one block's row group; `None` when the block's
    /// completion marker already exists.
    fn ingest_block(&self, rows: &[LedgerRow]) -> Result<Option<FinalizedBlock>, IngestError> {
        let head = &rows[0];
        if self.catalog.is_block_committed(head.block_number)? {
            info!(block = head.block_number, "block already done, skipping");
            return Ok(None);
        }

        let tic = Instant::now();
        let mut builder = BlockGraph::new(BlockMeta {
            number: head.block_number,
            hash: head.block_hash.clone(),
            timestamp: head.block_timestamp,
        });
        for row in rows {
            builder.ingest(row, self.catalog)?;
        }
        let block = builder.finalize(self.catalog, &self.store)?;
        info!(
            block = block.meta.number,
            elapsed_ms = tic.elapsed().as_millis() as u64,
            "block ingested"
        );
        Ok(Some(block))
    }

    fn fetch_rows(&self, first: u64, last: u64) -> Result<Vec<LedgerRow>, IngestError> {
        let mut attempt = 1;
        loop {
            match self.source.rows_for_span(first, last) {
                Ok(rows) => return Ok(rows),
                Err(err @ SourceError::Transient(_)) if attempt < SOURCE_ATTEMPTS => {
                    warn!(attempt, first, last, error = %err, "ledger source failed, retrying");
                    attempt += 1;
                }
                Err(source) => {
                    return Err(IngestError::SourceExhausted {
                        attempts: attempt,
                        source,
                    })
                }
            }
        }
    }
}
