//! # In-Memory Port Adapters
//!
//! `InMemoryCatalog` backs tests and single-process embedding; the
//! production catalog is a relational database behind the same trait.
//! `MemoryLedgerSource` serves a pre-parsed row stream the way the bulk
//! analytical collaborator would.

use crate::domain::errors::{CatalogError, SourceError};
use crate::ports::outbound::{BlockCommit, Catalog, LedgerSource};
use graph_types::{BlockMeta, BlockRef, Id, LedgerRow};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

#[derive(Debug, Default)]
struct CatalogState {
    blocks: BTreeMap<u64, BlockMeta>,
    tx_by_hash: HashMap<String, Id>,
    tx_by_id: BTreeMap<Id, String>,
    addr_by_label: HashMap<String, u64>,
    addr_by_id: BTreeMap<u64, String>,
    next_address_id: u64,
}

/// Catalog adapter holding every mapping in process memory.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    state: Mutex<CatalogState>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(CatalogState {
                next_address_id: 1,
                ..CatalogState::default()
            }),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, CatalogState>, CatalogError> {
        self.state
            .lock()
            .map_err(|_| CatalogError::Unavailable("catalog mutex poisoned".to_string()))
    }
}

impl Catalog for InMemoryCatalog {
    fn tx_id(&self, hash: &str) -> Result<Option<Id>, CatalogError> {
        Ok(self.lock()?.tx_by_hash.get(hash).copied())
    }

    fn tx_hash(&self, id: Id) -> Result<Option<String>, CatalogError> {
        Ok(self.lock()?.tx_by_id.get(&id).cloned())
    }

    fn resolve_addresses(&self, labels: &[String]) -> Result<Vec<(String, u64)>, CatalogError> {
        let mut state = self.lock()?;
        let mut resolved = Vec::with_capacity(labels.len());
        for label in labels {
            let id = match state.addr_by_label.get(label) {
                Some(&id) => id,
                None => {
                    let id = state.next_address_id;
                    state.next_address_id += 1;
                    state.addr_by_label.insert(label.clone(), id);
                    state.addr_by_id.insert(id, label.clone());
                    id
                }
            };
            resolved.push((label.clone(), id));
        }
        Ok(resolved)
    }

    fn address_id(&self, label: &str) -> Result<Option<u64>, CatalogError> {
        Ok(self.lock()?.addr_by_label.get(label).copied())
    }

    fn address_label(&self, id: u64) -> Result<Option<String>, CatalogError> {
        Ok(self.lock()?.addr_by_id.get(&id).cloned())
    }

    fn block_meta(&self, number: u64) -> Result<Option<BlockMeta>, CatalogError> {
        Ok(self.lock()?.blocks.get(&number).cloned())
    }

    fn blocks_in_span(&self, first: u64, last: u64) -> Result<Vec<BlockRef>, CatalogError> {
        Ok(self
            .lock()?
            .blocks
            .range(first..=last)
            .map(|(_, meta)| BlockRef::new(meta.number, meta.hash.clone()))
            .collect())
    }

    fn blocks_in_timespan(&self, start: u64, end: u64) -> Result<Vec<BlockRef>, CatalogError> {
        Ok(self
            .lock()?
            .blocks
            .values()
            .filter(|meta| meta.timestamp >= start && meta.timestamp < end)
            .map(|meta| BlockRef::new(meta.number, meta.hash.clone()))
            .collect())
    }

    fn is_block_committed(&self, number: u64) -> Result<bool, CatalogError> {
        Ok(self.lock()?.blocks.contains_key(&number))
    }

    fn commit_block(&self, commit: BlockCommit) -> Result<(), CatalogError> {
        let mut state = self.lock()?;
        if state.blocks.contains_key(&commit.meta.number) {
            // completion marker already present: idempotent no-op
            return Ok(());
        }
        for (hash, id) in &commit.tx_ids {
            state.tx_by_hash.insert(hash.clone(), *id);
            state.tx_by_id.insert(*id, hash.clone());
        }
        state.blocks.insert(commit.meta.number, commit.meta);
        Ok(())
    }
}

/// Ledger source adapter serving a fixed, ordered row stream.
#[derive(Debug, Default)]
pub struct MemoryLedgerSource {
    rows: Vec<LedgerRow>,
}

impl MemoryLedgerSource {
    pub fn new(rows: Vec<LedgerRow>) -> Self {
        Self { rows }
    }
}

impl LedgerSource for MemoryLedgerSource {
    fn rows_for_span(&self, first: u64, last: u64) -> Result<Vec<LedgerRow>, SourceError> {
        Ok(self
            .rows
            .iter()
            .filter(|row| (first..=last).contains(&row.block_number))
            .cloned()
            .collect())
    }
}
