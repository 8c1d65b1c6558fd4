//! # Block Graph Builder
//!
//! Builds one block's incidence matrices from the ordered upstream row
//! stream. A `BlockGraph` is created empty, accumulates transactions and
//! pending address attributions, then `finalize` resolves labels through the
//! catalog, writes the seven matrix files and commits the catalog rows plus
//! the completion marker in one step. After `finalize` the builder is a
//! read-only handle; further rows are rejected.

use crate::adapters::fs::MatrixFileStore;
use crate::domain::errors::BuildError;
use crate::ports::outbound::{BlockCommit, Catalog};
use cg_sparse::{Combine, SparseMatrix};
use graph_types::{block_id, id, BlockMeta, BlockRef, Id, LedgerRow, Relation};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, info};

/// A pending sender/receiver attribution awaiting address resolution.
#[derive(Debug, Clone)]
struct PendingAttribution {
    label: String,
    tx: Id,
    spend: Id,
    value: u64,
}

/// Dedup state for the transaction currently being consumed.
#[derive(Debug)]
struct CurrentTx {
    hash: String,
    id: Id,
    seen_inputs: HashSet<u32>,
    seen_outputs: HashSet<u32>,
    coinbase_marked: bool,
}

/// Read-only handle returned once a block is finalized.
#[derive(Debug, Clone)]
pub struct FinalizedBlock {
    pub meta: BlockMeta,
    pub tx_count: usize,
    /// Inputs whose spent transaction the catalog could not resolve
    /// (pre-window predecessors); recorded as unknown, never as coinbase.
    pub unresolved_inputs: u64,
    /// Edge counts per relation, in `Relation::ALL` order.
    pub edge_counts: [(Relation, usize); 7],
}

/// Incremental builder for one block's local incidence matrices.
pub struct BlockGraph {
    meta: BlockMeta,
    block_id: Id,
    bt: SparseMatrix,
    it: SparseMatrix,
    to: SparseMatrix,
    tx_ids: Vec<(String, Id)>,
    tx_by_hash: HashMap<String, Id>,
    pending_senders: Vec<PendingAttribution>,
    pending_receivers: Vec<PendingAttribution>,
    current: Option<CurrentTx>,
    unresolved_inputs: u64,
    finalized: bool,
}

impl BlockGraph {
    pub fn new(meta: BlockMeta) -> Self {
        let block_id = block_id(meta.number);
        Self {
            meta,
            block_id,
            bt: SparseMatrix::new(),
            it: SparseMatrix::new(),
            to: SparseMatrix::new(),
            tx_ids: Vec::new(),
            tx_by_hash: HashMap::new(),
            pending_senders: Vec::new(),
            pending_receivers: Vec::new(),
            current: None,
            unresolved_inputs: 0,
            finalized: false,
        }
    }

    pub fn number(&self) -> u64 {
        self.meta.number
    }

    /// Consume one upstream row.
    ///
    /// The catalog supplies spent-transaction resolution for inputs whose
    /// producing transaction lies in an earlier block; same-block spends
    /// resolve against the builder's own minted ids first.
    pub fn ingest(&mut self, row: &LedgerRow, catalog: &dyn Catalog) -> Result<(), BuildError> {
        if self.finalized {
            return Err(BuildError::Finalized {
                number: self.meta.number,
            });
        }
        if row.block_number != self.meta.number {
            return Err(BuildError::WrongBlock {
                expected: self.meta.number,
                got: row.block_number,
            });
        }

        if self.current.as_ref().map(|c| c.hash.as_str()) != Some(row.tx_hash.as_str()) {
            self.start_tx(&row.tx_hash)?;
        }
        let tx = self.current.as_mut().expect("current tx set by start_tx").id;

        match &row.input {
            None => {
                // Coinbase transaction: one synthetic zero-valued input whose
                // id is the block id itself.
                let current = self.current.as_mut().expect("current tx");
                if !current.coinbase_marked {
                    current.coinbase_marked = true;
                    self.it.set(self.block_id, tx, 0);
                }
            }
            Some(input) => {
                let first_seen = self
                    .current
                    .as_mut()
                    .expect("current tx")
                    .seen_inputs
                    .insert(input.index);
                if first_seen {
                    let spent_tx = match self.tx_by_hash.get(&input.spent_tx_hash) {
                        Some(&t) => Some(t),
                        None => catalog.tx_id(&input.spent_tx_hash)?,
                    };
                    match spent_tx {
                        Some(spent_tx) => {
                            let spend = id::spend_id(spent_tx, input.spent_index)?;
                            self.it.set(spend, tx, input.value);
                            for label in &input.addresses {
                                self.pending_senders.push(PendingAttribution {
                                    label: label.clone(),
                                    tx,
                                    spend,
                                    value: input.value,
                                });
                            }
                        }
                        None => {
                            // Predecessor outside the indexed window: unknown
                            // provenance, distinct from coinbase (Invariant 5).
                            self.unresolved_inputs += 1;
                            debug!(
                                block = self.meta.number,
                                spent_tx = %input.spent_tx_hash,
                                "input predecessor unresolved, recording as unknown"
                            );
                        }
                    }
                }
            }
        }

        if let Some(output) = &row.output {
            let first_seen = self
                .current
                .as_mut()
                .expect("current tx")
                .seen_outputs
                .insert(output.index);
            if first_seen {
                let spend = id::spend_id(tx, output.index)?;
                self.to.set(tx, spend, output.value);
                self.bt
                    .accumulate(self.block_id, tx, output.value, Combine::Plus);
                for label in &output.addresses {
                    self.pending_receivers.push(PendingAttribution {
                        label: label.clone(),
                        tx,
                        spend,
                        value: output.value,
                    });
                }
            }
        }

        Ok(())
    }

    fn start_tx(&mut self, hash: &str) -> Result<(), BuildError> {
        // 1-based first-seen index; index 0 is the coinbase slot
        let index = self.tx_ids.len() as u32 + 1;
        let tx = id::tx_id(self.meta.number, index)?;
        self.tx_ids.push((hash.to_string(), tx));
        self.tx_by_hash.insert(hash.to_string(), tx);
        self.current = Some(CurrentTx {
            hash: hash.to_string(),
            id: tx,
            seen_inputs: HashSet::new(),
            seen_outputs: HashSet::new(),
            coinbase_marked: false,
        });
        Ok(())
    }

    /// Resolve pending address labels, persist the seven matrix files and
    /// commit the catalog rows together with the completion marker.
    pub fn finalize(
        mut self,
        catalog: &dyn Catalog,
        store: &MatrixFileStore,
    ) -> Result<FinalizedBlock, BuildError> {
        // Phase one: batch insert-or-fetch every pending label, so the
        // attribution matrices only ever hold resolved ids.
        let labels: Vec<String> = self
            .pending_senders
            .iter()
            .chain(self.pending_receivers.iter())
            .map(|p| p.label.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let resolved: HashMap<String, u64> =
            catalog.resolve_addresses(&labels)?.into_iter().collect();

        // Phase two: attribute with resolved ids only.
        let mut si = SparseMatrix::new();
        let mut st = SparseMatrix::new();
        for p in self.pending_senders.drain(..) {
            let a = resolved[&p.label];
            si.set(a, p.spend, p.value);
            st.accumulate(a, p.tx, p.value, Combine::Plus);
        }
        let mut or_ = SparseMatrix::new();
        let mut tr = SparseMatrix::new();
        for p in self.pending_receivers.drain(..) {
            let a = resolved[&p.label];
            or_.set(p.spend, a, p.value);
            tr.accumulate(p.tx, a, p.value, Combine::Plus);
        }

        let block_ref = BlockRef::new(self.meta.number, self.meta.hash.clone());
        let matrices = [
            (Relation::BT, &self.bt),
            (Relation::IT, &self.it),
            (Relation::TO, &self.to),
            (Relation::SI, &si),
            (Relation::OR, &or_),
            (Relation::ST, &st),
            (Relation::TR, &tr),
        ];
        for (relation, matrix) in &matrices {
            store.write(&block_ref, *relation, matrix)?;
        }

        let edge_counts = matrices.map(|(relation, matrix)| (relation, matrix.nvals()));
        let tx_count = self.tx_ids.len();

        // Marker last: a crash before this point leaves only re-writable
        // files behind and the block re-processes cleanly.
        catalog.commit_block(BlockCommit {
            meta: self.meta.clone(),
            tx_ids: std::mem::take(&mut self.tx_ids),
        })?;

        self.finalized = true;
        self.tx_by_hash.clear();
        self.current = None;

        info!(
            block = self.meta.number,
            txs = tx_count,
            unresolved = self.unresolved_inputs,
            "block finalized"
        );

        Ok(FinalizedBlock {
            meta: self.meta,
            tx_count,
            unresolved_inputs: self.unresolved_inputs,
            edge_counts,
        })
    }
}
