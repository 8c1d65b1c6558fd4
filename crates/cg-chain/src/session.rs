//! # Chain-Scope Session
//!
//! A `ChainSession` pins one loaded block range and hands out the
//! chain-scoped relations over it. Each of the seven base relations is
//! merge-reduced from its per-block files at most once per session; the
//! three derived adjacencies are computed from the cached bases and cached
//! alongside them. The session owns its worker pool, sized at construction
//! and released on drop.

use crate::errors::ChainError;
use crate::reduce;
use crate::traversal::{EmptyReason, ExposureOutcome, Traversal};
use cg_block_store::{Catalog, MatrixFileStore};
use cg_sparse::{Combine, SparseMatrix, PLUS_MIN};
use graph_types::{block_number, is_coinbase, tx_of, BlockRef, Id, Relation};
use std::collections::BTreeSet;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Session construction knobs.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Worker pool size for the merge-reduce tree.
    pub pool_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            pool_size: num_cpus::get(),
        }
    }
}

/// One loaded block range with compute-once relation caches.
pub struct ChainSession {
    catalog: Arc<dyn Catalog>,
    store: MatrixFileStore,
    blocks: Vec<BlockRef>,
    pool: rayon::ThreadPool,
    bt: OnceLock<SparseMatrix>,
    it: OnceLock<SparseMatrix>,
    to: OnceLock<SparseMatrix>,
    si: OnceLock<SparseMatrix>,
    or_: OnceLock<SparseMatrix>,
    st: OnceLock<SparseMatrix>,
    tr: OnceLock<SparseMatrix>,
    io: OnceLock<SparseMatrix>,
    sr: OnceLock<SparseMatrix>,
    tt: OnceLock<SparseMatrix>,
}

/// Compute-once accessor: later callers reuse the first result.
fn compute_once<'a>(
    slot: &'a OnceLock<SparseMatrix>,
    compute: impl FnOnce() -> Result<SparseMatrix, ChainError>,
) -> Result<&'a SparseMatrix, ChainError> {
    if let Some(matrix) = slot.get() {
        return Ok(matrix);
    }
    let computed = compute()?;
    Ok(slot.get_or_init(|| computed))
}

impl ChainSession {
    /// Load the blocks with `first <= number <= last`.
    pub fn open_span(
        catalog: Arc<dyn Catalog>,
        store: MatrixFileStore,
        config: SessionConfig,
        first: u64,
        last: u64,
    ) -> Result<Self, ChainError> {
        let blocks = catalog.blocks_in_span(first, last)?;
        Self::with_blocks(catalog, store, config, blocks)
    }

    /// Load the blocks with `start <= timestamp < end`.
    pub fn open_timespan(
        catalog: Arc<dyn Catalog>,
        store: MatrixFileStore,
        config: SessionConfig,
        start: u64,
        end: u64,
    ) -> Result<Self, ChainError> {
        let blocks = catalog.blocks_in_timespan(start, end)?;
        Self::with_blocks(catalog, store, config, blocks)
    }

    /// Pin an explicit, ordered block list.
    pub fn with_blocks(
        catalog: Arc<dyn Catalog>,
        store: MatrixFileStore,
        config: SessionConfig,
        blocks: Vec<BlockRef>,
    ) -> Result<Self, ChainError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.pool_size)
            .build()?;
        debug!(
            blocks = blocks.len(),
            workers = config.pool_size,
            "chain session opened"
        );
        Ok(Self {
            catalog,
            store,
            blocks,
            pool,
            bt: OnceLock::new(),
            it: OnceLock::new(),
            to: OnceLock::new(),
            si: OnceLock::new(),
            or_: OnceLock::new(),
            st: OnceLock::new(),
            tr: OnceLock::new(),
            io: OnceLock::new(),
            sr: OnceLock::new(),
            tt: OnceLock::new(),
        })
    }

    pub fn blocks(&self) -> &[BlockRef] {
        &self.blocks
    }

    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }

    /// Chain-scoped base relation, merge-reduced on first access.
    pub fn relation(&self, relation: Relation) -> Result<&SparseMatrix, ChainError> {
        let slot = match relation {
            Relation::BT => &self.bt,
            Relation::IT => &self.it,
            Relation::TO => &self.to,
            Relation::SI => &self.si,
            Relation::OR => &self.or_,
            Relation::ST => &self.st,
            Relation::TR => &self.tr,
        };
        compute_once(slot, || {
            Ok(reduce::merge_relation(
                &self.pool,
                &self.store,
                &self.blocks,
                relation,
            )?)
        })
    }

    /// Input-occurrence -> output-occurrence adjacency: the value bounds
    /// what one transaction hop can transfer between the two occurrences.
    pub fn io(&self) -> Result<&SparseMatrix, ChainError> {
        compute_once(&self.io, || {
            let it = self.relation(Relation::IT)?;
            let to = self.relation(Relation::TO)?;
            Ok(it.mxm(to, PLUS_MIN))
        })
    }

    /// One-hop sender-address -> receiver-address transfer bound.
    pub fn sr(&self) -> Result<&SparseMatrix, ChainError> {
        compute_once(&self.sr, || {
            let st = self.relation(Relation::ST)?;
            let tr = self.relation(Relation::TR)?;
            Ok(st.mxm(tr, PLUS_MIN))
        })
    }

    /// Transaction-to-transaction funding adjacency: the tx-granular
    /// collapse of `IO`, one edge per (funding tx, spending tx) pair. The
    /// synthetic coinbase occurrence contributes no funding edge.
    pub fn tt(&self) -> Result<&SparseMatrix, ChainError> {
        compute_once(&self.tt, || {
            let io = self.io()?;
            let mut tt = SparseMatrix::new();
            for (i, o, v) in io.iter() {
                if is_coinbase(i) {
                    continue;
                }
                tt.accumulate(tx_of(i), tx_of(o), v, Combine::Plus);
            }
            Ok(tt)
        })
    }

    /// Every spend occurrence attributed to an address, as sender or
    /// receiver, in ascending id order.
    pub fn occurrences(&self, address: u64) -> Result<Vec<Id>, ChainError> {
        let si = self.relation(Relation::SI)?;
        let or_ = self.relation(Relation::OR)?;
        let mut ids: BTreeSet<Id> = si.row_iter(address).map(|(j, _)| j).collect();
        ids.extend(or_.col(address).ids());
        Ok(ids.into_iter().collect())
    }

    /// Minimum value exposure from address `from` to address `to`.
    ///
    /// Sources and targets are the addresses' occurrence sets; the working
    /// adjacency is restricted to the id sub-range spanning the first
    /// source through the last target before iterating. Empty shapes
    /// short-circuit with a descriptive reason.
    pub fn address_exposure(&self, from: &str, to: &str) -> Result<ExposureOutcome, ChainError> {
        let sources = match self.catalog.address_id(from)? {
            Some(a) => self.occurrences(a)?,
            None => Vec::new(),
        };
        let Some(&start_min) = sources.first() else {
            return Ok(ExposureOutcome::Empty(EmptyReason::NoSourceOccurrences));
        };
        let targets = match self.catalog.address_id(to)? {
            Some(a) => self.occurrences(a)?,
            None => Vec::new(),
        };
        let Some(&end_max) = targets.last() else {
            return Ok(ExposureOutcome::Empty(EmptyReason::NoTargetOccurrences));
        };
        if block_number(end_max) < block_number(start_min) {
            return Ok(ExposureOutcome::Empty(EmptyReason::TargetsPrecedeSources));
        }

        let io = self.io()?;
        let sub = io.extract(start_min..=end_max, start_min..=end_max);
        debug!(
            start_block = block_number(start_min),
            end_block = block_number(end_max),
            edges = sub.nvals(),
            "exposure search space restricted"
        );

        Ok(ExposureOutcome::Found(
            Traversal::new(&sub).exposure(&sources, &targets),
        ))
    }
}
