//! Shared fixtures: a small two-block chain driven through the real ingest
//! pipeline, then opened as a query session.

use anyhow::Result;
use cg_block_store::{Catalog, IngestService, InMemoryCatalog, MatrixFileStore, MemoryLedgerSource};
use cg_chain::{ChainSession, SessionConfig};
use graph_types::{InputRecord, LedgerRow, OutputRecord};
use std::sync::Arc;
use tempfile::TempDir;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn coinbase_row(
    number: u64,
    hash: &str,
    tx_hash: &str,
    value: u64,
    addr: &str,
) -> LedgerRow {
    LedgerRow {
        block_number: number,
        block_hash: hash.to_string(),
        block_timestamp: 1_300_000_000 + number,
        tx_hash: tx_hash.to_string(),
        input: None,
        output: Some(OutputRecord {
            index: 0,
            value,
            addresses: vec![addr.to_string()],
        }),
    }
}

/// Block 100: coinbase `t0` pays 5000 to `A`.
/// Block 101: `t1` spends that output into 4900 for `B` and 90 for `C`.
///
/// Rows follow the upstream join shape: one row per (input, output)
/// combination, so `t1` arrives as two rows repeating the same input.
pub fn two_block_rows() -> Vec<LedgerRow> {
    let spend_of_t0 = InputRecord {
        index: 0,
        value: 5000,
        spent_tx_hash: "t0".to_string(),
        spent_index: 0,
        addresses: vec!["A".to_string()],
    };
    let mut rows = vec![coinbase_row(100, "aa", "t0", 5000, "A")];
    for (index, value, addr) in [(0, 4900, "B"), (1, 90, "C")] {
        rows.push(LedgerRow {
            block_number: 101,
            block_hash: "bb".to_string(),
            block_timestamp: 1_300_000_101,
            tx_hash: "t1".to_string(),
            input: Some(spend_of_t0.clone()),
            output: Some(OutputRecord {
                index,
                value,
                addresses: vec![addr.to_string()],
            }),
        });
    }
    rows
}

/// Ingest `rows` into a fresh catalog and store, then open the span as a
/// session.
pub fn open_ingested(
    dir: &TempDir,
    rows: Vec<LedgerRow>,
    first: u64,
    last: u64,
) -> Result<ChainSession> {
    let catalog = Arc::new(InMemoryCatalog::new());
    let source = MemoryLedgerSource::new(rows);
    let store = MatrixFileStore::new(dir.path());
    IngestService::new(catalog.as_ref(), &source, store.clone()).load_span(first, last)?;

    let catalog: Arc<dyn Catalog> = catalog;
    Ok(ChainSession::open_span(
        catalog,
        store,
        SessionConfig { pool_size: 2 },
        first,
        last,
    )?)
}
