//! # Range Summary Report
//!
//! Aggregate statistics over a session's loaded range: block span, the
//! earliest and latest transactions, total value entering and leaving
//! transactions, and per-relation edge counts for both the base relations
//! and the derived adjacencies. Serializes to JSON and renders as a plain
//! text report.

use crate::errors::ChainError;
use crate::session::ChainSession;
use graph_types::{block_number, Id, Relation};
use serde::Serialize;
use std::fmt;

/// Edge count of one relation or derived adjacency.
#[derive(Debug, Clone, Serialize)]
pub struct RelationEdges {
    pub relation: String,
    pub description: String,
    pub edges: usize,
}

/// One end of the transaction span, resolved through the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct TxPoint {
    pub id: Id,
    pub hash: Option<String>,
    pub block_timestamp: Option<u64>,
}

/// Aggregate report over one loaded block range.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub blocks: usize,
    pub block_first: Option<u64>,
    pub block_last: Option<u64>,
    pub earliest_tx: Option<TxPoint>,
    pub latest_tx: Option<TxPoint>,
    /// Sum of all input values, synthetic coinbase inputs included at 0.
    pub value_in: u64,
    /// Sum of all output values.
    pub value_out: u64,
    pub relations: Vec<RelationEdges>,
    pub adjacencies: Vec<RelationEdges>,
    pub total_edges: usize,
}

impl Summary {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.block_first, self.block_last) {
            (Some(first), Some(last)) => {
                writeln!(f, "blocks {first}..={last} ({} loaded)", self.blocks)?
            }
            _ => writeln!(f, "no blocks loaded")?,
        }
        if let Some(tx) = &self.earliest_tx {
            writeln!(
                f,
                "earliest tx: {}",
                tx.hash.as_deref().unwrap_or("<unknown>")
            )?;
        }
        if let Some(tx) = &self.latest_tx {
            writeln!(
                f,
                "latest tx:   {}",
                tx.hash.as_deref().unwrap_or("<unknown>")
            )?;
        }
        writeln!(f, "value in:  {}", self.value_in)?;
        writeln!(f, "value out: {}", self.value_out)?;
        for group in [&self.relations, &self.adjacencies] {
            for r in group {
                writeln!(
                    f,
                    "{:>2} {:<40} {:>12} edges",
                    r.relation, r.description, r.edges
                )?;
            }
        }
        write!(f, "total: {} edges", self.total_edges)
    }
}

impl ChainSession {
    /// Compute the aggregate report for the loaded range. Forces every base
    /// relation and derived adjacency into the session cache.
    pub fn summary(&self) -> Result<Summary, ChainError> {
        let mut relations = Vec::with_capacity(Relation::ALL.len());
        let mut total_edges = 0;
        for relation in Relation::ALL {
            let edges = self.relation(relation)?.nvals();
            total_edges += edges;
            relations.push(RelationEdges {
                relation: relation.as_str().to_string(),
                description: relation.describe().to_string(),
                edges,
            });
        }

        let mut adjacencies = Vec::with_capacity(3);
        for (name, description, matrix) in [
            ("IO", "input occurrence to output occurrence", self.io()?),
            ("SR", "sender address to receiver address", self.sr()?),
            ("TT", "funding transaction to spending transaction", self.tt()?),
        ] {
            total_edges += matrix.nvals();
            adjacencies.push(RelationEdges {
                relation: name.to_string(),
                description: description.to_string(),
                edges: matrix.nvals(),
            });
        }

        let to = self.relation(Relation::TO)?;
        let earliest_tx = match to.min_row() {
            Some(id) => Some(self.tx_point(id)?),
            None => None,
        };
        let latest_tx = match to.max_row() {
            Some(id) => Some(self.tx_point(id)?),
            None => None,
        };

        Ok(Summary {
            blocks: self.blocks().len(),
            block_first: self.blocks().first().map(|b| b.number),
            block_last: self.blocks().last().map(|b| b.number),
            earliest_tx,
            latest_tx,
            value_in: self.relation(Relation::IT)?.reduce_sum(),
            value_out: to.reduce_sum(),
            relations,
            adjacencies,
            total_edges,
        })
    }

    fn tx_point(&self, id: Id) -> Result<TxPoint, ChainError> {
        let meta = self.catalog().block_meta(block_number(id))?;
        Ok(TxPoint {
            id,
            hash: self.catalog().tx_hash(id)?,
            block_timestamp: meta.map(|m| m.timestamp),
        })
    }
}
