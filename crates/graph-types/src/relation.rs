//! # Relation Taxonomy
//!
//! The seven base incidence relations persisted per block. Each is a sparse
//! matrix whose rows and columns are drawn from the packed id spaces and
//! whose cells hold accumulated satoshi values (or presence amounts for the
//! attribution relations).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A base incidence relation of the ledger graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relation {
    /// block -> tx, value = total tx output value.
    BT,
    /// input occurrence -> tx, value = input amount.
    IT,
    /// tx -> output occurrence, value = output amount.
    TO,
    /// sender address -> input occurrence.
    SI,
    /// output occurrence -> receiver address.
    OR,
    /// sender address -> tx, aggregate input value.
    ST,
    /// tx -> receiver address, aggregate output value.
    TR,
}

impl Relation {
    /// All base relations in persistence order.
    pub const ALL: [Relation; 7] = [
        Relation::BT,
        Relation::IT,
        Relation::TO,
        Relation::SI,
        Relation::OR,
        Relation::ST,
        Relation::TR,
    ];

    /// Stable name used in per-block file stems.
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::BT => "BT",
            Relation::IT => "IT",
            Relation::TO => "TO",
            Relation::SI => "SI",
            Relation::OR => "OR",
            Relation::ST => "ST",
            Relation::TR => "TR",
        }
    }

    /// Human description, used by the summary report.
    pub fn describe(&self) -> &'static str {
        match self {
            Relation::BT => "Blocks to Txs",
            Relation::IT => "Inputs to Txs",
            Relation::TO => "Txs to Outputs",
            Relation::SI => "Senders to Inputs",
            Relation::OR => "Outputs to Receivers",
            Relation::ST => "Senders to Txs",
            Relation::TR => "Txs to Receivers",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
