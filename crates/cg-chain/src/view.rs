//! # Entity Views
//!
//! Read-only, id-driven views over a session's relations: a transaction with
//! its input and output occurrences, a spend occurrence with its attributed
//! addresses, an address with its occurrence set. Views hold a borrow of the
//! session and resolve hashes and labels through its catalog on demand.

use crate::errors::ChainError;
use crate::session::ChainSession;
use graph_types::{block_id, block_number, is_coinbase, tx_of, Id, Relation};

/// One transaction in the loaded range.
pub struct TxView<'a> {
    session: &'a ChainSession,
    pub id: Id,
}

impl<'a> TxView<'a> {
    pub fn block_number(&self) -> u64 {
        block_number(self.id)
    }

    pub fn hash(&self) -> Result<Option<String>, ChainError> {
        Ok(self.session.catalog().tx_hash(self.id)?)
    }

    /// Whether this transaction is funded by the block's synthetic coinbase
    /// occurrence rather than prior outputs.
    pub fn is_coinbase(&self) -> Result<bool, ChainError> {
        let it = self.session.relation(Relation::IT)?;
        Ok(it.get(block_id(self.block_number()), self.id).is_some())
    }

    /// Input occurrences consumed by this transaction, with their values.
    pub fn inputs(&self) -> Result<Vec<SpendView<'a>>, ChainError> {
        let it = self.session.relation(Relation::IT)?;
        Ok(it
            .col(self.id)
            .iter()
            .map(|(id, value)| SpendView {
                session: self.session,
                id,
                value,
            })
            .collect())
    }

    /// Output occurrences produced by this transaction, with their values.
    pub fn outputs(&self) -> Result<Vec<SpendView<'a>>, ChainError> {
        let to = self.session.relation(Relation::TO)?;
        Ok(to
            .row(self.id)
            .iter()
            .map(|(id, value)| SpendView {
                session: self.session,
                id,
                value,
            })
            .collect())
    }
}

/// One coin occurrence: an output, or the input that consumes it (both share
/// the same id).
pub struct SpendView<'a> {
    session: &'a ChainSession,
    pub id: Id,
    pub value: u64,
}

impl<'a> SpendView<'a> {
    /// The block's synthetic coinbase occurrence has no producing output.
    pub fn is_coinbase(&self) -> bool {
        is_coinbase(self.id)
    }

    /// The transaction that produced this occurrence as an output.
    pub fn producing_tx(&self) -> TxView<'a> {
        TxView {
            session: self.session,
            id: tx_of(self.id),
        }
    }

    /// The transaction that consumed this occurrence, if it was spent within
    /// the loaded range.
    pub fn spending_tx(&self) -> Result<Option<TxView<'a>>, ChainError> {
        let it = self.session.relation(Relation::IT)?;
        Ok(it.row(self.id).ids().next().map(|id| TxView {
            session: self.session,
            id,
        }))
    }

    /// Address labels attributed to this occurrence, receiver side first,
    /// falling back to the sender side for occurrences only seen as inputs.
    pub fn addresses(&self) -> Result<Vec<String>, ChainError> {
        let or_ = self.session.relation(Relation::OR)?;
        let mut ids: Vec<u64> = or_.row(self.id).ids().collect();
        if ids.is_empty() {
            let si = self.session.relation(Relation::SI)?;
            ids = si.col(self.id).ids().collect();
        }
        let mut labels = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(label) = self.session.catalog().address_label(id)? {
                labels.push(label);
            }
        }
        Ok(labels)
    }
}

/// One catalog-resolved address.
pub struct AddressView<'a> {
    session: &'a ChainSession,
    pub id: u64,
    pub label: String,
}

impl<'a> AddressView<'a> {
    /// Every occurrence attributed to this address, as sender or receiver.
    pub fn occurrences(&self) -> Result<Vec<Id>, ChainError> {
        self.session.occurrences(self.id)
    }

    /// Occurrences this address received, with values.
    pub fn received(&self) -> Result<Vec<SpendView<'a>>, ChainError> {
        let or_ = self.session.relation(Relation::OR)?;
        Ok(or_
            .col(self.id)
            .iter()
            .map(|(id, value)| SpendView {
                session: self.session,
                id,
                value,
            })
            .collect())
    }

    /// Occurrences this address spent, with values.
    pub fn sent(&self) -> Result<Vec<SpendView<'a>>, ChainError> {
        let si = self.session.relation(Relation::SI)?;
        Ok(si
            .row(self.id)
            .iter()
            .map(|(id, value)| SpendView {
                session: self.session,
                id,
                value,
            })
            .collect())
    }
}

impl ChainSession {
    /// View a transaction by hash. `None` when the catalog has not minted an
    /// id for it.
    pub fn tx(&self, hash: &str) -> Result<Option<TxView<'_>>, ChainError> {
        Ok(self
            .catalog()
            .tx_id(hash)?
            .map(|id| TxView { session: self, id }))
    }

    /// View a transaction by its packed id.
    pub fn tx_view(&self, id: Id) -> TxView<'_> {
        TxView { session: self, id }
    }

    /// View an address by label. `None` for labels the catalog has never
    /// attributed.
    pub fn address(&self, label: &str) -> Result<Option<AddressView<'_>>, ChainError> {
        Ok(self.catalog().address_id(label)?.map(|id| AddressView {
            session: self,
            id,
            label: label.to_string(),
        }))
    }
}
