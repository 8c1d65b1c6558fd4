//! # Domain Errors
//!
//! One enum per failure surface. Id-width overflows are fatal for the
//! offending block; missing data (absent file, absent label, unresolvable
//! predecessor) is *not* an error and never appears here — it propagates as
//! empty matrices or `None` results.

use cg_sparse::CodecError;
use graph_types::IdError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Catalog (relational collaborator) failures.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The backing connection or statement failed.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    /// A committed row conflicts with what ingestion is writing.
    #[error("catalog conflict: {0}")]
    Conflict(String),
}

/// Upstream ledger-data source failures.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Worth retrying with bounded attempts.
    #[error("transient ledger source failure: {0}")]
    Transient(String),

    /// Not worth retrying.
    #[error("ledger source failure: {0}")]
    Fatal(String),
}

/// Per-block matrix file failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("matrix file i/o failed for {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Block graph construction failures. All fatal for the block.
#[derive(Debug, Error)]
pub enum BuildError {
    /// An id field overflowed its bit width (ledger density bound).
    #[error(transparent)]
    Id(#[from] IdError),

    /// A row for a different block reached this builder.
    #[error("row for block {got} fed to builder for block {expected}")]
    WrongBlock { expected: u64, got: u64 },

    /// Rows arrived after `finalize` sealed the block.
    #[error("block {number} is already finalized")]
    Finalized { number: u64 },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Span ingestion failures.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The ledger source kept failing past the retry budget.
    #[error("ledger source failed after {attempts} attempts")]
    SourceExhausted {
        attempts: u32,
        #[source]
        source: SourceError,
    },
}
