//! Chain-scope session errors.

use cg_block_store::{CatalogError, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("worker pool construction failed: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}
