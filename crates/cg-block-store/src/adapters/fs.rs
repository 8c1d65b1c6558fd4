//! # Per-Block Matrix Files
//!
//! One binary file per (block, relation) pair under a two-level fan-out
//! directory derived from the last two characters of the block hash:
//!
//! ```text
//! <root>/<hash[-2]>/<hash[-1]>/{number}_{hash}_{REL}.bin
//! ```
//!
//! Files are write-once; writes go through a temp file and an atomic rename
//! so a crash never leaves a half-written operand for the merge engine. A
//! missing file is not an error — a block can legitimately have zero
//! occurrences of a relation — and reads report it as `None`.

use crate::domain::errors::StoreError;
use cg_sparse::{codec, SparseMatrix};
use graph_types::{BlockRef, Relation};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Filesystem store for per-block relation matrices.
#[derive(Debug, Clone)]
pub struct MatrixFileStore {
    root: PathBuf,
}

impl MatrixFileStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Deterministic path of one (block, relation) file.
    pub fn relation_path(&self, block: &BlockRef, relation: Relation) -> PathBuf {
        let hash = block.hash.as_str();
        let bytes = hash.as_bytes();
        let (fan1, fan2) = match bytes {
            [.., a, b] => (*a as char, *b as char),
            _ => ('0', '0'),
        };
        self.root
            .join(fan1.to_string())
            .join(fan2.to_string())
            .join(format!("{}_{}_{}.bin", block.number, hash, relation))
    }

    /// Persist one relation matrix, atomically.
    pub fn write(
        &self,
        block: &BlockRef,
        relation: Relation,
        matrix: &SparseMatrix,
    ) -> Result<(), StoreError> {
        let path = self.relation_path(block, relation);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let bytes = codec::encode(matrix)?;
        let tmp = path.with_extension("tmp");
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| StoreError::Io { path, source }
        };
        let mut file = fs::File::create(&tmp).map_err(io_err(&tmp))?;
        file.write_all(&bytes).map_err(io_err(&tmp))?;
        file.sync_all().map_err(io_err(&tmp))?;
        fs::rename(&tmp, &path).map_err(io_err(&path))?;

        debug!(
            block = block.number,
            relation = %relation,
            nvals = matrix.nvals(),
            "matrix file written"
        );
        Ok(())
    }

    /// Load one relation matrix; `None` when the block has no file for it.
    pub fn read(
        &self,
        block: &BlockRef,
        relation: Relation,
    ) -> Result<Option<SparseMatrix>, StoreError> {
        let path = self.relation_path(block, relation);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        Ok(Some(codec::decode(&bytes)?))
    }

    pub fn exists(&self, block: &BlockRef, relation: Relation) -> bool {
        self.relation_path(block, relation).exists()
    }

    /// A handle that defers the disk load until the reduction touches it.
    pub fn lazy(&self, block: &BlockRef, relation: Relation) -> LazyMatrix {
        LazyMatrix {
            path: self.relation_path(block, relation),
        }
    }
}

/// Deferred-load handle to one per-block relation file.
#[derive(Debug, Clone)]
pub struct LazyMatrix {
    path: PathBuf,
}

impl LazyMatrix {
    /// Load the operand; `None` when the file does not exist.
    pub fn load(&self) -> Result<Option<SparseMatrix>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        Ok(Some(codec::decode(&bytes)?))
    }
}
