//! # Triple Codec
//!
//! Compact binary serialization of a sparse matrix as sorted
//! `(row, col, value)` triples. The layout is an implementation detail of
//! the per-block files; the only contract is lossless round-trip.

use crate::matrix::SparseMatrix;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Codec failures surface as store-level errors upstream.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("matrix encode failed: {0}")]
    Encode(#[source] bincode::Error),

    #[error("matrix decode failed: {0}")]
    Decode(#[source] bincode::Error),
}

/// On-disk shape of one per-block relation matrix.
#[derive(Serialize, Deserialize)]
struct MatrixFile {
    triples: Vec<(u64, u64, u64)>,
}

/// Encode a matrix into the triple layout.
pub fn encode(matrix: &SparseMatrix) -> Result<Vec<u8>, CodecError> {
    let file = MatrixFile {
        triples: matrix.to_triples(),
    };
    bincode::serialize(&file).map_err(CodecError::Encode)
}

/// Decode a matrix from the triple layout.
pub fn decode(bytes: &[u8]) -> Result<SparseMatrix, CodecError> {
    let file: MatrixFile = bincode::deserialize(bytes).map_err(CodecError::Decode)?;
    Ok(SparseMatrix::from_triples(file.triples))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn test_round_trip_is_lossless() {
        let m = SparseMatrix::from_triples([(1, 2, 3), (4, 5, 6), (u64::MAX, 0, u64::MAX)]);
        let decoded = decode(&encode(&m).unwrap()).unwrap();
        assert_eq!(decoded, m);
    }

    #[test]
    fn test_empty_matrix_round_trip() {
        let m = SparseMatrix::new();
        assert_eq!(decode(&encode(&m).unwrap()).unwrap(), m);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        // sorted triple order makes re-ingestion byte-identical
        let mut rng = StdRng::seed_from_u64(7);
        let triples: Vec<(u64, u64, u64)> =
            (0..200).map(|_| (rng.gen(), rng.gen(), rng.gen())).collect();
        let forward = SparseMatrix::from_triples(triples.iter().copied());
        let reversed = SparseMatrix::from_triples(triples.iter().rev().copied());
        assert_eq!(encode(&forward).unwrap(), encode(&reversed).unwrap());
    }

    #[test]
    fn test_truncated_bytes_fail_to_decode() {
        let bytes = encode(&SparseMatrix::from_triples([(1, 1, 1)])).unwrap();
        assert!(decode(&bytes[..bytes.len() - 3]).is_err());
    }
}
