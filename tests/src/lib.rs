//! # CoinGraph Test Suite
//!
//! Unified test crate for behavior that crosses crate boundaries.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── integration/      # Ingest -> store -> session -> query pipelines
//! │   ├── pipeline.rs   # Span ingestion into chain-scoped relations
//! │   └── exposure.rs   # Provenance and exposure over ingested data
//! │
//! └── properties/       # Algebraic properties of the engine
//!     └── algebra.rs    # Merge-reduce union, exposure conservatism
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p cg-tests
//!
//! # By category
//! cargo test -p cg-tests integration::
//! cargo test -p cg-tests properties::
//! ```

pub mod integration;
pub mod properties;

#[cfg(test)]
pub(crate) mod support;
