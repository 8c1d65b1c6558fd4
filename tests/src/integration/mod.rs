//! Cross-crate pipelines: ingest rows through the real service, persist
//! per-block files, then query through a chain session.

pub mod exposure;
pub mod pipeline;
