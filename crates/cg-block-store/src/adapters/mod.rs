//! Adapters: filesystem matrix store plus in-memory port implementations
//! for tests and embedding.

pub mod fs;
pub mod memory;
