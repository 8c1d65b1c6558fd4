//! Pure domain logic: the block graph builder and its error taxonomy.

pub mod builder;
pub mod errors;
