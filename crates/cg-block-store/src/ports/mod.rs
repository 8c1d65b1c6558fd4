//! Port traits: what the block store requires from its collaborators.

pub mod outbound;
