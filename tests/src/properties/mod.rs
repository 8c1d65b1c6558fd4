//! Algebraic properties the engine promises, checked over generated inputs.

pub mod algebra;
