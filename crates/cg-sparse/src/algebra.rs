//! # Combine / Accumulate Algebra
//!
//! The binary operators the engine parameterizes its compositions with. A
//! `Semiring` pairs the operator applied when multiple paths land on the same
//! cell (`add`) with the operator applied when composing two relations
//! through a shared dimension (`mul`).

/// A binary combine operator over cell values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combine {
    /// Keep the existing value.
    First,
    /// Take the incoming value (overwrite).
    Second,
    /// Saturating sum.
    Plus,
    /// Minimum.
    Min,
}

impl Combine {
    /// Apply the operator to an existing (`a`) and incoming (`b`) value.
    #[inline]
    pub fn apply(self, a: u64, b: u64) -> u64 {
        match self {
            Combine::First => a,
            Combine::Second => b,
            Combine::Plus => a.saturating_add(b),
            Combine::Min => a.min(b),
        }
    }
}

/// A combine/accumulate pair for relation composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Semiring {
    /// Applied pointwise when multiple paths contribute to one cell.
    pub add: Combine,
    /// Applied when composing through the shared dimension.
    pub mul: Combine,
}

/// Sum over paths, minimum through the hop: bounds transferable value.
pub const PLUS_MIN: Semiring = Semiring {
    add: Combine::Plus,
    mul: Combine::Min,
};

/// Sum over paths and through the hop: accumulates funding totals.
pub const PLUS_PLUS: Semiring = Semiring {
    add: Combine::Plus,
    mul: Combine::Plus,
};

/// Minimum everywhere: the conservative exposure propagation algebra.
pub const MIN_MIN: Semiring = Semiring {
    add: Combine::Min,
    mul: Combine::Min,
};

/// Overwrite combine used by the merge-reduce union (block id spaces are
/// disjoint, so the rule only matters for robustness to a half-written file).
pub const SECOND: Combine = Combine::Second;
