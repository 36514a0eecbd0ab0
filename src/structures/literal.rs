//! Signed literals, as stored in a clause.

use crate::{generic::interval_set::IntervalSet, structures::variable::Var};

/// The claim that a variable takes some value in [low, high].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SignedLiteral {
    pub var: Var,
    pub low: i32,
    pub high: i32,
}

impl SignedLiteral {
    pub fn new(var: Var, low: i32, high: i32) -> Self {
        SignedLiteral { var, low, high }
    }

    /// True if the range of the literal contains the range of other.
    pub fn contains(&self, other: &SignedLiteral) -> bool {
        self.low <= other.low && other.high <= self.high
    }

    /// The range of the literal, as a set.
    pub fn as_set(&self) -> IntervalSet {
        IntervalSet::from_range(self.low, self.high)
    }
}

/// Literals of a claim x ∈ S, one for each range of S.
pub fn literals_of(var: Var, set: &IntervalSet) -> impl Iterator<Item = SignedLiteral> + '_ {
    set.ranges().map(move |(low, high)| SignedLiteral::new(var, low, high))
}

impl std::fmt::Display for SignedLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(v{} ∈ [{},{}])", self.var, self.low, self.high)
    }
}
