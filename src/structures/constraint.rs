//! Constraints which may be posted to a context.
//!
//! Each constraint is propagated by a propagator of the [propagator database](crate::db::propagator), and explained through the default explanation during [analysis](crate::procedures::analysis).

use crate::{generic::interval_set::IntervalSet, structures::variable::Var};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Constraint {
    /// x ≤ y + c
    LessOrEqual { x: Var, y: Var, c: i32 },

    /// x ≠ y
    NotEqual { x: Var, y: Var },

    /// x ∈ set
    Member { x: Var, set: IntervalSet },

    /// Holds on no valuation.
    False,
}

impl Constraint {
    /// The variables of the constraint, in order of mention.
    pub fn vars(&self) -> Vec<Var> {
        match self {
            Self::LessOrEqual { x, y, .. } | Self::NotEqual { x, y } => vec![*x, *y],
            Self::Member { x, .. } => vec![*x],
            Self::False => Vec::default(),
        }
    }

    /// Whether the constraint holds, given a value for each of its variables.
    pub fn holds(&self, value_of: impl Fn(Var) -> Option<i32>) -> Option<bool> {
        match self {
            Self::LessOrEqual { x, y, c } => Some(value_of(*x)? as i64 <= value_of(*y)? as i64 + *c as i64),
            Self::NotEqual { x, y } => Some(value_of(*x)? != value_of(*y)?),
            Self::Member { x, set } => Some(set.contains(value_of(*x)?)),
            Self::False => Some(false),
        }
    }
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LessOrEqual { x, y, c } => write!(f, "v{x} ≤ v{y} + {c}"),
            Self::NotEqual { x, y } => write!(f, "v{x} ≠ v{y}"),
            Self::Member { x, set } => write!(f, "v{x} ∈ {set}"),
            Self::False => write!(f, "false"),
        }
    }
}
