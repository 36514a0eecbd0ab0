//! The reason for a domain reduction.

use crate::db::{ClauseKey, LevelIndex, PropagatorKey};

/// The cause of a domain reduction.
///
/// Analysis dispatches on the tag:
/// - Clauses explain themselves.
/// - Propagators, and decisions, are explained by the default explanation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cause {
    /// No cause, as for the initial domain of a variable.
    Null,

    /// The decision at the given position of the decision path, counting from one.
    Decision(LevelIndex),

    /// Some propagator.
    Propagator(PropagatorKey),

    /// Some signed clause.
    Clause(ClauseKey),
}

impl std::fmt::Display for Cause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Decision(position) => write!(f, "decision {position}"),
            Self::Propagator(key) => write!(f, "propagator {key:?}"),
            Self::Clause(key) => write!(f, "clause {key:?}"),
        }
    }
}
