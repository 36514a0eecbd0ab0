//! Databases for holding information relevant to a solve.
//!
//!   - [The variable database](crate::db::variable)
//!     + Variables, views, and their domains.
//!       Every restriction of a domain passes through the variable database, and is recorded in the implication graph and queued as events for propagation.
//!   - [The propagator database](crate::db::propagator)
//!     + Posted constraints, subscribed to the variables they mention.
//!   - [The clause store](crate::db::clause)
//!     + A collection of signed clauses, each indexed by a clause key. \
//!       There are two kinds of clause:
//!       * Original clauses, added to the context from some external source.
//!       * Learnt clauses, added to the context by [analysis](crate::procedures::analysis). \
//!         Every learnt clause is a consequence of the constraints and original clauses.
//!   - [The implication graph](crate::db::implication)
//!     + The reason for each reduction of a domain.
//!   - [The trail](crate::db::trail)
//!     + Records of how to undo every change made since the root, grouped by decision level.

pub mod clause;
pub mod implication;
mod keys;
pub use keys::*;
pub mod propagator;
pub mod trail;
pub mod variable;

/// The index of a decision level.
///
/// The level of the root is zero, and the level after the n-th decision is n.
pub type LevelIndex = u32;
