//! Key structures, such as variables, literals, and causes.
//!
//! Most structures here are small and copied freely.
//! The exception is the [domain](crate::generic::interval_set::IntervalSet) of a variable, which is owned by the [variable database](crate::db::variable).
//!
//! # Signed literals
//!
//! A *signed literal* is a claim of the form *x ∈ S* for some variable *x* and some set of integers *S*.
//! Boolean literals are the special case of a variable over {0, 1} with S one of {0} or {1}.
//!
//! Within a [signed clause](crate::db::clause::signed_clause) a literal is stored as a [SignedLiteral], a triple of a variable and the bounds of a single range, and a claim *x ∈ S* for S with n ranges is stored as n triples.
//!
//! # Causes
//!
//! Every reduction of a domain has a [cause](cause::Cause), and every contradiction a [conflict](conflict::Conflict) naming the cause.
//! Causes are tagged, and analysis dispatches on the tag.

pub mod cause;
pub mod conflict;
pub mod constraint;
pub mod entailment;
pub mod event;
pub mod literal;
pub mod variable;
