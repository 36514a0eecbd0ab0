//! Error types used in the library.
//!
//! - Most of these are very unlikely to occur during use, and indicate some contract violation (e.g. a variable used before it was known to the implication graph).
//! - Some of these are internally expected --- e.g. a [conflict](PropagationError::Conflict) is used to control the flow of a solve, and always leads to conflict analysis.
//!
//! Names of the error enums --- for the most part --- overlap with corresponding structs.
//  As such, throughout the library err::{self} is often used to prefix use of the types with `err::`.

use crate::structures::{conflict::Conflict, variable::Var};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Analysis(AnalysisError),
    Build(BuildError),
    ClauseStore(ClauseStoreError),
    ImplicationGraph(ImplicationGraphError),
    Propagation(PropagationError),
    VariableDB(VariableDBError),

    InvalidState,
}

/// Noted errors during conflict analysis.
///
/// Each is a contract violation by some explanation, and is only checked when requested through the [configuration](crate::config::Config).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AnalysisError {
    /// The learnt clause is satisfied on the valuation it was learnt to refute.
    SatisfiedClause,

    /// Too few literals of the learnt clause are false, and the undetermined literals concern more than one variable.
    WeakExplanation,

    /// Every literal of the learnt clause is false at the level it asserts at.
    AssertingLevel,

    /// Analysis was requested without a conflict, or without recorded implications.
    NoImplications,
}

impl From<AnalysisError> for ErrorKind {
    fn from(e: AnalysisError) -> Self {
        ErrorKind::Analysis(e)
    }
}

/// Noted errors when building a clause.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildError {
    /// A different count of variables and sets was given.
    Mismatch,

    /// Some variable is not known.
    UnknownVariable(Var),
}

impl From<BuildError> for ErrorKind {
    fn from(e: BuildError) -> Self {
        ErrorKind::Build(e)
    }
}

/// Errors in the clause store.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ClauseStoreError {
    /// A signed clause requires at least two literals, for two watches.
    ShortClause,

    /// A different count of variables and sets was given.
    Mismatch,

    /// A clause is missing.
    Missing,
}

impl From<ClauseStoreError> for ErrorKind {
    fn from(e: ClauseStoreError) -> Self {
        ErrorKind::ClauseStore(e)
    }
}

/// Errors in the implication graph.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ImplicationGraphError {
    /// An event on a variable not registered when the graph was initialised.
    ///
    /// This happens when a variable is created after learning has been enabled.
    UnknownVariable(Var),

    /// An index beyond the recorded entries.
    MissingEntry(usize),
}

impl From<ImplicationGraphError> for ErrorKind {
    fn from(e: ImplicationGraphError) -> Self {
        ErrorKind::ImplicationGraph(e)
    }
}

/// Noted errors during propagation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PropagationError {
    /// A conflict was found.
    /// This is expected from time to time, and a learning opportunity.
    Conflict(Conflict),

    /// A restriction of some variable without a domain.
    UnknownVariable(Var),

    /// The implication graph refused an event.
    ImplicationGraph(ImplicationGraphError),
}

impl From<PropagationError> for ErrorKind {
    fn from(e: PropagationError) -> Self {
        ErrorKind::Propagation(e)
    }
}

impl From<ImplicationGraphError> for PropagationError {
    fn from(e: ImplicationGraphError) -> Self {
        PropagationError::ImplicationGraph(e)
    }
}

/// Errors in the variable database.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VariableDBError {
    /// A variable was declared with an empty domain.
    EmptyDomain,

    /// A variable was declared with a domain reaching beyond the representable values.
    OutOfRange,

    /// Some variable is not known.
    UnknownVariable(Var),

    /// A boolean view was requested of a variable whose domain is not within {0, 1}.
    NotBoolean(Var),

    /// All possible variables have been created.
    VariablesExhausted,
}

impl From<VariableDBError> for ErrorKind {
    fn from(e: VariableDBError) -> Self {
        ErrorKind::VariableDB(e)
    }
}
