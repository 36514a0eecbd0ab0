//! Contradictions found during propagation.

use crate::structures::{cause::Cause, variable::Var};

/// A contradiction, and the cause which found it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Conflict {
    /// The (source) variable whose domain the cause would empty, or none if the cause failed as a whole.
    pub var: Option<Var>,

    pub cause: Cause,
}

impl Conflict {
    pub fn on(var: Var, cause: Cause) -> Self {
        Conflict {
            var: Some(var),
            cause,
        }
    }

    pub fn whole(cause: Cause) -> Self {
        Conflict { var: None, cause }
    }
}
