/*!
Miscelanous items related to [logging](log).

Calls to the log macro are made throughout the library.
These are intended to provide useful information for extending the library and/or fixing issues.

Note, no log implementation is provided.
For more details, see [log].
*/

/// Targets to be used within a [log]! macro.
pub mod targets {
    /// Logs related to [propagation](crate::procedures::propagate)
    pub const PROPAGATION: &str = "propagation";

    /// Logs related to [analysis](crate::procedures::analysis)
    pub const ANALYSIS: &str = "analysis";

    /// Logs related to clause deletion
    pub const REDUCTION: &str = "reduction";

    /// Logs related to the [clause store](crate::db::clause)
    pub const CLAUSE_DB: &str = "clause_db";

    /// Logs related to the [implication graph](crate::db::implication)
    pub const IMPLICATION: &str = "implication";

    /// Logs related to the [clause builder](crate::builder)
    pub const BUILDER: &str = "builder";

    /// Logs related to [backjumping](crate::procedures::backjump)
    pub const BACKJUMP: &str = "backjump";

    /// Logs related to [decisions](crate::procedures::decision)
    pub const DECISION: &str = "decision";
}
