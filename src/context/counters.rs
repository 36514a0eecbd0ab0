use std::time::Duration;

/// Counts for various things which count, roughly.
#[derive(Default)]
pub struct Counters {
    /// A count of every conflict seen during a solve.
    pub total_conflicts: usize,

    /// A count of all decisions made, not counting refutations.
    pub total_decisions: usize,

    /// The total number of iterations through a solve.
    pub total_iterations: usize,

    /// A count of clauses (and unit or empty clauses, as propagators) learnt from conflicts.
    pub total_learnts: usize,

    /// The time taken during a solve.
    pub time: Duration,
}
