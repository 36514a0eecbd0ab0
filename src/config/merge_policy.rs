use std::str::FromStr;

/// When an event is folded into an existing entry of the implication graph, rather than recorded as a fresh entry.
///
/// Merging shrinks the graph, at the cost of coarser explanations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum MergePolicy {
    /// Every event is a fresh entry.
    Disabled = 0,

    /// An event is merged with the latest entry of the graph, if the entry concerns the same variable, cause, and level.
    Consecutive,

    /// An event is merged with the latest entry of the variable, if the entry was made during the same call to a propagator, by the same cause, at the same level.
    SamePass,
}

impl MergePolicy {
    /// The minimum MergePolicy type.
    pub const MIN: MergePolicy = MergePolicy::Disabled;

    /// The maximum MergePolicy type.
    pub const MAX: MergePolicy = MergePolicy::SamePass;
}

impl std::fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled => write!(f, "Disabled"),
            Self::Consecutive => write!(f, "Consecutive"),
            Self::SamePass => write!(f, "SamePass"),
        }
    }
}

impl FromStr for MergePolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Disabled" => Ok(Self::Disabled),
            "Consecutive" => Ok(Self::Consecutive),
            "SamePass" => Ok(Self::SamePass),
            _unkown_string => Err(()),
        }
    }
}
