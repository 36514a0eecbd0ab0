//! The status of a literal, or a clause, relative to current domains.

/// Whether some claim holds on every valuation of the current domains, on none, or is yet to be determined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entailment {
    /// The claim holds on every valuation of the current domains.
    True,

    /// The claim holds on no valuation of the current domains.
    False,

    /// The claim holds on some valuation, but not every valuation.
    Undefined,
}

impl Entailment {
    /// The conjunction of two statuses.
    pub fn and(self, other: Entailment) -> Entailment {
        match (self, other) {
            (Self::False, _) | (_, Self::False) => Self::False,
            (Self::True, Self::True) => Self::True,
            _ => Self::Undefined,
        }
    }
}

impl std::fmt::Display for Entailment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::True => write!(f, "true"),
            Self::False => write!(f, "false"),
            Self::Undefined => write!(f, "undefined"),
        }
    }
}
