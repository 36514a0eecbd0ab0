//! Variables and views.
//!
//! A [Var] is an index to the [variable database](crate::db::variable), and the index doubles as a stable identifier used to sort the literals of a clause.
//!
//! A variable is either a *source*, with a domain of its own, or a [View] of some other variable.
//! The domain of a view is the image of the domain of its source, and any restriction of a view is a restriction of its source through the [preimage](View::preimage) of the view.

use crate::generic::interval_set::IntervalSet;

/// A variable, as an index to the variable database.
pub type Var = u32;

/// How a domain is restricted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DomainKind {
    /// Only the bounds of the domain are maintained, and any restriction is widened to its hull.
    Bounded,

    /// Every value of the domain is maintained, and so the domain may have holes.
    Enumerated,
}

/// The relation between a view and its source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    /// The view takes the value of the source plus the offset.
    Offset(i32),

    /// The view takes the negated value of the source.
    Minus,

    /// A boolean, 1 exactly when the source takes the given value.
    Equal(i32),

    /// A boolean, 1 exactly when the source does not take the given value.
    NotEqual(i32),

    /// A boolean, the negation of a boolean source.
    Not,
}

impl View {
    /// The value of the view, given a value of the source.
    pub fn apply(&self, value: i32) -> i32 {
        match self {
            Self::Offset(offset) => value.saturating_add(*offset),
            Self::Minus => -value,
            Self::Equal(c) => (value == *c) as i32,
            Self::NotEqual(c) => (value != *c) as i32,
            Self::Not => 1 - value,
        }
    }

    /// The domain of the view, given the domain of the source.
    pub fn image(&self, source: &IntervalSet) -> IntervalSet {
        match self {
            Self::Offset(offset) => source.shifted(*offset),
            Self::Minus => source.negated(),
            Self::Equal(c) | Self::NotEqual(c) => {
                let may_equal = source.contains(*c);
                let may_differ = source.size() > 1 || (!source.is_empty() && !may_equal);
                let (one, zero) = match self {
                    Self::Equal(_) => (may_equal, may_differ),
                    _ => (may_differ, may_equal),
                };
                let mut image = IntervalSet::empty();
                if zero {
                    image.add(0);
                }
                if one {
                    image.add(1);
                }
                image
            }
            Self::Not => self.preimage(source),
        }
    }

    /// The values of the source for which the view takes a value in the given set.
    ///
    /// For boolean views the preimage is relative to the universe, and so the preimage of {0, 1} is the universe.
    pub fn preimage(&self, set: &IntervalSet) -> IntervalSet {
        match self {
            Self::Offset(offset) => set.shifted(-*offset),
            Self::Minus => set.negated(),
            Self::Equal(c) | Self::NotEqual(c) => {
                let (on_value, off_value) = match self {
                    Self::Equal(_) => (set.contains(1), set.contains(0)),
                    _ => (set.contains(0), set.contains(1)),
                };
                match (on_value, off_value) {
                    (true, true) => IntervalSet::universe(),
                    (true, false) => IntervalSet::singleton(*c),
                    (false, true) => {
                        let mut others = IntervalSet::universe();
                        others.remove(*c);
                        others
                    }
                    (false, false) => IntervalSet::empty(),
                }
            }
            Self::Not => {
                let mut preimage = IntervalSet::empty();
                if set.contains(0) {
                    preimage.add(1);
                }
                if set.contains(1) {
                    preimage.add(0);
                }
                preimage
            }
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Offset(offset) => write!(f, "+{offset}"),
            Self::Minus => write!(f, "-"),
            Self::Equal(c) => write!(f, "={c}"),
            Self::NotEqual(c) => write!(f, "≠{c}"),
            Self::Not => write!(f, "¬"),
        }
    }
}

#[cfg(test)]
mod view_tests {
    use super::*;

    #[test]
    fn equal_view() {
        let view = View::Equal(3);
        assert_eq!(view.image(&IntervalSet::from_range(0, 5)), IntervalSet::from_range(0, 1));
        assert_eq!(view.image(&IntervalSet::singleton(3)), IntervalSet::singleton(1));
        assert_eq!(view.image(&IntervalSet::from_range(4, 5)), IntervalSet::singleton(0));

        assert_eq!(view.preimage(&IntervalSet::singleton(1)), IntervalSet::singleton(3));
        assert!(!view.preimage(&IntervalSet::singleton(0)).contains(3));
        assert!(view.preimage(&IntervalSet::singleton(0)).contains(4));
        assert_eq!(view.preimage(&IntervalSet::from_range(0, 1)), IntervalSet::universe());
        assert!(view.preimage(&IntervalSet::singleton(7)).is_empty());
    }

    #[test]
    fn arithmetic_views() {
        let source = IntervalSet::from_values([1, 2, 5]);
        assert_eq!(View::Offset(10).image(&source), IntervalSet::from_values([11, 12, 15]));
        assert_eq!(View::Minus.image(&source), IntervalSet::from_values([-5, -2, -1]));
        assert_eq!(View::Minus.preimage(&IntervalSet::from_range(-2, 0)), IntervalSet::from_range(0, 2));
        assert_eq!(View::Offset(-1).preimage(&IntervalSet::singleton(0)), IntervalSet::singleton(1));
    }

    #[test]
    fn not_view() {
        assert_eq!(View::Not.image(&IntervalSet::singleton(0)), IntervalSet::singleton(1));
        assert_eq!(View::Not.preimage(&IntervalSet::from_range(1, 9)), IntervalSet::singleton(0));
        assert_eq!(View::Not.apply(1), 0);
    }
}
