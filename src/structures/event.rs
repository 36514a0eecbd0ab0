//! Primitive domain events.
//!
//! Every restriction of a domain is decomposed into a sequence of primitive events, and each event is recorded in the [implication graph](crate::db::implication).
//! Recording the event, rather than the resulting domain, is enough to rebuild the domain of an entry from the domain of its predecessor.

use crate::generic::interval_set::IntervalSet;

/// A bitmask of event kinds, as recorded with each entry of the implication graph.
pub type EventMask = u8;

/// Masks of each kind of event.
pub mod mask {
    use super::EventMask;

    /// The mask of an entry holding the initial domain of a variable.
    pub const VOID: EventMask = 0;
    pub const REMOVE: EventMask = 1;
    pub const INCLOW: EventMask = 1 << 1;
    pub const DECUPP: EventMask = 1 << 2;
    pub const INSTANTIATE: EventMask = 1 << 3;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// The value was removed.
    Remove(i32),

    /// The lower bound was raised to the value.
    IncLow(i32),

    /// The upper bound was lowered to the value.
    DecUpp(i32),

    /// The domain was reduced to the value.
    Instantiate(i32),
}

impl Event {
    pub fn mask(&self) -> EventMask {
        match self {
            Self::Remove(_) => mask::REMOVE,
            Self::IncLow(_) => mask::INCLOW,
            Self::DecUpp(_) => mask::DECUPP,
            Self::Instantiate(_) => mask::INSTANTIATE,
        }
    }

    pub fn value(&self) -> i32 {
        match self {
            Self::Remove(v) | Self::IncLow(v) | Self::DecUpp(v) | Self::Instantiate(v) => *v,
        }
    }

    /// Applies the event to a domain.
    pub fn apply(&self, domain: &mut IntervalSet) {
        match self {
            Self::Remove(v) => domain.remove(*v),
            Self::IncLow(v) => domain.remove_range(i32::MIN, v.saturating_sub(1)),
            Self::DecUpp(v) => domain.remove_range(v.saturating_add(1), i32::MAX),
            Self::Instantiate(v) => domain.retain_range(*v, *v),
        }
    }

    /// The primitive events which reduce `from` to `to`, for `to` a non-empty subset of `from`.
    pub fn decompose(from: &IntervalSet, to: &IntervalSet) -> Vec<Event> {
        let mut events = Vec::default();
        let (Some(to_min), Some(to_max)) = (to.min(), to.max()) else {
            return events;
        };

        if to_min == to_max {
            events.push(Event::Instantiate(to_min));
            return events;
        }

        if from.min().is_some_and(|from_min| from_min < to_min) {
            events.push(Event::IncLow(to_min));
        }
        if from.max().is_some_and(|from_max| from_max > to_max) {
            events.push(Event::DecUpp(to_max));
        }

        let mut holes = from.clone();
        holes.retain_range(to_min, to_max);
        holes.difference_with(to);
        events.extend(holes.values().map(Event::Remove));

        events
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remove(v) => write!(f, "remove {v}"),
            Self::IncLow(v) => write!(f, "inclow {v}"),
            Self::DecUpp(v) => write!(f, "decupp {v}"),
            Self::Instantiate(v) => write!(f, "instantiate {v}"),
        }
    }
}

#[cfg(test)]
mod event_tests {
    use super::*;

    #[test]
    fn decomposition_rebuilds() {
        let from = IntervalSet::from_range(0, 10);
        let mut to = IntervalSet::from_range(2, 8);
        to.remove(5);

        let events = Event::decompose(&from, &to);
        assert_eq!(events, vec![Event::IncLow(2), Event::DecUpp(8), Event::Remove(5)]);

        let mut rebuilt = from.clone();
        for event in events {
            event.apply(&mut rebuilt);
        }
        assert_eq!(rebuilt, to);
    }

    #[test]
    fn instantiation() {
        let from = IntervalSet::from_range(-999, 999);
        let to = IntervalSet::singleton(7);
        assert_eq!(Event::decompose(&from, &to), vec![Event::Instantiate(7)]);
    }
}
