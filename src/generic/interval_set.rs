/*!
A set of integers, stored as a sorted collection of disjoint ranges.

Interval sets are used throughout the library:
- As the domain of a variable.
- As the set of values a signed literal claims a variable takes.
- As the domain recorded with each entry of the [implication graph](crate::db::implication).

Ranges are kept sorted, disjoint, and non-adjacent, so the representation of a set is canonical and equality of sets is equality of representations.

All values lie within [MIN, MAX], which leaves some headroom for arithmetic on bounds (e.g. by [views](crate::structures::variable::View)) without overflow.

# Example

```rust
# use otter_fd::generic::interval_set::IntervalSet;
let mut set = IntervalSet::from_range(0, 9);
set.remove(4);
set.remove_range(7, 20);

assert_eq!(set.nb_ranges(), 2);
assert_eq!(set.to_string(), "{[0,3],[5,6]}");
assert_eq!(set.next_value(3), Some(5));
assert!(!set.contains(4));
```
*/

use std::cmp;

/// The smallest value any set may contain.
pub const MIN: i32 = -(1 << 30);

/// The largest value any set may contain.
pub const MAX: i32 = 1 << 30;

/// Sorted, disjoint, non-adjacent, inclusive ranges.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntervalSet {
    ranges: Vec<(i32, i32)>,
}

impl IntervalSet {
    /// The empty set.
    pub fn empty() -> Self {
        IntervalSet { ranges: Vec::new() }
    }

    /// The set [MIN, MAX].
    pub fn universe() -> Self {
        IntervalSet::from_range(MIN, MAX)
    }

    /// The set [low, high], or the empty set if low > high.
    pub fn from_range(low: i32, high: i32) -> Self {
        let mut set = IntervalSet::empty();
        set.add_range(low, high);
        set
    }

    pub fn singleton(value: i32) -> Self {
        IntervalSet::from_range(value, value)
    }

    /// A set from some collection of values.
    pub fn from_values(values: impl IntoIterator<Item = i32>) -> Self {
        let mut set = IntervalSet::empty();
        for value in values {
            set.add(value);
        }
        set
    }

    pub fn clear(&mut self) {
        self.ranges.clear()
    }

    /// Overwrites self with a copy of other, reusing the allocation of self.
    pub fn copy_from(&mut self, other: &IntervalSet) {
        self.ranges.clear();
        self.ranges.extend_from_slice(&other.ranges);
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The number of (maximal) ranges in the set.
    pub fn nb_ranges(&self) -> usize {
        self.ranges.len()
    }

    /// The ranges of the set, in ascending order.
    pub fn ranges(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.ranges.iter().copied()
    }

    /// The values of the set, in ascending order.
    pub fn values(&self) -> impl Iterator<Item = i32> + '_ {
        self.ranges.iter().flat_map(|&(low, high)| low..=high)
    }

    pub fn min(&self) -> Option<i32> {
        self.ranges.first().map(|range| range.0)
    }

    pub fn max(&self) -> Option<i32> {
        self.ranges.last().map(|range| range.1)
    }

    /// The count of values in the set.
    pub fn size(&self) -> u64 {
        self.ranges
            .iter()
            .map(|&(low, high)| (high as i64 - low as i64 + 1) as u64)
            .sum()
    }

    /// The index of the range containing value, if any.
    fn range_of(&self, value: i32) -> Result<usize, usize> {
        self.ranges.binary_search_by(|&(low, high)| {
            if high < value {
                cmp::Ordering::Less
            } else if low > value {
                cmp::Ordering::Greater
            } else {
                cmp::Ordering::Equal
            }
        })
    }

    pub fn contains(&self, value: i32) -> bool {
        self.range_of(value).is_ok()
    }

    /// The smallest value of the set strictly greater than value, if any.
    pub fn next_value(&self, value: i32) -> Option<i32> {
        let probe = value.checked_add(1)?;
        match self.range_of(probe) {
            Ok(_) => Some(probe),
            Err(index) => self.ranges.get(index).map(|range| range.0),
        }
    }

    /// The largest value of the set strictly smaller than value, if any.
    pub fn previous_value(&self, value: i32) -> Option<i32> {
        let probe = value.checked_sub(1)?;
        match self.range_of(probe) {
            Ok(_) => Some(probe),
            Err(index) if index > 0 => Some(self.ranges[index - 1].1),
            Err(_) => None,
        }
    }

    pub fn add(&mut self, value: i32) {
        self.add_range(value, value)
    }

    /// Adds every value of [low, high] to the set.
    pub fn add_range(&mut self, low: i32, high: i32) {
        let low = cmp::max(low, MIN);
        let high = cmp::min(high, MAX);
        if low > high {
            return;
        }

        // The first range which could touch [low, high], and the first which lies strictly beyond it.
        let start = self
            .ranges
            .partition_point(|&(_, h)| (h as i64) < low as i64 - 1);
        let end = self
            .ranges
            .partition_point(|&(l, _)| (l as i64) <= high as i64 + 1);

        if start == end {
            self.ranges.insert(start, (low, high));
        } else {
            let merged_low = cmp::min(low, self.ranges[start].0);
            let merged_high = cmp::max(high, self.ranges[end - 1].1);
            self.ranges.drain(start + 1..end);
            self.ranges[start] = (merged_low, merged_high);
        }
    }

    /// Adds every value of other to the set.
    pub fn union_with(&mut self, other: &IntervalSet) {
        for &(low, high) in &other.ranges {
            self.add_range(low, high);
        }
    }

    pub fn remove(&mut self, value: i32) {
        self.remove_range(value, value)
    }

    /// Removes every value of [low, high] from the set.
    pub fn remove_range(&mut self, low: i32, high: i32) {
        if low > high || self.ranges.is_empty() {
            return;
        }

        let mut revised = Vec::with_capacity(self.ranges.len() + 1);
        for &(l, h) in &self.ranges {
            if h < low || l > high {
                revised.push((l, h));
                continue;
            }
            if l < low {
                revised.push((l, low - 1));
            }
            if h > high {
                revised.push((high + 1, h));
            }
        }
        self.ranges = revised;
    }

    /// Removes every value of other from the set.
    pub fn difference_with(&mut self, other: &IntervalSet) {
        for &(low, high) in &other.ranges {
            self.remove_range(low, high);
        }
    }

    /// Keeps only those values within [low, high].
    pub fn retain_range(&mut self, low: i32, high: i32) {
        if low > high {
            self.ranges.clear();
            return;
        }
        self.ranges.retain(|&(l, h)| h >= low && l <= high);
        if let Some(first) = self.ranges.first_mut() {
            first.0 = cmp::max(first.0, low);
        }
        if let Some(last) = self.ranges.last_mut() {
            last.1 = cmp::min(last.1, high);
        }
    }

    /// Keeps only those values which are also in other.
    pub fn intersect_with(&mut self, other: &IntervalSet) {
        let mut revised = Vec::with_capacity(cmp::max(self.ranges.len(), other.ranges.len()));
        let (mut i, mut j) = (0, 0);
        while i < self.ranges.len() && j < other.ranges.len() {
            let (a_low, a_high) = self.ranges[i];
            let (b_low, b_high) = other.ranges[j];
            let low = cmp::max(a_low, b_low);
            let high = cmp::min(a_high, b_high);
            if low <= high {
                revised.push((low, high));
            }
            if a_high < b_high {
                i += 1;
            } else {
                j += 1;
            }
        }
        self.ranges = revised;
    }

    /// The complement of the set with respect to [MIN, MAX].
    pub fn complement(&self) -> IntervalSet {
        let mut set = IntervalSet::universe();
        set.difference_with(self);
        set
    }

    /// True if no value is in both sets.
    pub fn disjoint(&self, other: &IntervalSet) -> bool {
        let (mut i, mut j) = (0, 0);
        while i < self.ranges.len() && j < other.ranges.len() {
            let (a_low, a_high) = self.ranges[i];
            let (b_low, b_high) = other.ranges[j];
            if cmp::max(a_low, b_low) <= cmp::min(a_high, b_high) {
                return false;
            }
            if a_high < b_high {
                i += 1;
            } else {
                j += 1;
            }
        }
        true
    }

    /// True if every value of the set is in other.
    pub fn is_subset_of(&self, other: &IntervalSet) -> bool {
        self.ranges.iter().all(|&(low, high)| match other.range_of(low) {
            Ok(index) => other.ranges[index].1 >= high,
            Err(_) => false,
        })
    }

    /// True if every value of [low, high] is in the set.
    pub fn contains_range(&self, low: i32, high: i32) -> bool {
        match self.range_of(low) {
            Ok(index) => self.ranges[index].1 >= high,
            Err(_) => low > high,
        }
    }

    /// The smallest range containing the set, as a set.
    pub fn hull(&self) -> IntervalSet {
        match (self.min(), self.max()) {
            (Some(low), Some(high)) => IntervalSet::from_range(low, high),
            _ => IntervalSet::empty(),
        }
    }

    /// A copy of the set with every value shifted by offset.
    pub fn shifted(&self, offset: i32) -> IntervalSet {
        let mut set = IntervalSet::empty();
        for &(low, high) in &self.ranges {
            set.add_range(low.saturating_add(offset), high.saturating_add(offset));
        }
        set
    }

    /// A copy of the set with every value negated.
    pub fn negated(&self) -> IntervalSet {
        let mut set = IntervalSet::empty();
        for &(low, high) in self.ranges.iter().rev() {
            set.add_range(-high, -low);
        }
        set
    }
}

impl std::fmt::Display for IntervalSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let write_range = |f: &mut std::fmt::Formatter<'_>, (low, high): (i32, i32)| {
            if low == high {
                write!(f, "{low}")
            } else {
                write!(f, "[{low},{high}]")
            }
        };

        match self.ranges.len() {
            0 => write!(f, "{{}}"),
            1 => write_range(f, self.ranges[0]),
            _ => {
                write!(f, "{{")?;
                for (index, range) in self.ranges.iter().enumerate() {
                    if index > 0 {
                        write!(f, ",")?;
                    }
                    write_range(f, *range)?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod interval_set_tests {
    use super::*;

    #[test]
    fn add_merges_adjacent() {
        let mut set = IntervalSet::empty();
        set.add_range(0, 2);
        set.add_range(6, 8);
        set.add_range(3, 5);
        assert_eq!(set.nb_ranges(), 1);
        assert_eq!(set.min(), Some(0));
        assert_eq!(set.max(), Some(8));
    }

    #[test]
    fn remove_splits() {
        let mut set = IntervalSet::from_range(-999, 999);
        set.remove(5);
        set.remove(7);
        set.remove(9);
        assert_eq!(set.nb_ranges(), 4);
        assert_eq!(set.size(), 1999 - 3);
        assert_eq!(set.next_value(4), Some(6));
        assert_eq!(set.previous_value(8), Some(6));
        assert_eq!(set.next_value(999), None);
    }

    #[test]
    fn intersection_and_disjoint() {
        let mut a = IntervalSet::from_values([1, 2, 3, 7, 8]);
        let b = IntervalSet::from_values([3, 4, 5, 8]);
        assert!(!a.disjoint(&b));
        a.intersect_with(&b);
        assert_eq!(a, IntervalSet::from_values([3, 8]));

        let c = IntervalSet::from_values([4, 5]);
        assert!(a.disjoint(&c));
    }

    #[test]
    fn subsets() {
        let a = IntervalSet::from_values([2, 3, 7]);
        let b = IntervalSet::from_range(0, 8);
        assert!(a.is_subset_of(&b));
        assert!(!b.is_subset_of(&a));
        assert!(IntervalSet::empty().is_subset_of(&a));
        assert!(b.contains_range(2, 8));
        assert!(!a.contains_range(2, 7));
    }

    #[test]
    fn retain_and_complement() {
        let mut set = IntervalSet::from_values([1, 2, 5, 6, 9]);
        set.retain_range(2, 6);
        assert_eq!(set, IntervalSet::from_values([2, 5, 6]));

        let complement = set.complement();
        assert!(complement.contains(3));
        assert!(!complement.contains(5));
        assert!(complement.contains(MIN));
        assert!(complement.contains(MAX));
    }

    #[test]
    fn views_arithmetic() {
        let set = IntervalSet::from_values([1, 2, 5]);
        assert_eq!(set.shifted(3), IntervalSet::from_values([4, 5, 8]));
        assert_eq!(set.negated(), IntervalSet::from_values([-5, -2, -1]));
    }
}
