/*!
An index from closed intervals to values.

Intervals are kept in two ordered indices, one by start and one by end, with at most one value for each interval.
So insertion and deletion are logarithmic, and each query visits only the intervals it returns.

The index is used by the [clause store](crate::db::clause) to find, for each variable, the containers of watched literals whose range may change status after a bound of the variable moves:
- [below](IntervalTree::below) lists intervals starting at or below a (new) lower bound.
- [above](IntervalTree::above) lists intervals ending at or above a (new) upper bound.

```rust
# use otter_fd::generic::interval_tree::IntervalTree;
let mut tree = IntervalTree::default();
tree.insert(0, 4, 'a');
tree.insert(3, 9, 'b');
tree.insert(6, 7, 'c');

assert_eq!(tree.get(3, 9), Some(&'b'));
assert_eq!(tree.below(3).copied().collect::<Vec<_>>(), vec!['a', 'b']);
assert_eq!(tree.above(8).copied().collect::<Vec<_>>(), vec!['b']);
```
*/

use std::collections::{BTreeMap, BTreeSet};

/// Intervals and their values, ordered by start and, separately, by end.
pub struct IntervalTree<V> {
    /// Values, by (start, end).
    by_start: BTreeMap<(i32, i32), V>,

    /// Intervals, as (end, start).
    by_end: BTreeSet<(i32, i32)>,
}

impl<V> Default for IntervalTree<V> {
    fn default() -> Self {
        IntervalTree {
            by_start: BTreeMap::default(),
            by_end: BTreeSet::default(),
        }
    }
}

impl<V> IntervalTree<V> {
    pub fn get(&self, start: i32, end: i32) -> Option<&V> {
        self.by_start.get(&(start, end))
    }

    /// Inserts a value for the interval, returning any value previously stored for the interval.
    pub fn insert(&mut self, start: i32, end: i32, value: V) -> Option<V> {
        self.by_end.insert((end, start));
        self.by_start.insert((start, end), value)
    }

    pub fn delete(&mut self, start: i32, end: i32) -> Option<V> {
        self.by_end.remove(&(end, start));
        self.by_start.remove(&(start, end))
    }

    /// Keeps only those values for which the predicate holds.
    pub fn retain(&mut self, mut predicate: impl FnMut(&V) -> bool) {
        let by_end = &mut self.by_end;
        self.by_start.retain(|(start, end), value| {
            let keep = predicate(value);
            if !keep {
                by_end.remove(&(*end, *start));
            }
            keep
        });
    }

    pub fn len(&self) -> usize {
        self.by_start.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_start.is_empty()
    }

    /// Every value, in order of interval.
    pub fn iter(&self) -> impl Iterator<Item = &V> {
        self.by_start.values()
    }

    /// Values of intervals starting at or below bound, in ascending order of start.
    pub fn below(&self, bound: i32) -> impl Iterator<Item = &V> {
        self.by_start.range(..=(bound, i32::MAX)).map(|(_, value)| value)
    }

    /// Values of intervals ending at or above bound, in ascending order of end.
    pub fn above(&self, bound: i32) -> impl Iterator<Item = &V> {
        self.by_end
            .range((bound, i32::MIN)..)
            .filter_map(move |(end, start)| self.by_start.get(&(*start, *end)))
    }
}

#[cfg(test)]
mod interval_tree_tests {
    use super::*;

    #[test]
    fn insert_replace_delete() {
        let mut tree = IntervalTree::default();
        assert!(tree.insert(1, 2, 10).is_none());
        assert_eq!(tree.insert(1, 2, 20), Some(10));
        assert!(tree.insert(1, 3, 30).is_none());
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.delete(1, 2), Some(20));
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![30]);
    }

    #[test]
    fn bounds() {
        let mut tree = IntervalTree::default();
        for (index, (start, end)) in [(-5, 0), (0, 10), (2, 3), (8, 12)].into_iter().enumerate() {
            tree.insert(start, end, index);
        }
        assert_eq!(tree.below(1).copied().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(tree.above(9).copied().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(tree.above(100).count(), 0);
    }

    #[test]
    fn indices_agree_after_removal() {
        let mut tree = IntervalTree::default();
        for (index, (start, end)) in [(0, 9), (1, 2), (3, 12), (5, 5)].into_iter().enumerate() {
            tree.insert(start, end, index);
        }
        tree.retain(|value| value % 2 == 0);
        assert_eq!(tree.delete(0, 9), Some(0));
        assert!(tree.delete(1, 2).is_none());

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.above(0).copied().collect::<Vec<_>>(), vec![2]);
        assert_eq!(tree.below(100).copied().collect::<Vec<_>>(), vec![2]);
    }
}
