/*!
A map from keys to (unique) positions, ordered by position.

Used as the *front* during [conflict analysis](crate::procedures::analysis): each variable is mapped to an entry of the [implication graph](crate::db::implication), and the entry with the largest index is always at hand.

Positions are assumed unique, as each entry of the implication graph concerns a single variable.

```rust
# use otter_fd::generic::value_sorted_map::ValueSortedMap;
let mut front = ValueSortedMap::default();
front.put(7_u32, 12);
front.put(3_u32, 40);
front.put(7_u32, 2);

assert_eq!(front.last(), Some((40, 3)));
assert_eq!(front.poll_last(), Some((40, 3)));
assert_eq!(front.last(), Some((2, 7)));
```
*/

use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

pub struct ValueSortedMap<K: Copy + Eq + Hash + Ord> {
    positions: HashMap<K, usize>,
    order: BTreeSet<(usize, K)>,
}

impl<K: Copy + Eq + Hash + Ord> Default for ValueSortedMap<K> {
    fn default() -> Self {
        ValueSortedMap {
            positions: HashMap::default(),
            order: BTreeSet::default(),
        }
    }
}

impl<K: Copy + Eq + Hash + Ord> ValueSortedMap<K> {
    /// Maps key to position, replacing any previous position of key.
    pub fn put(&mut self, key: K, position: usize) {
        if let Some(previous) = self.positions.insert(key, position) {
            self.order.remove(&(previous, key));
        }
        self.order.insert((position, key));
    }

    /// Maps key to position, if key is present.
    pub fn replace(&mut self, key: K, position: usize) {
        if self.positions.contains_key(&key) {
            self.put(key, position)
        }
    }

    pub fn get(&self, key: K) -> Option<usize> {
        self.positions.get(&key).copied()
    }

    pub fn contains(&self, key: K) -> bool {
        self.positions.contains_key(&key)
    }

    pub fn remove(&mut self, key: K) -> Option<usize> {
        let position = self.positions.remove(&key)?;
        self.order.remove(&(position, key));
        Some(position)
    }

    /// The largest position, and its key.
    pub fn last(&self) -> Option<(usize, K)> {
        self.order.last().copied()
    }

    /// Removes and returns the largest position, and its key.
    pub fn poll_last(&mut self) -> Option<(usize, K)> {
        let (position, key) = self.order.pop_last()?;
        self.positions.remove(&key);
        Some((position, key))
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.order.clear();
    }

    /// Keys and positions, in ascending order of position.
    pub fn iter(&self) -> impl Iterator<Item = (usize, K)> + '_ {
        self.order.iter().copied()
    }
}
