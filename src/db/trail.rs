/*!
A record of how to undo changes, grouped by decision level.

Each change made at some level above the root which must be undone on a backjump is noted with an [Undo] record.
On a backjump the records of each level above the target are applied in reverse order of their addition.

Changes at the root are never undone, and so no record is kept.

Each level is also a *world*, with an identifier unique across a solve.
This allows, e.g., the domain of a variable to be saved at most once per world by stamping the variable with the world of the last save.

```rust
# use otter_fd::db::trail::{Trail, Undo};
let mut trail = Trail::default();
trail.save(Undo::GraphSize(3));
assert_eq!(trail.level(), 0);

trail.push_level();
let world = trail.world();
trail.save(Undo::GraphSize(5));
trail.save(Undo::GraphSize(7));

trail.push_level();
assert_ne!(trail.world(), world);

assert!(trail.pop_level().is_empty());
assert_eq!(trail.pop_level(), vec![Undo::GraphSize(7), Undo::GraphSize(5)]);
assert_eq!(trail.level(), 0);
```
*/

use crate::{
    db::{ClauseKey, ContainerKey, LevelIndex},
    generic::interval_set::IntervalSet,
    structures::variable::Var,
};

/// How to undo a change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Undo {
    /// Restore the domain of a variable.
    Domain { var: Var, domain: IntervalSet },

    /// Restore the size of the implication graph.
    GraphSize(usize),

    /// Make a container of watchers active.
    ContainerActive(ContainerKey),

    /// Make a clause active and unlocked.
    ClauseActive(ClauseKey),

    /// Restore a watcher to the container of its literal.
    Reattach { clause: ClauseKey, literal: usize },
}

#[derive(Default)]
pub struct Trail {
    undos: Vec<Undo>,

    /// The index of the first record of each level.
    marks: Vec<usize>,

    /// The world of each level.
    worlds: Vec<u32>,

    /// A count of all worlds entered.
    world_count: u32,
}

impl Trail {
    /// The current level.
    pub fn level(&self) -> LevelIndex {
        self.marks.len() as LevelIndex
    }

    /// The world of the current level, which is zero only at the root.
    pub fn world(&self) -> u32 {
        self.worlds.last().copied().unwrap_or(0)
    }

    /// Enters a fresh level.
    pub fn push_level(&mut self) {
        self.marks.push(self.undos.len());
        self.world_count += 1;
        self.worlds.push(self.world_count);
    }

    /// Notes how to undo some change, unless at the root.
    pub fn save(&mut self, undo: Undo) {
        if !self.marks.is_empty() {
            self.undos.push(undo);
        }
    }

    /// Leaves the current level, returning the records of the level in the order they should be applied.
    pub fn pop_level(&mut self) -> Vec<Undo> {
        match self.marks.pop() {
            Some(mark) => {
                self.worlds.pop();
                let mut undos = self.undos.split_off(mark);
                undos.reverse();
                undos
            }
            None => Vec::default(),
        }
    }

    /// A count of all records.
    pub fn len(&self) -> usize {
        self.undos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undos.is_empty()
    }
}
