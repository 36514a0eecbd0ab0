/*!
Watchers of literals, grouped into containers.

A [Watcher] binds a clause to the position of one of its (watched) literals.
Watchers are held by a [Container], and each container concerns a single variable and range.

With the [IntervalTree](StorageMode::IntervalTree) storage mode watchers of literals on the same variable and range share a container, and the containers of each variable are indexed by an [interval tree](IntervalTree).
So, a domain event requires each range to be checked once, regardless of how many clauses watch a literal on the range.

With the [PerClause](StorageMode::PerClause) storage mode each watched literal of a clause has a container of its own.
The container is kept for the lifetime of the clause, and reused whenever the literal is watched again.

A container is *active* until the status of its literal is fixed, at which point the watchers of the container are swept and the container made passive until a backjump.
*/

use std::collections::{HashMap, HashSet};

use slotmap::SlotMap;

use crate::{
    config::dbs::StorageMode,
    db::{ClauseKey, ContainerKey},
    generic::interval_tree::IntervalTree,
    structures::{event::Event, literal::SignedLiteral, variable::Var},
};

/// A clause, and the position of a watched literal of the clause.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Watcher {
    pub clause: ClauseKey,
    pub literal: usize,
}

pub struct Container {
    pub var: Var,
    pub start: i32,
    pub end: i32,
    pub watchers: Vec<Watcher>,
    pub active: bool,
}

pub struct Watches {
    mode: StorageMode,
    containers: SlotMap<ContainerKey, Container>,

    /// Shared containers, by variable.
    trees: HashMap<Var, IntervalTree<ContainerKey>>,

    /// Private containers, by variable.
    private: HashMap<Var, Vec<ContainerKey>>,

    /// The private container of each clause and literal position.
    owners: HashMap<(ClauseKey, usize), ContainerKey>,
}

impl Watches {
    pub fn new(mode: StorageMode) -> Self {
        Watches {
            mode,
            containers: SlotMap::default(),
            trees: HashMap::default(),
            private: HashMap::default(),
            owners: HashMap::default(),
        }
    }

    /// Adds a watcher for the given literal, to the container of the literal.
    pub fn attach(&mut self, clause: ClauseKey, literal: &SignedLiteral, position: usize) -> ContainerKey {
        let watcher = Watcher {
            clause,
            literal: position,
        };

        let key = match self.mode {
            StorageMode::IntervalTree => {
                let tree = self.trees.entry(literal.var).or_default();
                match tree.get(literal.low, literal.high) {
                    Some(key) => *key,
                    None => {
                        let key = self.containers.insert(Container {
                            var: literal.var,
                            start: literal.low,
                            end: literal.high,
                            watchers: Vec::default(),
                            active: true,
                        });
                        tree.insert(literal.low, literal.high, key);
                        key
                    }
                }
            }

            StorageMode::PerClause => match self.owners.get(&(clause, position)) {
                Some(key) if self.containers.contains_key(*key) => *key,
                _ => {
                    let key = self.containers.insert(Container {
                        var: literal.var,
                        start: literal.low,
                        end: literal.high,
                        watchers: Vec::default(),
                        active: true,
                    });
                    self.private.entry(literal.var).or_default().push(key);
                    self.owners.insert((clause, position), key);
                    key
                }
            },
        };

        if let Some(container) = self.containers.get_mut(key) {
            if !container.watchers.contains(&watcher) {
                container.watchers.push(watcher);
            }
        }
        key
    }

    /// The containers of var whose literal may have changed status due to the event, given the current bounds of var.
    ///
    /// Events on views, removals, and instantiations may change the status of any literal.
    pub fn affected(&self, var: Var, event: Event, bounds: (i32, i32), is_view: bool) -> Vec<ContainerKey> {
        let (lb, ub) = bounds;
        let sweep = is_view || matches!(event, Event::Remove(_) | Event::Instantiate(_));
        let mut keys = Vec::default();

        if let Some(tree) = self.trees.get(&var) {
            match event {
                _ if sweep => keys.extend(tree.iter().copied()),
                Event::IncLow(_) => keys.extend(tree.below(lb).copied()),
                _ => keys.extend(tree.above(ub).copied()),
            }
        }

        if let Some(private) = self.private.get(&var) {
            for key in private {
                let Some(container) = self.containers.get(*key) else {
                    continue;
                };
                let relevant = match event {
                    _ if sweep => true,
                    Event::IncLow(_) => container.start <= lb,
                    _ => container.end >= ub,
                };
                if relevant {
                    keys.push(*key);
                }
            }
        }

        keys
    }

    pub fn get(&self, key: ContainerKey) -> Option<&Container> {
        self.containers.get(key)
    }

    pub fn get_mut(&mut self, key: ContainerKey) -> Option<&mut Container> {
        self.containers.get_mut(key)
    }

    pub fn activate(&mut self, key: ContainerKey) {
        if let Some(container) = self.containers.get_mut(key) {
            container.active = true;
        }
    }

    /// Removes watchers of clauses which no longer exist, and then any empty container.
    ///
    /// The private containers of an existing clause are kept, empty or otherwise, for reuse.
    pub fn collect_garbage(&mut self, exists: impl Fn(ClauseKey) -> bool) {
        for container in self.containers.values_mut() {
            container.watchers.retain(|watcher| exists(watcher.clause));
        }
        self.owners.retain(|(clause, _), _| exists(*clause));

        let owned = self.owners.values().copied().collect::<HashSet<_>>();
        let keep = |key: ContainerKey, container: &Container| !container.watchers.is_empty() || owned.contains(&key);

        let containers = &self.containers;
        for tree in self.trees.values_mut() {
            tree.retain(|key| containers.get(*key).is_some_and(|c| keep(*key, c)));
        }
        for private in self.private.values_mut() {
            private.retain(|key| containers.get(*key).is_some_and(|c| keep(*key, c)));
        }

        self.containers.retain(|key, container| keep(key, &*container));
    }

    /// A count of all containers.
    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    /// Every container, together with its key.
    pub fn iter(&self) -> impl Iterator<Item = (ContainerKey, &Container)> {
        self.containers.iter()
    }
}
