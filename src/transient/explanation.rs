/*!
An accumulator of signed literals, built during conflict analysis.

# Overview

An explanation holds:
- A *front*, mapping variables to entries of the [implication graph](crate::db::implication), from which the largest entry is taken at each step of analysis.
- A set of literals, at most one for each (source) variable, each the claim that the variable takes a value in the set.
- The level the resulting clause asserts at, unset until analysis stops.

Literals are added in one of two ways, each following signed resolution:
- [union_lit](Explanation::union_lit) joins a set to the literal of a variable, as when a variable appears in the reason of the pivot.
- [intersect_lit](Explanation::intersect_lit) restricts the literal of a variable to a set, as when the variable is the pivot. If the literal becomes empty, the literal is dropped, together with the variable from the front.

An intersection with a variable absent from the explanation is a union.

Sets are taken from, and returned to, a [pool](SetPool).

```rust
# use otter_fd::transient::explanation::Explanation;
# use otter_fd::generic::interval_set::IntervalSet;
let mut explanation = Explanation::default();

explanation.union_lit(0, IntervalSet::from_range(0, 3));
explanation.union_lit(0, IntervalSet::singleton(7));
explanation.intersect_lit(0, IntervalSet::from_range(2, 8));
assert_eq!(explanation.literal(0).unwrap().to_string(), "{[2,3],7}");

explanation.intersect_lit(0, IntervalSet::singleton(5));
assert!(!explanation.contains(0));
assert_eq!(explanation.cardinality(), 0);

let scratch = explanation.universe();
assert!(scratch.contains(-5) && scratch.contains(5));
explanation.return_set(scratch);
assert!(explanation.empty().is_empty());
```
*/

use std::collections::HashMap;

use crate::{
    db::{implication::ImplicationGraph, LevelIndex},
    generic::{interval_set::IntervalSet, pool::SetPool, value_sorted_map::ValueSortedMap},
    structures::variable::Var,
    types::err::{self},
};

#[derive(Default)]
pub struct Explanation {
    /// Variables mapped to entries of the implication graph.
    pub front: ValueSortedMap<Var>,

    literals: HashMap<Var, IntervalSet>,

    assert_level: Option<LevelIndex>,

    pool: SetPool,
}

impl Explanation {
    /// Clears the front, literals, and assert level.
    pub fn recycle(&mut self) {
        self.front.clear();
        for (_, set) in self.literals.drain() {
            self.pool.give(set);
        }
        self.assert_level = None;
    }

    /// An empty set, from the pool.
    pub fn empty(&mut self) -> IntervalSet {
        self.pool.take()
    }

    /// The universe, from the pool.
    pub fn universe(&mut self) -> IntervalSet {
        let mut set = self.pool.take();
        set.add_range(crate::generic::interval_set::MIN, crate::generic::interval_set::MAX);
        set
    }

    pub fn return_set(&mut self, set: IntervalSet) {
        self.pool.give(set);
    }

    /// The root domain of var, less the domain of var at its entry in the front.
    pub fn complement(&mut self, var: Var, graph: &ImplicationGraph) -> Result<IntervalSet, err::ImplicationGraphError> {
        let mut set = self.pool.take();
        set.copy_from(graph.root_domain(var)?);
        if let Some(index) = self.front.get(var) {
            set.difference_with(&graph.entry(index)?.domain);
        }
        Ok(set)
    }

    /// Joins set to the literal of var.
    pub fn union_lit(&mut self, var: Var, set: IntervalSet) {
        match self.literals.get_mut(&var) {
            Some(literal) => {
                literal.union_with(&set);
                self.pool.give(set);
            }
            None if set.is_empty() => self.pool.give(set),
            None => {
                self.literals.insert(var, set);
            }
        }
    }

    /// Restricts the literal of var to set, or joins set to the literal if var has no literal.
    pub fn intersect_lit(&mut self, var: Var, set: IntervalSet) {
        let Some(literal) = self.literals.get_mut(&var) else {
            return self.union_lit(var, set);
        };
        literal.intersect_with(&set);
        self.pool.give(set);
        if literal.is_empty() {
            self.remove_lit(var);
        }
    }

    /// Removes the literal of var, and var from the front.
    pub fn remove_lit(&mut self, var: Var) {
        if let Some(set) = self.literals.remove(&var) {
            self.pool.give(set);
        }
        self.front.remove(var);
    }

    pub fn contains(&self, var: Var) -> bool {
        self.literals.contains_key(&var)
    }

    pub fn literal(&self, var: Var) -> Option<&IntervalSet> {
        self.literals.get(&var)
    }

    /// The literals of the explanation, sorted by variable.
    pub fn literals(&self) -> Vec<(Var, &IntervalSet)> {
        let mut literals = self.literals.iter().map(|(var, set)| (*var, set)).collect::<Vec<_>>();
        literals.sort_by_key(|(var, _)| *var);
        literals
    }

    /// A count of literals.
    pub fn cardinality(&self) -> usize {
        self.literals.len()
    }

    /// The level the clause asserts at, if analysis has stopped.
    pub fn assert_level(&self) -> Option<LevelIndex> {
        self.assert_level
    }

    pub fn set_assert_level(&mut self, level: LevelIndex) {
        self.assert_level = Some(level);
    }
}

impl std::fmt::Display for Explanation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (index, (var, set)) in self.literals().into_iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "v{var} ∈ {set}")?;
        }
        write!(f, "}}")
    }
}
