/*!
A record of the reason for each reduction of a domain.

# Overview

The implication graph is an append-only sequence of entries, each noting:
- The (source) variable reduced, and the domain of the variable after the reduction.
- The [cause](Cause) of the reduction, the [kind(s) of event](crate::structures::event::mask), and the value of the (latest) event.
- The index of the previous entry of the variable, its *predecessor*.
- The decision level of the reduction, and the filtering pass during which it was made.

The entries of a variable form a chain, from the latest entry (the *head* of the variable) back to a *root* entry holding the domain of the variable when recording began.
A root entry is its own predecessor, and has an empty event mask.

The domain of an entry is derived from the domain of its predecessor and the event, and so no entry requires a copy of the domain of the variable at the time of the event.

Entries are never revised, with the exception of merges, and never removed, with the exception of a backjump.
On a backjump the size of the graph is restored through the [trail](crate::db::trail), and the graph *synchronises* with the restored size when next used: entries beyond the size are truncated, and the head of each variable is relinked to its still valid predecessor.

# Merges

Depending on [policy](MergePolicy), an event may be folded into the head entry of the variable rather than recorded as a fresh entry:
- [Consecutive](MergePolicy::Consecutive): the head is the latest entry of the graph, and has the same cause and level.
- [SamePass](MergePolicy::SamePass): the head was made in the current pass, and has the same cause and level.

# Walks

During [analysis](crate::procedures::analysis) the graph is walked backwards from a conflict through a *front*, a map from variables to entries sorted by entry index.
The methods [collect_nodes_from_conflict](ImplicationGraph::collect_nodes_from_conflict), [predecessors_of](ImplicationGraph::predecessors_of), and [find_predecessor](ImplicationGraph::find_predecessor) extend the front.

# Example

```rust
# use otter_fd::db::implication::ImplicationGraph;
# use otter_fd::config::{Config, MergePolicy};
# use otter_fd::generic::interval_set::IntervalSet;
# use otter_fd::structures::{cause::Cause, event::Event};
let mut config = Config::default();
config.merge_policy.value = MergePolicy::Disabled;

let mut graph = ImplicationGraph::new(&config);
graph.init([(0, IntervalSet::from_range(0, 9))], 1);

assert!(graph.push_event(0, Cause::Null, Event::IncLow(3), 0).is_ok());
assert!(graph.push_event(0, Cause::Null, Event::Remove(5), 0).is_ok());

assert_eq!(graph.size(), 3);
assert_eq!(graph.chain(0).unwrap(), vec![2, 1, 0]);
assert_eq!(graph.domain(2).to_string(), "{[3,4],[6,9]}");
```
*/

use crate::{
    config::{Config, MergePolicy},
    db::LevelIndex,
    generic::{interval_set::IntervalSet, value_sorted_map::ValueSortedMap},
    misc::log::targets::{self},
    structures::{
        cause::Cause,
        conflict::Conflict,
        event::{mask, Event, EventMask},
        variable::Var,
    },
    types::err::{self},
};

/// An entry of the implication graph.
#[derive(Clone, Debug)]
pub struct Entry {
    pub var: Var,
    pub domain: IntervalSet,
    pub cause: Cause,
    pub mask: EventMask,
    pub value: i32,
    pub prev: usize,
    pub level: LevelIndex,
    pub pass: u32,
}

pub struct ImplicationGraph {
    entries: Vec<Entry>,

    /// The size of the graph, which may be below the count of entries after a backjump.
    size: usize,

    /// The latest entry of each variable.
    heads: Vec<Option<usize>>,

    /// The root entry of each variable.
    roots: Vec<Option<usize>>,

    /// The current filtering pass.
    pass: u32,

    merge_policy: MergePolicy,

    /// Whether events are recorded.
    recording: bool,
}

impl ImplicationGraph {
    pub fn new(config: &Config) -> Self {
        ImplicationGraph {
            entries: Vec::default(),
            size: 0,
            heads: Vec::default(),
            roots: Vec::default(),
            pass: 0,
            merge_policy: config.merge_policy.value,
            recording: false,
        }
    }

    /// Begins recording, with a root entry for each given variable and domain.
    ///
    /// `count` bounds the variables, so any variable at least `count` is unknown.
    pub fn init(&mut self, domains: impl IntoIterator<Item = (Var, IntervalSet)>, count: usize) {
        self.entries.clear();
        self.heads = vec![None; count];
        self.roots = vec![None; count];
        self.pass = 0;

        for (var, domain) in domains {
            let index = self.entries.len();
            self.entries.push(Entry {
                var,
                domain,
                cause: Cause::Null,
                mask: mask::VOID,
                value: 0,
                prev: index,
                level: 0,
                pass: 0,
            });
            self.heads[var as usize] = Some(index);
            self.roots[var as usize] = Some(index);
        }
        self.size = self.entries.len();
        self.recording = true;
    }

    /// Stops recording, and forgets every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.heads.clear();
        self.roots.clear();
        self.size = 0;
        self.recording = false;
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// The count of (valid) entries.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Restores the size of the graph, as on a backjump.
    ///
    /// Entries beyond the size are removed on the next [synchronise](ImplicationGraph::synchronise).
    pub fn set_size(&mut self, size: usize) {
        self.size = std::cmp::min(size, self.size);
    }

    /// Removes entries beyond the size of the graph, relinking the head of each affected variable.
    pub fn synchronise(&mut self) {
        let upto = self.size;
        if self.entries.len() <= upto {
            return;
        }
        log::trace!(target: targets::IMPLICATION, "Synchronise {} to {upto}", self.entries.len());

        for index in upto..self.entries.len() {
            let var = self.entries[index].var as usize;
            if self.heads[var].is_some_and(|head| head >= upto) {
                self.heads[var] = Some(self.entries[index].prev);
            }
        }
        self.entries.truncate(upto);
    }

    /// Marks the start of a fresh call to some propagator.
    pub fn begin_pass(&mut self) {
        self.pass = self.pass.wrapping_add(1);
    }

    /// Records an event.
    ///
    /// For documentation, see [db::implication](crate::db::implication).
    pub fn push_event(
        &mut self,
        var: Var,
        cause: Cause,
        event: Event,
        level: LevelIndex,
    ) -> Result<(), err::ImplicationGraphError> {
        if !self.recording {
            return Ok(());
        }
        self.synchronise();

        let Some(head) = self.heads.get(var as usize).copied().flatten() else {
            log::error!(target: targets::IMPLICATION, "Event on unknown variable v{var}");
            return Err(err::ImplicationGraphError::UnknownVariable(var));
        };

        if self.mergeable(head, cause, level) {
            let entry = &mut self.entries[head];
            entry.mask |= event.mask();
            entry.value = event.value();
            event.apply(&mut entry.domain);
            log::trace!(target: targets::IMPLICATION, "Merged {event} on v{var} into {head}");
            return Ok(());
        }

        let mut domain = self.entries[head].domain.clone();
        event.apply(&mut domain);

        log::trace!(target: targets::IMPLICATION, "{}: {event} on v{var} by {cause} at {level}", self.entries.len());
        let index = self.entries.len();
        self.entries.push(Entry {
            var,
            domain,
            cause,
            mask: event.mask(),
            value: event.value(),
            prev: head,
            level,
            pass: self.pass,
        });
        self.heads[var as usize] = Some(index);
        self.size = self.entries.len();

        Ok(())
    }

    fn mergeable(&self, head: usize, cause: Cause, level: LevelIndex) -> bool {
        let entry = &self.entries[head];
        if entry.prev == head || entry.cause != cause || entry.level != level {
            return false;
        }
        match self.merge_policy {
            MergePolicy::Disabled => false,
            MergePolicy::Consecutive => head + 1 == self.entries.len(),
            MergePolicy::SamePass => entry.pass == self.pass,
        }
    }

    /// Seeds a front from a conflict.
    ///
    /// A conflict on some variable seeds the front with the head of the variable.
    /// Otherwise, the front is seeded with the head of each variable the cause of the conflict depends on.
    pub fn collect_nodes_from_conflict(
        &mut self,
        conflict: &Conflict,
        cause_vars: &[Var],
        front: &mut ValueSortedMap<Var>,
    ) -> Result<(), err::ImplicationGraphError> {
        self.synchronise();
        match conflict.var {
            Some(var) => front.put(var, self.head(var)?),
            None => {
                for &var in cause_vars {
                    front.put(var, self.head(var)?);
                }
            }
        }
        Ok(())
    }

    /// Extends a front with the predecessors of the entry at `p`.
    ///
    /// The variable of the entry is mapped to its predecessor, and each variable the cause of the entry depends on is mapped to its rightmost entry before `p`.
    pub fn predecessors_of(
        &self,
        p: usize,
        cause_vars: &[Var],
        front: &mut ValueSortedMap<Var>,
    ) -> Result<(), err::ImplicationGraphError> {
        let entry = self.entry(p)?;
        front.put(entry.var, entry.prev);
        for &var in cause_vars {
            if var != entry.var {
                self.find_predecessor(front, var, p)?;
            }
        }
        Ok(())
    }

    /// Maps var in the front to its rightmost entry before `p`.
    pub fn find_predecessor(
        &self,
        front: &mut ValueSortedMap<Var>,
        var: Var,
        p: usize,
    ) -> Result<(), err::ImplicationGraphError> {
        match front.get(var) {
            Some(mut index) => {
                while index >= p && self.entries[index].prev != index {
                    index = self.entries[index].prev;
                }
                front.replace(var, index);
            }
            None => front.put(var, self.rightmost_node(p, var)?),
        }
        Ok(())
    }

    /// The rightmost entry of var before `limit`, or the root of var.
    pub fn rightmost_node(&self, limit: usize, var: Var) -> Result<usize, err::ImplicationGraphError> {
        let mut index = self.head(var)?;
        while index >= limit && self.entries[index].prev != index {
            index = self.entries[index].prev;
        }
        Ok(index)
    }

    /// The latest entry of a variable.
    pub fn head(&self, var: Var) -> Result<usize, err::ImplicationGraphError> {
        match self.heads.get(var as usize).copied().flatten() {
            Some(head) => Ok(head),
            None => Err(err::ImplicationGraphError::UnknownVariable(var)),
        }
    }

    pub fn entry(&self, index: usize) -> Result<&Entry, err::ImplicationGraphError> {
        match self.entries.get(index) {
            Some(entry) if index < self.size => Ok(entry),
            _ => Err(err::ImplicationGraphError::MissingEntry(index)),
        }
    }

    // Unchecked accessors, for indices taken from the graph.

    pub fn var(&self, index: usize) -> Var {
        self.entries[index].var
    }

    pub fn cause(&self, index: usize) -> Cause {
        self.entries[index].cause
    }

    pub fn mask(&self, index: usize) -> EventMask {
        self.entries[index].mask
    }

    pub fn value(&self, index: usize) -> i32 {
        self.entries[index].value
    }

    pub fn level(&self, index: usize) -> LevelIndex {
        self.entries[index].level
    }

    pub fn domain(&self, index: usize) -> &IntervalSet {
        &self.entries[index].domain
    }

    pub fn predecessor(&self, index: usize) -> usize {
        self.entries[index].prev
    }

    /// The domain of var when recording began.
    pub fn root_domain(&self, var: Var) -> Result<&IntervalSet, err::ImplicationGraphError> {
        match self.roots.get(var as usize).copied().flatten() {
            Some(root) => Ok(&self.entries[root].domain),
            None => Err(err::ImplicationGraphError::UnknownVariable(var)),
        }
    }

    /// The domain of var at the end of the root level.
    pub fn root_level_domain(&self, var: Var) -> Result<&IntervalSet, err::ImplicationGraphError> {
        let mut index = self.head(var)?;
        while self.entries[index].level > 0 {
            index = self.entries[index].prev;
        }
        Ok(&self.entries[index].domain)
    }

    /// The entries of var, from the head to the root.
    pub fn chain(&self, var: Var) -> Result<Vec<usize>, err::ImplicationGraphError> {
        let mut index = self.head(var)?;
        let mut chain = vec![index];
        while self.entries[index].prev != index {
            index = self.entries[index].prev;
            chain.push(index);
        }
        Ok(chain)
    }
}
