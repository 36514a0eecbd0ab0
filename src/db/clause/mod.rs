/*!
A store of signed clauses, and the watchers of their literals.

# Overview

Clauses are stored in a [slotmap](slotmap), and accessed by a [ClauseKey].
Original clauses and learnt clauses are noted in separate lists, and the list of learnt clauses is ordered by addition (until a [reduction](ClauseStore::reduce_db)).
The most recently learnt clause is noted as *last*, until the next call to [forget](ClauseStore::forget).

The watchers of each clause are held in [containers](watches::Container), and the store is notified of each domain event through [on_event](ClauseStore::on_event):
- An instantiation or removal on a variable sweeps every container of the variable.
- An increase of the lower bound to *lb* sweeps containers starting at or below *lb*.
- A decrease of the upper bound to *ub* sweeps containers ending at or above *ub*.

A swept container whose literal is now true or false is checked: watchers of literals which are no longer watched are removed, and on a false literal each watching clause is scheduled for propagation (or, if the clause is passive, the watcher is removed until a backjump).
In either case the container is made passive until a backjump.

Scheduled clauses are propagated through [propagate](ClauseStore::propagate), one at a time, by the [propagation engine](crate::procedures::propagate).

# Counters

The clause identifier and activity increment are fields of the store, and are reset only by creating a fresh store.

# Example

```rust
# use otter_fd::config::Config;
# use otter_fd::db::clause::{ClauseStore, signed_clause::ClauseSource};
# use otter_fd::generic::interval_set::IntervalSet;
let mut store = ClauseStore::new(&Config::default());

let key = store
    .add(&[0, 1], &[IntervalSet::from_range(0, 4), IntervalSet::singleton(7)], ClauseSource::Original)
    .unwrap();

assert_eq!(store.original_count(), 1);
assert_eq!(store.get(key).unwrap().to_string(), "(v0 ∈ [0,4]) ∨ (v1 ∈ [7,7])");
assert!(store.add(&[0], &[IntervalSet::singleton(3)], ClauseSource::Original).is_err());
```
*/

pub mod reduction;
pub mod signed_clause;
pub mod statistics;
pub mod watches;

use std::collections::VecDeque;

use signed_clause::{ClauseSource, SignedClause};
use slotmap::SlotMap;
use watches::Watches;

use crate::{
    config::{dbs::ClauseStoreConfig, Activity, Config},
    db::{implication::ImplicationGraph, trail::{Trail, Undo}, variable::VariableDB, ClauseKey, ContainerKey},
    generic::interval_set::IntervalSet,
    misc::log::targets::{self},
    structures::{entailment::Entailment, event::Event, variable::Var},
    types::err::{self},
};

pub struct ClauseStore {
    clauses: SlotMap<ClauseKey, SignedClause>,

    originals: Vec<ClauseKey>,

    learnts: Vec<ClauseKey>,

    /// The most recently learnt clause, until forgotten.
    last: Option<ClauseKey>,

    watches: Watches,

    queue: VecDeque<ClauseKey>,

    /// The activity with which the next clause used during analysis will be bumped by.
    clause_inc: Activity,

    next_id: usize,

    config: ClauseStoreConfig,

    print_clauses: bool,

    /// Scratch space for hidden unit detection.
    uua: IntervalSet,
}

impl ClauseStore {
    pub fn new(config: &Config) -> Self {
        ClauseStore {
            clauses: SlotMap::default(),
            originals: Vec::default(),
            learnts: Vec::default(),
            last: None,
            watches: Watches::new(config.clause_db.storage_mode.value),
            queue: VecDeque::default(),
            clause_inc: 1.0,
            next_id: 0,
            config: config.clause_db.clone(),
            print_clauses: config.print_clauses.value,
            uua: IntervalSet::default(),
        }
    }

    /// Adds a clause over the given variables and sets, and schedules the clause for (coarse) propagation.
    ///
    /// Learnt clauses become the [last](ClauseStore::last) clause, with activity equal to the current increment.
    pub fn add(
        &mut self,
        vars: &[Var],
        ranges: &[IntervalSet],
        source: ClauseSource,
    ) -> Result<ClauseKey, err::ClauseStoreError> {
        if vars.len() != ranges.len() {
            return Err(err::ClauseStoreError::Mismatch);
        }

        let mut clause = SignedClause::new(self.next_id, vars, ranges, source);
        if clause.size() < 2 {
            log::error!(target: targets::CLAUSE_DB, "A clause of {} literals", clause.size());
            return Err(err::ClauseStoreError::ShortClause);
        }
        self.next_id += 1;

        if source == ClauseSource::Learnt {
            clause.activity = self.clause_inc;
            clause.raw_activity = 1;
        }

        let (w0, w1) = clause.watched();
        let (l0, l1) = (*clause.literal(w0), *clause.literal(w1));
        let key = self.clauses.insert(clause);
        self.watches.attach(key, &l0, w0);
        self.watches.attach(key, &l1, w1);

        match source {
            ClauseSource::Original => self.originals.push(key),
            ClauseSource::Learnt => {
                self.learnts.push(key);
                self.last = Some(key);
            }
        }

        if self.print_clauses {
            if let Some(clause) = self.clauses.get(key) {
                match source {
                    ClauseSource::Original => log::info!(target: targets::CLAUSE_DB, "add: {clause}"),
                    ClauseSource::Learnt => log::info!(target: targets::CLAUSE_DB, "learn: {clause}"),
                }
            }
        }

        self.schedule(key, true);
        Ok(key)
    }

    pub fn get(&self, key: ClauseKey) -> Result<&SignedClause, err::ClauseStoreError> {
        self.clauses.get(key).ok_or(err::ClauseStoreError::Missing)
    }

    /// The most recently learnt clause, if not yet forgotten.
    pub fn last(&self) -> Option<ClauseKey> {
        self.last
    }

    /// The current activity increment.
    pub fn clause_inc(&self) -> Activity {
        self.clause_inc
    }

    /// Notes the use of a clause during analysis.
    pub fn bump(&mut self, key: ClauseKey) {
        if let Some(clause) = self.clauses.get_mut(key) {
            clause.activity += self.clause_inc;
            clause.raw_activity += 1;
        }
    }

    /// Schedules a clause for propagation, coarse or otherwise.
    pub fn schedule(&mut self, key: ClauseKey, coarse: bool) {
        if let Some(clause) = self.clauses.get_mut(key) {
            clause.coarse |= coarse;
            if !clause.scheduled {
                clause.scheduled = true;
                self.queue.push_back(key);
            }
        }
    }

    /// Takes the next scheduled clause, if any.
    pub fn pop_scheduled(&mut self) -> Option<ClauseKey> {
        while let Some(key) = self.queue.pop_front() {
            if let Some(clause) = self.clauses.get_mut(key) {
                clause.scheduled = false;
                return Some(key);
            }
        }
        None
    }

    pub fn clear_queue(&mut self) {
        for key in self.queue.drain(..) {
            if let Some(clause) = self.clauses.get_mut(key) {
                clause.scheduled = false;
                clause.coarse = false;
            }
        }
    }

    /// Propagates a clause.
    ///
    /// On a conflict the clause is noted for (coarse) propagation after a backjump.
    pub fn propagate(
        &mut self,
        key: ClauseKey,
        variables: &mut VariableDB,
        trail: &mut Trail,
        graph: &mut ImplicationGraph,
    ) -> Result<(), err::PropagationError> {
        let Some(clause) = self.clauses.get_mut(key) else {
            return Ok(());
        };
        let coarse = std::mem::take(&mut clause.coarse);
        if !clause.is_active() {
            return Ok(());
        }

        let result = clause.propagate(key, coarse, &mut self.watches, variables, trail, graph, &mut self.uua);
        if result.is_err() {
            trail.save(Undo::ClauseActive(key));
        }
        result
    }

    /// Sweeps the containers of var affected by an event.
    pub fn on_event(&mut self, var: Var, event: Event, variables: &VariableDB, trail: &mut Trail) {
        let domain = variables.domain(var);
        let (Some(lb), Some(ub)) = (domain.min(), domain.max()) else {
            return;
        };
        let affected = self.watches.affected(var, event, (lb, ub), variables.is_view(var));
        for container in affected {
            self.check_container(container, &domain, trail);
        }
    }

    fn check_container(&mut self, key: ContainerKey, domain: &IntervalSet, trail: &mut Trail) {
        let Some(container) = self.watches.get_mut(key) else {
            return;
        };
        if !container.active {
            return;
        }

        match signed_clause::check(domain, container.start, container.end) {
            Entailment::Undefined => return,

            Entailment::True => {
                let clauses = &self.clauses;
                container.watchers.retain(|watcher| {
                    clauses
                        .get(watcher.clause)
                        .is_some_and(|clause| clause.is_watched(watcher.literal))
                });
            }

            Entailment::False => {
                let watchers = std::mem::take(&mut container.watchers);
                let mut kept = Vec::with_capacity(watchers.len());
                for watcher in watchers {
                    let Some(clause) = self.clauses.get_mut(watcher.clause) else {
                        continue;
                    };
                    if !clause.is_watched(watcher.literal) {
                        continue;
                    }
                    if clause.scheduled {
                        kept.push(watcher);
                        continue;
                    }
                    if !clause.is_active() {
                        trail.save(Undo::Reattach {
                            clause: watcher.clause,
                            literal: watcher.literal,
                        });
                        continue;
                    }
                    kept.push(watcher);
                    clause.scheduled = true;
                    self.queue.push_back(watcher.clause);
                }
                if let Some(container) = self.watches.get_mut(key) {
                    container.watchers = kept;
                }
            }
        }

        trail.save(Undo::ContainerActive(key));
        if let Some(container) = self.watches.get_mut(key) {
            container.active = false;
        }
    }

    /// Restores a container, as on a backjump.
    pub fn activate_container(&mut self, key: ContainerKey) {
        self.watches.activate(key);
    }

    /// Makes a clause active, and schedules the clause for coarse propagation, as on a backjump.
    pub fn reactivate(&mut self, key: ClauseKey) {
        if let Some(clause) = self.clauses.get_mut(key) {
            clause.state = signed_clause::ClauseState::Active;
            self.schedule(key, true);
        }
    }

    /// Restores a watcher, as on a backjump, if the clause still exists.
    pub fn reattach(&mut self, key: ClauseKey, literal: usize) {
        if let Some(clause) = self.clauses.get(key) {
            let watched = *clause.literal(literal);
            self.watches.attach(key, &watched, literal);
        }
    }

    /// The watchers, and their containers.
    pub fn watches(&self) -> &Watches {
        &self.watches
    }
}
