/*!
A database of propagators, one for each posted constraint.

Each propagator is subscribed to the variables of its constraint, and scheduled whenever an event occurs on one of those variables.

A propagator may be *half-reified* by a boolean control variable b, in which case the constraint is enforced only once b = 1.
The control variable is not a dependency of the constraint, and so is noted separately during [analysis](crate::procedures::analysis).

Propagators posted during a solve (e.g. by the [clause builder](crate::builder)) note the level at which they were posted, and are rescheduled by a backjump below that level, as any reductions they made have been undone.
*/

use std::collections::{HashMap, VecDeque};

use slotmap::SlotMap;

use crate::{
    db::{implication::ImplicationGraph, trail::Trail, variable::VariableDB, LevelIndex, PropagatorKey},
    generic::interval_set::{self, IntervalSet},
    misc::log::targets::{self},
    structures::{cause::Cause, conflict::Conflict, constraint::Constraint, variable::Var},
    types::err::{self},
};

pub struct Propagator {
    pub constraint: Constraint,

    /// The control variable, if the propagator is half-reified.
    pub reification: Option<Var>,

    /// The lowest level at which the propagator has been posted.
    pub posted_at: LevelIndex,

    scheduled: bool,
}

impl Propagator {
    /// Propagates the constraint of the propagator, if the control variable (if any) is 1.
    pub fn propagate(
        &self,
        key: PropagatorKey,
        variables: &mut VariableDB,
        trail: &mut Trail,
        graph: &mut ImplicationGraph,
    ) -> Result<(), err::PropagationError> {
        if let Some(b) = self.reification {
            if variables.value(b) != Some(1) {
                return Ok(());
            }
        }

        let cause = Cause::Propagator(key);

        match &self.constraint {
            Constraint::LessOrEqual { x, y, c } => {
                let x_max = variables.ub(*y).saturating_add(*c);
                variables.restrict(*x, &IntervalSet::from_range(interval_set::MIN, x_max), cause, trail, graph)?;

                let y_min = variables.lb(*x).saturating_sub(*c);
                variables.restrict(*y, &IntervalSet::from_range(y_min, interval_set::MAX), cause, trail, graph)?;
            }

            Constraint::NotEqual { x, y } => loop {
                let mut changed = false;
                if let Some(value) = variables.value(*x) {
                    let others = IntervalSet::singleton(value).complement();
                    changed |= variables.restrict(*y, &others, cause, trail, graph)?;
                }
                if let Some(value) = variables.value(*y) {
                    let others = IntervalSet::singleton(value).complement();
                    changed |= variables.restrict(*x, &others, cause, trail, graph)?;
                }
                if !changed {
                    break;
                }
            },

            Constraint::Member { x, set } => {
                variables.restrict(*x, set, cause, trail, graph)?;
            }

            Constraint::False => {
                return Err(err::PropagationError::Conflict(Conflict::whole(cause)));
            }
        }

        Ok(())
    }

    /// Whether the propagator holds on the values of its variables, if every relevant variable has a value.
    pub fn holds(&self, variables: &VariableDB) -> Option<bool> {
        if let Some(b) = self.reification {
            match variables.value(b) {
                Some(1) => {}
                Some(_) => return Some(true),
                None => return None,
            }
        }
        self.constraint.holds(|var| variables.value(var))
    }
}

#[derive(Default)]
pub struct PropagatorDB {
    propagators: SlotMap<PropagatorKey, Propagator>,

    /// The propagators of each variable mentioned by some propagator.
    subscribers: HashMap<Var, Vec<PropagatorKey>>,

    queue: VecDeque<PropagatorKey>,
}

impl PropagatorDB {
    /// Stores and schedules a propagator for a constraint.
    pub fn post(&mut self, constraint: Constraint, reification: Option<Var>, level: LevelIndex) -> PropagatorKey {
        log::trace!(target: targets::PROPAGATION, "Post {constraint} at {level}");
        let vars = constraint.vars();
        let key = self.propagators.insert(Propagator {
            constraint,
            reification,
            posted_at: level,
            scheduled: false,
        });

        for var in vars.into_iter().chain(reification) {
            let subscribed = self.subscribers.entry(var).or_default();
            if !subscribed.contains(&key) {
                subscribed.push(key);
            }
        }

        self.schedule(key);
        key
    }

    pub fn get(&self, key: PropagatorKey) -> Option<&Propagator> {
        self.propagators.get(key)
    }

    pub fn count(&self) -> usize {
        self.propagators.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PropagatorKey, &Propagator)> {
        self.propagators.iter()
    }

    pub fn schedule(&mut self, key: PropagatorKey) {
        if let Some(propagator) = self.propagators.get_mut(key) {
            if !propagator.scheduled {
                propagator.scheduled = true;
                self.queue.push_back(key);
            }
        }
    }

    /// Schedules every propagator subscribed to var.
    pub fn on_event(&mut self, var: Var) {
        if let Some(subscribed) = self.subscribers.get(&var) {
            for index in 0..subscribed.len() {
                let key = subscribed[index];
                if let Some(propagator) = self.propagators.get_mut(key) {
                    if !propagator.scheduled {
                        propagator.scheduled = true;
                        self.queue.push_back(key);
                    }
                }
            }
        }
    }

    /// Takes the next scheduled propagator, if any.
    pub fn pop(&mut self) -> Option<PropagatorKey> {
        let key = self.queue.pop_front()?;
        if let Some(propagator) = self.propagators.get_mut(key) {
            propagator.scheduled = false;
        }
        Some(key)
    }

    pub fn clear_queue(&mut self) {
        for key in self.queue.drain(..) {
            if let Some(propagator) = self.propagators.get_mut(key) {
                propagator.scheduled = false;
            }
        }
    }

    /// Reschedules propagators posted above the target level of a backjump.
    pub fn on_backjump(&mut self, target: LevelIndex) {
        let mut revived = Vec::default();
        for (key, propagator) in self.propagators.iter_mut() {
            if propagator.posted_at > target {
                propagator.posted_at = target;
                revived.push(key);
            }
        }
        for key in revived {
            self.schedule(key);
        }
    }

    /// The source variables the constraint of a propagator depends on, without duplicates and without the control variable.
    pub fn cause_vars(&self, key: PropagatorKey, variables: &VariableDB) -> Vec<Var> {
        let mut vars = Vec::default();
        if let Some(propagator) = self.propagators.get(key) {
            for var in propagator.constraint.vars() {
                let source = variables.source_of(var);
                if !vars.contains(&source) {
                    vars.push(source);
                }
            }
        }
        vars
    }
}

#[cfg(test)]
mod propagator_tests {
    use super::*;
    use crate::{config::Config, structures::variable::DomainKind};

    #[test]
    fn less_or_equal_bounds() {
        let mut variables = VariableDB::default();
        let mut trail = Trail::default();
        let mut graph = ImplicationGraph::new(&Config::default());
        let mut propagators = PropagatorDB::default();

        let x = variables.fresh("x", IntervalSet::from_range(2, 9), DomainKind::Bounded).unwrap();
        let y = variables.fresh("y", IntervalSet::from_range(0, 5), DomainKind::Bounded).unwrap();

        let key = propagators.post(Constraint::LessOrEqual { x, y, c: -1 }, None, 0);
        assert_eq!(propagators.pop(), Some(key));

        let propagator = propagators.get(key).unwrap();
        assert!(propagator.propagate(key, &mut variables, &mut trail, &mut graph).is_ok());
        assert_eq!(*variables.domain(x), IntervalSet::from_range(2, 4));
        assert_eq!(*variables.domain(y), IntervalSet::from_range(3, 5));
    }

    #[test]
    fn reified_only_when_on() {
        let mut variables = VariableDB::default();
        let mut trail = Trail::default();
        let mut graph = ImplicationGraph::new(&Config::default());
        let mut propagators = PropagatorDB::default();

        let x = variables.fresh("x", IntervalSet::from_range(0, 9), DomainKind::Enumerated).unwrap();
        let b = variables.fresh("b", IntervalSet::from_range(0, 1), DomainKind::Bounded).unwrap();

        let set = IntervalSet::from_values([3, 4]);
        let key = propagators.post(Constraint::Member { x, set: set.clone() }, Some(b), 0);
        let propagator = propagators.get(key).unwrap();

        assert!(propagator.propagate(key, &mut variables, &mut trail, &mut graph).is_ok());
        assert_eq!(variables.size(x), 10);

        let one = IntervalSet::singleton(1);
        assert!(variables.restrict(b, &one, Cause::Null, &mut trail, &mut graph).is_ok());
        assert!(propagator.propagate(key, &mut variables, &mut trail, &mut graph).is_ok());
        assert_eq!(*variables.domain(x), set);
        assert_eq!(propagators.cause_vars(key, &variables), vec![x]);
    }

    #[test]
    fn rescheduled_by_backjump() {
        let mut propagators = PropagatorDB::default();
        let key = propagators.post(Constraint::False, None, 3);
        assert_eq!(propagators.pop(), Some(key));
        assert_eq!(propagators.pop(), None);

        propagators.on_backjump(4);
        assert_eq!(propagators.pop(), None);

        propagators.on_backjump(1);
        assert_eq!(propagators.pop(), Some(key));
        assert_eq!(propagators.get(key).map(|p| p.posted_at), Some(1));
    }
}
