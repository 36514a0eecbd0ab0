/*!
A database of variables, views, and their domains.

# Overview

Each variable is either a *source*, with a domain of its own, or a [view](View) of some other variable.
The domain of a view is always derived from the domain of its source, and so only sources have a domain to restrict, save, and restore.

Every change to a domain is made through [restrict](VariableDB::restrict), which:
- Maps a restriction of a view onto its source.
- Saves the domain of the source, at most once per level.
- Decomposes the change into primitive [events](Event), each of which is recorded in the [implication graph](crate::db::implication).
- Queues the events for the source and each of its views, to be dispatched to propagators and the clause store.

A restriction which would empty a domain leaves the domain untouched, records an emptying event, and fails with a [conflict](Conflict) on the source.

# Example

```rust
# use otter_fd::db::{implication::ImplicationGraph, trail::Trail, variable::VariableDB};
# use otter_fd::config::Config;
# use otter_fd::generic::interval_set::IntervalSet;
# use otter_fd::structures::{cause::Cause, variable::{DomainKind, View}};
let mut variables = VariableDB::default();
let mut trail = Trail::default();
let mut graph = ImplicationGraph::new(&Config::default());

let x = variables.fresh("x", IntervalSet::from_range(0, 9), DomainKind::Enumerated).unwrap();
let x_is_three = variables.fresh_view("x=3", x, View::Equal(3)).unwrap();

let one = IntervalSet::singleton(1);
assert_eq!(variables.restrict(x_is_three, &one, Cause::Null, &mut trail, &mut graph), Ok(true));
assert_eq!(variables.value(x), Some(3));
```
*/

use std::{borrow::Cow, collections::VecDeque};

use crate::{
    db::{implication::ImplicationGraph, trail::{Trail, Undo}},
    generic::interval_set::{IntervalSet, MAX, MIN},
    misc::log::targets::{self},
    structures::{
        cause::Cause,
        conflict::Conflict,
        event::Event,
        variable::{DomainKind, Var, View},
    },
    types::err::{self},
};

/// How the domain of a variable is determined.
pub enum VariableKind {
    Source {
        domain: IntervalSet,

        /// The domain of the variable when created.
        initial: IntervalSet,

        kind: DomainKind,

        /// The world in which the domain was last saved.
        stamp: u32,
    },

    View { source: Var, view: View },
}

pub struct Variable {
    pub name: String,
    pub kind: VariableKind,

    /// Views whose source is the variable.
    pub views: Vec<Var>,
}

#[derive(Default)]
pub struct VariableDB {
    variables: Vec<Variable>,

    /// Events yet to be dispatched, in order of occurrence.
    events: VecDeque<(Var, Event)>,
}

impl VariableDB {
    /// A fresh (source) variable with the given domain.
    pub fn fresh(
        &mut self,
        name: &str,
        domain: IntervalSet,
        kind: DomainKind,
    ) -> Result<Var, err::VariableDBError> {
        if domain.is_empty() {
            return Err(err::VariableDBError::EmptyDomain);
        }
        let domain = match kind {
            DomainKind::Bounded => domain.hull(),
            DomainKind::Enumerated => domain,
        };
        let var = self.next_var()?;
        self.variables.push(Variable {
            name: name.to_owned(),
            kind: VariableKind::Source {
                initial: domain.clone(),
                domain,
                kind,
                stamp: 0,
            },
            views: Vec::default(),
        });
        Ok(var)
    }

    /// A fresh (source) variable with domain [lo, hi].
    ///
    /// A range reaching beyond the values an [IntervalSet] may hold is an error, rather than truncated.
    pub fn fresh_range(
        &mut self,
        name: &str,
        lo: i32,
        hi: i32,
        kind: DomainKind,
    ) -> Result<Var, err::VariableDBError> {
        if lo < MIN || hi > MAX {
            return Err(err::VariableDBError::OutOfRange);
        }
        self.fresh(name, IntervalSet::from_range(lo, hi), kind)
    }

    /// A fresh view of some other variable.
    ///
    /// Views of views are permitted, and a boolean view requires a source whose domain lies within {0, 1} only if the view is [View::Not].
    pub fn fresh_view(&mut self, name: &str, source: Var, view: View) -> Result<Var, err::VariableDBError> {
        if source as usize >= self.variables.len() {
            return Err(err::VariableDBError::UnknownVariable(source));
        }
        if view == View::Not && !self.domain(source).is_subset_of(&IntervalSet::from_range(0, 1)) {
            return Err(err::VariableDBError::NotBoolean(source));
        }
        let var = self.next_var()?;
        self.variables.push(Variable {
            name: name.to_owned(),
            kind: VariableKind::View { source, view },
            views: Vec::default(),
        });
        self.variables[source as usize].views.push(var);
        Ok(var)
    }

    fn next_var(&self) -> Result<Var, err::VariableDBError> {
        match Var::try_from(self.variables.len()) {
            Ok(var) if var < Var::MAX => Ok(var),
            _ => Err(err::VariableDBError::VariablesExhausted),
        }
    }

    /// A count of all variables, including views.
    pub fn count(&self) -> usize {
        self.variables.len()
    }

    pub fn contains(&self, var: Var) -> bool {
        (var as usize) < self.variables.len()
    }

    pub fn name(&self, var: Var) -> &str {
        &self.variables[var as usize].name
    }

    pub fn is_view(&self, var: Var) -> bool {
        matches!(self.variables[var as usize].kind, VariableKind::View { .. })
    }

    /// Every source variable, in order of creation.
    pub fn sources(&self) -> impl Iterator<Item = Var> + '_ {
        self.variables
            .iter()
            .enumerate()
            .filter(|(_, variable)| matches!(variable.kind, VariableKind::Source { .. }))
            .map(|(index, _)| index as Var)
    }

    /// The view relation and direct source of a variable, if the variable is a view.
    pub fn view_of(&self, var: Var) -> Option<(Var, View)> {
        match self.variables[var as usize].kind {
            VariableKind::View { source, view } => Some((source, view)),
            VariableKind::Source { .. } => None,
        }
    }

    /// The source variable at the end of the chain of views from var.
    pub fn source_of(&self, var: Var) -> Var {
        let mut var = var;
        while let Some((source, _)) = self.view_of(var) {
            var = source;
        }
        var
    }

    /// The source of a variable, and the set the source must take a value in for the variable to take a value in the given set.
    pub fn to_source(&self, var: Var, set: &IntervalSet) -> (Var, IntervalSet) {
        let mut var = var;
        let mut set = set.clone();
        while let Some((source, view)) = self.view_of(var) {
            set = view.preimage(&set);
            var = source;
        }
        (var, set)
    }

    /// The current domain of a variable.
    pub fn domain(&self, var: Var) -> Cow<'_, IntervalSet> {
        match &self.variables[var as usize].kind {
            VariableKind::Source { domain, .. } => Cow::Borrowed(domain),
            VariableKind::View { source, view } => Cow::Owned(view.image(&self.domain(*source))),
        }
    }

    /// The domain of a variable when created.
    pub fn initial_domain(&self, var: Var) -> Cow<'_, IntervalSet> {
        match &self.variables[var as usize].kind {
            VariableKind::Source { initial, .. } => Cow::Borrowed(initial),
            VariableKind::View { source, view } => {
                Cow::Owned(view.image(&self.initial_domain(*source)))
            }
        }
    }

    /// True if the domain of the variable has been a single value since creation.
    pub fn is_constant(&self, var: Var) -> bool {
        self.initial_domain(var).size() == 1
    }

    pub fn lb(&self, var: Var) -> i32 {
        self.domain(var).min().unwrap_or(crate::generic::interval_set::MAX)
    }

    pub fn ub(&self, var: Var) -> i32 {
        self.domain(var).max().unwrap_or(crate::generic::interval_set::MIN)
    }

    pub fn size(&self, var: Var) -> u64 {
        self.domain(var).size()
    }

    /// The value of a variable, if the domain of the variable is a single value.
    pub fn value(&self, var: Var) -> Option<i32> {
        let domain = self.domain(var);
        match (domain.min(), domain.max()) {
            (Some(min), Some(max)) if min == max => Some(min),
            _ => None,
        }
    }

    /// Restricts the domain of a variable to some set.
    ///
    /// Returns true if the domain (of the source) changed.
    ///
    /// For documentation, see [db::variable](crate::db::variable).
    pub fn restrict(
        &mut self,
        var: Var,
        set: &IntervalSet,
        cause: Cause,
        trail: &mut Trail,
        graph: &mut ImplicationGraph,
    ) -> Result<bool, err::PropagationError> {
        let (source, set) = self.to_source(var, set);
        let level = trail.level();
        let world = trail.world();

        let VariableKind::Source {
            domain,
            kind,
            stamp,
            ..
        } = &mut self.variables[source as usize].kind
        else {
            return Err(err::PropagationError::UnknownVariable(source));
        };

        let mut revised = domain.clone();
        revised.intersect_with(&set);
        if *kind == DomainKind::Bounded {
            revised = revised.hull();
        }

        if revised == *domain {
            return Ok(false);
        }

        if revised.is_empty() {
            let beyond = domain.max().map_or(crate::generic::interval_set::MAX, |max| max.saturating_add(1));
            log::trace!(target: targets::PROPAGATION, "Emptying v{source} by {cause}");
            graph.push_event(source, cause, Event::IncLow(beyond), level)?;
            return Err(err::PropagationError::Conflict(Conflict::on(source, cause)));
        }

        if *stamp != world {
            trail.save(Undo::Domain {
                var: source,
                domain: domain.clone(),
            });
            *stamp = world;
        }

        let events = Event::decompose(domain, &revised);
        *domain = revised;

        for event in events {
            graph.push_event(source, cause, event, level)?;
            self.queue_event(source, event);
        }

        Ok(true)
    }

    /// Queues an event for a variable and, transitively, each of its views.
    fn queue_event(&mut self, var: Var, event: Event) {
        let mut stack = vec![var];
        while let Some(var) = stack.pop() {
            self.events.push_back((var, event));
            stack.extend(self.variables[var as usize].views.iter().copied());
        }
    }

    /// Restores the domain of a source variable, as on a backjump.
    pub fn restore(&mut self, var: Var, restored: IntervalSet) {
        if let VariableKind::Source { domain, .. } = &mut self.variables[var as usize].kind {
            *domain = restored;
        }
    }

    /// Takes the next event to dispatch, if any.
    pub fn pop_event(&mut self) -> Option<(Var, Event)> {
        self.events.pop_front()
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// A string of the form `name ∈ domain` for each variable.
    pub fn valuation_string(&self) -> String {
        (0..self.variables.len())
            .map(|index| format!("{} ∈ {}", self.variables[index].name, self.domain(index as Var)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
