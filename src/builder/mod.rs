/*!
Tools for building clauses, and a context.

# The clause builder

A [ClauseBuilder] accumulates literals, each the claim that some variable takes a value in some set, and [builds](ClauseBuilder::build) the disjunction of the literals:

- [put](ClauseBuilder::put) records a literal.
  + A literal on a constant variable is immediately true or false, and so either makes the clause always true or is dropped.
  + Otherwise the set is joined to any set already recorded for the variable.
- [build](ClauseBuilder::build) then:
  + If enabled, rewrites each literal on a view as a literal on the source of the view, through the preimage of the view. As the source may itself be a view, this is done with a worklist.
  + Restricts each set to the initial domain of its variable, dropping empty sets. A set which covers the initial domain makes the clause always true.
  + Sorts the remaining literals by variable.
  + Posts the [false](crate::structures::constraint::Constraint::False) constraint if no literals remain, a [membership](crate::structures::constraint::Constraint::Member) constraint for a single variable, and otherwise adds a clause to the [clause store](crate::db::clause).

The builder is reset after every build, successful or otherwise.

Clauses are added to a context through [add_clause](crate::context::GenericContext::add_clause), and learnt clauses through [extract_clause](crate::context::GenericContext::extract_clause).

# Example

```rust
# use otter_fd::context::Context;
# use otter_fd::config::Config;
# use otter_fd::builder::BuildOk;
# use otter_fd::generic::interval_set::IntervalSet;
# use otter_fd::structures::variable::View;
let mut the_context = Context::from_config(Config::default());

let x = the_context.fresh_variable("x", 0, 9).unwrap();
let y = the_context.fresh_variable("y", 0, 9).unwrap();
let x_is_4 = the_context.fresh_view("x=4", x, View::Equal(4)).unwrap();

// x = 4 ∨ x ∈ [7, 20] ∨ y ≤ 2
let built = the_context.add_clause(
    &[x_is_4, x, y],
    &[IntervalSet::singleton(1), IntervalSet::from_range(7, 20), IntervalSet::from_range(-5, 2)],
);

let Ok(BuildOk::Clause(key)) = built else { panic!("!") };
let clause = the_context.clause_db.get(key).unwrap();
assert_eq!(clause.to_string(), "(v0 ∈ [4,4]) ∨ (v0 ∈ [7,9]) ∨ (v1 ∈ [0,2])");

// y ∈ [0, 9] is always true
let built = the_context.add_clause(&[x, y], &[IntervalSet::singleton(3), IntervalSet::from_range(0, 9)]);
assert_eq!(built, Ok(BuildOk::Tautology));
```
*/

use std::collections::HashMap;

use crate::{
    db::{
        clause::{signed_clause::ClauseSource, ClauseStore},
        propagator::PropagatorDB,
        variable::VariableDB,
        ClauseKey, LevelIndex, PropagatorKey,
    },
    generic::interval_set::IntervalSet,
    misc::log::targets::{self},
    structures::{constraint::Constraint, entailment::Entailment, variable::Var},
    types::err::{self},
};

/// Ok results when building a clause.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildOk {
    /// A clause of two or more variables was added to the clause store.
    Clause(ClauseKey),

    /// A clause of at most one variable was posted as a propagator.
    Propagator(PropagatorKey),

    /// The clause was always true, and so nothing was added.
    Tautology,
}

#[derive(Default)]
pub struct ClauseBuilder {
    sets: HashMap<Var, IntervalSet>,

    /// Variables in order of first mention.
    vars: Vec<Var>,

    /// Whether the clause is known to be always true, known to be always false, or neither.
    status: Option<Entailment>,
}

impl ClauseBuilder {
    /// Records the literal var ∈ set.
    pub fn put(&mut self, var: Var, set: IntervalSet, variables: &VariableDB) {
        if self.status == Some(Entailment::True) {
            return;
        }

        if variables.is_constant(var) {
            if variables.initial_domain(var).min().is_some_and(|value| set.contains(value)) {
                self.status = Some(Entailment::True);
            }
            return;
        }

        match self.sets.get_mut(&var) {
            Some(existing) => existing.union_with(&set),
            None => {
                self.vars.push(var);
                self.sets.insert(var, set);
            }
        }
        self.status = Some(Entailment::Undefined);
    }

    /// The status of the clause built so far, before any simplification.
    pub fn status(&self) -> Entailment {
        self.status.unwrap_or(Entailment::False)
    }

    pub fn reset(&mut self) {
        self.sets.clear();
        self.vars.clear();
        self.status = None;
    }

    /// Builds the clause recorded, and resets the builder.
    ///
    /// For documentation, see [builder](crate::builder).
    pub fn build(
        &mut self,
        variables: &VariableDB,
        clauses: &mut ClauseStore,
        propagators: &mut PropagatorDB,
        source: ClauseSource,
        level: LevelIndex,
        view_elimination: bool,
    ) -> Result<BuildOk, err::ErrorKind> {
        let result = self.build_clause(variables, clauses, propagators, source, level, view_elimination);
        self.reset();
        result
    }

    fn build_clause(
        &mut self,
        variables: &VariableDB,
        clauses: &mut ClauseStore,
        propagators: &mut PropagatorDB,
        source: ClauseSource,
        level: LevelIndex,
        view_elimination: bool,
    ) -> Result<BuildOk, err::ErrorKind> {
        if self.status == Some(Entailment::True) {
            return Ok(BuildOk::Tautology);
        }

        if view_elimination {
            self.eliminate_views(variables);
        }

        let mut vars = std::mem::take(&mut self.vars);
        vars.sort_unstable();
        vars.dedup();

        let mut kept_vars = Vec::with_capacity(vars.len());
        let mut kept_sets = Vec::with_capacity(vars.len());
        for var in vars {
            let Some(mut set) = self.sets.remove(&var) else {
                continue;
            };
            if !variables.contains(var) {
                return Err(err::BuildError::UnknownVariable(var).into());
            }

            let initial = variables.initial_domain(var);
            set.intersect_with(&initial);
            if set.is_empty() {
                continue;
            }
            if initial.is_subset_of(&set) {
                log::trace!(target: targets::BUILDER, "v{var} ∈ {set} is always true");
                return Ok(BuildOk::Tautology);
            }

            kept_vars.push(var);
            kept_sets.push(set);
        }

        match kept_vars.len() {
            0 => {
                log::debug!(target: targets::BUILDER, "Posting false at {level}");
                Ok(BuildOk::Propagator(propagators.post(Constraint::False, None, level)))
            }

            1 => {
                let (Some(x), Some(set)) = (kept_vars.pop(), kept_sets.pop()) else {
                    return Err(err::BuildError::Mismatch.into());
                };
                Ok(BuildOk::Propagator(propagators.post(Constraint::Member { x, set }, None, level)))
            }

            _ => Ok(BuildOk::Clause(clauses.add(&kept_vars, &kept_sets, source)?)),
        }
    }

    /// Rewrites every literal on a view as a literal on the source of the view.
    fn eliminate_views(&mut self, variables: &VariableDB) {
        let mut worklist = self.vars.iter().copied().filter(|var| variables.is_view(*var)).collect::<Vec<_>>();

        while let Some(var) = worklist.pop() {
            let Some((source, view)) = variables.view_of(var) else {
                continue;
            };
            let Some(set) = self.sets.remove(&var) else {
                continue;
            };

            let preimage = view.preimage(&set);
            log::trace!(target: targets::BUILDER, "v{var} ∈ {set} as v{source} ∈ {preimage}");
            match self.sets.get_mut(&source) {
                Some(existing) => existing.union_with(&preimage),
                None => {
                    self.vars.push(source);
                    self.sets.insert(source, preimage);
                    if variables.is_view(source) {
                        worklist.push(source);
                    }
                }
            }
        }

        self.vars.retain(|var| !variables.is_view(*var));
    }
}
