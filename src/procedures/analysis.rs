/*!
Analysis of a conflict, and of a solution.

# Overview

Analysis walks the [implication graph](crate::db::implication) backwards from a conflict, accumulating an [explanation](crate::transient::explanation): a set of literals whose disjunction is a consequence of the constraints and clauses of the context, and which is false on the domains at the conflict.

The walk is through the *front* of the explanation, a map from variables to entries of the graph:

1. The front is seeded from the conflict.
   If the conflict is on some variable the front holds the (emptying) entry of the variable.
   Otherwise, the cause failed as a whole, and the cause is explained without a pivot.
2. So long as analysis may not [stop](GenericContext::learn_signed_clause), the rightmost entry of the front, the *pivot*, is taken:
   - The predecessors of the pivot are added to the front.
   - The cause of the pivot explains the pivot. The literal of the pivot variable is intersected with the claim made by the cause, and the literal of every other variable the cause depends on is joined with the values it excludes.
   - If the cause is a half-reified propagator, the literal of the control variable is joined with its other value.
   - The front is *relaxed*, by dropping entries of variables absent from the explanation and moving entries left past those on which the literal of the variable was already false.
3. Analysis stops when the front is empty, the rightmost entry is a root entry or made at the root, or the rightmost entry is a decision.
   In the first cases the explanation asserts at the root, and otherwise at the position of the decision.

Explanations follow one of two schemes:
- A [signed clause](crate::db::clause::signed_clause) explains itself, through its literals, and the use of the clause is noted by bumping its activity.
- Every other cause uses the *default* explanation, in which the pivot variable is claimed to take a value excluded by its previous domain, or a value of its revised domain, and every other variable is claimed to take a value excluded by its domain at its entry in the front.

Literals on views are always rewritten on the source of the view, as only sources appear in the implication graph.

After analysis the explanation is handed to the [clause builder](crate::builder) by [extract_clause](GenericContext::extract_clause), with each literal first restricted to the domain of its variable at the end of the root level.

# Solutions

[learn_solution](GenericContext::learn_solution) builds an explanation which refutes the current decision path, and is used to [refute a solution](GenericContext::refute_solution).

# Example

```rust
# use otter_fd::context::Context;
# use otter_fd::config::Config;
# use otter_fd::structures::constraint::Constraint;
# use otter_fd::types::err::PropagationError;
let mut the_context = Context::from_config(Config::default());

let x = the_context.fresh_variable("x", 0, 1).unwrap();
let y = the_context.fresh_variable("y", 0, 1).unwrap();
let z = the_context.fresh_variable("z", 0, 1).unwrap();

for (a, b) in [(x, y), (x, z), (y, z)] {
    assert!(the_context.post(Constraint::NotEqual { x: a, y: b }).is_ok());
}
assert!(the_context.propagate().is_ok());

assert!(the_context.decide(x, 0).is_ok());
let Err(PropagationError::Conflict(conflict)) = the_context.propagate() else { panic!("!") };

// The conflict is explained by the decision alone.
let assert_level = the_context.learn_signed_clause(&conflict).unwrap();
assert_eq!(assert_level, 1);
assert_eq!(the_context.explanation.cardinality(), 1);
assert!(the_context.explanation.literal(x).is_some_and(|literal| !literal.contains(0)));
```
*/

use crate::{
    builder::BuildOk,
    context::GenericContext,
    db::{clause::signed_clause::ClauseSource, LevelIndex},
    generic::interval_set::IntervalSet,
    misc::log::targets::{self},
    structures::{
        cause::Cause,
        conflict::Conflict,
        event::mask,
        variable::Var,
    },
    types::err::{self},
};

impl<R: rand::Rng + std::default::Default> GenericContext<R> {
    /// Builds an explanation of a conflict, and returns the level the explanation asserts at.
    ///
    /// For documentation, see [procedures::analysis](crate::procedures::analysis).
    pub fn learn_signed_clause(&mut self, conflict: &Conflict) -> Result<LevelIndex, err::ErrorKind> {
        if !self.implication_graph.is_recording() {
            return Err(err::AnalysisError::NoImplications.into());
        }

        self.explanation.recycle();
        self.init_front(conflict)?;

        while !self.stop() {
            let Some((p, var)) = self.explanation.front.poll_last() else {
                break;
            };
            let cause = self.implication_graph.cause(p);
            let cause_vars = self.cause_vars(cause);
            self.implication_graph
                .predecessors_of(p, &cause_vars, &mut self.explanation.front)?;

            if self.config.proof.value {
                log::info!(target: targets::ANALYSIS, "Cause: {cause}");
                log::info!(target: targets::ANALYSIS, "Pivot: v{var} = {}", self.implication_graph.domain(p));
            }

            self.explain(cause, &cause_vars, Some(p))?;

            if self.config.proof.value {
                log::info!(target: targets::ANALYSIS, "Explanation: {}", self.explanation);
            }

            self.relax();
        }

        let assert_level = self.explanation.assert_level().unwrap_or(0);
        log::debug!(target: targets::ANALYSIS, "Asserting at {assert_level}: {}", self.explanation);
        Ok(assert_level)
    }

    fn init_front(&mut self, conflict: &Conflict) -> Result<(), err::ErrorKind> {
        let cause_vars = self.cause_vars(conflict.cause);
        self.implication_graph
            .collect_nodes_from_conflict(conflict, &cause_vars, &mut self.explanation.front)?;

        if conflict.var.is_none() {
            if self.config.proof.value {
                log::info!(target: targets::ANALYSIS, "Cause: {}", conflict.cause);
                log::info!(target: targets::ANALYSIS, "Pivot: none");
            }
            self.explain(conflict.cause, &cause_vars, None)?;
        }
        Ok(())
    }

    /// The (source) variables a cause depends on.
    fn cause_vars(&self, cause: Cause) -> Vec<Var> {
        match cause {
            Cause::Propagator(key) => self.propagator_db.cause_vars(key, &self.variable_db),

            Cause::Clause(key) => {
                let mut vars = Vec::default();
                if let Ok(clause) = self.clause_db.get(key) {
                    for literal in clause.literals() {
                        let source = self.variable_db.source_of(literal.var);
                        if !vars.contains(&source) {
                            vars.push(source);
                        }
                    }
                }
                vars
            }

            Cause::Decision(_) | Cause::Null => Vec::default(),
        }
    }

    /// Explains the entry at `pivot` by its cause, or the failure of the cause as a whole if no pivot is given.
    fn explain(&mut self, cause: Cause, cause_vars: &[Var], pivot: Option<usize>) -> Result<(), err::ErrorKind> {
        match cause {
            Cause::Clause(key) => self.explain_clause(key, pivot)?,

            Cause::Propagator(key) => {
                self.default_explain(cause_vars, pivot)?;
                self.check_reification(key, pivot)?;
            }

            Cause::Decision(_) | Cause::Null => {
                log::warn!(target: targets::ANALYSIS, "No explanation of {cause}");
            }
        }
        Ok(())
    }

    fn default_explain(&mut self, cause_vars: &[Var], pivot: Option<usize>) -> Result<(), err::ErrorKind> {
        let graph = &self.implication_graph;
        let explanation = &mut self.explanation;
        let pivot_var = pivot.map(|p| graph.var(p));

        for &var in cause_vars {
            let mut set = explanation.complement(var, graph)?;
            match pivot {
                Some(p) if Some(var) == pivot_var => {
                    set.union_with(graph.domain(p));
                    explanation.intersect_lit(var, set);
                }
                _ => explanation.union_lit(var, set),
            }
        }
        Ok(())
    }

    fn explain_clause(&mut self, key: crate::db::ClauseKey, pivot: Option<usize>) -> Result<(), err::ErrorKind> {
        self.clause_db.bump(key);

        let graph = &self.implication_graph;
        let limit = pivot.unwrap_or(graph.size());
        let pivot_var = pivot.map(|p| graph.var(p));

        let sets = self.clause_db.get(key)?.explain(&self.variable_db);
        for (var, preimage) in sets {
            if !self.explanation.front.contains(var) {
                graph.find_predecessor(&mut self.explanation.front, var, limit)?;
            }
            match Some(var) == pivot_var {
                true => self.explanation.intersect_lit(var, preimage),
                false => self.explanation.union_lit(var, preimage),
            }
        }
        Ok(())
    }

    /// Notes the control variable of a half-reified propagator.
    fn check_reification(&mut self, key: crate::db::PropagatorKey, pivot: Option<usize>) -> Result<(), err::ErrorKind> {
        let Some(b) = self.propagator_db.get(key).and_then(|propagator| propagator.reification) else {
            return Ok(());
        };
        let Some(value) = self.variable_db.value(b) else {
            log::error!(target: targets::ANALYSIS, "Control variable v{b} without a value");
            return Err(err::AnalysisError::NoImplications.into());
        };

        let graph = &self.implication_graph;
        let (source, set) = self.variable_db.to_source(b, &IntervalSet::singleton(1 - value));
        graph.find_predecessor(&mut self.explanation.front, source, pivot.unwrap_or(graph.size()))?;
        self.explanation.union_lit(source, set);
        Ok(())
    }

    /// Drops irrelevant entries from the right of the front.
    fn relax(&mut self) {
        let graph = &self.implication_graph;
        let explanation = &mut self.explanation;
        let mut previous = None;

        while let Some((l, var)) = explanation.front.last() {
            if previous == Some(l) {
                break;
            }
            match explanation.literal(var) {
                None => {
                    explanation.front.poll_last();
                }
                Some(literal) => {
                    let p = graph.predecessor(l);
                    if p < l && literal.disjoint(graph.domain(p)) {
                        explanation.front.replace(var, p);
                    }
                }
            }
            previous = Some(l);
        }
    }

    /// Whether analysis may stop, noting the assert level if so.
    fn stop(&mut self) -> bool {
        let graph = &self.implication_graph;
        match self.explanation.front.last() {
            None => self.explanation.set_assert_level(0),
            Some((max, _)) if graph.mask(max) == mask::VOID || graph.level(max) == 0 => {
                self.explanation.set_assert_level(0)
            }
            Some((max, _)) => {
                if let Cause::Decision(position) = graph.cause(max) {
                    self.explanation.set_assert_level(position);
                }
            }
        }
        self.explanation.assert_level().is_some()
    }

    /// Builds an explanation refuting the current decision path.
    ///
    /// Refuted decisions at the bottom of the path are skipped, as the branches of those decisions have been explored.
    pub fn learn_solution(&mut self) {
        self.explanation.recycle();
        self.explanation.set_assert_level(0);

        let mut top = self.decisions.len();
        while top > 1 && self.decisions[top - 1].refuted {
            top -= 1;
        }

        for index in (0..top).rev() {
            let decision = self.decisions[index];
            let set = match decision.refuted {
                false => {
                    let mut set = self.explanation.universe();
                    set.remove(decision.value);
                    set
                }
                true => {
                    let mut set = self.explanation.empty();
                    set.add(decision.value);
                    set
                }
            };
            self.explanation.union_lit(decision.var, set);
        }
        log::debug!(target: targets::ANALYSIS, "Solution refuted by {}", self.explanation);
    }

    /// Builds the clause of the explanation.
    ///
    /// Each literal is restricted to the domain of its variable at the end of the root level, as the domains of the root level are permanent.
    pub fn extract_clause(&mut self, source: ClauseSource) -> Result<BuildOk, err::ErrorKind> {
        self.implication_graph.synchronise();

        for (var, literal) in self.explanation.literals() {
            let mut set = literal.clone();
            if self.implication_graph.is_recording() {
                set.intersect_with(self.implication_graph.root_level_domain(var)?);
            }
            self.clause_builder.put(var, set, &self.variable_db);
        }

        self.clause_builder.build(
            &self.variable_db,
            &mut self.clause_db,
            &mut self.propagator_db,
            source,
            self.trail.level(),
            self.config.view_elimination.value,
        )
    }
}
