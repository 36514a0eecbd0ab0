/*!
Methods for choosing the value of a variable.

# Overview

A decision is to restrict some variable *x* to some value *v*, and each decision opens a fresh level.
The decisions made are held as the decision path of a context, the decision at level *n* being at position *n*.

If the branch of a decision fails the decision is *refuted*, replacing the decision *x = v* with the decision *x ≠ v* at the same position.

# Heuristics

The variable chosen is a source variable with the smallest domain of at least two values, with ties broken by the lowest variable.

The value chosen is the lower bound of the domain, or with probability [random_decision_bias](crate::config::Config::random_decision_bias) a value of the domain chosen at random.

```rust
# use otter_fd::context::Context;
# use otter_fd::config::Config;
# use otter_fd::procedures::decision::DecisionOk;
let mut the_context = Context::from_config(Config::default());
let x = the_context.fresh_variable("x", 0, 9).unwrap();
let y = the_context.fresh_variable("y", 3, 4).unwrap();

assert_eq!(the_context.make_decision(), Ok(DecisionOk::Made(y, 3)));
assert_eq!(the_context.make_decision(), Ok(DecisionOk::Made(x, 0)));
assert_eq!(the_context.make_decision(), Ok(DecisionOk::Exhausted));
assert_eq!(the_context.counters.total_decisions, 2);
```
*/

use rand::Rng;

use crate::{
    context::GenericContext,
    db::trail::Undo,
    generic::interval_set::IntervalSet,
    misc::log::targets::{self},
    structures::{cause::Cause, variable::Var},
    types::err::{self},
};

/// A decision on the decision path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decision {
    pub var: Var,
    pub value: i32,

    /// Whether the decision is x ≠ v, rather than x = v.
    pub refuted: bool,
}

/// Possible 'Ok' results from making a decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecisionOk {
    /// Some variable was restricted to some value.
    Made(Var, i32),

    /// Every variable has a value, so no decision could be made.
    Exhausted,
}

impl<R: rand::Rng + std::default::Default> GenericContext<R> {
    /// Makes a decision, if some variable is without a value.
    ///
    /// For documentation, see [procedures::decision](crate::procedures::decision).
    pub fn make_decision(&mut self) -> Result<DecisionOk, err::ErrorKind> {
        let chosen = self
            .variable_db
            .sources()
            .map(|var| (self.variable_db.size(var), var))
            .filter(|(size, _)| *size > 1)
            .min();

        let Some((size, var)) = chosen else {
            return Ok(DecisionOk::Exhausted);
        };

        let bias = self.config.random_decision_bias.value;
        let value = match bias > 0.0 && self.rng.gen_bool(bias) {
            true => {
                let index = self.rng.gen_range(0..size);
                self.variable_db.domain(var).values().nth(index as usize)
            }
            false => self.variable_db.domain(var).min(),
        };
        let Some(value) = value else {
            return Ok(DecisionOk::Exhausted);
        };

        self.decide(var, value)?;
        Ok(DecisionOk::Made(var, value))
    }

    /// Opens a fresh level, and restricts var to value.
    pub fn decide(&mut self, var: Var, value: i32) -> Result<(), err::ErrorKind> {
        self.apply_decision(Decision {
            var,
            value,
            refuted: false,
        })
    }

    /// Opens a fresh level, and applies a decision at the level.
    pub(crate) fn apply_decision(&mut self, decision: Decision) -> Result<(), err::ErrorKind> {
        self.open_level();
        let level = self.trail.level();
        self.decisions.push(decision);

        let set = match decision.refuted {
            false => {
                self.counters.total_decisions += 1;
                IntervalSet::singleton(decision.value)
            }
            true => IntervalSet::singleton(decision.value).complement(),
        };
        log::trace!(target: targets::DECISION, "{level}: v{} {} {}", decision.var, if decision.refuted { "≠" } else { "=" }, decision.value);

        self.variable_db.restrict(
            decision.var,
            &set,
            Cause::Decision(level),
            &mut self.trail,
            &mut self.implication_graph,
        )?;
        Ok(())
    }

    fn open_level(&mut self) {
        self.trail.push_level();
        self.trail.save(Undo::GraphSize(self.implication_graph.size()));
    }
}
