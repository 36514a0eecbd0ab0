//! Determines the satisfiability of the constraints of a context.
//!
//! # Overview
//!
//! A solve is a depth-first search with binary decisions, in which each conflict is analysed and the resulting clause learnt.
//!
//! Roughly, the loop is as diagrammed:
//!
//! ```none
//!           +---------------+
//!   +-------| make_decision |
//!   |       +---------------+
//!   |               ⌃
//!   |               | if some variable is without a value
//!   |               |
//!   |               |              +-----> satisfiable, if every variable has a value
//!   ⌄   +-----------+-----+        |
//! --+-->|    propagate    |--------+
//!   ⌃   +-----------------+        |
//!   |               |              +-----> unsatisfiable, if a conflict cannot be resolved
//!   |               |
//!   |               | on a conflict
//!   |               ⌄
//!   |   +-----------------------+
//!   +---| analyse, backjump,    |
//!       | learn, and refute     |
//!       +-----------------------+
//! ```
//!
//! On a conflict:
//! - If the conflict is at the root the constraints are unsatisfiable.
//!   The conflict is still analysed (if learning is enabled), and as every literal of the explanation is false at the root, the [clause builder](crate::builder) posts the false constraint.
//! - Otherwise the conflict is analysed, resulting in an explanation which asserts at some level *a*.
//!   The deepest decision at or above position *a* which has not been refuted is found, say at position *j*.
//!   If there is no such decision, the constraints are unsatisfiable.
//!   Otherwise, a backjump is made to level *j - 1*, the clause of the explanation is learnt, the [clause store](crate::db::clause) forgets some clauses, and the decision at *j* is refuted.
//!
//! If the decision at *a* has not been refuted then *j = a*, and the backjump is non-chronological.
//! Otherwise, the search falls back to chronological backtracking past *a*.
//!
//! Without learning, every conflict is resolved by chronological backtracking.
//!
//! If a time limit is set, the time is checked on each iteration of the loop, and a solve past the limit ends with an [unknown](Report::Unknown) report.
//!
//! # Example
//!
//! ```rust
//! # use otter_fd::context::Context;
//! # use otter_fd::config::Config;
//! # use otter_fd::reports::Report;
//! # use otter_fd::structures::constraint::Constraint;
//! let mut the_context = Context::from_config(Config::default());
//!
//! let vars = (0..4)
//!     .map(|index| the_context.fresh_variable(&format!("q{index}"), 0, 2).unwrap())
//!     .collect::<Vec<_>>();
//!
//! for (index, x) in vars.iter().enumerate() {
//!     for y in &vars[index + 1..] {
//!         assert!(the_context.post(Constraint::NotEqual { x: *x, y: *y }).is_ok());
//!     }
//! }
//!
//! assert_eq!(the_context.solve(), Ok(Report::Unsatisfiable));
//! assert!(the_context.counters.total_conflicts > 0);
//! ```

use crate::{
    builder::BuildOk,
    context::{ContextState, GenericContext},
    db::{clause::signed_clause::ClauseSource, LevelIndex},
    misc::log::targets::{self},
    procedures::decision::{Decision, DecisionOk},
    reports::Report,
    structures::conflict::Conflict,
    types::err::{self},
};

impl<R: rand::Rng + std::default::Default> GenericContext<R> {
    /// Determines the satisfiability of the context.
    ///
    /// For documentation, see [procedures::solve](crate::procedures::solve).
    pub fn solve(&mut self) -> Result<Report, err::ErrorKind> {
        let total_time = std::time::Instant::now();

        if matches!(self.state, ContextState::Unsatisfiable) {
            return Ok(Report::Unsatisfiable);
        }
        self.state = ContextState::Solving;

        let time_limit = self.config.time_limit.value;
        let mut refutation: Option<Decision> = None;

        'solve_loop: loop {
            self.counters.total_iterations += 1;
            log::trace!("Iteration {}", self.counters.total_iterations);

            self.counters.time = total_time.elapsed();
            if !time_limit.is_zero() && self.counters.time > time_limit {
                self.state = ContextState::Input;
                return Ok(Report::Unknown);
            }

            match self.propagate() {
                Ok(()) => {}

                Err(err::PropagationError::Conflict(conflict)) => {
                    self.counters.total_conflicts += 1;
                    match self.resolve_conflict(&conflict)? {
                        Some(decision) => {
                            refutation = Some(decision);
                            continue 'solve_loop;
                        }
                        None => {
                            self.state = ContextState::Unsatisfiable;
                            break 'solve_loop;
                        }
                    }
                }

                Err(e) => return Err(e.into()),
            }

            if let Some(decision) = refutation.take() {
                match self.refute(decision)? {
                    true => continue 'solve_loop,
                    false => {
                        self.state = ContextState::Unsatisfiable;
                        break 'solve_loop;
                    }
                }
            }

            match self.make_decision()? {
                DecisionOk::Made(..) => continue 'solve_loop,
                DecisionOk::Exhausted => {
                    self.state = ContextState::Satisfiable;
                    break 'solve_loop;
                }
            }
        }

        self.counters.time = total_time.elapsed();
        Ok(self.report())
    }

    /// Resolves a conflict, returning the decision to refute, if any.
    fn resolve_conflict(&mut self, conflict: &Conflict) -> Result<Option<Decision>, err::ErrorKind> {
        let level = self.trail.level();
        let learning = self.config.learning.value;

        let assert_level = match learning {
            true => self.learn_signed_clause(conflict)?,
            false => level,
        };

        let Some(position) = self.deepest_unrefuted(assert_level) else {
            log::info!(target: targets::ANALYSIS, "Unsatisfiable, from a conflict at {level}");
            if learning {
                self.backjump(0);
                self.extract_clause(ClauseSource::Learnt)?;
            }
            return Ok(None);
        };

        let decision = self.decisions[position as usize - 1];
        self.backjump(position - 1);

        if learning {
            match self.extract_clause(ClauseSource::Learnt)? {
                BuildOk::Clause(_) => self.counters.total_learnts += 1,
                BuildOk::Propagator(_) => self.counters.total_learnts += 1,
                BuildOk::Tautology => {
                    log::warn!(target: targets::ANALYSIS, "A tautology was learnt");
                }
            }

            let check = self.config.check_learnts.value && position == assert_level;
            self.clause_db.forget(
                position - 1,
                check,
                self.config.check_asserting_level.value,
                &self.variable_db,
            )?;
        }

        Ok(Some(Decision {
            refuted: true,
            ..decision
        }))
    }

    /// The deepest position at or above `limit` whose decision has not been refuted.
    fn deepest_unrefuted(&self, limit: LevelIndex) -> Option<LevelIndex> {
        let top = std::cmp::min(limit as usize, self.decisions.len());
        (1..=top)
            .rev()
            .find(|position| !self.decisions[position - 1].refuted)
            .map(|position| position as LevelIndex)
    }

    /// Applies the refutation of a decision, falling back to earlier decisions if the refutation would fail at once.
    ///
    /// Returns false if no decision remains to refute.
    fn refute(&mut self, decision: Decision) -> Result<bool, err::ErrorKind> {
        let mut decision = decision;
        loop {
            if self.variable_db.value(decision.var) != Some(decision.value) {
                self.apply_decision(decision)?;
                return Ok(true);
            }

            log::trace!(target: targets::DECISION, "Refutation of v{} ≠ {} fails", decision.var, decision.value);
            let Some(position) = self.deepest_unrefuted(self.trail.level()) else {
                return Ok(false);
            };
            let next = self.decisions[position as usize - 1];
            self.backjump(position - 1);
            decision = Decision {
                refuted: true,
                ..next
            };
        }
    }
}
