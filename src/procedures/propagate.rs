/*!
Propagation to a fixpoint.

# Overview

[propagate](GenericContext::propagate) repeatedly:
- Dispatches each queued domain event to the propagators subscribed to the variable of the event, and to the [clause store](crate::db::clause), which sweeps the containers of the variable.
- Propagates a scheduled clause, if any.
- Otherwise, propagates a scheduled propagator, if any.

Clauses are propagated before propagators, as clause propagation is cheap.
Each call to a clause or propagator begins a fresh pass of the [implication graph](crate::db::implication).

Propagation stops on the first conflict, at which point every queue is cleared and the conflict is returned as a [PropagationError::Conflict](err::PropagationError::Conflict).

If learning is enabled and the implication graph is not recording (e.g. as a variable was created since the last solve) the graph is initialised with the current domain of each source variable.
As the graph is only initialised at the root, these domains are the root domains of the variables.
*/

use crate::{
    context::GenericContext,
    misc::log::targets::{self},
    types::err::{self},
};

impl<R: rand::Rng + std::default::Default> GenericContext<R> {
    /// Propagates every queued event, scheduled clause, and scheduled propagator.
    ///
    /// For documentation, see [procedures::propagate](crate::procedures::propagate).
    pub fn propagate(&mut self) -> Result<(), err::PropagationError> {
        if self.config.learning.value && !self.implication_graph.is_recording() && self.trail.level() == 0 {
            self.init_implication_graph();
        }

        let result = self.propagate_to_fixpoint();
        if result.is_err() {
            self.variable_db.clear_events();
            self.propagator_db.clear_queue();
            self.clause_db.clear_queue();
        }
        result
    }

    fn propagate_to_fixpoint(&mut self) -> Result<(), err::PropagationError> {
        loop {
            while let Some((var, event)) = self.variable_db.pop_event() {
                self.propagator_db.on_event(var);
                self.clause_db.on_event(var, event, &self.variable_db, &mut self.trail);
            }

            if let Some(key) = self.clause_db.pop_scheduled() {
                self.implication_graph.begin_pass();
                self.clause_db.propagate(
                    key,
                    &mut self.variable_db,
                    &mut self.trail,
                    &mut self.implication_graph,
                )?;
                continue;
            }

            if let Some(key) = self.propagator_db.pop() {
                let Some(propagator) = self.propagator_db.get(key) else {
                    continue;
                };
                self.implication_graph.begin_pass();
                if let Err(e) = propagator.propagate(
                    key,
                    &mut self.variable_db,
                    &mut self.trail,
                    &mut self.implication_graph,
                ) {
                    log::trace!(target: targets::PROPAGATION, "Failure of {}", propagator.constraint);
                    return Err(e);
                }
                continue;
            }

            return Ok(());
        }
    }

    /// Begins recording implications, with a root entry for each source variable.
    pub fn init_implication_graph(&mut self) {
        let domains = self
            .variable_db
            .sources()
            .map(|var| (var, self.variable_db.domain(var).into_owned()))
            .collect::<Vec<_>>();
        log::debug!(target: targets::IMPLICATION, "Recording implications of {} variables", domains.len());
        self.implication_graph.init(domains, self.variable_db.count());
    }
}
