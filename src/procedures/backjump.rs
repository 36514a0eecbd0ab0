//! Recovery from a conflict.
//!
//! # Overview
//!
//! A backjump is a 'jump' from some (higher) decision level to some previous (lower) decision level.
//!
//! Each level above the target is removed from the [trail](crate::db::trail), and the records of the level are applied in reverse order of addition:
//! - Domains of variables are restored.
//! - The size of the implication graph is restored, and the graph synchronises when next used.
//! - Containers of watchers are made active.
//! - Clauses are made active, and scheduled for (coarse) propagation.
//! - Watchers removed from passive clauses are reattached.
//!
//! Propagators posted above the target are rescheduled, and decisions above the target are forgotten.
//!
//! Passing a target level at or above the current level is safe, and nothing will happen.
//!
//! # Example
//!
//! ```rust
//! # use otter_fd::context::Context;
//! # use otter_fd::config::Config;
//! let mut the_context = Context::from_config(Config::default());
//! let x = the_context.fresh_variable("x", 0, 9).unwrap();
//!
//! assert!(the_context.decide(x, 4).is_ok());
//! assert!(the_context.propagate().is_ok());
//! assert_eq!(the_context.value_of(x), Some(4));
//!
//! the_context.backjump(0);
//! assert_eq!(the_context.domain_of(x).size(), 10);
//! assert!(the_context.decisions.is_empty());
//! ```

use crate::{
    context::GenericContext,
    db::{trail::Undo, LevelIndex},
    misc::log::targets::{self},
};

impl<R: rand::Rng + std::default::Default> GenericContext<R> {
    /// Backjumps to the given target level.
    ///
    /// For documentation, see [procedures::backjump](crate::procedures::backjump).
    pub fn backjump(&mut self, target: LevelIndex) {
        if self.trail.level() <= target {
            return;
        }
        log::trace!(target: targets::BACKJUMP, "Backjump from {} to {target}", self.trail.level());

        self.variable_db.clear_events();
        self.propagator_db.clear_queue();

        while self.trail.level() > target {
            for undo in self.trail.pop_level() {
                match undo {
                    Undo::Domain { var, domain } => self.variable_db.restore(var, domain),
                    Undo::GraphSize(size) => self.implication_graph.set_size(size),
                    Undo::ContainerActive(key) => self.clause_db.activate_container(key),
                    Undo::ClauseActive(key) => self.clause_db.reactivate(key),
                    Undo::Reattach { clause, literal } => self.clause_db.reattach(clause, literal),
                }
            }
        }

        self.propagator_db.on_backjump(target);
        self.decisions.truncate(target as usize);
    }
}
