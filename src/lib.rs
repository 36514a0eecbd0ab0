//! A finite-domain constraint solver built around conflict-driven learning of signed clauses.
//!
//! otter_fd determines the satisfiability of constraint models over integer variables.
//! At its heart is a learning engine which lifts conflict-driven clause-learning from boolean literals to *signed* literals, claims of the form *x ∈ [a, b]*.
//!
//! # Orientation
//!
//! The library is designed around the core structure of a [context].
//!
//! Contexts are built from a [configuration](crate::config), and variables, constraints, and clauses are added to a context before a [solve](crate::procedures::solve).
//!
//! Internally, a solve is viewed in terms of a handful of databases:
//! - Variables and their domains are stored in a [variable database](crate::db::variable).
//! - Propagators are stored in a [propagator database](crate::db::propagator).
//! - Signed clauses, both declared and learnt, are stored in a [clause store](crate::db::clause).
//! - The reasons for every domain reduction are recorded in an [implication graph](crate::db::implication).
//!
//! When propagation derives a contradiction the implication graph is walked backwards by [conflict analysis](crate::procedures::analysis), producing a set of literals.
//! The literals are simplified by the [clause builder](crate::builder) and the result is installed in the clause store, from which it may propagate, closing the loop.
//!
//! Useful starting points, then, may be:
//! - The high-level [solve procedure](crate::procedures::solve).
//! - The [implication graph](crate::db::implication) and [analysis](crate::procedures::analysis) procedure.
//! - The [clause store](crate::db::clause) and its [signed clauses](crate::db::clause::signed_clause).
//! - The [configuration](crate::config), to see what features are supported.
//!
//! # Examples
//!
//! + Find (a count of) all solutions to a small model.
//!
//! ```rust
//! # use otter_fd::config::Config;
//! # use otter_fd::context::Context;
//! # use otter_fd::reports::Report;
//! use otter_fd::structures::constraint::Constraint;
//!
//! let mut the_context = Context::from_config(Config::default());
//!
//! let x = the_context.fresh_variable("x", 0, 2).unwrap();
//! let y = the_context.fresh_variable("y", 0, 2).unwrap();
//!
//! assert!(the_context.post(Constraint::NotEqual { x, y }).is_ok());
//!
//! let mut count = 0;
//! loop {
//!     match the_context.solve() {
//!         Ok(Report::Satisfiable) => count += 1,
//!         _ => break,
//!     }
//!     assert!(the_context.is_satisfied());
//!     assert!(the_context.refute_solution().is_ok());
//! }
//!
//! assert_eq!(count, 6);
//! ```
//!
//! + Detect that a model is unsatisfiable without making a decision.
//!
//! ```rust
//! # use otter_fd::config::Config;
//! # use otter_fd::context::Context;
//! # use otter_fd::reports::Report;
//! use otter_fd::structures::constraint::Constraint;
//!
//! let mut the_context = Context::from_config(Config::default());
//!
//! let x = the_context.fresh_variable("x", 0, 3).unwrap();
//! let y = the_context.fresh_variable("y", 0, 3).unwrap();
//!
//! // x < y and y < x
//! assert!(the_context.post(Constraint::LessOrEqual { x, y, c: -1 }).is_ok());
//! assert!(the_context.post(Constraint::LessOrEqual { x: y, y: x, c: -1 }).is_ok());
//!
//! assert_eq!(the_context.solve(), Ok(Report::Unsatisfiable));
//! assert_eq!(the_context.counters.total_decisions, 0);
//! ```
//!
//! # Logs
//!
//! To help diagnose issues detailed calls to [log!](log) are made, and a variety of targets are defined in order to help narrow output to relevant parts of the library.
//!
//! The targets are listed in [misc::log].
//!
//! For example, when used with [env_logger](https://docs.rs/env_logger/latest/env_logger/):
//! - Logs related to [the clause store](crate::db::clause) can be filtered with `RUST_LOG=clause_db …` or,
//! - Logs of reduction without information about the clauses removed can be found with `RUST_LOG=reduction=info …`
//!

#![allow(mixed_script_confusables)]
#![allow(clippy::single_match)]
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::derivable_impls)]

pub mod builder;
pub mod procedures;

pub mod config;
pub mod context;
pub mod structures;
pub mod types;

pub mod generic;

pub mod db;

pub mod misc;
pub mod reports;
pub mod transient;
