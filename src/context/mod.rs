/*!
The context, to which variables, constraints, and clauses are added and within which solves take place.

Strictly, a [GenericContext] and a [Context].

The generic context is designed to be generic over various parameters.
Though, for the moment this is limited to the source of randomness.

Still, this helps distinguish generic context methods against those intended for external use or a particular application.
In particular, [from_config](Context::from_config) is implemented for a context rather than a generic context to avoid requiring a source of randomness to be supplied alongside a config.

# Example
```rust
# use otter_fd::context::Context;
# use otter_fd::config::Config;
# use otter_fd::reports::Report;
# use otter_fd::generic::interval_set::IntervalSet;
# use otter_fd::structures::constraint::Constraint;
let mut the_context = Context::from_config(Config::default());

let x = the_context.fresh_variable("x", 0, 5).unwrap();
let y = the_context.fresh_variable("y", 0, 5).unwrap();

// x + 2 ≤ y
assert!(the_context.post(Constraint::LessOrEqual { x, y, c: -2 }).is_ok());
// x ≥ 3 ∨ y ≤ 3
assert!(the_context
    .add_clause(&[x, y], &[IntervalSet::from_range(3, 5), IntervalSet::from_range(0, 3)])
    .is_ok());

assert_eq!(the_context.solve(), Ok(Report::Satisfiable));
assert_eq!(the_context.report(), Report::Satisfiable);
assert!(the_context.is_satisfied());

assert_eq!(the_context.value_of(x), Some(0));
assert_eq!(the_context.value_of(y), Some(2));
```
*/

mod counters;
pub use counters::Counters;
mod generic;
pub use generic::GenericContext;
mod specific;
pub use specific::Context;

/// The state of a context.
///
/// States are ordered, so the configuration of a context may be limited to states up to some state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ContextState {
    /// The context allows for configuration.
    Configuration,

    /// The context allows input.
    Input,

    /// The consistency of the context is unknown.
    Solving,

    /// The context is known to be consistent, with a value for every variable.
    Satisfiable,

    /// The context is known to be inconsistent.
    Unsatisfiable,
}

impl std::fmt::Display for ContextState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration => write!(f, "Configuration"),
            Self::Input => write!(f, "Input"),
            Self::Solving => write!(f, "Solving"),
            Self::Satisfiable => write!(f, "Satisfiable"),
            Self::Unsatisfiable => write!(f, "Unsatisfiable"),
        }
    }
}
