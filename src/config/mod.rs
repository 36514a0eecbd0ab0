/*!
Configuration of a context.

All configuration for a context is contained within the context, and each option is a [ConfigOption] noting bounds on the value of the option and the latest [state](ContextState) of a context at which the option may be changed.

Some structures clone parts of the configuration when created, e.g. the [clause store](crate::db::clause) and the [implication graph](crate::db::implication).

# Example

```rust
# use otter_fd::config::{Config, MergePolicy};
# use otter_fd::context::{Context, ContextState};
let mut config = Config::default();
assert!(config.merge_policy.set(MergePolicy::SamePass, ContextState::Configuration));
assert!(!config.clause_db.reduction_ratio.set(2.0, ContextState::Configuration));

let the_context = Context::from_config(config);
assert_eq!(the_context.config.merge_policy.value, MergePolicy::SamePass);
```
*/

mod config_option;
pub use config_option::ConfigOption;

pub mod dbs;
use dbs::ClauseStoreConfig;

mod merge_policy;
pub use merge_policy::MergePolicy;

use crate::context::ContextState;

/// Representation of clause activity.
pub type Activity = f64;

/// Representation for the probability of making a random decision.
pub type RandomDecisionBias = f64;

/// The primary configuration structure.
#[derive(Clone)]
pub struct Config {
    /// Configuration of the clause store.
    pub clause_db: ClauseStoreConfig,

    /// When events are merged into an existing entry of the implication graph.
    pub merge_policy: ConfigOption<MergePolicy>,

    /// Learn a clause from each conflict.
    ///
    /// Without learning the search backtracks chronologically.
    pub learning: ConfigOption<bool>,

    /// Rewrite literals on views as literals on the source of the view when building a clause.
    pub view_elimination: ConfigOption<bool>,

    /// Check each learnt clause is false on the valuation it was learnt from, and asserts some literal.
    pub check_learnts: ConfigOption<bool>,

    /// Check each learnt clause is not false at the level it asserts at.
    pub check_asserting_level: ConfigOption<bool>,

    /// Log each step of an explanation.
    pub proof: ConfigOption<bool>,

    /// Log each clause added to the clause store.
    pub print_clauses: ConfigOption<bool>,

    /// The probability of deciding on a random value of a variable, rather than the lower bound.
    pub random_decision_bias: ConfigOption<RandomDecisionBias>,

    /// The time limit for a solve, with zero for no limit.
    pub time_limit: ConfigOption<std::time::Duration>,
}

impl Default for Config {
    /// The default context is configured to provide quick, deterministic, results.
    fn default() -> Self {
        Config {
            clause_db: ClauseStoreConfig::default(),

            merge_policy: ConfigOption {
                name: "merge_policy",
                min: MergePolicy::MIN,
                max: MergePolicy::MAX,
                max_state: ContextState::Configuration,
                value: MergePolicy::Consecutive,
            },

            learning: ConfigOption {
                name: "learning",
                min: false,
                max: true,
                max_state: ContextState::Configuration,
                value: true,
            },

            view_elimination: ConfigOption {
                name: "view_elimination",
                min: false,
                max: true,
                max_state: ContextState::Configuration,
                value: true,
            },

            check_learnts: ConfigOption {
                name: "check_learnts",
                min: false,
                max: true,
                max_state: ContextState::Input,
                value: false,
            },

            check_asserting_level: ConfigOption {
                name: "check_asserting_level",
                min: false,
                max: true,
                max_state: ContextState::Input,
                value: false,
            },

            proof: ConfigOption {
                name: "proof",
                min: false,
                max: true,
                max_state: ContextState::Input,
                value: false,
            },

            print_clauses: ConfigOption {
                name: "print_clauses",
                min: false,
                max: true,
                max_state: ContextState::Input,
                value: false,
            },

            random_decision_bias: ConfigOption {
                name: "random_decision_bias",
                min: 0.0,
                max: 1.0,
                max_state: ContextState::Configuration,
                value: 0.0,
            },

            time_limit: ConfigOption {
                name: "time_limit",
                min: std::time::Duration::from_secs(0),
                max: std::time::Duration::MAX,
                max_state: ContextState::Input,
                value: std::time::Duration::from_secs(0),
            },
        }
    }
}
