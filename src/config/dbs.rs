//! Configuration of databases, typically derived from the configuration of a context.

use std::str::FromStr;

use crate::context::ContextState;

use super::{Activity, ConfigOption};

/// How watchers are grouped into containers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum StorageMode {
    /// Watchers of literals on the same variable and range share a container, indexed by an interval tree.
    IntervalTree = 0,

    /// Each watcher has a container of its own.
    PerClause,
}

impl StorageMode {
    pub const MIN: StorageMode = StorageMode::IntervalTree;
    pub const MAX: StorageMode = StorageMode::PerClause;
}

impl std::fmt::Display for StorageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IntervalTree => write!(f, "IntervalTree"),
            Self::PerClause => write!(f, "PerClause"),
        }
    }
}

impl FromStr for StorageMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IntervalTree" => Ok(Self::IntervalTree),
            "PerClause" => Ok(Self::PerClause),
            _unkown_string => Err(()),
        }
    }
}

/// Configuration for the clause store.
#[derive(Clone)]
pub struct ClauseStoreConfig {
    /// The count of learnt clauses at which the store is reduced.
    pub max_learnts: ConfigOption<usize>,

    /// The proportion of learnt clauses kept by a reduction.
    pub reduction_ratio: ConfigOption<f64>,

    /// How many of the most recent learnt clauses are tested against the latest for dominance.
    pub dominance_window: ConfigOption<usize>,

    /// The factor by which the activity increment grows after each conflict.
    pub activity_inflation: ConfigOption<Activity>,

    /// How watchers are grouped.
    pub storage_mode: ConfigOption<StorageMode>,
}

impl Default for ClauseStoreConfig {
    fn default() -> Self {
        ClauseStoreConfig {
            max_learnts: ConfigOption {
                name: "max_learnts",
                min: 2,
                max: usize::MAX,
                max_state: ContextState::Configuration,
                value: 100_000,
            },

            reduction_ratio: ConfigOption {
                name: "reduction_ratio",
                min: 0.0,
                max: 1.0,
                max_state: ContextState::Configuration,
                value: 0.5,
            },

            dominance_window: ConfigOption {
                name: "dominance_window",
                min: 0,
                max: usize::MAX,
                max_state: ContextState::Configuration,
                value: 4,
            },

            activity_inflation: ConfigOption {
                name: "activity_inflation",
                min: 1.0,
                max: 2.0,
                max_state: ContextState::Configuration,
                value: 1.001,
            },

            storage_mode: ConfigOption {
                name: "storage_mode",
                min: StorageMode::MIN,
                max: StorageMode::MAX,
                max_state: ContextState::Configuration,
                value: StorageMode::IntervalTree,
            },
        }
    }
}
