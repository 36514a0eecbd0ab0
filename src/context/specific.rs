use crate::{
    builder::ClauseBuilder,
    config::Config,
    db::{clause::ClauseStore, implication::ImplicationGraph, propagator::PropagatorDB, trail::Trail, variable::VariableDB},
    generic::random::MinimalPCG32,
    transient::explanation::Explanation,
};

use rand::SeedableRng;

use super::{ContextState, Counters, GenericContext};

/// A context which uses [MinimalPCG32] as a source of randomness.
pub type Context = GenericContext<MinimalPCG32>;

impl Context {
    /// Creates a context from some given configuration.
    pub fn from_config(config: Config) -> Self {
        Self {
            clause_db: ClauseStore::new(&config),
            implication_graph: ImplicationGraph::new(&config),

            config,

            counters: Counters::default(),
            variable_db: VariableDB::default(),
            propagator_db: PropagatorDB::default(),
            trail: Trail::default(),

            explanation: Explanation::default(),
            clause_builder: ClauseBuilder::default(),
            decisions: Vec::default(),

            rng: MinimalPCG32::from_seed(0_u64.to_le_bytes()),
            state: ContextState::Configuration,
        }
    }
}
