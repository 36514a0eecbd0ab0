use crate::{
    builder::{BuildOk, ClauseBuilder},
    config::Config,
    db::{
        clause::{signed_clause::ClauseSource, ClauseStore},
        implication::ImplicationGraph,
        propagator::PropagatorDB,
        trail::Trail,
        variable::VariableDB,
        PropagatorKey,
    },
    generic::interval_set::IntervalSet,
    procedures::decision::Decision,
    reports::Report,
    structures::{
        constraint::Constraint,
        entailment::Entailment,
        variable::{DomainKind, Var, View},
    },
    transient::explanation::Explanation,
    types::err::{self},
};

use super::{ContextState, Counters};

/// A generic context, parameratised to a source of randomness.
///
/// Requires a source of [rng](rand::Rng) which (also) implements [Default].
///
/// # Example
///
/// ```rust
/// # use otter_fd::context::Context;
/// # use otter_fd::config::Config;
/// # use otter_fd::structures::variable::View;
/// let mut the_context = Context::from_config(Config::default());
///
/// let x = the_context.fresh_variable("x", -2, 2).unwrap();
/// let minus_x = the_context.fresh_view("-x", x, View::Minus).unwrap();
/// assert_eq!(the_context.domain_of(minus_x).max(), Some(2));
/// assert_eq!(the_context.value_of(x), None);
/// ```
pub struct GenericContext<R: rand::Rng + std::default::Default> {
    /// The configuration of a context.
    pub config: Config,

    /// Counters related to a context/solve.
    pub counters: Counters,

    /// The variable database.
    /// See [db::variable](crate::db::variable) for details.
    pub variable_db: VariableDB,

    /// The propagator database.
    /// See [db::propagator](crate::db::propagator) for details.
    pub propagator_db: PropagatorDB,

    /// The clause store.
    /// See [db::clause](crate::db::clause) for details.
    pub clause_db: ClauseStore,

    /// The implication graph.
    /// See [db::implication](crate::db::implication) for details.
    pub implication_graph: ImplicationGraph,

    /// What to undo on a backjump, by level.
    pub trail: Trail,

    /// The explanation of the most recent conflict, or solution.
    pub explanation: Explanation,

    /// A builder for clauses added to, or learnt by, the context.
    pub clause_builder: ClauseBuilder,

    /// The decision made at each level above the root, with the decision of level *n* at index *n - 1*.
    pub decisions: Vec<Decision>,

    /// The status of the context.
    pub state: ContextState,

    /// The source of rng.
    pub rng: R,
}

impl<R: rand::Rng + std::default::Default> GenericContext<R> {
    /// A report on the state of the context.
    pub fn report(&self) -> Report {
        Report::from(self.state)
    }

    /// A fresh enumerated variable with domain [lo, hi].
    pub fn fresh_variable(&mut self, name: &str, lo: i32, hi: i32) -> Result<Var, err::ErrorKind> {
        self.fresh_range(name, lo, hi, DomainKind::Enumerated)
    }

    /// A fresh bounded variable with domain [lo, hi].
    pub fn fresh_bounded_variable(&mut self, name: &str, lo: i32, hi: i32) -> Result<Var, err::ErrorKind> {
        self.fresh_range(name, lo, hi, DomainKind::Bounded)
    }

    fn fresh_range(&mut self, name: &str, lo: i32, hi: i32, kind: DomainKind) -> Result<Var, err::ErrorKind> {
        self.prepare_input();
        let var = self.variable_db.fresh_range(name, lo, hi, kind)?;
        self.implication_graph.clear();
        log::trace!("Fresh variable {name} as v{var}");
        Ok(var)
    }

    /// A fresh variable with domain {0, 1}.
    pub fn fresh_boolean(&mut self, name: &str) -> Result<Var, err::ErrorKind> {
        self.fresh_variable(name, 0, 1)
    }

    /// A fresh variable with the given domain.
    ///
    /// The domain of a bounded variable is the hull of the set given.
    /// The set itself never holds values beyond the limits of an [IntervalSet].
    pub fn fresh_variable_from_set(
        &mut self,
        name: &str,
        domain: IntervalSet,
        kind: DomainKind,
    ) -> Result<Var, err::ErrorKind> {
        self.prepare_input();
        let var = self.variable_db.fresh(name, domain, kind)?;
        self.implication_graph.clear();
        log::trace!("Fresh variable {name} as v{var}");
        Ok(var)
    }

    /// A fresh view of some existing variable.
    pub fn fresh_view(&mut self, name: &str, source: Var, view: View) -> Result<Var, err::ErrorKind> {
        self.prepare_input();
        let var = self.variable_db.fresh_view(name, source, view)?;
        self.implication_graph.clear();
        log::trace!("Fresh view {name} as v{var}, {view} of v{source}");
        Ok(var)
    }

    /// Posts a constraint, to be propagated from the next call to [propagate](GenericContext::propagate).
    pub fn post(&mut self, constraint: Constraint) -> Result<PropagatorKey, err::ErrorKind> {
        self.check_vars(&constraint.vars())?;
        self.prepare_input();
        Ok(self.propagator_db.post(constraint, None, 0))
    }

    /// Posts a constraint which holds whenever the boolean b takes the value 1.
    pub fn post_reified(&mut self, constraint: Constraint, b: Var) -> Result<PropagatorKey, err::ErrorKind> {
        self.check_vars(&constraint.vars())?;
        self.check_vars(&[b])?;
        if !self.variable_db.domain(b).is_subset_of(&IntervalSet::from_range(0, 1)) {
            return Err(err::VariableDBError::NotBoolean(b).into());
        }
        self.prepare_input();
        Ok(self.propagator_db.post(constraint, Some(b), 0))
    }

    /// Adds the clause ⋁ vars\[i\] ∈ sets\[i\] to the context.
    ///
    /// The clause is simplified by the [clause builder](crate::builder) before being stored, and so may be stored as a propagator, or not at all.
    pub fn add_clause(&mut self, vars: &[Var], sets: &[IntervalSet]) -> Result<BuildOk, err::ErrorKind> {
        if vars.len() != sets.len() {
            return Err(err::BuildError::Mismatch.into());
        }
        self.check_vars(vars)?;
        self.prepare_input();

        for (var, set) in vars.iter().zip(sets) {
            self.clause_builder.put(*var, set.clone(), &self.variable_db);
        }
        self.clause_builder.build(
            &self.variable_db,
            &mut self.clause_db,
            &mut self.propagator_db,
            ClauseSource::Original,
            self.trail.level(),
            self.config.view_elimination.value,
        )
    }

    /// The value of a variable, if its domain is a singleton.
    pub fn value_of(&self, var: Var) -> Option<i32> {
        self.variable_db.value(var)
    }

    /// The current domain of a variable.
    pub fn domain_of(&self, var: Var) -> IntervalSet {
        self.variable_db.domain(var).into_owned()
    }

    /// Whether every propagator and clause holds on the current domains.
    pub fn is_satisfied(&self) -> bool {
        self.propagator_db
            .iter()
            .all(|(_, propagator)| propagator.holds(&self.variable_db) == Some(true))
            && self.clause_db.is_entailed(&self.variable_db) == Entailment::True
    }

    /// Learns a clause refuting the solution found by the most recent solve, so a subsequent solve finds some other solution.
    ///
    /// Returns an error unless the context is satisfiable.
    pub fn refute_solution(&mut self) -> Result<BuildOk, err::ErrorKind> {
        if self.state != ContextState::Satisfiable {
            return Err(err::ErrorKind::InvalidState);
        }
        self.learn_solution();
        self.backjump(0);
        let result = self.extract_clause(ClauseSource::Learnt);
        self.state = ContextState::Input;
        result
    }

    /// A string of the domain of every variable.
    pub fn valuation_string(&self) -> String {
        self.variable_db.valuation_string()
    }

    fn check_vars(&self, vars: &[Var]) -> Result<(), err::ErrorKind> {
        match vars.iter().find(|var| !self.variable_db.contains(**var)) {
            Some(var) => Err(err::VariableDBError::UnknownVariable(*var).into()),
            None => Ok(()),
        }
    }

    /// Input is made at the root, and unsettles a settled solve.
    fn prepare_input(&mut self) {
        if self.trail.level() > 0 {
            self.backjump(0);
        }
        match self.state {
            ContextState::Unsatisfiable => {}
            _ => self.state = ContextState::Input,
        }
    }
}
