use otter_fd::{
    builder::BuildOk,
    config::{dbs::StorageMode, Config},
    context::Context,
    db::{clause::{signed_clause::ClauseSource, ClauseStore}, variable::VariableDB},
    generic::interval_set::IntervalSet,
    reports::Report,
    structures::{
        constraint::Constraint,
        entailment::Entailment,
        variable::{DomainKind, Var},
    },
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn wide_variables(the_context: &mut Context, count: usize, kind: DomainKind) -> Vec<Var> {
    (0..count)
        .map(|index| {
            the_context
                .fresh_variable_from_set(&format!("v{index}"), IntervalSet::from_range(-999, 999), kind)
                .unwrap()
        })
        .collect()
}

/// Every active clause watches a literal which is not false, or is true.
fn watch_invariant(the_context: &Context) -> bool {
    the_context
        .clause_db
        .originals()
        .chain(the_context.clause_db.learnts())
        .all(|(_, clause)| {
            let (w0, w1) = clause.watched();
            clause.is_entailed(&the_context.variable_db) == Entailment::True
                || clause.check(w0, &the_context.variable_db) != Entailment::False
                || clause.check(w1, &the_context.variable_db) != Entailment::False
        })
}

mod unit_propagation {
    use super::*;

    fn forced_range(mode: StorageMode, kind: DomainKind) {
        init_logger();
        let mut config = Config::default();
        config.clause_db.storage_mode.value = mode;
        let mut the_context = Context::from_config(config);
        let vars = wide_variables(&mut the_context, 3, kind);
        let (x, y, z) = (vars[0], vars[1], vars[2]);

        // x ≤ 4 ∨ y ≥ 6 ∨ 10 ≤ z ≤ 20
        assert!(the_context
            .add_clause(
                &[x, y, z],
                &[
                    IntervalSet::from_range(-999, 4),
                    IntervalSet::from_range(6, 999),
                    IntervalSet::from_range(10, 20),
                ],
            )
            .is_ok());
        assert!(the_context.propagate().is_ok());
        assert_eq!(the_context.domain_of(z).size(), 1999);

        assert!(the_context.decide(x, 5).is_ok());
        assert!(the_context.propagate().is_ok());
        assert_eq!(the_context.domain_of(z).size(), 1999);
        assert!(watch_invariant(&the_context));

        assert!(the_context.decide(y, 5).is_ok());
        assert!(the_context.propagate().is_ok());
        assert_eq!(the_context.domain_of(z), IntervalSet::from_range(10, 20));
        assert!(watch_invariant(&the_context));

        the_context.backjump(1);
        assert_eq!(the_context.domain_of(z).size(), 1999);
        assert!(the_context.decide(y, -3).is_ok());
        assert!(the_context.propagate().is_ok());
        assert_eq!(the_context.domain_of(z), IntervalSet::from_range(10, 20));
    }

    #[test]
    fn forced_range_interval_tree() {
        forced_range(StorageMode::IntervalTree, DomainKind::Enumerated);
        forced_range(StorageMode::IntervalTree, DomainKind::Bounded);
    }

    #[test]
    fn forced_range_per_clause() {
        forced_range(StorageMode::PerClause, DomainKind::Enumerated);
        forced_range(StorageMode::PerClause, DomainKind::Bounded);
    }

    fn forbidden_values(mode: StorageMode) {
        init_logger();
        let mut config = Config::default();
        config.clause_db.storage_mode.value = mode;
        let mut the_context = Context::from_config(config);
        let vars = wide_variables(&mut the_context, 3, DomainKind::Enumerated);
        let (x, y, z) = (vars[0], vars[1], vars[2]);

        let mut allowed = IntervalSet::from_range(-999, 999);
        for value in [5, 7, 9] {
            allowed.remove(value);
        }

        // x = 1 ∨ y = 2 ∨ z ∉ {5, 7, 9}
        assert!(the_context
            .add_clause(&[x, y, z], &[IntervalSet::singleton(1), IntervalSet::singleton(2), allowed.clone()])
            .is_ok());

        assert!(the_context.post(Constraint::Member { x, set: IntervalSet::from_range(2, 999) }).is_ok());
        assert!(the_context.post(Constraint::Member { x: y, set: IntervalSet::from_range(-999, 1) }).is_ok());
        assert!(the_context.propagate().is_ok());

        assert_eq!(the_context.domain_of(z), allowed);
        assert_eq!(the_context.solve(), Ok(Report::Satisfiable));
        assert_eq!(the_context.value_of(z), Some(-999));
    }

    #[test]
    fn forbidden_values_interval_tree() {
        forbidden_values(StorageMode::IntervalTree);
    }

    #[test]
    fn forbidden_values_per_clause() {
        forbidden_values(StorageMode::PerClause);
    }

    fn forbidden_values_by_decision(mode: StorageMode) {
        init_logger();
        let mut config = Config::default();
        config.clause_db.storage_mode.value = mode;
        let mut the_context = Context::from_config(config);
        let vars = wide_variables(&mut the_context, 3, DomainKind::Enumerated);
        let (x, y, z) = (vars[0], vars[1], vars[2]);

        let mut allowed = IntervalSet::from_range(-999, 999);
        for value in [5, 7, 9] {
            allowed.remove(value);
        }

        assert!(the_context
            .add_clause(&[x, y, z], &[IntervalSet::singleton(1), IntervalSet::singleton(2), allowed.clone()])
            .is_ok());
        assert!(the_context.propagate().is_ok());

        assert!(the_context.decide(x, 5).is_ok());
        assert!(the_context.propagate().is_ok());
        assert_eq!(the_context.domain_of(z).size(), 1999);

        assert!(the_context.decide(y, 0).is_ok());
        assert!(the_context.propagate().is_ok());
        assert_eq!(the_context.domain_of(z), allowed);
        assert!(the_context.clause_db.originals().all(|(_, clause)| clause.is_locked()));

        the_context.backjump(1);
        assert_eq!(the_context.domain_of(z).size(), 1999);
        assert!(the_context.decide(y, 3).is_ok());
        assert!(the_context.propagate().is_ok());
        assert_eq!(the_context.domain_of(z), allowed);
    }

    #[test]
    fn forbidden_values_by_decision_interval_tree() {
        forbidden_values_by_decision(StorageMode::IntervalTree);
    }

    #[test]
    fn forbidden_values_by_decision_per_clause() {
        forbidden_values_by_decision(StorageMode::PerClause);
    }

    fn container_count(mode: StorageMode) -> usize {
        let mut config = Config::default();
        config.clause_db.storage_mode.value = mode;
        let mut the_context = Context::from_config(config);
        let vars = wide_variables(&mut the_context, 3, DomainKind::Enumerated);

        for other in [vars[1], vars[2]] {
            assert!(the_context
                .add_clause(&[vars[0], other], &[IntervalSet::from_range(0, 4), IntervalSet::singleton(1)])
                .is_ok());
        }
        the_context.clause_db.watches().container_count()
    }

    #[test]
    fn shared_containers() {
        assert_eq!(container_count(StorageMode::IntervalTree), 3);
        assert_eq!(container_count(StorageMode::PerClause), 4);
    }

    #[test]
    fn private_containers_are_reused() {
        init_logger();
        let mut config = Config::default();
        config.clause_db.storage_mode.value = StorageMode::PerClause;
        let mut the_context = Context::from_config(config);
        let vars = (0..8)
            .map(|index| the_context.fresh_variable(&format!("p{index}"), 0, 6).unwrap())
            .collect::<Vec<_>>();
        for (index, x) in vars.iter().enumerate() {
            for y in &vars[index + 1..] {
                assert!(the_context.post(Constraint::NotEqual { x: *x, y: *y }).is_ok());
            }
        }
        assert_eq!(the_context.solve(), Ok(Report::Unsatisfiable));
        assert!(the_context.counters.total_conflicts > 0);

        let literals: usize = the_context
            .clause_db
            .originals()
            .chain(the_context.clause_db.learnts())
            .map(|(_, clause)| clause.size())
            .sum();
        assert!(the_context.clause_db.watches().container_count() <= literals);
    }

    #[test]
    fn watches_through_search() {
        init_logger();
        let mut the_context = Context::from_config(Config::default());
        let vars = (0..6)
            .map(|index| the_context.fresh_variable(&format!("v{index}"), 0, 5).unwrap())
            .collect::<Vec<_>>();

        for index in 0..4 {
            assert!(the_context
                .add_clause(
                    &[vars[index], vars[index + 1], vars[index + 2]],
                    &[IntervalSet::from_range(1, 2), IntervalSet::from_range(4, 5), IntervalSet::singleton(3)],
                )
                .is_ok());
        }

        assert!(the_context.propagate().is_ok());
        assert!(watch_invariant(&the_context));
        loop {
            match the_context.make_decision() {
                Ok(otter_fd::procedures::decision::DecisionOk::Made(..)) => {}
                _ => break,
            }
            match the_context.propagate() {
                Ok(()) => assert!(watch_invariant(&the_context)),
                Err(_) => break,
            }
        }
    }
}

mod store {
    use super::*;

    fn booleans(count: usize) -> (VariableDB, Vec<Var>) {
        let mut variables = VariableDB::default();
        let vars = (0..count)
            .map(|index| {
                variables
                    .fresh(&format!("b{index}"), IntervalSet::from_range(0, 1), DomainKind::Enumerated)
                    .unwrap()
            })
            .collect();
        (variables, vars)
    }

    #[test]
    fn reduction_bound() {
        init_logger();
        let mut config = Config::default();
        config.clause_db.max_learnts.value = 4;
        let mut store = ClauseStore::new(&config);
        let (variables, vars) = booleans(12);

        for index in 0..10 {
            let clause = [vars[index], vars[index + 1]];
            let sets = [IntervalSet::singleton(0), IntervalSet::singleton(1)];
            assert!(store.add(&clause, &sets, ClauseSource::Learnt).is_ok());
            assert!(store.forget(1, false, false, &variables).is_ok());
            assert!(store.learnt_count() < 4);
        }
        assert!(store.last().is_none());
    }

    #[test]
    fn activity_monotonicity() {
        let config = Config::default();
        let mut store = ClauseStore::new(&config);
        let (variables, vars) = booleans(4);
        let sets = [IntervalSet::singleton(0), IntervalSet::singleton(0)];

        let key = store.add(&vars[0..2], &sets, ClauseSource::Learnt).unwrap();
        assert_eq!(store.get(key).unwrap().activity, store.clause_inc());
        assert_eq!(store.get(key).unwrap().raw_activity, 1);

        let mut previous = store.get(key).unwrap().activity;
        for _ in 0..8 {
            assert!(store.forget(1, false, false, &variables).is_ok());
            assert_eq!(store.get(key).unwrap().activity, previous);

            store.bump(key);
            assert!(store.get(key).unwrap().activity > previous);
            previous = store.get(key).unwrap().activity;
        }

        assert_eq!(store.get(key).unwrap().raw_activity, 9);

        // A fresh clause begins at the grown increment.
        let fresh = store.add(&vars[2..4], &sets, ClauseSource::Learnt).unwrap();
        assert!(store.get(fresh).unwrap().activity > 1.0);
    }

    #[test]
    fn dominated_learnts_are_removed() {
        let config = Config::default();
        let mut store = ClauseStore::new(&config);
        let (variables, vars) = booleans(3);

        let weak = [IntervalSet::singleton(0), IntervalSet::singleton(0), IntervalSet::singleton(0)];
        assert!(store.add(&vars, &weak, ClauseSource::Learnt).is_ok());
        assert!(store.forget(1, false, false, &variables).is_ok());

        // b0 = 0 ∨ b1 = 0 implies b0 = 0 ∨ b1 = 0 ∨ b2 = 0
        let strong = [IntervalSet::singleton(0), IntervalSet::singleton(0)];
        assert!(store.add(&vars[0..2], &strong, ClauseSource::Learnt).is_ok());
        assert!(store.forget(1, false, false, &variables).is_ok());

        assert_eq!(store.learnt_count(), 1);
        assert_eq!(store.learnts().next().unwrap().1.size(), 2);
    }

    #[test]
    fn short_clauses() {
        let config = Config::default();
        let mut store = ClauseStore::new(&config);
        let (_, vars) = booleans(2);
        assert!(store.add(&vars[0..1], &[IntervalSet::singleton(0)], ClauseSource::Original).is_err());
        assert!(store.add(&vars, &[IntervalSet::singleton(0)], ClauseSource::Original).is_err());
    }

    #[test]
    fn top_learnts() {
        init_logger();
        let mut the_context = Context::from_config(Config::default());
        let vars = (0..6)
            .map(|index| the_context.fresh_variable(&format!("p{index}"), 0, 4).unwrap())
            .collect::<Vec<_>>();
        for (index, x) in vars.iter().enumerate() {
            for y in &vars[index + 1..] {
                assert!(the_context.post(Constraint::NotEqual { x: *x, y: *y }).is_ok());
            }
        }
        assert_eq!(the_context.solve(), Ok(Report::Unsatisfiable));

        let top = the_context.clause_db.top_learnts(10);
        assert!(top.len() <= 10);
        assert!(top.windows(2).all(|pair| pair[0].raw_activity >= pair[1].raw_activity));

        let rendering = the_context.clause_db.top_learnts_string(10);
        assert_eq!(rendering.lines().count(), top.len());
    }

    #[test]
    fn rendering() {
        let mut the_context = Context::from_config(Config::default());
        let x = the_context.fresh_variable("x", 0, 9).unwrap();
        let y = the_context.fresh_variable("y", 0, 9).unwrap();

        let Ok(BuildOk::Clause(key)) =
            the_context.add_clause(&[y, x], &[IntervalSet::from_values([1, 2, 5]), IntervalSet::from_range(7, 8)])
        else {
            panic!("No clause");
        };
        assert_eq!(
            the_context.clause_db.get(key).unwrap().to_string(),
            "(v0 ∈ [7,8]) ∨ (v1 ∈ [1,2]) ∨ (v1 ∈ [5,5])"
        );
        assert_eq!(the_context.clause_db.original_count(), 1);
    }
}
