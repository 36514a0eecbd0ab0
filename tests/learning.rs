use std::collections::HashSet;

use otter_fd::{
    config::Config,
    context::Context,
    db::clause::signed_clause::ClauseSource,
    generic::{interval_set::IntervalSet, random::MinimalPCG32},
    reports::Report,
    structures::{constraint::Constraint, variable::Var},
    types::err::{self},
};

use rand::{Rng, SeedableRng};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A small model, stored so it may be posted to several contexts and checked by brute force.
struct Model {
    var_count: usize,
    lo: i32,
    hi: i32,
    constraints: Vec<Constraint>,
    clauses: Vec<(Vec<Var>, Vec<IntervalSet>)>,
}

impl Model {
    fn random(rng: &mut MinimalPCG32, var_count: usize) -> Self {
        let (lo, hi) = (0, 3);
        let mut constraints = Vec::default();
        let mut clauses = Vec::default();

        for _ in 0..rng.gen_range(2..6) {
            let x = rng.gen_range(0..var_count) as Var;
            let y = (x + rng.gen_range(1..var_count as Var)) % var_count as Var;
            match rng.gen_bool(0.5) {
                true => constraints.push(Constraint::NotEqual { x, y }),
                false => constraints.push(Constraint::LessOrEqual { x, y, c: rng.gen_range(-1..=1) }),
            }
        }

        for _ in 0..rng.gen_range(1..4) {
            let x = rng.gen_range(0..var_count) as Var;
            let y = (x + 1) % var_count as Var;
            let a = rng.gen_range(lo..=hi);
            let b = rng.gen_range(lo..=hi);
            clauses.push((
                vec![x, y],
                vec![IntervalSet::from_range(a, a + rng.gen_range(0..2)), IntervalSet::singleton(b)],
            ));
        }

        Model {
            var_count,
            lo,
            hi,
            constraints,
            clauses,
        }
    }

    fn post_to(&self, the_context: &mut Context) -> Vec<Var> {
        let vars = (0..self.var_count)
            .map(|index| the_context.fresh_variable(&format!("v{index}"), self.lo, self.hi).unwrap())
            .collect::<Vec<_>>();
        for constraint in &self.constraints {
            assert!(the_context.post(constraint.clone()).is_ok());
        }
        for (vars, sets) in &self.clauses {
            assert!(the_context.add_clause(vars, sets).is_ok());
        }
        vars
    }

    fn holds(&self, values: &[i32]) -> bool {
        let value_of = |var: Var| values.get(var as usize).copied();
        self.constraints.iter().all(|constraint| constraint.holds(value_of) == Some(true))
            && self.clauses.iter().all(|(vars, sets)| {
                vars.iter()
                    .zip(sets)
                    .any(|(var, set)| set.contains(values[*var as usize]))
            })
    }

    fn brute_force_count(&self) -> usize {
        let width = (self.hi - self.lo + 1) as usize;
        let total = width.pow(self.var_count as u32);
        (0..total)
            .filter(|index| {
                let mut index = *index;
                let values = (0..self.var_count)
                    .map(|_| {
                        let value = self.lo + (index % width) as i32;
                        index /= width;
                        value
                    })
                    .collect::<Vec<_>>();
                self.holds(&values)
            })
            .count()
    }
}

/// Enumerates every solution of the context through solution refutation.
fn enumerate(the_context: &mut Context, vars: &[Var]) -> Result<HashSet<Vec<i32>>, err::ErrorKind> {
    let mut solutions = HashSet::default();
    for _ in 0..2048 {
        match the_context.solve()? {
            Report::Satisfiable => {
                assert!(the_context.is_satisfied());
                let solution = vars
                    .iter()
                    .map(|var| the_context.value_of(*var).unwrap())
                    .collect::<Vec<_>>();
                assert!(solutions.insert(solution), "A solution was found twice");
                the_context.refute_solution()?;
            }
            Report::Unsatisfiable => return Ok(solutions),
            Report::Unknown => break,
        }
    }
    panic!("Enumeration did not finish");
}

fn pigeons(the_context: &mut Context, pigeons: usize, holes: i32) -> Vec<Var> {
    let vars = (0..pigeons)
        .map(|index| the_context.fresh_variable(&format!("p{index}"), 0, holes - 1).unwrap())
        .collect::<Vec<_>>();
    for (index, x) in vars.iter().enumerate() {
        for y in &vars[index + 1..] {
            assert!(the_context.post(Constraint::NotEqual { x: *x, y: *y }).is_ok());
        }
    }
    vars
}

mod scenarios {
    use super::*;

    fn contradiction(the_context: &mut Context) {
        let x = the_context.fresh_variable("x", 0, 3).unwrap();
        let y = the_context.fresh_variable("y", 0, 3).unwrap();

        // x < y and x > y
        assert!(the_context.post(Constraint::LessOrEqual { x, y, c: -1 }).is_ok());
        assert!(the_context.post(Constraint::LessOrEqual { x: y, y: x, c: -1 }).is_ok());
    }

    #[test]
    fn root_contradiction() {
        init_logger();
        let mut the_context = Context::from_config(Config::default());
        contradiction(&mut the_context);

        assert_eq!(the_context.solve(), Ok(Report::Unsatisfiable));
        assert_eq!(the_context.counters.total_decisions, 0);
        assert!(the_context
            .propagator_db
            .iter()
            .any(|(_, propagator)| propagator.constraint == Constraint::False));
    }

    #[test]
    fn root_contradiction_asserts_at_root() {
        init_logger();
        let mut the_context = Context::from_config(Config::default());
        contradiction(&mut the_context);

        let Err(err::PropagationError::Conflict(conflict)) = the_context.propagate() else {
            panic!("No conflict at the root");
        };
        assert_eq!(the_context.learn_signed_clause(&conflict), Ok(0));
    }

    #[test]
    fn pigeonhole() {
        init_logger();
        let mut the_context = Context::from_config(Config::default());
        let _ = pigeons(&mut the_context, 5, 4);
        assert_eq!(the_context.solve(), Ok(Report::Unsatisfiable));
        assert!(the_context.counters.total_learnts > 0);
    }

    #[test]
    fn checked_learning() {
        init_logger();
        let mut config = Config::default();
        config.check_learnts.value = true;
        config.check_asserting_level.value = true;

        let mut the_context = Context::from_config(config);
        let _ = pigeons(&mut the_context, 6, 5);
        assert_eq!(the_context.solve(), Ok(Report::Unsatisfiable));
    }
}

mod soundness {
    use super::*;

    #[test]
    fn learnt_clause_is_false_at_conflict() {
        init_logger();
        let mut the_context = Context::from_config(Config::default());
        let vars = pigeons(&mut the_context, 4, 3);

        assert!(the_context.propagate().is_ok());
        let conflict = loop {
            assert!(the_context.make_decision().is_ok());
            if let Err(err::PropagationError::Conflict(conflict)) = the_context.propagate() {
                break conflict;
            }
        };

        let domains = vars.iter().map(|var| the_context.domain_of(*var)).collect::<Vec<_>>();
        let assert_level = the_context.learn_signed_clause(&conflict).unwrap();
        assert!(assert_level <= the_context.trail.level());

        assert!(the_context.explanation.cardinality() > 0);
        for (var, literal) in the_context.explanation.literals() {
            assert!(literal.disjoint(&domains[var as usize]));
        }
    }

    #[test]
    fn learnt_clause_prunes_after_backjump() {
        init_logger();
        let mut the_context = Context::from_config(Config::default());
        let vars = pigeons(&mut the_context, 6, 5);

        let mut conflicts = 0;
        let mut pending = the_context.propagate();
        while conflicts < 12 {
            match pending {
                Ok(()) => match the_context.make_decision() {
                    Ok(otter_fd::procedures::decision::DecisionOk::Made(..)) => pending = the_context.propagate(),
                    _ => break,
                },

                Err(err::PropagationError::Conflict(conflict)) => {
                    conflicts += 1;
                    let domains = vars.iter().map(|var| the_context.domain_of(*var)).collect::<Vec<_>>();

                    let assert_level = the_context.learn_signed_clause(&conflict).unwrap();
                    let literals = the_context
                        .explanation
                        .literals()
                        .into_iter()
                        .map(|(var, literal)| (var, literal.clone()))
                        .collect::<Vec<_>>();
                    assert!(literals
                        .iter()
                        .all(|(var, literal)| literal.disjoint(&domains[*var as usize])));

                    if assert_level == 0 {
                        break;
                    }
                    the_context.backjump(assert_level - 1);
                    assert!(the_context.extract_clause(ClauseSource::Learnt).is_ok());

                    pending = the_context.propagate();
                    if pending.is_ok() {
                        // Some variable of the clause is pruned of every value it held at the conflict.
                        assert!(literals.iter().any(|(var, literal)| {
                            let domain = the_context.domain_of(*var);
                            domain.is_subset_of(literal) && domain.disjoint(&domains[*var as usize])
                        }));
                    }
                }

                Err(e) => panic!("{e:?}"),
            }
        }

        assert!(conflicts > 1);
    }

    #[test]
    fn enumeration_agrees() {
        init_logger();
        let mut rng = MinimalPCG32::from_seed(7_u64.to_le_bytes());

        for _ in 0..24 {
            let model = Model::random(&mut rng, 4);
            let expected = model.brute_force_count();

            for learning in [true, false] {
                let mut config = Config::default();
                config.learning.value = learning;
                let mut the_context = Context::from_config(config);
                let vars = model.post_to(&mut the_context);

                let solutions = enumerate(&mut the_context, &vars).unwrap();
                assert_eq!(solutions.len(), expected);
                assert!(solutions.iter().all(|solution| model.holds(solution)));
            }
        }
    }

    #[test]
    fn enumeration_with_random_values() {
        init_logger();
        let mut config = Config::default();
        config.random_decision_bias.value = 0.5;
        let mut the_context = Context::from_config(config);
        let vars = pigeons(&mut the_context, 3, 4);

        let solutions = enumerate(&mut the_context, &vars).unwrap();
        assert_eq!(solutions.len(), 24);
    }

    #[test]
    fn enumeration_through_views() {
        init_logger();
        let mut the_context = Context::from_config(Config::default());
        let x = the_context.fresh_variable("x", 0, 4).unwrap();
        let y = the_context.fresh_variable("y", 0, 4).unwrap();
        let y_plus = the_context
            .fresh_view("y+1", y, otter_fd::structures::variable::View::Offset(1))
            .unwrap();

        // x ≤ y + 1 - 1 and x ≠ y + 1
        assert!(the_context.post(Constraint::LessOrEqual { x, y: y_plus, c: -1 }).is_ok());
        assert!(the_context.post(Constraint::NotEqual { x, y: y_plus }).is_ok());

        let solutions = enumerate(&mut the_context, &[x, y]).unwrap();
        assert_eq!(solutions.len(), 15);
    }
}
