use otter_fd::{
    config::Config,
    context::{Context, ContextState},
    generic::interval_set::{IntervalSet, MAX, MIN},
    reports::Report,
    structures::{constraint::Constraint, variable::View},
    types::err::{self},
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

mod basic {
    use super::*;

    #[test]
    fn one_variable() {
        init_logger();
        let mut the_context = Context::from_config(Config::default());
        let x = the_context.fresh_variable("x", 3, 7).unwrap();
        assert_eq!(the_context.solve(), Ok(Report::Satisfiable));
        assert_eq!(the_context.value_of(x), Some(3));
        assert!(the_context.is_satisfied());
    }

    #[test]
    fn bounded_variables() {
        init_logger();
        let mut the_context = Context::from_config(Config::default());
        let x = the_context.fresh_bounded_variable("x", 0, 9).unwrap();
        let y = the_context.fresh_bounded_variable("y", 0, 9).unwrap();

        // Holes are not kept, and so x ≠ 0 only raises the lower bound of x.
        assert!(the_context.post(Constraint::NotEqual { x, y }).is_ok());
        assert!(the_context.post(Constraint::Member { x: y, set: IntervalSet::singleton(0) }).is_ok());
        assert!(the_context.post(Constraint::LessOrEqual { x, y, c: 4 }).is_ok());

        assert!(the_context.propagate().is_ok());
        assert_eq!(the_context.domain_of(x), IntervalSet::from_range(1, 4));
    }

    #[test]
    fn conflict() {
        init_logger();
        let mut the_context = Context::from_config(Config::default());
        let x = the_context.fresh_boolean("x").unwrap();
        let y = the_context.fresh_boolean("y").unwrap();
        let z = the_context.fresh_boolean("z").unwrap();
        assert!(the_context.post(Constraint::NotEqual { x, y }).is_ok());
        assert!(the_context.post(Constraint::NotEqual { x: y, y: z }).is_ok());
        assert!(the_context.post(Constraint::NotEqual { x, y: z }).is_ok());
        assert_eq!(the_context.solve(), Ok(Report::Unsatisfiable));
        assert_eq!(the_context.report(), Report::Unsatisfiable);

        // Unsatisfiability is sticky.
        assert_eq!(the_context.solve(), Ok(Report::Unsatisfiable));
    }

    #[test]
    fn clause_forces_value() {
        init_logger();
        let mut the_context = Context::from_config(Config::default());
        let x = the_context.fresh_variable("x", 0, 9).unwrap();
        let y = the_context.fresh_variable("y", 0, 9).unwrap();
        assert!(the_context.post(Constraint::Member { x, set: IntervalSet::from_range(0, 4) }).is_ok());
        assert!(the_context
            .add_clause(&[x, y], &[IntervalSet::from_range(5, 9), IntervalSet::singleton(6)])
            .is_ok());

        assert_eq!(the_context.solve(), Ok(Report::Satisfiable));
        assert_eq!(the_context.value_of(y), Some(6));
        assert!(the_context.is_satisfied());
    }

    #[test]
    fn views() {
        init_logger();
        let mut the_context = Context::from_config(Config::default());
        let x = the_context.fresh_variable("x", 0, 5).unwrap();
        let minus_x = the_context.fresh_view("-x", x, View::Minus).unwrap();
        let x_is_two = the_context.fresh_view("x=2", x, View::Equal(2)).unwrap();

        assert!(the_context.post(Constraint::Member { x: minus_x, set: IntervalSet::from_range(-3, -2) }).is_ok());
        assert!(the_context.post(Constraint::Member { x: x_is_two, set: IntervalSet::singleton(0) }).is_ok());

        assert_eq!(the_context.solve(), Ok(Report::Satisfiable));
        assert_eq!(the_context.value_of(x), Some(3));
        assert_eq!(the_context.value_of(minus_x), Some(-3));
    }

    #[test]
    fn reification() {
        init_logger();
        let mut the_context = Context::from_config(Config::default());
        let x = the_context.fresh_variable("x", 0, 3).unwrap();
        let y = the_context.fresh_variable("y", 0, 3).unwrap();
        let b = the_context.fresh_boolean("b").unwrap();

        // b → x > y, and b holds.
        assert!(the_context.post_reified(Constraint::LessOrEqual { x: y, y: x, c: -1 }, b).is_ok());
        assert!(the_context.post(Constraint::Member { x: b, set: IntervalSet::singleton(1) }).is_ok());

        assert_eq!(the_context.solve(), Ok(Report::Satisfiable));
        assert_eq!(the_context.value_of(x), Some(1));
        assert_eq!(the_context.value_of(y), Some(0));
    }

    #[test]
    fn reification_requires_boolean() {
        let mut the_context = Context::from_config(Config::default());
        let x = the_context.fresh_variable("x", 0, 3).unwrap();
        let y = the_context.fresh_variable("y", 0, 3).unwrap();
        assert_eq!(
            the_context.post_reified(Constraint::NotEqual { x, y }, y),
            Err(err::ErrorKind::VariableDB(err::VariableDBError::NotBoolean(y)))
        );
    }
}

mod input {
    use super::*;

    #[test]
    fn unknown_variable() {
        let mut the_context = Context::from_config(Config::default());
        let x = the_context.fresh_variable("x", 0, 3).unwrap();
        assert_eq!(
            the_context.post(Constraint::NotEqual { x, y: 7 }),
            Err(err::ErrorKind::VariableDB(err::VariableDBError::UnknownVariable(7)))
        );
    }

    #[test]
    fn mismatched_clause() {
        let mut the_context = Context::from_config(Config::default());
        let x = the_context.fresh_variable("x", 0, 3).unwrap();
        assert_eq!(
            the_context.add_clause(&[x], &[]),
            Err(err::ErrorKind::Build(err::BuildError::Mismatch))
        );
    }

    #[test]
    fn empty_domain() {
        let mut the_context = Context::from_config(Config::default());
        assert_eq!(
            the_context.fresh_variable("x", 3, 2),
            Err(err::ErrorKind::VariableDB(err::VariableDBError::EmptyDomain))
        );
    }

    #[test]
    fn out_of_range_domain() {
        let mut the_context = Context::from_config(Config::default());
        assert_eq!(
            the_context.fresh_variable("x", i32::MIN, 0),
            Err(err::ErrorKind::VariableDB(err::VariableDBError::OutOfRange))
        );
        assert_eq!(
            the_context.fresh_bounded_variable("y", 0, i32::MAX),
            Err(err::ErrorKind::VariableDB(err::VariableDBError::OutOfRange))
        );

        let z = the_context.fresh_variable("z", MIN, MAX).unwrap();
        assert_eq!(the_context.domain_of(z), IntervalSet::from_range(MIN, MAX));
        assert_eq!(z, 0);
    }

    #[test]
    fn input_after_solve() {
        init_logger();
        let mut the_context = Context::from_config(Config::default());
        let x = the_context.fresh_variable("x", 0, 3).unwrap();
        assert_eq!(the_context.solve(), Ok(Report::Satisfiable));
        assert_eq!(the_context.value_of(x), Some(0));

        // Fresh variables and constraints are added at the root, after the solve.
        let y = the_context.fresh_variable("y", 0, 3).unwrap();
        assert_eq!(the_context.state, ContextState::Input);
        assert!(the_context.post(Constraint::LessOrEqual { x: y, y: x, c: -2 }).is_ok());

        assert_eq!(the_context.solve(), Ok(Report::Satisfiable));
        assert_eq!(the_context.value_of(x), Some(2));
        assert_eq!(the_context.value_of(y), Some(0));
    }

    #[test]
    fn configuration_state() {
        let mut the_context = Context::from_config(Config::default());
        assert!(the_context.config.learning.set(false, the_context.state));
        let _ = the_context.fresh_variable("x", 0, 3).unwrap();
        assert!(!the_context.config.learning.set(true, the_context.state));
        assert!(the_context.config.check_learnts.set(true, the_context.state));
    }

    #[test]
    fn refutation_requires_solution() {
        let mut the_context = Context::from_config(Config::default());
        let _ = the_context.fresh_variable("x", 0, 3).unwrap();
        assert_eq!(the_context.refute_solution(), Err(err::ErrorKind::InvalidState));
    }

    #[test]
    fn time_limit() {
        init_logger();
        let mut the_context = Context::from_config(Config::default());
        the_context.config.time_limit.value = std::time::Duration::from_nanos(1);

        let vars = (0..9)
            .map(|index| the_context.fresh_variable(&format!("p{index}"), 0, 7).unwrap())
            .collect::<Vec<_>>();
        for (index, x) in vars.iter().enumerate() {
            for y in &vars[index + 1..] {
                assert!(the_context.post(Constraint::NotEqual { x: *x, y: *y }).is_ok());
            }
        }

        assert_eq!(the_context.solve(), Ok(Report::Unknown));
        assert_eq!(the_context.state, ContextState::Input);
    }
}
