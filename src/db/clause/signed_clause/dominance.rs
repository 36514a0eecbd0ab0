//! A partial order on clauses.
//!
//! A clause *outshines* another clause if each literal of the clause is contained in some literal of the other clause on the same variable.
//! In this case the variables of the clause are a subset of the variables of the other clause, and the clause entails the other clause.
//! So, the other clause is redundant.
//!
//! Literals of each clause are sorted by variable, and then range.

use crate::structures::literal::SignedLiteral;

use super::SignedClause;

/// True if each literal of `ci` is contained in some literal of `cj` on the same variable.
fn outshine(ci: &[SignedLiteral], cj: &[SignedLiteral]) -> bool {
    ci.iter().all(|literal| {
        let start = cj.partition_point(|other| other.var < literal.var);
        cj[start..]
            .iter()
            .take_while(|other| other.var == literal.var)
            .any(|other| other.contains(literal))
    })
}

impl SignedClause {
    /// Compares the clause with another clause.
    ///
    /// Returns:
    /// - 1 if the clause outshines the other clause, and so entails the other clause.
    /// - -1 if the other clause outshines the clause.
    /// - 0 if the clauses are incomparable.
    ///
    /// For clauses of equal size, outshining the other clause takes precedence.
    pub fn dominate(&self, other: &SignedClause) -> i32 {
        let (ci, cj) = (self.literals(), other.literals());
        match ci.len().cmp(&cj.len()) {
            std::cmp::Ordering::Less => outshine(ci, cj) as i32,
            std::cmp::Ordering::Greater => -(outshine(cj, ci) as i32),
            std::cmp::Ordering::Equal => {
                if outshine(ci, cj) {
                    1
                } else if outshine(cj, ci) {
                    -1
                } else {
                    0
                }
            }
        }
    }
}

#[cfg(test)]
mod dominance_tests {
    use crate::{
        db::clause::signed_clause::{ClauseSource, SignedClause},
        generic::interval_set::IntervalSet,
    };

    /// Every set over [0, 2] given as ranges, excluding the empty set.
    fn small_sets() -> Vec<IntervalSet> {
        (1..8_u32)
            .map(|mask| IntervalSet::from_values((0..3).filter(|v| mask & (1 << v) != 0)))
            .collect()
    }

    /// Every clause over variables 0 and 1 with a set over [0, 2] for each mentioned variable.
    fn small_clauses() -> Vec<SignedClause> {
        let sets = small_sets();
        let mut clauses = Vec::default();
        for a in &sets {
            clauses.push(SignedClause::new(0, &[0], &[a.clone()], ClauseSource::Learnt));
            clauses.push(SignedClause::new(0, &[1], &[a.clone()], ClauseSource::Learnt));
            for b in &sets {
                clauses.push(SignedClause::new(0, &[0, 1], &[a.clone(), b.clone()], ClauseSource::Learnt));
            }
        }
        clauses
    }

    fn satisfies(clause: &SignedClause, x: i32, y: i32) -> bool {
        clause.literals().iter().any(|literal| {
            let value = if literal.var == 0 { x } else { y };
            literal.low <= value && value <= literal.high
        })
    }

    #[test]
    fn dominance_is_entailment() {
        let clauses = small_clauses();
        for a in &clauses {
            for b in &clauses {
                if a.dominate(b) > 0 {
                    for x in 0..3 {
                        for y in 0..3 {
                            if satisfies(a, x, y) {
                                assert!(satisfies(b, x, y), "{a} dominates {b} at ({x}, {y})");
                            }
                        }
                    }
                }
                if a.dominate(b) < 0 {
                    assert!(b.dominate(a) > 0);
                }
            }
        }
    }

    #[test]
    fn examples() {
        let x_small = SignedClause::new(0, &[0, 1], &[IntervalSet::from_range(0, 1), IntervalSet::singleton(4)], ClauseSource::Learnt);
        let x_large = SignedClause::new(1, &[0, 1], &[IntervalSet::from_range(0, 3), IntervalSet::from_range(4, 5)], ClauseSource::Learnt);
        let wider = SignedClause::new(2, &[0, 1, 2], &[IntervalSet::from_range(0, 3), IntervalSet::from_range(4, 5), IntervalSet::singleton(0)], ClauseSource::Learnt);
        let other = SignedClause::new(3, &[0, 2], &[IntervalSet::from_range(0, 3), IntervalSet::singleton(0)], ClauseSource::Learnt);

        assert_eq!(x_small.dominate(&x_large), 1);
        assert_eq!(x_large.dominate(&x_small), -1);
        assert_eq!(x_small.dominate(&wider), 1);
        assert_eq!(wider.dominate(&x_large), -1);
        assert_eq!(x_small.dominate(&other), 0);
    }
}
