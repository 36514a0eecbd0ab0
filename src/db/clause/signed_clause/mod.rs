/*!
Signed clauses, disjunctions of signed literals.

# Overview

A signed clause is a disjunction of claims *x ∈ S*, stored as one [literal](SignedLiteral) for each range of each S, sorted by variable and then range.

Propagation follows the two watched literal scheme of boolean clauses:
- The positions of two literals are *watched*, as the first two elements of a permutation `pos` of the literals.
- So long as some watched literal is not false the clause says nothing, and so propagation is required only when a watched literal becomes false.
- When a watched literal is false, the remaining literals are scanned for a replacement. If no replacement is found the clause is *unit*, and the remaining watched literal is enforced.

Unlike boolean clauses, a signed clause may have many literals on the same variable.
A clause may then be unit *on a variable*, with each literal on some other variable false, without being unit on any literal.
This is detected by a (coarse) pass over the whole clause, [detect_hidden_uua](SignedClause::detect_hidden_uua), and enforced by restricting the variable to the union of its literals.

# States

A clause is one of:
- Active, and so propagates.
- Passive, as the clause is true on the current domains.
- Locked, as the clause has propagated and so may be the reason for a reduction.

Passive and locked clauses are made active again on a backjump.

# Construction

The permutation `pos` is the identity, with the exception of a clause whose first variable has n > 1 ranges, in which case `pos[1]` and `pos[n]` are swapped so the initial watches are on distinct variables.

```rust
# use otter_fd::db::clause::signed_clause::{SignedClause, ClauseSource};
# use otter_fd::generic::interval_set::IntervalSet;
let mut x_set = IntervalSet::from_range(0, 2);
x_set.add_range(5, 7);
let y_set = IntervalSet::singleton(4);

let clause = SignedClause::new(0, &[0, 1], &[x_set, y_set], ClauseSource::Original);
assert_eq!(clause.size(), 3);
assert_eq!(clause.watched(), (0, 2));
assert_eq!(clause.to_string(), "(v0 ∈ [0,2]) ∨ (v0 ∈ [5,7]) ∨ (v1 ∈ [4,4])");
```
*/

mod dominance;

use crate::{
    config::Activity,
    db::{clause::watches::Watches, implication::ImplicationGraph, trail::{Trail, Undo}, variable::VariableDB, ClauseKey},
    generic::interval_set::IntervalSet,
    structures::{cause::Cause, entailment::Entailment, literal::{literals_of, SignedLiteral}, variable::Var},
    types::err::{self},
};

/// Flag noting `pos[0]` is false.
const F1: u8 = 0b01;

/// Flag noting `pos[1]` is false.
const F2: u8 = 0b10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClauseState {
    Active,
    Passive,
    Locked,
}

/// Whether a clause was given to the context, or learnt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClauseSource {
    Original,
    Learnt,
}

/// The status of the claim `var ∈ [low, high]` on a domain.
///
/// The next value probe finds holes of enumerated domains, and is exact for bounded domains as bounded domains have no holes.
pub fn check(domain: &IntervalSet, low: i32, high: i32) -> Entailment {
    let (Some(lb), Some(ub)) = (domain.min(), domain.max()) else {
        return Entailment::False;
    };

    if low <= lb && ub <= high {
        Entailment::True
    } else if low > ub
        || lb > high
        || domain
            .next_value(low.saturating_sub(1))
            .map_or(true, |next| next > high)
    {
        Entailment::False
    } else {
        Entailment::Undefined
    }
}

pub struct SignedClause {
    /// An identifier, unique to the store.
    pub id: usize,

    literals: Vec<SignedLiteral>,

    /// A permutation of the literals, with the watched literals first.
    pos: Vec<usize>,

    /// Which of the watched literals are known to be false.
    flags: u8,

    pub state: ClauseState,

    pub(super) scheduled: bool,

    /// Whether the next propagation of the clause is coarse.
    pub(super) coarse: bool,

    pub activity: Activity,

    /// A count of uses of the clause during analysis.
    pub raw_activity: u64,

    pub source: ClauseSource,
}

impl SignedClause {
    /// A clause from variables and corresponding sets.
    ///
    /// Literals are sorted by variable, and then range.
    pub fn new(id: usize, vars: &[Var], ranges: &[IntervalSet], source: ClauseSource) -> Self {
        let mut pairs: Vec<(Var, &IntervalSet)> = vars.iter().copied().zip(ranges.iter()).collect();
        pairs.sort_by_key(|(var, _)| *var);

        let mut literals = Vec::default();
        for (var, set) in &pairs {
            literals.extend(literals_of(*var, set));
        }
        literals.sort_by_key(|literal| (literal.var, literal.low));
        literals.dedup();

        let mut pos: Vec<usize> = (0..literals.len()).collect();
        if let Some(first) = literals.first() {
            let n = literals.iter().take_while(|literal| literal.var == first.var).count();
            if n > 1 && n < pos.len() {
                pos.swap(1, n);
            }
        }

        SignedClause {
            id,
            literals,
            pos,
            flags: 0,
            state: ClauseState::Active,
            scheduled: false,
            coarse: false,
            activity: 0.0,
            raw_activity: 0,
            source,
        }
    }

    /// A count of literals.
    pub fn size(&self) -> usize {
        self.literals.len()
    }

    pub fn literals(&self) -> &[SignedLiteral] {
        &self.literals
    }

    pub fn literal(&self, index: usize) -> &SignedLiteral {
        &self.literals[index]
    }

    /// The positions of the watched literals.
    pub fn watched(&self) -> (usize, usize) {
        (self.pos[0], self.pos[1])
    }

    pub fn is_watched(&self, index: usize) -> bool {
        self.pos[0] == index || self.pos[1] == index
    }

    pub fn is_active(&self) -> bool {
        self.state == ClauseState::Active
    }

    pub fn is_locked(&self) -> bool {
        self.state == ClauseState::Locked
    }

    /// The status of the literal at the given index.
    pub fn check(&self, index: usize, variables: &VariableDB) -> Entailment {
        let literal = &self.literals[index];
        check(&variables.domain(literal.var), literal.low, literal.high)
    }

    /// The status of the clause.
    pub fn is_entailed(&self, variables: &VariableDB) -> Entailment {
        let mut undefined = false;
        for index in 0..self.literals.len() {
            match self.check(index, variables) {
                Entailment::True => return Entailment::True,
                Entailment::Undefined => undefined = true,
                Entailment::False => {}
            }
        }
        match undefined {
            true => Entailment::Undefined,
            false => Entailment::False,
        }
    }

    fn set_passive(&mut self, key: ClauseKey, trail: &mut Trail) {
        self.state = ClauseState::Passive;
        trail.save(Undo::ClauseActive(key));
    }

    fn set_passive_and_lock(&mut self, key: ClauseKey, trail: &mut Trail) {
        self.state = ClauseState::Locked;
        trail.save(Undo::ClauseActive(key));
    }

    /// Propagates the clause.
    ///
    /// Both watched literals are checked: a true watch makes the clause passive, and a false watch requires [propagate_clause](SignedClause::propagate_clause).
    /// Coarse propagation, or propagation which leaves both watches on a single variable, also looks for a [hidden unit](SignedClause::detect_hidden_uua).
    #[allow(clippy::too_many_arguments)]
    pub fn propagate(
        &mut self,
        key: ClauseKey,
        coarse: bool,
        watches: &mut Watches,
        variables: &mut VariableDB,
        trail: &mut Trail,
        graph: &mut ImplicationGraph,
        uua: &mut IntervalSet,
    ) -> Result<(), err::PropagationError> {
        self.flags = 0;

        match self.check(self.pos[0], variables) {
            Entailment::True => {
                self.set_passive(key, trail);
                return Ok(());
            }
            Entailment::False => self.flags |= F1,
            Entailment::Undefined => {}
        }

        match self.check(self.pos[1], variables) {
            Entailment::True => {
                self.flags = 0;
                self.set_passive(key, trail);
                return Ok(());
            }
            Entailment::False => self.flags |= F2,
            Entailment::Undefined => {}
        }

        if self.flags != 0 {
            self.propagate_clause(key, watches, variables, trail, graph)?;
        }

        // A clause unit on a variable watches two literals of the variable.
        if self.is_active() && (coarse || self.watches_one_variable()) {
            self.detect_hidden_uua(key, variables, trail, graph, uua)?;
        }

        Ok(())
    }

    /// Whether both watched literals are on the same variable.
    pub fn watches_one_variable(&self) -> bool {
        self.literals[self.pos[0]].var == self.literals[self.pos[1]].var
    }

    /// Replaces false watches, or enforces the clause if no replacement exists.
    ///
    /// Requires some watched literal to be false, and no watched literal to be true.
    pub fn propagate_clause(
        &mut self,
        key: ClauseKey,
        watches: &mut Watches,
        variables: &mut VariableDB,
        trail: &mut Trail,
        graph: &mut ImplicationGraph,
    ) -> Result<(), err::PropagationError> {
        let mut k = 2;
        let mut to = self.pos.len();

        while self.flags != 0 {
            let p = match self.flags & F2 != 0 {
                true => {
                    self.flags ^= F2;
                    1
                }
                false => {
                    self.flags ^= F1;
                    0
                }
            };

            if p == 0 {
                self.pos.swap(0, 1);
            }
            let l0 = self.pos[0];
            let l1 = self.pos[1];

            let mut found = false;
            while k < to {
                let l = self.pos[k];
                let status = self.check(l, variables);
                if status != Entailment::False {
                    self.pos[1] = l;
                    to -= 1;
                    self.pos[k] = self.pos[to];
                    self.pos[to] = l1;
                    watches.attach(key, &self.literals[l], l);

                    if status == Entailment::True {
                        self.flags = 0;
                        self.set_passive(key, trail);
                        return Ok(());
                    }
                    found = true;
                    break;
                }
                k += 1;
            }

            if !found {
                self.flags = 0;
                let literal = self.literals[l0];
                let set = IntervalSet::from_range(literal.low, literal.high);
                if variables.restrict(literal.var, &set, Cause::Clause(key), trail, graph)? {
                    self.set_passive_and_lock(key, trail);
                }
                return Ok(());
            }
        }

        Ok(())
    }

    /// The claim of the clause on each source variable, as the union of the preimages of its literals.
    ///
    /// Sources are given in order of first mention.
    pub fn explain(&self, variables: &VariableDB) -> Vec<(Var, IntervalSet)> {
        let mut sets: Vec<(Var, IntervalSet)> = Vec::default();
        for literal in &self.literals {
            let (source, preimage) = variables.to_source(literal.var, &literal.as_set());
            match sets.iter_mut().find(|(var, _)| *var == source) {
                Some((_, set)) => set.union_with(&preimage),
                None => sets.push((source, preimage)),
            }
        }
        sets
    }

    /// Enforces the clause if every literal is false, with the exception of literals on a single variable.
    pub fn detect_hidden_uua(
        &mut self,
        key: ClauseKey,
        variables: &mut VariableDB,
        trail: &mut Trail,
        graph: &mut ImplicationGraph,
        uua: &mut IntervalSet,
    ) -> Result<(), err::PropagationError> {
        uua.clear();
        let mut one: Option<Var> = None;

        for index in 0..self.literals.len() {
            let literal = self.literals[index];
            match self.check(index, variables) {
                Entailment::Undefined => {
                    if one.is_none() || one == Some(literal.var) {
                        one = Some(literal.var);
                        uua.add_range(literal.low, literal.high);
                    } else {
                        one = None;
                        break;
                    }
                }
                Entailment::True => {
                    one = None;
                    break;
                }
                Entailment::False => {}
            }
        }

        if let Some(var) = one {
            match variables.restrict(var, uua, Cause::Clause(key), trail, graph)? {
                true => self.set_passive_and_lock(key, trail),
                false => self.set_passive(key, trail),
            }
        }

        Ok(())
    }
}

impl std::fmt::Display for SignedClause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, literal) in self.literals.iter().enumerate() {
            if index > 0 {
                write!(f, " ∨ ")?;
            }
            write!(f, "{literal}")?;
        }
        Ok(())
    }
}
