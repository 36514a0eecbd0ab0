//! Summaries of the clause store.

use crate::{
    db::{
        clause::{signed_clause::SignedClause, ClauseStore},
        variable::VariableDB,
        ClauseKey,
    },
    structures::entailment::Entailment,
};

impl ClauseStore {
    /// A count of original clauses.
    pub fn original_count(&self) -> usize {
        self.originals.len()
    }

    /// A count of learnt clauses.
    pub fn learnt_count(&self) -> usize {
        self.learnts.len()
    }

    /// A count of all clauses.
    pub fn count(&self) -> usize {
        self.clauses.len()
    }

    pub fn originals(&self) -> impl Iterator<Item = (ClauseKey, &SignedClause)> {
        self.originals.iter().filter_map(|key| Some((*key, self.clauses.get(*key)?)))
    }

    pub fn learnts(&self) -> impl Iterator<Item = (ClauseKey, &SignedClause)> {
        self.learnts.iter().filter_map(|key| Some((*key, self.clauses.get(*key)?)))
    }

    /// The status of the conjunction of every clause in the store.
    pub fn is_entailed(&self, variables: &VariableDB) -> Entailment {
        self.clauses
            .values()
            .fold(Entailment::True, |status, clause| status.and(clause.is_entailed(variables)))
    }

    /// The n learnt clauses used most often during analysis, most used first.
    pub fn top_learnts(&self, n: usize) -> Vec<&SignedClause> {
        let mut learnts = self.learnts().map(|(_, clause)| clause).collect::<Vec<_>>();
        learnts.sort_by(|a, b| b.raw_activity.cmp(&a.raw_activity));
        learnts.truncate(n);
        learnts
    }

    /// A rendering of the n most used learnt clauses, one to a line, with the count of uses.
    pub fn top_learnts_string(&self, n: usize) -> String {
        self.top_learnts(n)
            .iter()
            .map(|clause| format!("{} {clause}", clause.raw_activity))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
