/*!
Forgetting learnt clauses.

After each conflict the store is asked to [forget](ClauseStore::forget):
- The activity increment grows, so recent use counts for more than past use.
- At the root, learnt clauses which are true are removed, as they may never propagate again.
- Elsewhere, the most recent learnt clause is compared against a small window of the learnt clauses preceding it, and those it [dominates](crate::db::clause::signed_clause::SignedClause::dominate) are removed.
- If the count of learnt clauses has reached the configured maximum the least active are removed, keeping the configured proportion.

Locked clauses, and the most recent learnt clause, are never removed.
*/

use crate::{
    db::{clause::ClauseStore, variable::VariableDB, ClauseKey, LevelIndex},
    misc::log::targets::{self},
    structures::{entailment::Entailment, variable::Var},
    types::err::{self},
};

/// Activities beyond this limit are rescaled.
const ACTIVITY_LIMIT: f64 = 1e20;

impl ClauseStore {
    /// Forgets clauses after a conflict and backjump to the given level.
    ///
    /// If requested, the most recent learnt clause is [checked](ClauseStore::check) first.
    pub fn forget(
        &mut self,
        level: LevelIndex,
        check_last: bool,
        check_asserting_level: bool,
        variables: &VariableDB,
    ) -> Result<(), err::AnalysisError> {
        self.decay_activity();

        if level == 0 {
            self.simplify_db(variables);
        } else if let Some(last) = self.last {
            if check_last {
                self.check(last, check_asserting_level, variables)?;
            }
            self.detect_dominance(last);
        }

        self.reduce_db();
        self.last = None;
        Ok(())
    }

    fn decay_activity(&mut self) {
        self.clause_inc *= self.config.activity_inflation.value;

        if self.clause_inc > ACTIVITY_LIMIT {
            let factor = ACTIVITY_LIMIT.recip();
            self.clause_inc *= factor;
            for key in &self.learnts {
                if let Some(clause) = self.clauses.get_mut(*key) {
                    clause.activity *= factor;
                }
            }
            log::debug!(target: targets::REDUCTION, "Activity rescaled");
        }
    }

    /// Removes learnt clauses true at the root.
    pub fn simplify_db(&mut self, variables: &VariableDB) {
        let clauses = &mut self.clauses;
        let before = self.learnts.len();

        self.learnts.retain(|key| {
            let Some(clause) = clauses.get(*key) else {
                return false;
            };
            if clause.is_locked() || clause.is_entailed(variables) != Entailment::True {
                return true;
            }
            clauses.remove(*key);
            false
        });

        if self.learnts.len() < before {
            log::debug!(target: targets::REDUCTION, "Simplified {} learnt clauses", before - self.learnts.len());
            let clauses = &self.clauses;
            self.watches.collect_garbage(|key| clauses.contains_key(key));
        }
    }

    /// Removes unlocked learnt clauses within the dominance window which are dominated by the newest clause.
    pub fn detect_dominance(&mut self, newest: ClauseKey) {
        let window = self.config.dominance_window.value;
        let size = self.learnts.len();
        if size < 2 || window == 0 || self.learnts.last() != Some(&newest) {
            return;
        }

        let Some(latest) = self.clauses.get(newest) else {
            return;
        };

        let bottom = (size - 1).saturating_sub(window);
        let mut dominated = Vec::default();
        for index in (bottom..size - 1).rev() {
            let key = self.learnts[index];
            let Some(clause) = self.clauses.get(key) else {
                continue;
            };
            if !clause.is_locked() && latest.dominate(clause) > 0 {
                log::trace!(target: targets::REDUCTION, "{latest} dominates {clause}");
                dominated.push(key);
            }
        }

        if !dominated.is_empty() {
            for key in &dominated {
                self.clauses.remove(*key);
            }
            self.learnts.retain(|key| !dominated.contains(key));

            let clauses = &self.clauses;
            self.watches.collect_garbage(|key| clauses.contains_key(key));
        }
    }

    /// Removes the least active learnt clauses, if the count of learnt clauses has reached the limit.
    pub fn reduce_db(&mut self) {
        let size = self.learnts.len();
        if size < self.config.max_learnts.value {
            return;
        }

        let clauses = &self.clauses;
        self.learnts.sort_by(|a, b| {
            let a = clauses.get(*a).map_or(0.0, |clause| clause.activity);
            let b = clauses.get(*b).map_or(0.0, |clause| clause.activity);
            b.total_cmp(&a)
        });

        let keep = (self.config.reduction_ratio.value * size as f64).round() as usize;
        let mut kept = Vec::with_capacity(keep);
        for (index, key) in std::mem::take(&mut self.learnts).into_iter().enumerate() {
            let Some(clause) = self.clauses.get(key) else {
                continue;
            };
            if index < keep || clause.is_locked() || Some(key) == self.last {
                kept.push(key);
            } else {
                self.clauses.remove(key);
            }
        }

        log::info!(target: targets::REDUCTION, "Reduced learnt clauses from {size} to {}", kept.len());
        self.learnts = kept;

        let clauses = &self.clauses;
        self.watches.collect_garbage(|key| clauses.contains_key(key));
    }

    /// Checks a learnt clause on the current domains.
    ///
    /// The clause may not contain a true literal, and either all but one literal are false or the undetermined literals concern a single variable.
    /// If check_asserting_level is set, some literal may not be false.
    pub fn check(
        &self,
        key: ClauseKey,
        check_asserting_level: bool,
        variables: &VariableDB,
    ) -> Result<(), err::AnalysisError> {
        let Some(clause) = self.clauses.get(key) else {
            return Ok(());
        };

        let mut false_count = 0;
        let mut undefined_var: Option<Var> = None;
        let mut unique = true;

        for index in 0..clause.size() {
            match clause.check(index, variables) {
                Entailment::True => {
                    log::error!(target: targets::ANALYSIS, "Satisfied: {clause}");
                    return Err(err::AnalysisError::SatisfiedClause);
                }
                Entailment::False => false_count += 1,
                Entailment::Undefined => {
                    let var = clause.literal(index).var;
                    match undefined_var {
                        None => undefined_var = Some(var),
                        Some(other) if other != var => unique = false,
                        Some(_) => {}
                    }
                }
            }
        }

        if false_count + 1 < clause.size() && !unique {
            log::error!(target: targets::ANALYSIS, "Weak explanation: {clause}");
            return Err(err::AnalysisError::WeakExplanation);
        }

        if check_asserting_level && false_count == clause.size() {
            log::error!(target: targets::ANALYSIS, "False at the asserting level: {clause}");
            return Err(err::AnalysisError::AssertingLevel);
        }

        Ok(())
    }
}
