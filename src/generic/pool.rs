//! A pool of interval sets, to bound allocation churn during conflict analysis.
//!
//! Sets taken from the pool are empty, and sets given back are cleared before reuse.

use super::interval_set::IntervalSet;

#[derive(Default)]
pub struct SetPool {
    free: Vec<IntervalSet>,
}

impl SetPool {
    /// An empty set, reused from the pool if possible.
    pub fn take(&mut self) -> IntervalSet {
        self.free.pop().unwrap_or_default()
    }

    /// Returns a set to the pool.
    pub fn give(&mut self, mut set: IntervalSet) {
        set.clear();
        self.free.push(set);
    }

    pub fn available(&self) -> usize {
        self.free.len()
    }
}
