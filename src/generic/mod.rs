//! Generic structures, independent of the solver.

pub mod interval_set;
pub mod interval_tree;
pub mod pool;
pub mod random;
pub mod value_sorted_map;
