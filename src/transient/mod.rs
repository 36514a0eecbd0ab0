//! Structures used transiently during a solve, reset before each use.

pub mod explanation;
