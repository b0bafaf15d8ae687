//! Dense linear solvers used to compute descent steps.

pub mod solve;

pub use solve::*;
