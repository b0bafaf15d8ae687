//! Numerical differentiation.

pub mod derivatives;

pub use derivatives::*;
