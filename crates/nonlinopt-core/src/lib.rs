//! Core traits and types for finite-difference nonlinear optimization.
//!
//! This crate provides the building blocks the minimizers are made of:
//! objective-function interfaces, finite-difference derivatives and the
//! dense linear solvers used to compute descent steps.
//!
//! # Key Concepts
//!
//! - **Objective functions**: scalar-valued or residual (vector-valued) maps
//!   of a real parameter vector
//! - **Finite differences**: forward and central Jacobians and a mixed
//!   finite-difference Hessian, with a fixed positive step
//! - **Linear solves**: a family of named decompositions solving `A x = b`,
//!   split into a strict Cholesky family and a permissive family
//!
//! # Modules
//!
//! - [`error`]: Error types for solves and optimization
//! - [`function`]: Scalar and residual function traits
//! - [`linalg`]: Dense linear solvers
//! - [`numerical`]: Finite-difference derivatives
//! - [`types`]: Scalar trait with per-precision constants, matrix aliases

pub mod error;
pub mod function;
pub mod linalg;
pub mod numerical;
pub mod types;

// Re-export commonly used items at the crate root
pub use error::{OptimizerError, Result, SolveError, SolveResult};

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use nonlinopt_core::prelude::*;
///
/// let f = |x: &DVector<f64>| x[0] * x[0];
/// let g = FiniteDifference::default().gradient(&f, &DVector::from_vec(vec![1.0]));
/// assert!((g[0] - 2.0).abs() < 1e-4);
/// ```
pub mod prelude {
    pub use crate::error::{OptimizerError, Result, SolveError, SolveResult};
    pub use crate::function::{CountingFunction, ResidualFunction, ScalarFunction, WeightedQuadratic};
    pub use crate::linalg::{solve_full_piv_lu, solve_ldlt, solve_llt, solve_svd, SolveMethod};
    pub use crate::numerical::{
        hessian_approx, jacobian_approx, jacobian_approx_central, jacobian_approx_scalar,
        FiniteDifference,
    };
    pub use crate::types::{DMatrix, DVector, Scalar};
}
