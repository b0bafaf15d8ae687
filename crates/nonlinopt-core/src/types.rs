//! Type definitions and aliases for nonlinear optimization.
//!
//! This module provides the scalar trait shared by every algorithm,
//! the dynamic matrix aliases used for parameter vectors, Jacobians and
//! Hessians, and the per-precision numerical constants.

use nalgebra::{Dyn, OMatrix, OVector, RealField, Scalar as NalgebraScalar};
use num_traits::{Float, FromPrimitive};
use std::fmt::{Debug, Display};

/// Trait for scalar types used in optimization (f32 or f64).
///
/// This trait combines all the numeric traits required by the
/// finite-difference routines, the linear solvers and the minimizers.
pub trait Scalar:
    NalgebraScalar
    + RealField
    + Float
    + FromPrimitive
    + Display
    + Debug
    + Default
    + Copy
    + Send
    + Sync
    + 'static
{
    /// Machine epsilon for this scalar type.
    const EPSILON: Self;

    /// Default step `h` for finite-difference derivatives.
    const DEFAULT_FD_STEP: Self;

    /// Relative tolerance when checking that a matrix is symmetric.
    const SYMMETRY_TOLERANCE: Self;

    /// Multiple of machine epsilon, per matrix dimension, below which a
    /// pivot or singular value relative to the matrix scale counts as zero.
    const PIVOT_TOLERANCE: Self;

    /// Convert from f64 (for constants).
    ///
    /// # Panics
    ///
    /// Panics if the conversion fails, which cannot happen for `f32`/`f64`.
    fn from_f64(v: f64) -> Self {
        <Self as FromPrimitive>::from_f64(v).expect("Failed to convert from f64")
    }
}

impl Scalar for f32 {
    const EPSILON: Self = f32::EPSILON;
    const DEFAULT_FD_STEP: Self = 1e-3;
    const SYMMETRY_TOLERANCE: Self = 1e-5;
    const PIVOT_TOLERANCE: Self = 8.0 * f32::EPSILON;
}

impl Scalar for f64 {
    const EPSILON: Self = f64::EPSILON;
    const DEFAULT_FD_STEP: Self = 1e-6;
    const SYMMETRY_TOLERANCE: Self = 1e-12;
    const PIVOT_TOLERANCE: Self = 8.0 * f64::EPSILON;
}

/// Type alias for a dynamically-sized matrix.
pub type DMatrix<T> = OMatrix<T, Dyn, Dyn>;

/// Type alias for a dynamically-sized vector.
pub type DVector<T> = OVector<T, Dyn>;
