//! Objective function interfaces.
//!
//! A minimizer is bound to exactly one of two function shapes:
//!
//! - [`ScalarFunction`]: maps a parameter vector to one real number
//! - [`ResidualFunction`]: maps a parameter vector to a vector of residuals,
//!   minimized in the sum-of-squares sense
//!
//! Both traits are implemented for plain closures, so most callers never
//! implement them by hand. Functions are only ever invoked through `&self`
//! and must be deterministic for a fixed input, since the differentiation
//! routines call them many times per iteration with neighboring inputs.

use crate::types::{DVector, Scalar};
use std::cell::Cell;

/// A scalar-valued objective `f: R^n -> R`.
pub trait ScalarFunction<T: Scalar> {
    /// Evaluates the function at `x`.
    fn value(&self, x: &DVector<T>) -> T;

    /// Number of parameters the function expects, if known.
    ///
    /// Minimizers use it to reject a parameter vector of the wrong length
    /// before the first evaluation.
    fn input_dimension(&self) -> Option<usize> {
        None
    }
}

/// A vector-valued residual function `r: R^n -> R^m`.
pub trait ResidualFunction<T: Scalar> {
    /// Evaluates the residual vector at `x`.
    fn residuals(&self, x: &DVector<T>) -> DVector<T>;

    /// Number of parameters the function expects, if known.
    fn input_dimension(&self) -> Option<usize> {
        None
    }
}

impl<T, F> ScalarFunction<T> for F
where
    T: Scalar,
    F: Fn(&DVector<T>) -> T,
{
    fn value(&self, x: &DVector<T>) -> T {
        self(x)
    }
}

impl<T, F> ResidualFunction<T> for F
where
    T: Scalar,
    F: Fn(&DVector<T>) -> DVector<T>,
{
    fn residuals(&self, x: &DVector<T>) -> DVector<T> {
        self(x)
    }
}

/// Wrapper that counts function evaluations.
///
/// Useful for checking the evaluation cost of the differentiation
/// routines and for reporting how expensive a minimization was.
#[derive(Debug)]
pub struct CountingFunction<F> {
    /// The underlying function
    pub inner: F,
    evaluations: Cell<usize>,
}

impl<F> CountingFunction<F> {
    /// Creates a new counting wrapper around a function.
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            evaluations: Cell::new(0),
        }
    }

    /// Returns the number of evaluations so far.
    pub fn evaluations(&self) -> usize {
        self.evaluations.get()
    }

    /// Resets the counter to zero.
    pub fn reset(&self) {
        self.evaluations.set(0);
    }

    fn record(&self) {
        self.evaluations.set(self.evaluations.get() + 1);
    }
}

impl<T, F> ScalarFunction<T> for CountingFunction<F>
where
    T: Scalar,
    F: ScalarFunction<T>,
{
    fn value(&self, x: &DVector<T>) -> T {
        self.record();
        self.inner.value(x)
    }

    fn input_dimension(&self) -> Option<usize> {
        self.inner.input_dimension()
    }
}

impl<T, F> ResidualFunction<T> for CountingFunction<F>
where
    T: Scalar,
    F: ResidualFunction<T>,
{
    fn residuals(&self, x: &DVector<T>) -> DVector<T> {
        self.record();
        self.inner.residuals(x)
    }

    fn input_dimension(&self) -> Option<usize> {
        self.inner.input_dimension()
    }
}

/// A convex quadratic `f(x) = (x - c)^T diag(w) (x - c)` with a known minimum.
///
/// Declares its input dimension, which makes it handy for exercising the
/// dimension checks of the minimizers.
#[derive(Debug, Clone)]
pub struct WeightedQuadratic<T: Scalar> {
    /// Location of the minimum
    pub center: DVector<T>,
    /// Positive per-coordinate weights
    pub weights: DVector<T>,
}

impl<T: Scalar> WeightedQuadratic<T> {
    /// Creates a new weighted quadratic.
    pub fn new(center: DVector<T>, weights: DVector<T>) -> Self {
        Self { center, weights }
    }
}

impl<T: Scalar> ScalarFunction<T> for WeightedQuadratic<T> {
    fn value(&self, x: &DVector<T>) -> T {
        x.iter()
            .zip(self.center.iter())
            .zip(self.weights.iter())
            .fold(T::zero(), |acc, ((&xi, &ci), &wi)| {
                acc + wi * (xi - ci) * (xi - ci)
            })
    }

    fn input_dimension(&self) -> Option<usize> {
        Some(self.center.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_closure_as_scalar_function() {
        let f = |x: &DVector<f64>| x.norm_squared();
        let x = DVector::from_vec(vec![1.0, 2.0]);
        assert_relative_eq!(f.value(&x), 5.0);
        assert_eq!(ScalarFunction::<f64>::input_dimension(&f), None);
    }

    #[test]
    fn test_closure_as_residual_function() {
        let r = |x: &DVector<f64>| x.map(|v| v - 1.0);
        let x = DVector::from_vec(vec![1.0, 3.0]);
        assert_eq!(r.residuals(&x), DVector::from_vec(vec![0.0, 2.0]));
    }

    #[test]
    fn test_counting_function() {
        let f = CountingFunction::new(|x: &DVector<f64>| x.sum());
        let x = DVector::from_vec(vec![1.0, 2.0, 3.0]);

        assert_eq!(f.evaluations(), 0);
        assert_relative_eq!(f.value(&x), 6.0);
        assert_relative_eq!(f.value(&x), 6.0);
        assert_eq!(f.evaluations(), 2);

        f.reset();
        assert_eq!(f.evaluations(), 0);
    }

    #[test]
    fn test_weighted_quadratic() {
        let q = WeightedQuadratic::new(
            DVector::from_vec(vec![1.0, -2.0]),
            DVector::from_vec(vec![1.0, 10.0]),
        );
        assert_relative_eq!(q.value(&DVector::from_vec(vec![1.0, -2.0])), 0.0);
        assert_relative_eq!(q.value(&DVector::from_vec(vec![2.0, -1.0])), 11.0);
        assert_eq!(q.input_dimension(), Some(2));

        let counted = CountingFunction::new(q);
        assert_eq!(ScalarFunction::<f64>::input_dimension(&counted), Some(2));
    }
}
