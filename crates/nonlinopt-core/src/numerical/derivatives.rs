//! Finite-difference derivatives of user functions.
//!
//! All routines perturb one or two coordinates at a time and re-evaluate
//! the function. Each perturbed point is a fresh copy of `x`, so the
//! caller's vector is never mutated, not even transiently.
//!
//! | Routine | Scheme | Evaluations |
//! |---------|--------|-------------|
//! | [`FiniteDifference::jacobian_scalar`] | forward | `1 + n` |
//! | [`FiniteDifference::jacobian`] | forward | `1 + n` |
//! | [`FiniteDifference::jacobian_central`] | central | `2n` |
//! | [`FiniteDifference::hessian`] | 5-point diagonal, 4-point mixed | `1 + 4n + 2n(n-1)` |
//!
//! Accuracy degrades silently when the step is poorly matched to the
//! curvature of the function; no error is raised for that.

use crate::{
    error::{OptimizerError, Result},
    function::{ResidualFunction, ScalarFunction},
    types::{DMatrix, DVector, Scalar},
};
use num_traits::Float;

/// Finite-difference differentiator with a fixed step `h`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FiniteDifference<T: Scalar> {
    step: T,
}

impl<T: Scalar> Default for FiniteDifference<T> {
    fn default() -> Self {
        Self {
            step: T::DEFAULT_FD_STEP,
        }
    }
}

impl<T: Scalar> FiniteDifference<T> {
    /// Creates a differentiator with a caller-supplied step.
    ///
    /// The step must be finite and strictly positive.
    pub fn new(step: T) -> Result<Self> {
        if !Float::is_finite(step) || step <= T::zero() {
            return Err(OptimizerError::invalid_argument(format!(
                "finite-difference step must be finite and positive, got {step}"
            )));
        }
        Ok(Self { step })
    }

    /// Returns the step size.
    pub fn step(&self) -> T {
        self.step
    }

    /// Forward-difference Jacobian of a scalar function, as a `1 x n` matrix.
    pub fn jacobian_scalar<F>(&self, f: &F, x: &DVector<T>) -> DMatrix<T>
    where
        F: ScalarFunction<T> + ?Sized,
    {
        let n = x.len();
        let h = self.step;
        let f_x = f.value(x);

        DMatrix::from_fn(1, n, |_, i| (f.value(&perturbed(x, i, h)) - f_x) / h)
    }

    /// Forward-difference gradient of a scalar function, as a column vector.
    ///
    /// Same values as [`Self::jacobian_scalar`], transposed.
    pub fn gradient<F>(&self, f: &F, x: &DVector<T>) -> DVector<T>
    where
        F: ScalarFunction<T> + ?Sized,
    {
        let jacobian = self.jacobian_scalar(f, x);
        DVector::from_iterator(x.len(), jacobian.iter().copied())
    }

    /// Forward-difference Jacobian of a residual function, as an `m x n` matrix.
    ///
    /// Column `i` is `(r(x + h e_i) - r(x)) / h`.
    pub fn jacobian<F>(&self, f: &F, x: &DVector<T>) -> Result<DMatrix<T>>
    where
        F: ResidualFunction<T> + ?Sized,
    {
        let n = x.len();
        let h = self.step;
        let r_x = f.residuals(x);
        let m = r_x.len();

        let mut jacobian = DMatrix::zeros(m, n);
        for i in 0..n {
            let r_plus = f.residuals(&perturbed(x, i, h));
            check_residual_len(m, r_plus.len())?;
            jacobian.set_column(i, &((r_plus - &r_x) / h));
        }
        Ok(jacobian)
    }

    /// Central-difference Jacobian of a residual function.
    ///
    /// Column `i` is `(r(x + h e_i) - r(x - h e_i)) / 2h`. The truncation
    /// error is `O(h^2)` instead of `O(h)`, at the price of `2n` evaluations
    /// and no reusable base value.
    pub fn jacobian_central<F>(&self, f: &F, x: &DVector<T>) -> Result<DMatrix<T>>
    where
        F: ResidualFunction<T> + ?Sized,
    {
        let n = x.len();
        let h = self.step;
        let two_h = h + h;

        if n == 0 {
            let m = f.residuals(x).len();
            return Ok(DMatrix::zeros(m, 0));
        }

        let mut columns: Vec<DVector<T>> = Vec::with_capacity(n);
        for i in 0..n {
            let r_plus = f.residuals(&perturbed(x, i, h));
            let r_minus = f.residuals(&perturbed(x, i, -h));
            let m = columns.first().map_or(r_plus.len(), |c| c.len());
            check_residual_len(m, r_plus.len())?;
            check_residual_len(m, r_minus.len())?;
            columns.push((r_plus - r_minus) / two_h);
        }
        Ok(DMatrix::from_columns(&columns))
    }

    /// Hessian of a scalar function.
    ///
    /// Diagonal entries use the 5-point stencil
    /// `(-f(x+2h) + 16f(x+h) - 30f(x) + 16f(x-h) - f(x-2h)) / 12h^2`;
    /// off-diagonal entries use the mixed central difference
    /// `(f(++) - f(+-) - f(-+) + f(--)) / 4h^2`, written to both `(i, j)`
    /// and `(j, i)` from one computation so the result is exactly symmetric.
    pub fn hessian<F>(&self, f: &F, x: &DVector<T>) -> DMatrix<T>
    where
        F: ScalarFunction<T> + ?Sized,
    {
        let n = x.len();
        let h = self.step;
        let h2 = h * h;
        let c12 = <T as Scalar>::from_f64(12.0);
        let c16 = <T as Scalar>::from_f64(16.0);
        let c30 = <T as Scalar>::from_f64(30.0);
        let c4 = <T as Scalar>::from_f64(4.0);
        let f_x = f.value(x);

        let mut hessian = DMatrix::zeros(n, n);
        for i in 0..n {
            let f_p = f.value(&perturbed(x, i, h));
            let f_p2 = f.value(&perturbed(x, i, h + h));
            let f_n = f.value(&perturbed(x, i, -h));
            let f_n2 = f.value(&perturbed(x, i, -(h + h)));
            hessian[(i, i)] = (-f_p2 + c16 * f_p - c30 * f_x + c16 * f_n - f_n2) / (c12 * h2);

            for j in (i + 1)..n {
                let f_pp = f.value(&perturbed_pair(x, (i, h), (j, h)));
                let f_np = f.value(&perturbed_pair(x, (i, -h), (j, h)));
                let f_nn = f.value(&perturbed_pair(x, (i, -h), (j, -h)));
                let f_pn = f.value(&perturbed_pair(x, (i, h), (j, -h)));

                let value = (f_pp - f_pn - f_np + f_nn) / (c4 * h2);
                hessian[(i, j)] = value;
                hessian[(j, i)] = value;
            }
        }
        hessian
    }
}

fn perturbed<T: Scalar>(x: &DVector<T>, i: usize, delta: T) -> DVector<T> {
    let mut point = x.clone();
    point[i] += delta;
    point
}

fn perturbed_pair<T: Scalar>(x: &DVector<T>, a: (usize, T), b: (usize, T)) -> DVector<T> {
    let mut point = x.clone();
    point[a.0] += a.1;
    point[b.0] += b.1;
    point
}

fn check_residual_len(expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(OptimizerError::dimension_mismatch(
            format!("{expected} residuals"),
            format!("{actual} residuals"),
        ))
    }
}

/// Forward-difference Jacobian of a scalar function with the default step.
pub fn jacobian_approx_scalar<T, F>(f: &F, x: &DVector<T>) -> DMatrix<T>
where
    T: Scalar,
    F: ScalarFunction<T> + ?Sized,
{
    FiniteDifference::default().jacobian_scalar(f, x)
}

/// Forward-difference Jacobian of a residual function with the default step.
pub fn jacobian_approx<T, F>(f: &F, x: &DVector<T>) -> Result<DMatrix<T>>
where
    T: Scalar,
    F: ResidualFunction<T> + ?Sized,
{
    FiniteDifference::default().jacobian(f, x)
}

/// Central-difference Jacobian of a residual function with the default step.
pub fn jacobian_approx_central<T, F>(f: &F, x: &DVector<T>) -> Result<DMatrix<T>>
where
    T: Scalar,
    F: ResidualFunction<T> + ?Sized,
{
    FiniteDifference::default().jacobian_central(f, x)
}

/// Hessian of a scalar function with the default step.
pub fn hessian_approx<T, F>(f: &F, x: &DVector<T>) -> DMatrix<T>
where
    T: Scalar,
    F: ScalarFunction<T> + ?Sized,
{
    FiniteDifference::default().hessian(f, x)
}
