//! Gauss-Newton on a residual function.
//!
//! The error is `||r(x)||^2`. The step solves the normal equations
//! `J^T J delta = -J^T r` with the central-difference Jacobian `J`: first
//! through LDLT, then, only when LDLT reports the matrix as not positive
//! definite, through full-pivot LU. Any other failure, or a failure of the
//! LU retry, ends the run.

use crate::{
    config::MinimizerConfig, least_squares::ResidualProblem, minimizer::Minimizer, StepStrategy,
};
use nonlinopt_core::{
    error::{Result, SolveResult},
    function::ResidualFunction,
    linalg::{solve_full_piv_lu, solve_ldlt},
    numerical::FiniteDifference,
    types::{DMatrix, DVector, Scalar},
};

/// Gauss-Newton step strategy.
#[derive(Debug, Clone)]
pub struct GaussNewton<T: Scalar, F> {
    problem: ResidualProblem<T, F>,
}

impl<T, F> GaussNewton<T, F>
where
    T: Scalar,
    F: ResidualFunction<T>,
{
    /// Binds the strategy to a residual function.
    pub fn new(function: F) -> Self {
        Self {
            problem: ResidualProblem::new(function),
        }
    }

    /// Replaces the finite-difference differentiator.
    pub fn with_differentiator(mut self, differentiator: FiniteDifference<T>) -> Self {
        self.problem.differentiator = differentiator;
        self
    }

    /// Builds a ready-to-run minimizer.
    pub fn minimizer(function: F, config: MinimizerConfig<T>) -> Result<Minimizer<T, Self>> {
        Minimizer::new(Self::new(function), config)
    }

    /// The bound residual function.
    pub fn function(&self) -> &F {
        &self.problem.function
    }
}

/// Solves the normal equations, retrying with full-pivot LU when the
/// Cholesky-family solve rejects the matrix.
pub(crate) fn solve_normal_equations<T: Scalar>(
    jtj: &DMatrix<T>,
    rhs: &DVector<T>,
) -> SolveResult<DVector<T>> {
    match solve_ldlt(jtj, rhs) {
        Ok(delta) => Ok(delta),
        Err(e) if e.is_not_positive_definite() => {
            log::warn!("Gauss-Newton: LDLT failed ({e}), retrying with full-pivot LU");
            solve_full_piv_lu(jtj, rhs)
        }
        Err(e) => Err(e),
    }
}

impl<T, F> StepStrategy<T> for GaussNewton<T, F>
where
    T: Scalar,
    F: ResidualFunction<T>,
{
    fn name(&self) -> &str {
        "GaussNewton"
    }

    fn compute_error(&mut self, x: &DVector<T>) -> Result<T> {
        Ok(self.problem.sum_of_squares(x))
    }

    fn compute_delta(&mut self, x: &DVector<T>) -> Result<DVector<T>> {
        let (jacobian, residuals) = self.problem.linearize(x)?;
        let jtj = jacobian.tr_mul(&jacobian);
        let rhs = -jacobian.tr_mul(&residuals);
        Ok(solve_normal_equations(&jtj, &rhs)?)
    }

    fn input_dimension(&self) -> Option<usize> {
        self.problem.function.input_dimension()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nonlinopt_core::{
        error::{OptimizerError, SolveError},
        function::CountingFunction,
    };

    #[test]
    fn test_linear_least_squares_in_one_step() {
        // r(x) = A x - b is linear, so one Gauss-Newton step is exact up to
        // finite-difference noise.
        let a = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        let b = DVector::from_vec(vec![1.0, 2.0, 2.0]);
        let residuals = move |x: &DVector<f64>| &a * x - &b;
        let mut gn = GaussNewton::new(residuals);

        let x = DVector::from_vec(vec![0.0, 0.0]);
        assert_relative_eq!(gn.compute_error(&x).unwrap(), 9.0, epsilon = 1e-12);
        let delta = gn.compute_delta(&x).unwrap();
        assert_relative_eq!(
            delta,
            DVector::from_vec(vec![2.0 / 3.0, 5.0 / 3.0]),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_cached_residuals_are_reused() {
        let counting = CountingFunction::new(|x: &DVector<f64>| x.map(|v| v - 1.0));
        let mut gn = GaussNewton::new(counting);
        let x = DVector::from_vec(vec![0.0, 0.0, 0.0]);

        gn.compute_error(&x).unwrap();
        assert_eq!(gn.function().evaluations(), 1);
        gn.compute_delta(&x).unwrap();
        // Central Jacobian only: 2n evaluations, no re-evaluation of r(x).
        assert_eq!(gn.function().evaluations(), 1 + 6);

        // Without a cached value the residuals are evaluated on demand.
        gn.compute_delta(&x).unwrap();
        assert_eq!(gn.function().evaluations(), 7 + 1 + 6);
    }

    #[test]
    fn test_rank_deficient_normal_equations_fall_back() {
        // Both parameters enter only through their sum: J^T J has rank one.
        let residuals = |x: &DVector<f64>| DVector::from_vec(vec![x[0] + x[1] - 2.0]);
        let mut gn = GaussNewton::new(residuals);
        let x = DVector::from_vec(vec![0.0, 0.0]);

        gn.compute_error(&x).unwrap();
        let delta = gn.compute_delta(&x).unwrap();
        assert!(delta.iter().all(|v| v.is_finite()));
        assert_relative_eq!(delta[0] + delta[1], 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_fallback_pipeline_branches() {
        let indefinite = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 1.0]);
        let rhs = DVector::from_vec(vec![3.0, 3.0]);
        assert_relative_eq!(
            solve_normal_equations(&indefinite, &rhs).unwrap(),
            DVector::from_vec(vec![1.0, 1.0]),
            epsilon = 1e-12
        );

        let zero = DMatrix::<f64>::zeros(2, 2);
        let solution = solve_normal_equations(&zero, &rhs).unwrap();
        assert!(solution.iter().all(|v| v.is_finite()));

        // Shape errors are not retried.
        let short = DVector::from_vec(vec![1.0]);
        assert!(matches!(
            solve_normal_equations(&indefinite, &short),
            Err(SolveError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_badly_scaled_normal_equations_solve_directly() {
        let jtj = DMatrix::from_diagonal(&DVector::from_vec(vec![1e6, 1e-8]));
        let rhs = DVector::from_vec(vec![1e6, 2e-8]);
        assert_relative_eq!(
            solve_normal_equations(&jtj, &rhs).unwrap(),
            DVector::from_vec(vec![1.0, 2.0]),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_changing_residual_count_is_an_error() {
        let residuals = |x: &DVector<f64>| {
            if x[0] > 0.0 {
                DVector::from_vec(vec![x[0], x[0]])
            } else {
                DVector::from_vec(vec![x[0]])
            }
        };
        let mut gn = GaussNewton::new(residuals);
        let x = DVector::from_vec(vec![0.0]);

        gn.compute_error(&x).unwrap();
        assert!(matches!(
            gn.compute_delta(&x),
            Err(OptimizerError::DimensionMismatch { .. })
        ));
    }
}
