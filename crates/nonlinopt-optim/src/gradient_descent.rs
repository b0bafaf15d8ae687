//! Gradient descent on a residual function.
//!
//! The error is `||r(x)||^2` and the step is `-J^T r`, the negative
//! half-gradient of the error. No curvature and no step normalization: the
//! configured lambda is the only control over overshoot, and convergence is
//! linear at best.

use crate::{
    config::MinimizerConfig, least_squares::ResidualProblem, minimizer::Minimizer, StepStrategy,
};
use nonlinopt_core::{
    error::Result,
    function::ResidualFunction,
    numerical::FiniteDifference,
    types::{DVector, Scalar},
};

/// Gradient descent step strategy.
#[derive(Debug, Clone)]
pub struct GradientDescent<T: Scalar, F> {
    problem: ResidualProblem<T, F>,
}

impl<T, F> GradientDescent<T, F>
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

impl<T, F> StepStrategy<T> for GradientDescent<T, F>
where
    T: Scalar,
    F: ResidualFunction<T>,
{
    fn name(&self) -> &str {
        "GradientDescent"
    }

    fn compute_error(&mut self, x: &DVector<T>) -> Result<T> {
        Ok(self.problem.sum_of_squares(x))
    }

    fn compute_delta(&mut self, x: &DVector<T>) -> Result<DVector<T>> {
        let (jacobian, residuals) = self.problem.linearize(x)?;
        Ok(-jacobian.tr_mul(&residuals))
    }

    fn input_dimension(&self) -> Option<usize> {
        self.problem.function.input_dimension()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_step_is_negative_half_gradient() {
        // r = (2 x0, x1 - 1): J^T r = (4 x0, x1 - 1)
        let residuals = |x: &DVector<f64>| DVector::from_vec(vec![2.0 * x[0], x[1] - 1.0]);
        let mut gd = GradientDescent::new(residuals);
        let x = DVector::from_vec(vec![0.5, 3.0]);

        assert_relative_eq!(gd.compute_error(&x).unwrap(), 5.0, epsilon = 1e-12);
        let delta = gd.compute_delta(&x).unwrap();
        assert_relative_eq!(delta, DVector::from_vec(vec![-2.0, -2.0]), epsilon = 1e-8);
    }

    #[test]
    fn test_zero_residual_gives_zero_step() {
        let residuals = |x: &DVector<f64>| x.clone();
        let mut gd = GradientDescent::new(residuals);
        let x = DVector::zeros(3);

        assert_eq!(gd.compute_error(&x).unwrap(), 0.0);
        assert_eq!(gd.compute_delta(&x).unwrap(), DVector::zeros(3));
    }

    #[test]
    fn test_small_lambda_converges_on_linear_residuals() {
        let residuals = |x: &DVector<f64>| DVector::from_vec(vec![x[0] - 1.0, 2.0 * (x[1] + 1.0)]);
        let config = MinimizerConfig::new()
            .with_max_iterations(500)
            .with_tolerance(1e-16)
            .with_lambda(0.1);
        let mut minimizer = GradientDescent::minimizer(residuals, config).unwrap();
        let mut x = DVector::from_vec(vec![3.0, 3.0]);

        minimizer.run(&mut x).unwrap();
        assert_relative_eq!(x, DVector::from_vec(vec![1.0, -1.0]), epsilon = 1e-6);
        let errors = minimizer.history().errors();
        assert!(errors.windows(2).all(|w| w[1] <= w[0]));
    }
}
