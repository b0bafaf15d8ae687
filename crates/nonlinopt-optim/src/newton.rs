//! Newton's method on a scalar objective.
//!
//! The step solves `H delta = -g`, with the gradient `g` from forward
//! differences and the Hessian `H` from the mixed finite-difference
//! stencil. The system goes through the LDLT solve, so a Hessian that is
//! not symmetric or has a vanishing pivot fails the run. There is no
//! regularization or line search; an indefinite Hessian can send the
//! iterate uphill.

use crate::{config::MinimizerConfig, minimizer::Minimizer, StepStrategy};
use nonlinopt_core::{
    error::Result,
    function::ScalarFunction,
    linalg::solve_ldlt,
    numerical::FiniteDifference,
    types::{DVector, Scalar},
};

/// Newton step strategy.
#[derive(Debug, Clone)]
pub struct Newton<T: Scalar, F> {
    function: F,
    differentiator: FiniteDifference<T>,
}

impl<T, F> Newton<T, F>
where
    T: Scalar,
    F: ScalarFunction<T>,
{
    /// Binds the strategy to a scalar objective.
    pub fn new(function: F) -> Self {
        Self {
            function,
            differentiator: FiniteDifference::default(),
        }
    }

    /// Replaces the finite-difference differentiator.
    pub fn with_differentiator(mut self, differentiator: FiniteDifference<T>) -> Self {
        self.differentiator = differentiator;
        self
    }

    /// Builds a ready-to-run minimizer.
    pub fn minimizer(function: F, config: MinimizerConfig<T>) -> Result<Minimizer<T, Self>> {
        Minimizer::new(Self::new(function), config)
    }

    /// The bound objective.
    pub fn function(&self) -> &F {
        &self.function
    }
}

impl<T, F> StepStrategy<T> for Newton<T, F>
where
    T: Scalar,
    F: ScalarFunction<T>,
{
    fn name(&self) -> &str {
        "Newton"
    }

    fn compute_error(&mut self, x: &DVector<T>) -> Result<T> {
        Ok(self.function.value(x))
    }

    fn compute_delta(&mut self, x: &DVector<T>) -> Result<DVector<T>> {
        let gradient = self.differentiator.gradient(&self.function, x);
        let hessian = self.differentiator.hessian(&self.function, x);
        Ok(solve_ldlt(&hessian, &(-gradient))?)
    }

    fn input_dimension(&self) -> Option<usize> {
        self.function.input_dimension()
    }
}
