//! Residual bookkeeping shared by the least-squares strategies.

use nonlinopt_core::{
    error::{OptimizerError, Result},
    function::ResidualFunction,
    numerical::FiniteDifference,
    types::{DMatrix, DVector, Scalar},
};

/// A residual function together with the residuals of the current iterate.
#[derive(Debug, Clone)]
pub(crate) struct ResidualProblem<T: Scalar, F> {
    pub(crate) function: F,
    pub(crate) differentiator: FiniteDifference<T>,
    cached: Option<DVector<T>>,
}

impl<T, F> ResidualProblem<T, F>
where
    T: Scalar,
    F: ResidualFunction<T>,
{
    pub(crate) fn new(function: F) -> Self {
        Self {
            function,
            differentiator: FiniteDifference::default(),
            cached: None,
        }
    }

    /// Evaluates `r(x)`, caches it and returns `||r||^2`.
    pub(crate) fn sum_of_squares(&mut self, x: &DVector<T>) -> T {
        let residuals = self.function.residuals(x);
        let error = residuals.norm_squared();
        self.cached = Some(residuals);
        error
    }

    /// Central-difference Jacobian at `x` and the residuals cached for `x`.
    ///
    /// The cache is consumed; if nothing was cached the residuals are
    /// evaluated here.
    pub(crate) fn linearize(&mut self, x: &DVector<T>) -> Result<(DMatrix<T>, DVector<T>)> {
        let residuals = match self.cached.take() {
            Some(r) => r,
            None => self.function.residuals(x),
        };
        let jacobian = self.differentiator.jacobian_central(&self.function, x)?;
        if jacobian.nrows() != residuals.len() {
            return Err(OptimizerError::dimension_mismatch(
                format!("{} residuals", residuals.len()),
                format!("{} Jacobian rows", jacobian.nrows()),
            ));
        }
        Ok((jacobian, residuals))
    }
}
