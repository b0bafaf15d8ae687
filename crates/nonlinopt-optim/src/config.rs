//! Minimizer configuration.

use nonlinopt_core::{
    error::{OptimizerError, Result},
    types::Scalar,
};
use num_traits::Float;

/// Configuration shared by every minimizer.
///
/// The configuration is fixed once a [`Minimizer`](crate::Minimizer) is
/// built from it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MinimizerConfig<T: Scalar> {
    /// Iteration cap for one `run` call
    pub max_iterations: usize,
    /// Absolute error threshold for immediate success
    pub tolerance: T,
    /// Step scaling applied as `x <- x + lambda * delta`
    pub lambda: T,
}

impl<T: Scalar> Default for MinimizerConfig<T> {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            tolerance: <T as Scalar>::from_f64(1e-12),
            lambda: T::one(),
        }
    }
}

impl<T: Scalar> MinimizerConfig<T> {
    /// Create a new configuration with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the iteration cap
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the absolute error tolerance
    pub fn with_tolerance(mut self, tolerance: T) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the step-scaling factor
    pub fn with_lambda(mut self, lambda: T) -> Self {
        self.lambda = lambda;
        self
    }

    /// Checks that the configuration can drive a minimization.
    ///
    /// A NaN tolerance would make the tolerance test unreachable and a
    /// non-finite lambda poisons the iterate on the first step.
    pub fn validate(&self) -> Result<()> {
        if Float::is_nan(self.tolerance) {
            return Err(OptimizerError::invalid_configuration(
                "tolerance must not be NaN",
                "tolerance",
                self.tolerance.to_string(),
            ));
        }
        if !Float::is_finite(self.lambda) {
            return Err(OptimizerError::invalid_configuration(
                "lambda must be finite",
                "lambda",
                self.lambda.to_string(),
            ));
        }
        Ok(())
    }
}
