//! Error types for linear solves and optimization.
//!
//! This module defines the error types shared by the finite-difference
//! routines, the linear solvers and the minimizers.

use thiserror::Error;

/// Errors that can occur while solving a dense linear system.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// Malformed input, such as an empty system.
    #[error("Invalid argument: {reason}")]
    InvalidArgument {
        /// Description of the invalid input
        reason: String,
    },

    /// Dimension mismatch between the matrix and the right-hand side.
    ///
    /// Also raised when a method that requires a square matrix
    /// receives a rectangular one.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions
        expected: String,
        /// Actual dimensions
        actual: String,
    },

    /// The matrix is not numerically symmetric positive definite.
    ///
    /// Raised by the Cholesky family only.
    #[error("Matrix appears not to be positive definite: {reason}")]
    NotPositiveDefinite {
        /// Description of the failed check
        reason: String,
    },

    /// The matrix is singular and the method cannot recover.
    #[error("Matrix is singular: {reason}")]
    Singular {
        /// Description of the singularity
        reason: String,
    },
}

impl SolveError {
    /// Create an InvalidArgument error with a custom reason.
    pub fn invalid_argument<S: Into<String>>(reason: S) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch<S1, S2>(expected: S1, actual: S2) -> Self
    where
        S1: std::fmt::Display,
        S2: std::fmt::Display,
    {
        Self::DimensionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create a NotPositiveDefinite error with a custom reason.
    pub fn not_positive_definite<S: Into<String>>(reason: S) -> Self {
        Self::NotPositiveDefinite {
            reason: reason.into(),
        }
    }

    /// Create a Singular error with a custom reason.
    pub fn singular<S: Into<String>>(reason: S) -> Self {
        Self::Singular {
            reason: reason.into(),
        }
    }

    /// Returns true for the failure kind the Gauss-Newton fallback recovers from.
    pub fn is_not_positive_definite(&self) -> bool {
        matches!(self, Self::NotPositiveDefinite { .. })
    }
}

/// Errors that can occur during optimization.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizerError {
    /// Invalid input to a differentiation routine or to a minimizer run.
    #[error("Invalid argument: {reason}")]
    InvalidArgument {
        /// Description of the invalid input
        reason: String,
    },

    /// Invalid minimizer configuration.
    #[error("Invalid optimizer configuration: {reason}")]
    InvalidConfiguration {
        /// Description of the configuration error
        reason: String,
        /// Name of the invalid parameter
        parameter: String,
        /// Value that was invalid
        value: String,
    },

    /// The parameter vector or a function output changed shape.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions
        expected: String,
        /// Actual dimensions
        actual: String,
    },

    /// Propagated linear solve error.
    #[error("Linear solve failed: {0}")]
    Solve(#[from] SolveError),
}

impl OptimizerError {
    /// Create an InvalidArgument error with a custom reason.
    pub fn invalid_argument<S: Into<String>>(reason: S) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfiguration error.
    pub fn invalid_configuration<S1, S2, S3>(reason: S1, parameter: S2, value: S3) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Self::InvalidConfiguration {
            reason: reason.into(),
            parameter: parameter.into(),
            value: value.into(),
        }
    }

    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch<S1, S2>(expected: S1, actual: S2) -> Self
    where
        S1: std::fmt::Display,
        S2: std::fmt::Display,
    {
        Self::DimensionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

/// Result type alias for linear solves.
pub type SolveResult<T> = std::result::Result<T, SolveError>;

/// Result type alias for differentiation and optimizer operations.
pub type Result<T> = std::result::Result<T, OptimizerError>;
