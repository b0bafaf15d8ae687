//! NonlinOpt - local nonlinear minimization with finite-difference derivatives.
//!
//! This is the facade crate. It re-exports the building blocks from
//! [`nonlinopt_core`] (function traits, finite differences, linear solves)
//! and the minimizers from [`nonlinopt_optim`].
//!
//! # Quick Start
//!
//! ```rust
//! use nonlinopt::prelude::*;
//!
//! // Two residuals, two unknowns: x0 + x1 = 3 and x0 - x1 = 1
//! let residuals = |x: &DVector<f64>| DVector::from_vec(vec![x[0] + x[1] - 3.0, x[0] - x[1] - 1.0]);
//!
//! let mut minimizer = GaussNewton::minimizer(residuals, MinimizerConfig::new()).unwrap();
//! let mut x = DVector::from_vec(vec![0.0, 0.0]);
//! let info = minimizer.run(&mut x).unwrap();
//!
//! assert_eq!(info, ResultInfo::ToleranceReached);
//! assert!((x[0] - 2.0).abs() < 1e-6 && (x[1] - 1.0).abs() < 1e-6);
//! ```

pub use nonlinopt_core;
pub use nonlinopt_optim;

pub use nalgebra;

/// Everything needed to set up and run a minimization.
pub mod prelude {
    pub use nonlinopt_core::prelude::*;
    pub use nonlinopt_optim::{
        GaussNewton, GradientDescent, History, Minimizer, MinimizerConfig, Newton, ResultInfo,
        StepStrategy,
    };
}
