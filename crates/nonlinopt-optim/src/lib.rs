//! NonlinOpt Optimization - Iterative minimizers built on finite differences.
//!
//! Every minimizer is a [`Minimizer`] driving one [`StepStrategy`]. The
//! driver owns the loop, the termination tests and the history; a strategy
//! only says how the error and the next step are computed from the current
//! point.
//!
//! # Available Strategies
//!
//! - **Newton**: scalar objective, solves `H delta = -g`
//! - **Gauss-Newton**: residual function, solves the normal equations with
//!   an LDLT-then-LU fallback
//! - **Gradient Descent**: residual function, steps along `-J^T r`
//!
//! # Examples
//!
//! ```rust
//! use nonlinopt_optim::{GaussNewton, MinimizerConfig};
//! use nonlinopt_core::types::DVector;
//!
//! // Fit y = (a t - 0.2)^2 to samples generated with a = 0.2
//! let t: Vec<f64> = (0..10).map(|i| i as f64 * 0.1).collect();
//! let residuals = move |x: &DVector<f64>| {
//!     DVector::from_iterator(
//!         t.len(),
//!         t.iter().map(|&ti| (x[0] * ti - 0.2).powi(2) - (0.2 * ti - 0.2).powi(2)),
//!     )
//! };
//!
//! let config = MinimizerConfig::new().with_max_iterations(100).with_tolerance(1e-12);
//! let mut minimizer = GaussNewton::minimizer(residuals, config).unwrap();
//! let mut x = DVector::from_vec(vec![0.0]);
//! let info = minimizer.run(&mut x).unwrap();
//!
//! assert!(info.is_success());
//! assert!((x[0] - 0.2).abs() < 1e-3);
//! ```

pub mod config;
pub mod gauss_newton;
pub mod gradient_descent;
mod least_squares;
pub mod minimizer;
pub mod newton;

pub use config::MinimizerConfig;
pub use gauss_newton::GaussNewton;
pub use gradient_descent::GradientDescent;
pub use minimizer::{History, Minimizer, ResultInfo, StepStrategy};
pub use newton::Newton;
