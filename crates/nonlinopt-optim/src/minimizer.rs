//! Generic minimization driver.
//!
//! A [`Minimizer`] repeatedly asks its [`StepStrategy`] for the current
//! error and the next step, applies the step in place and stops on the
//! first of three conditions:
//!
//! 1. the error drops strictly below the tolerance ([`ResultInfo::ToleranceReached`]),
//! 2. the error, sampled every 100 iterations, failed to improve on more
//!    than 10 consecutive samples ([`ResultInfo::Converged`]),
//! 3. the iteration cap is exhausted ([`ResultInfo::MaxIterationReached`]).
//!
//! The tolerance test runs every iteration and takes priority over the
//! stagnation test within the same iteration. The stagnation test is coarse
//! on purpose: with a small iteration cap it may never fire.

use crate::config::MinimizerConfig;
use nonlinopt_core::{
    error::{OptimizerError, Result},
    types::{DVector, Scalar},
};
use num_traits::Float;
use std::fmt;

/// Iterations between two stagnation samples.
const STAGNATION_SAMPLE_PERIOD: usize = 100;

/// Non-improving samples tolerated before declaring convergence.
const STAGNATION_PATIENCE: usize = 10;

/// How an error value and a step are computed from the current point.
///
/// Within one iteration the driver always calls
/// [`compute_error`](Self::compute_error) before
/// [`compute_delta`](Self::compute_delta) on the same `x`, so strategies
/// may cache intermediate values between the two calls.
pub trait StepStrategy<T: Scalar> {
    /// Short name used in log messages.
    fn name(&self) -> &str;

    /// Error of the current iterate; smaller is better.
    fn compute_error(&mut self, x: &DVector<T>) -> Result<T>;

    /// Step to add (scaled by lambda) to the current iterate.
    fn compute_delta(&mut self, x: &DVector<T>) -> Result<DVector<T>>;

    /// Parameter count expected by the bound function, if known.
    fn input_dimension(&self) -> Option<usize> {
        None
    }
}

impl<T: Scalar, S: StepStrategy<T> + ?Sized> StepStrategy<T> for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn compute_error(&mut self, x: &DVector<T>) -> Result<T> {
        (**self).compute_error(x)
    }

    fn compute_delta(&mut self, x: &DVector<T>) -> Result<DVector<T>> {
        (**self).compute_delta(x)
    }

    fn input_dimension(&self) -> Option<usize> {
        (**self).input_dimension()
    }
}

/// Terminal status of one `run` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResultInfo {
    /// The error dropped below the tolerance
    ToleranceReached,
    /// The error stopped improving
    Converged,
    /// The iteration cap was exhausted
    MaxIterationReached,
}

impl ResultInfo {
    /// Whether the run ended on a tolerance or plateau criterion.
    pub fn is_success(&self) -> bool {
        matches!(self, ResultInfo::ToleranceReached | ResultInfo::Converged)
    }
}

impl fmt::Display for ResultInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResultInfo::ToleranceReached => "ToleranceReached",
            ResultInfo::Converged => "Converged",
            ResultInfo::MaxIterationReached => "MaxIterationReached",
        };
        f.write_str(name)
    }
}

/// Per-iteration record of errors and steps.
///
/// Append-only. Every iteration records its error; an iteration that
/// terminates before computing a step records no delta, so `deltas` can be
/// one entry shorter than `errors` per run.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct History<T: Scalar> {
    errors: Vec<T>,
    deltas: Vec<DVector<T>>,
}

impl<T: Scalar> History<T> {
    /// Recorded errors, oldest first.
    pub fn errors(&self) -> &[T] {
        &self.errors
    }

    /// Recorded steps, oldest first.
    pub fn deltas(&self) -> &[DVector<T>] {
        &self.deltas
    }

    /// Number of recorded errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Most recent error.
    pub fn last_error(&self) -> Option<T> {
        self.errors.last().copied()
    }

    fn push_error(&mut self, error: T) {
        self.errors.push(error);
    }

    fn push_delta(&mut self, delta: DVector<T>) {
        self.deltas.push(delta);
    }
}

/// Iterative minimizer driving a [`StepStrategy`].
///
/// The history survives across `run` calls; build a fresh minimizer for a
/// clean record.
#[derive(Debug)]
pub struct Minimizer<T: Scalar, S> {
    strategy: S,
    config: MinimizerConfig<T>,
    history: History<T>,
}

impl<T, S> Minimizer<T, S>
where
    T: Scalar,
    S: StepStrategy<T>,
{
    /// Creates a minimizer from a strategy and a validated configuration.
    pub fn new(strategy: S, config: MinimizerConfig<T>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            strategy,
            config,
            history: History::default(),
        })
    }

    /// Minimizes in place, starting from `x`.
    ///
    /// On return `x` holds the last iterate, whatever the outcome. On error
    /// it holds the iterate after the last successfully applied step.
    pub fn run(&mut self, x: &mut DVector<T>) -> Result<ResultInfo> {
        self.check_input(x)?;

        let name = self.strategy.name().to_string();
        let mut prev_error = <T as Float>::infinity();
        let mut convergence_count = 0usize;

        for i in 0..self.config.max_iterations {
            let error = self.strategy.compute_error(x)?;
            self.history.push_error(error);
            log::trace!("{name}: iteration {i}, error {error}");

            if error < self.config.tolerance {
                log::debug!("{name}: tolerance reached after {} iterations", i + 1);
                return Ok(ResultInfo::ToleranceReached);
            }

            if i % STAGNATION_SAMPLE_PERIOD == 0 {
                if error < prev_error {
                    prev_error = error;
                    convergence_count = 0;
                } else {
                    convergence_count += 1;
                    if convergence_count > STAGNATION_PATIENCE {
                        log::debug!("{name}: error stagnated at {error} after {} iterations", i + 1);
                        return Ok(ResultInfo::Converged);
                    }
                }
            }

            let delta = self.strategy.compute_delta(x)?;
            if delta.len() != x.len() {
                return Err(OptimizerError::dimension_mismatch(
                    format!("step of length {}", x.len()),
                    format!("length {}", delta.len()),
                ));
            }
            x.axpy(self.config.lambda, &delta, T::one());
            self.history.push_delta(delta);
        }

        log::debug!(
            "{name}: iteration cap of {} reached, last error {:?}",
            self.config.max_iterations,
            self.history.last_error()
        );
        Ok(ResultInfo::MaxIterationReached)
    }

    /// Recorded errors and steps of every run so far.
    pub fn history(&self) -> &History<T> {
        &self.history
    }

    /// The configuration.
    pub fn config(&self) -> &MinimizerConfig<T> {
        &self.config
    }

    /// The step strategy.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Consumes the minimizer, returning the strategy and the history.
    pub fn into_parts(self) -> (S, History<T>) {
        (self.strategy, self.history)
    }

    fn check_input(&self, x: &DVector<T>) -> Result<()> {
        if x.is_empty() {
            return Err(OptimizerError::invalid_argument(
                "parameter vector must not be empty",
            ));
        }
        if let Some(expected) = self.strategy.input_dimension() {
            if expected != x.len() {
                return Err(OptimizerError::invalid_argument(format!(
                    "{} expects {expected} parameters, got {}",
                    self.strategy.name(),
                    x.len()
                )));
            }
        }
        if x.iter().any(|v| !Float::is_finite(*v)) {
            return Err(OptimizerError::invalid_argument(
                "parameter vector must be finite",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scripted strategy: returns a fixed error sequence and a unit step.
    struct Scripted {
        errors: Vec<f64>,
        calls: usize,
        deltas: usize,
    }

    impl Scripted {
        fn new(errors: Vec<f64>) -> Self {
            Self {
                errors,
                calls: 0,
                deltas: 0,
            }
        }
    }

    impl StepStrategy<f64> for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn compute_error(&mut self, _x: &DVector<f64>) -> Result<f64> {
            let error = self.errors[self.calls.min(self.errors.len() - 1)];
            self.calls += 1;
            Ok(error)
        }

        fn compute_delta(&mut self, x: &DVector<f64>) -> Result<DVector<f64>> {
            self.deltas += 1;
            Ok(DVector::from_element(x.len(), 1.0))
        }
    }

    fn config(max_iterations: usize) -> MinimizerConfig<f64> {
        MinimizerConfig::new()
            .with_max_iterations(max_iterations)
            .with_tolerance(1e-6)
    }

    #[test]
    fn test_tolerance_reached_immediately() {
        let mut minimizer = Minimizer::new(Scripted::new(vec![0.0]), config(100)).unwrap();
        let mut x = DVector::from_vec(vec![3.0]);

        assert_eq!(minimizer.run(&mut x).unwrap(), ResultInfo::ToleranceReached);
        assert_eq!(minimizer.history().len(), 1);
        assert!(minimizer.history().deltas().is_empty());
        assert_eq!(x[0], 3.0);
    }

    #[test]
    fn test_max_iterations_applies_every_step() {
        let errors: Vec<f64> = (0..50).map(|i| 1.0 / (i + 1) as f64).collect();
        let mut minimizer = Minimizer::new(
            Scripted::new(errors),
            config(20).with_lambda(0.5),
        )
        .unwrap();
        let mut x = DVector::from_vec(vec![0.0, 1.0]);

        assert_eq!(minimizer.run(&mut x).unwrap(), ResultInfo::MaxIterationReached);
        assert_eq!(minimizer.history().len(), 20);
        assert_eq!(minimizer.history().deltas().len(), 20);
        assert_eq!(minimizer.strategy().deltas, 20);
        assert_eq!(x, DVector::from_vec(vec![10.0, 11.0]));
    }

    #[test]
    fn test_zero_iterations() {
        let mut minimizer = Minimizer::new(Scripted::new(vec![1.0]), config(0)).unwrap();
        let mut x = DVector::from_vec(vec![1.0]);
        assert_eq!(minimizer.run(&mut x).unwrap(), ResultInfo::MaxIterationReached);
        assert!(minimizer.history().is_empty());
    }

    #[test]
    fn test_stagnation_cadence() {
        // Constant error: sample 0 improves on +inf, samples 1..=11 do not.
        // The 11th non-improving sample is taken at i = 1100.
        let mut minimizer = Minimizer::new(Scripted::new(vec![1.0]), config(5000)).unwrap();
        let mut x = DVector::from_vec(vec![0.0]);

        assert_eq!(minimizer.run(&mut x).unwrap(), ResultInfo::Converged);
        assert_eq!(minimizer.history().len(), 1101);
        assert_eq!(minimizer.history().deltas().len(), 1100);
        assert_eq!(x[0], 1100.0);
    }

    #[test]
    fn test_stagnation_never_fires_with_small_cap() {
        let mut minimizer = Minimizer::new(Scripted::new(vec![1.0]), config(1100)).unwrap();
        let mut x = DVector::from_vec(vec![0.0]);
        assert_eq!(minimizer.run(&mut x).unwrap(), ResultInfo::MaxIterationReached);
    }

    #[test]
    fn test_tolerance_has_priority_over_stagnation() {
        // Error stays flat, then drops below tolerance exactly at i = 1100.
        let mut errors = vec![1.0; 1100];
        errors.push(0.0);
        let mut minimizer = Minimizer::new(Scripted::new(errors), config(5000)).unwrap();
        let mut x = DVector::from_vec(vec![0.0]);

        assert_eq!(minimizer.run(&mut x).unwrap(), ResultInfo::ToleranceReached);
        assert_eq!(minimizer.history().len(), 1101);
    }

    #[test]
    fn test_history_accumulates_across_runs() {
        let mut minimizer = Minimizer::new(Scripted::new(vec![1.0]), config(3)).unwrap();
        let mut x = DVector::from_vec(vec![0.0]);
        minimizer.run(&mut x).unwrap();
        minimizer.run(&mut x).unwrap();

        assert_eq!(minimizer.history().len(), 6);
        assert_eq!(minimizer.history().last_error(), Some(1.0));
        assert_eq!(x[0], 6.0);
    }

    #[test]
    fn test_rejects_bad_input() {
        let mut minimizer = Minimizer::new(Scripted::new(vec![1.0]), config(3)).unwrap();

        let mut empty = DVector::<f64>::zeros(0);
        assert!(matches!(
            minimizer.run(&mut empty),
            Err(OptimizerError::InvalidArgument { .. })
        ));

        let mut nan = DVector::from_vec(vec![f64::NAN]);
        assert!(matches!(
            minimizer.run(&mut nan),
            Err(OptimizerError::InvalidArgument { .. })
        ));
        assert!(minimizer.history().is_empty());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let result = Minimizer::new(
            Scripted::new(vec![1.0]),
            MinimizerConfig::new().with_lambda(f64::NAN),
        );
        assert!(matches!(
            result,
            Err(OptimizerError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_result_info_display() {
        assert_eq!(ResultInfo::ToleranceReached.to_string(), "ToleranceReached");
        assert_eq!(ResultInfo::Converged.to_string(), "Converged");
        assert_eq!(ResultInfo::MaxIterationReached.to_string(), "MaxIterationReached");
        assert!(ResultInfo::Converged.is_success());
        assert!(!ResultInfo::MaxIterationReached.is_success());
    }
}
