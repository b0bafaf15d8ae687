//! Example: fitting two parameters to two residuals with Gauss-Newton
//!
//! Residuals are `(x0 t_i - 0.2)^2 + x1 - 1` for `t = (1, 2)`. The system
//! has a zero-residual solution, which Gauss-Newton reaches in a handful of
//! iterations.

use nonlinopt::prelude::*;

fn main() -> Result<()> {
    println!("Basic minimization with Gauss-Newton");
    println!("====================================\n");

    let t = DVector::from_vec(vec![1.0, 2.0]);
    let residuals = move |x: &DVector<f64>| t.map(|ti| (x[0] * ti - 0.2).powi(2) + x[1] - 1.0);

    let mut x = DVector::from_vec(vec![0.0, 0.0]);
    let mut minimizer = GaussNewton::minimizer(&residuals, MinimizerConfig::new())?;
    let info = minimizer.run(&mut x)?;

    println!("Result: {info}");
    println!("x = [{:.6}, {:.6}]", x[0], x[1]);
    println!("Iterations: {}", minimizer.history().len());
    if let Some(error) = minimizer.history().last_error() {
        println!("Final error: {error:.3e}");
    }

    let jacobian = jacobian_approx(&residuals, &x)?;
    println!("Jacobian at the solution:{jacobian}");

    Ok(())
}
