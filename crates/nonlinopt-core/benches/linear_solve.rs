//! Linear solver benchmarks.
//!
//! Times every solve method on random symmetric positive definite systems
//! of increasing size, so that the Cholesky family can be compared against
//! the permissive decompositions on equal footing.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nonlinopt_core::{
    linalg::SolveMethod,
    types::{DMatrix, DVector},
};
use rand::prelude::*;

/// Random SPD system `A^T A x = b`, shifted to keep it well conditioned.
fn random_spd_system(n: usize, rng: &mut impl Rng) -> (DMatrix<f64>, DVector<f64>) {
    let a = DMatrix::from_fn(n, n, |_, _| rng.gen_range(-1.0..1.0));
    let spd = a.transpose() * &a + DMatrix::identity(n, n) * n as f64;
    let b = DVector::from_fn(n, |_, _| rng.gen_range(-1.0..1.0));
    (spd, b)
}

fn bench_solve_methods(c: &mut Criterion) {
    let mut group = c.benchmark_group("linear_solve");
    let mut rng = StdRng::seed_from_u64(42);

    for n in [20, 50, 100] {
        let (a, b) = random_spd_system(n, &mut rng);

        for method in SolveMethod::ALL {
            group.bench_with_input(BenchmarkId::new(method.name(), n), &n, |bench, _| {
                bench.iter(|| method.solve(black_box(&a), black_box(&b)))
            });
        }
    }

    group.finish();
}

fn bench_accuracy_report(c: &mut Criterion) {
    // Residual of each method relative to the SVD solution, printed once.
    let mut rng = StdRng::seed_from_u64(7);
    let (a, b) = random_spd_system(50, &mut rng);
    let reference = SolveMethod::Svd.solve(&a, &b).expect("SVD solve");

    for method in SolveMethod::ALL {
        match method.solve(&a, &b) {
            Ok(x) => println!(
                "{:<28} residual {:>12.3e}  error {:>12.3e}",
                method.name(),
                (&a * &x - &b).norm(),
                (&x - &reference).norm()
            ),
            Err(e) => println!("{:<28} {}", method.name(), e),
        }
    }

    c.bench_function("ldlt_50", |bench| {
        bench.iter(|| SolveMethod::Ldlt.solve(black_box(&a), black_box(&b)))
    });
}

criterion_group!(benches, bench_solve_methods, bench_accuracy_report);
criterion_main!(benches);
