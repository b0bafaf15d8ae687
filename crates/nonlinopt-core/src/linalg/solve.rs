//! Dense linear solves `A x = b` through a selectable decomposition.
//!
//! Methods fall into two families with different failure contracts:
//!
//! - **Cholesky family** ([`SolveMethod::Llt`], [`SolveMethod::Ldlt`]): require a
//!   square, numerically symmetric matrix and signal
//!   [`SolveError::NotPositiveDefinite`] when the factorization breaks down.
//! - **Permissive family** (LU, QR, SVD): never signal on rank deficiency.
//!   When the decomposition reports a pivot at roundoff level, or the system
//!   is rectangular, they return the SVD least-squares / minimum-norm solution.
//!
//! A pivot or singular value counts as zero when it is at most
//! `PIVOT_TOLERANCE * n * scale`, a few ulps per dimension relative to the
//! largest one. Badly scaled but full-rank systems are solved as given.
//!
//! Callers that care about conditioning must check it themselves; the
//! permissive family degrades silently.

use crate::{
    error::{SolveError, SolveResult},
    types::{DMatrix, DVector, Scalar},
};
use nalgebra::linalg::UDU;
use num_traits::Float;
use std::fmt;

/// Iteration budget per dimension for the SVD.
const SVD_ITERATIONS_PER_DIM: usize = 200;

/// Available decompositions for solving a dense linear system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolveMethod {
    /// Explicit inverse `A^-1 b`; square matrices only, fails when singular.
    PseudoInverse,
    /// LU with full pivoting.
    FullPivLu,
    /// LU with partial (row) pivoting.
    PartialPivLu,
    /// Householder QR.
    HouseholderQr,
    /// Householder QR with column pivoting.
    ColPivHouseholderQr,
    /// Cholesky `L L^T`.
    Llt,
    /// Symmetric `U D U^T` factorization, tolerant of indefinite matrices.
    Ldlt,
    /// Singular value decomposition, least-squares / minimum-norm.
    Svd,
}

impl SolveMethod {
    /// Every method, in benchmark order.
    pub const ALL: [SolveMethod; 8] = [
        SolveMethod::PseudoInverse,
        SolveMethod::FullPivLu,
        SolveMethod::PartialPivLu,
        SolveMethod::HouseholderQr,
        SolveMethod::ColPivHouseholderQr,
        SolveMethod::Llt,
        SolveMethod::Ldlt,
        SolveMethod::Svd,
    ];

    /// Short human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            SolveMethod::PseudoInverse => "pseudo_inverse",
            SolveMethod::FullPivLu => "lu::full_piv",
            SolveMethod::PartialPivLu => "lu::partial_piv",
            SolveMethod::HouseholderQr => "qr::householder",
            SolveMethod::ColPivHouseholderQr => "qr::col_piv_householder",
            SolveMethod::Llt => "cholesky::llt",
            SolveMethod::Ldlt => "cholesky::ldlt",
            SolveMethod::Svd => "svd",
        }
    }

    /// Whether the method belongs to the Cholesky family.
    pub fn is_cholesky_family(&self) -> bool {
        matches!(self, SolveMethod::Llt | SolveMethod::Ldlt)
    }

    /// Solves `A x = b` with this method.
    pub fn solve<T: Scalar>(&self, a: &DMatrix<T>, b: &DVector<T>) -> SolveResult<DVector<T>> {
        match self {
            SolveMethod::PseudoInverse => solve_pseudo_inverse(a, b),
            SolveMethod::FullPivLu => solve_full_piv_lu(a, b),
            SolveMethod::PartialPivLu => solve_partial_piv_lu(a, b),
            SolveMethod::HouseholderQr => solve_householder_qr(a, b),
            SolveMethod::ColPivHouseholderQr => solve_col_piv_householder_qr(a, b),
            SolveMethod::Llt => solve_llt(a, b),
            SolveMethod::Ldlt => solve_ldlt(a, b),
            SolveMethod::Svd => solve_svd(a, b),
        }
    }
}

impl fmt::Display for SolveMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Solves `A x = b` through the explicit inverse of `A`.
pub fn solve_pseudo_inverse<T: Scalar>(a: &DMatrix<T>, b: &DVector<T>) -> SolveResult<DVector<T>> {
    check_system(a, b)?;
    check_square(a)?;
    let inverse = a
        .clone()
        .try_inverse()
        .ok_or_else(|| SolveError::singular("matrix has no inverse"))?;
    Ok(inverse * b)
}

/// Solves `A x = b` with a fully pivoted LU decomposition.
pub fn solve_full_piv_lu<T: Scalar>(a: &DMatrix<T>, b: &DVector<T>) -> SolveResult<DVector<T>> {
    check_system(a, b)?;
    if !a.is_square() {
        return least_squares_fallback(SolveMethod::FullPivLu, a, b);
    }
    let lu = a.clone().full_piv_lu();
    if is_rank_deficient(&lu.u().diagonal()) {
        return least_squares_fallback(SolveMethod::FullPivLu, a, b);
    }
    lu.solve(b)
        .map_or_else(|| least_squares_fallback(SolveMethod::FullPivLu, a, b), Ok)
}

/// Solves `A x = b` with a partially pivoted LU decomposition.
pub fn solve_partial_piv_lu<T: Scalar>(
    a: &DMatrix<T>,
    b: &DVector<T>,
) -> SolveResult<DVector<T>> {
    check_system(a, b)?;
    if !a.is_square() {
        return least_squares_fallback(SolveMethod::PartialPivLu, a, b);
    }
    let lu = a.clone().lu();
    if is_rank_deficient(&lu.u().diagonal()) {
        return least_squares_fallback(SolveMethod::PartialPivLu, a, b);
    }
    lu.solve(b)
        .map_or_else(|| least_squares_fallback(SolveMethod::PartialPivLu, a, b), Ok)
}

/// Solves `A x = b` with a Householder QR decomposition.
pub fn solve_householder_qr<T: Scalar>(
    a: &DMatrix<T>,
    b: &DVector<T>,
) -> SolveResult<DVector<T>> {
    check_system(a, b)?;
    if !a.is_square() {
        return least_squares_fallback(SolveMethod::HouseholderQr, a, b);
    }
    let qr = a.clone().qr();
    if is_rank_deficient(&qr.r().diagonal()) {
        return least_squares_fallback(SolveMethod::HouseholderQr, a, b);
    }
    qr.solve(b)
        .map_or_else(|| least_squares_fallback(SolveMethod::HouseholderQr, a, b), Ok)
}

/// Solves `A x = b` with a column-pivoted Householder QR decomposition.
pub fn solve_col_piv_householder_qr<T: Scalar>(
    a: &DMatrix<T>,
    b: &DVector<T>,
) -> SolveResult<DVector<T>> {
    check_system(a, b)?;
    if !a.is_square() {
        return least_squares_fallback(SolveMethod::ColPivHouseholderQr, a, b);
    }
    let qr = a.clone().col_piv_qr();
    if is_rank_deficient(&qr.r().diagonal()) {
        return least_squares_fallback(SolveMethod::ColPivHouseholderQr, a, b);
    }
    qr.solve(b)
        .map_or_else(|| least_squares_fallback(SolveMethod::ColPivHouseholderQr, a, b), Ok)
}

/// Solves `A x = b` with a Cholesky `L L^T` decomposition.
///
/// Fails with [`SolveError::NotPositiveDefinite`] unless `A` is symmetric
/// positive definite.
pub fn solve_llt<T: Scalar>(a: &DMatrix<T>, b: &DVector<T>) -> SolveResult<DVector<T>> {
    check_system(a, b)?;
    check_square(a)?;
    check_symmetric(a)?;
    let cholesky = a
        .clone()
        .cholesky()
        .ok_or_else(|| SolveError::not_positive_definite("Cholesky factorization failed"))?;
    Ok(cholesky.solve(b))
}

/// Solves `A x = b` with a symmetric `U D U^T` factorization.
///
/// Accepts indefinite matrices, but fails with
/// [`SolveError::NotPositiveDefinite`] when `A` is not symmetric or a pivot
/// of `D` is zero, non-finite, or at roundoff level relative to the largest
/// diagonal entry of `A`.
pub fn solve_ldlt<T: Scalar>(a: &DMatrix<T>, b: &DVector<T>) -> SolveResult<DVector<T>> {
    check_system(a, b)?;
    check_square(a)?;
    check_symmetric(a)?;

    let scale = a.diagonal().amax();
    let udu = UDU::new(a.clone())
        .ok_or_else(|| SolveError::not_positive_definite("zero pivot in UDU factorization"))?;
    let threshold = pivot_threshold(scale, a.nrows());
    if udu
        .d
        .iter()
        .any(|pivot| !Float::is_finite(*pivot) || Float::abs(*pivot) <= threshold)
    {
        return Err(SolveError::not_positive_definite(
            "pivot below tolerance in UDU factorization",
        ));
    }

    let y = udu
        .u
        .solve_upper_triangular(b)
        .ok_or_else(|| SolveError::singular("triangular factor is singular"))?;
    let z = y.component_div(&udu.d);
    udu.u
        .tr_solve_upper_triangular(&z)
        .ok_or_else(|| SolveError::singular("triangular factor is singular"))
}

/// Solves `A x = b` in the least-squares sense with an SVD.
///
/// Singular values at roundoff level relative to the largest one are treated
/// as zero, which yields the minimum-norm solution for rank-deficient systems.
pub fn solve_svd<T: Scalar>(a: &DMatrix<T>, b: &DVector<T>) -> SolveResult<DVector<T>> {
    check_system(a, b)?;
    let max_iterations = SVD_ITERATIONS_PER_DIM * a.nrows().max(a.ncols());
    let svd = a
        .clone()
        .try_svd(true, true, T::EPSILON, max_iterations)
        .ok_or_else(|| SolveError::singular("SVD did not converge"))?;
    let cutoff = pivot_threshold(svd.singular_values.amax(), a.nrows().max(a.ncols()));
    svd.solve(b, cutoff).map_err(SolveError::singular)
}

fn least_squares_fallback<T: Scalar>(
    method: SolveMethod,
    a: &DMatrix<T>,
    b: &DVector<T>,
) -> SolveResult<DVector<T>> {
    log::debug!(
        "{method}: {}x{} system is rank deficient or rectangular, using SVD least squares",
        a.nrows(),
        a.ncols()
    );
    solve_svd(a, b)
}

fn pivot_threshold<T: Scalar>(scale: T, dim: usize) -> T {
    T::PIVOT_TOLERANCE * <T as Scalar>::from_f64(dim as f64) * scale
}

fn is_rank_deficient<T: Scalar>(pivots: &DVector<T>) -> bool {
    let largest = pivots.amax();
    let threshold = pivot_threshold(largest, pivots.len());
    largest == T::zero() || pivots.iter().any(|p| Float::abs(*p) <= threshold)
}

fn check_system<T: Scalar>(a: &DMatrix<T>, b: &DVector<T>) -> SolveResult<()> {
    if a.is_empty() {
        return Err(SolveError::invalid_argument("empty system"));
    }
    if a.nrows() != b.len() {
        return Err(SolveError::dimension_mismatch(
            format!("right-hand side of length {}", a.nrows()),
            format!("length {}", b.len()),
        ));
    }
    Ok(())
}

fn check_square<T: Scalar>(a: &DMatrix<T>) -> SolveResult<()> {
    if a.is_square() {
        Ok(())
    } else {
        Err(SolveError::dimension_mismatch(
            "square matrix",
            format!("{}x{} matrix", a.nrows(), a.ncols()),
        ))
    }
}

fn check_symmetric<T: Scalar>(a: &DMatrix<T>) -> SolveResult<()> {
    let asymmetry = (a - a.transpose()).norm();
    // Written so that NaN entries fail the check.
    if asymmetry <= T::SYMMETRY_TOLERANCE * a.norm() {
        Ok(())
    } else {
        Err(SolveError::not_positive_definite("matrix is not symmetric"))
    }
}
