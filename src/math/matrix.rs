//! Dense matrix helpers on top of `nalgebra`.
//!
//! The regression code needs a handful of primitives beyond what `DMatrix`
//! offers directly:
//!
//! - building a row-major design matrix from nested rows
//! - prepending an intercept column
//! - in-place column scaling (used by standardisation)
//! - inverting the normal-equation matrix `XᵀX`, with an explicit fallback to
//!   the Moore–Penrose pseudo-inverse when it is singular
//!
//! Fallback policy: try a direct LU inverse first. If that fails (or yields
//! non-finite entries) we compute a thin SVD and zero every reciprocal whose
//! singular value is at or below [`PINV_TOL`]. An SVD that does not converge is
//! reported as an error, never swallowed.

use nalgebra::{DMatrix, DVector};
use tracing::warn;

use crate::error::StatsError;

/// Singular values at or below this are treated as zero in the pseudo-inverse.
pub const PINV_TOL: f64 = 1e-12;

/// How [`invert_or_pinv`] obtained its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InverseKind {
    Direct,
    Pseudo,
}

/// Build an `n × k` matrix from `n` rows of equal length `k`.
pub fn matrix_from_rows(rows: &[Vec<f64>]) -> Result<DMatrix<f64>, StatsError> {
    let Some(first) = rows.first() else {
        return Err(StatsError::empty("design matrix has no rows"));
    };
    let k = first.len();
    if k == 0 {
        return Err(StatsError::empty("design matrix has no columns"));
    }
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != k) {
        return Err(StatsError::invalid(format!(
            "ragged design matrix: row {i} has {} columns, expected {k}",
            row.len()
        )));
    }
    Ok(DMatrix::from_fn(rows.len(), k, |i, j| rows[i][j]))
}

/// Return a copy of `x` with a column of ones prepended.
pub fn add_intercept_column(x: &DMatrix<f64>) -> DMatrix<f64> {
    x.clone().insert_column(0, 1.0)
}

/// Multiply column `j` of `x` by `factor` in place.
pub fn scale_column(x: &mut DMatrix<f64>, j: usize, factor: f64) {
    x.column_mut(j).scale_mut(factor);
}

/// Moore–Penrose pseudo-inverse via thin SVD.
pub fn pseudo_inverse(a: &DMatrix<f64>) -> Result<DMatrix<f64>, StatsError> {
    // max_niter = 0 means "iterate until convergence".
    let svd = a
        .clone()
        .try_svd(true, true, f64::EPSILON, 0)
        .ok_or_else(|| StatsError::invalid("SVD decomposition failed to converge"))?;

    let (Some(u), Some(v_t)) = (svd.u.as_ref(), svd.v_t.as_ref()) else {
        return Err(StatsError::invalid("SVD decomposition did not produce U and Vᵀ"));
    };

    let sigma_inv = DMatrix::from_diagonal(&DVector::from_iterator(
        svd.singular_values.len(),
        svd.singular_values
            .iter()
            .map(|&s| if s > PINV_TOL { 1.0 / s } else { 0.0 }),
    ));

    // A⁺ = V Σ⁺ Uᵀ
    Ok(v_t.transpose() * sigma_inv * u.transpose())
}

/// Invert a square matrix, falling back to the pseudo-inverse when singular.
pub fn invert_or_pinv(a: &DMatrix<f64>) -> Result<(DMatrix<f64>, InverseKind), StatsError> {
    if !a.is_square() {
        return Err(StatsError::invalid(format!(
            "cannot invert a {}x{} matrix",
            a.nrows(),
            a.ncols()
        )));
    }

    if let Some(inv) = a.clone().try_inverse() {
        if inv.iter().all(|v| v.is_finite()) {
            return Ok((inv, InverseKind::Direct));
        }
    }

    warn!(
        dim = a.nrows(),
        "normal-equation matrix is singular; using SVD pseudo-inverse"
    );
    let pinv = pseudo_inverse(a)?;
    Ok((pinv, InverseKind::Pseudo))
}
