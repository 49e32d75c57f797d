//! Ordinary least squares with classical Gaussian inference.
//!
//! We solve the normal equations
//!
//! ```text
//! β = (XᵀX)⁻¹ Xᵀy
//! ```
//!
//! and report standard errors, Student-t statistics and two-sided p-values,
//! R² / adjusted R², and Gaussian AIC/BIC.
//!
//! Implementation choices:
//! - `(XᵀX)⁻¹` is needed anyway for the standard errors, so we invert it once
//!   rather than solving via QR/SVD on `X`.
//! - A singular `XᵀX` (collinear columns) is not an error: we fall back to the
//!   SVD pseudo-inverse (see [`crate::math::invert_or_pinv`]). Coefficients are
//!   then the minimum-norm solution.

use std::f64::consts::PI;

use nalgebra::{DMatrix, DVector};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::domain::RegressionResult;
use crate::error::StatsError;
use crate::math::{add_intercept_column, invert_or_pinv, matrix_from_rows};

/// Fit `y ~ X` from row-major nested rows, optionally prepending an intercept.
pub fn ols(x: &[Vec<f64>], y: &[f64], with_intercept: bool) -> Result<RegressionResult, StatsError> {
    if x.is_empty() || y.is_empty() {
        return Err(StatsError::empty("OLS input is empty"));
    }
    if x.len() != y.len() {
        return Err(StatsError::invalid(format!(
            "OLS length mismatch: X has {} rows, y has {} values",
            x.len(),
            y.len()
        )));
    }

    let mut design = matrix_from_rows(x)?;
    if with_intercept {
        design = add_intercept_column(&design);
    }
    ols_mat(&design, &DVector::from_column_slice(y))
}

/// Fit `y ~ X` for a ready-made design matrix (no intercept is added).
pub fn ols_mat(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<RegressionResult, StatsError> {
    let (n, k) = x.shape();
    if n == 0 || k == 0 || y.is_empty() {
        return Err(StatsError::empty("OLS input is empty"));
    }
    if y.len() != n {
        return Err(StatsError::invalid(format!(
            "OLS length mismatch: X has {n} rows, y has {} values",
            y.len()
        )));
    }
    if n <= k {
        return Err(StatsError::invalid(format!(
            "degrees of freedom n - k = {} must be positive (n={n}, k={k})",
            n as i64 - k as i64
        )));
    }

    let xt = x.transpose();
    let gram = &xt * x;
    let (gram_inv, _) = invert_or_pinv(&gram)?;

    let beta = &gram_inv * (&xt * y);
    let resid = y - x * &beta;
    let rss = resid.norm_squared();

    let df = (n - k) as f64;
    let sigma2 = rss / df;

    let std_errors: Vec<f64> = (0..k).map(|i| (sigma2 * gram_inv[(i, i)]).sqrt()).collect();
    let t_stats: Vec<f64> = beta
        .iter()
        .zip(&std_errors)
        .map(|(b, se)| b / se)
        .collect();

    let t_dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| StatsError::invalid(format!("Student-t distribution with df={df}: {e}")))?;
    let p_values: Vec<f64> = t_stats.iter().map(|&t| two_sided_p(&t_dist, t)).collect();

    let tss = total_sum_of_squares(y);
    let (r_squared, adj_r_squared) = r_squared(rss, tss, n, k);

    let log_lik = gaussian_log_likelihood(rss, n);
    let (aic, bic) = information_criteria(log_lik, n, k);

    Ok(RegressionResult {
        coeffs: beta.iter().copied().collect(),
        std_errors,
        t_stats,
        p_values,
        resids: resid.iter().copied().collect(),
        sigma2,
        r_squared,
        adj_r_squared,
        aic,
        bic,
    })
}

/// Two-sided Student-t p-value. A zero standard error gives `t = ±inf`
/// (p = 0) or `0/0 = NaN` (p undefined).
pub(crate) fn two_sided_p(dist: &StudentsT, t: f64) -> f64 {
    if t.is_nan() {
        f64::NAN
    } else if t.is_infinite() {
        0.0
    } else {
        (2.0 * dist.sf(t.abs())).clamp(0.0, 1.0)
    }
}

/// `Σ (y_i - ȳ)²`.
pub(crate) fn total_sum_of_squares(y: &DVector<f64>) -> f64 {
    let mean = y.mean();
    y.iter().map(|v| (v - mean) * (v - mean)).sum()
}

/// R² and adjusted R²; both `NaN` when `tss == 0` (constant response).
pub(crate) fn r_squared(rss: f64, tss: f64, n: usize, k: usize) -> (f64, f64) {
    if tss <= 0.0 {
        return (f64::NAN, f64::NAN);
    }
    let r2 = 1.0 - rss / tss;
    let adj = if n > k {
        1.0 - (1.0 - r2) * (n as f64 - 1.0) / (n - k) as f64
    } else {
        f64::NAN
    };
    (r2, adj)
}

/// Concentrated Gaussian log-likelihood `-n/2 · (1 + ln(2π·RSS/n))`.
pub(crate) fn gaussian_log_likelihood(rss: f64, n: usize) -> f64 {
    let n = n as f64;
    -0.5 * n * (1.0 + (2.0 * PI * rss / n).ln())
}

/// `(AIC, BIC)` from a log-likelihood with `k` parameters and `n` observations.
pub(crate) fn information_criteria(log_lik: f64, n: usize, k: usize) -> (f64, f64) {
    let k = k as f64;
    let aic = -2.0 * log_lik + 2.0 * k;
    let bic = -2.0 * log_lik + k * (n as f64).ln();
    (aic, bic)
}
