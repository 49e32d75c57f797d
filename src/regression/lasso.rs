//! L1-penalised regression (LASSO), linear and logistic.
//!
//! Objectives, with `α_eff = α / n` and the intercept (when present) neither
//! penalised nor standardised:
//!
//! ```text
//! linear:   (1/2n) ‖y - Xβ‖²                          + α_eff ‖β‖₁
//! logistic: (1/n)  Σ [ln(1 + e^{x_iβ}) - y_i x_iβ]    + α_eff ‖β‖₁
//! ```
//!
//! Solvers:
//! - linear: cyclic coordinate descent with soft-thresholding. A running
//!   residual `r = y - Xβ` is kept so each coordinate update costs `O(n)`.
//! - logistic: proximal gradient (ISTA). The initial step is the reciprocal of
//!   the Lipschitz bound `max_j ‖X_j‖² / 4n`; when a proposal does not lower
//!   the objective the step is halved (at most `max_backtracks` times) and the
//!   halved step carries over to later iterations.
//!
//! Both stop once the largest coordinate change drops below `tol`, or after
//! `max_iter` sweeps. Classical SE / t / p are not defined for penalised fits
//! and are reported as `NaN`.

use nalgebra::{DMatrix, DVector};
use tracing::{debug, warn};

use crate::domain::{LassoOptions, RegressionResult};
use crate::error::StatsError;
use crate::math::add_intercept_column;
use crate::regression::ols::{
    gaussian_log_likelihood, information_criteria, r_squared, total_sum_of_squares,
};
use crate::regression::standardize::standardize_columns;

/// Floor for `(1/n)‖X_j‖²` so a zero column does not divide by zero.
const GRAM_FLOOR: f64 = 1e-8;
/// Linear predictor magnitude beyond which the logistic link is saturated.
const LOGIT_SATURATION: f64 = 20.0;
/// Probability clamp for the Bernoulli log-likelihood.
const PROB_EPS: f64 = 1e-12;

/// `S(z, a) = sign(z) · max(|z| - a, 0)`.
pub fn soft_threshold(z: f64, a: f64) -> f64 {
    if z > a {
        z - a
    } else if z < -a {
        z + a
    } else {
        0.0
    }
}

/// LASSO with the default solver settings ([`LassoOptions::default`]).
pub fn lasso(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
    alpha: f64,
    use_logistic: bool,
    with_intercept: bool,
) -> Result<RegressionResult, StatsError> {
    lasso_with_options(x, y, alpha, use_logistic, with_intercept, &LassoOptions::default())
}

/// LASSO with explicit tolerance / iteration limits.
///
/// `x` must not contain an intercept column; set `with_intercept` instead.
/// Returned coefficients are on the original (unstandardised) scale, with the
/// intercept first when requested.
pub fn lasso_with_options(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
    alpha: f64,
    use_logistic: bool,
    with_intercept: bool,
    opts: &LassoOptions,
) -> Result<RegressionResult, StatsError> {
    let (n, p) = x.shape();
    if n == 0 || p == 0 || y.is_empty() {
        return Err(StatsError::empty("LASSO input is empty"));
    }
    if y.len() != n {
        return Err(StatsError::invalid(format!(
            "LASSO length mismatch: X has {n} rows, y has {} values",
            y.len()
        )));
    }
    if !alpha.is_finite() || alpha < 0.0 {
        return Err(StatsError::invalid(format!("LASSO alpha must be finite and >= 0, got {alpha}")));
    }
    if use_logistic && y.iter().any(|v| !(0.0..=1.0).contains(v)) {
        return Err(StatsError::invalid("logistic LASSO response must lie in [0, 1]"));
    }

    let alpha_eff = alpha / n as f64;

    let design = if with_intercept {
        add_intercept_column(x)
    } else {
        x.clone()
    };
    let mut work = design.clone();
    let scaling = standardize_columns(&mut work, with_intercept);

    let beta_std = if use_logistic {
        logistic_ista(&work, y, alpha_eff, with_intercept, opts)
    } else {
        linear_cd(&work, y, alpha_eff, with_intercept, opts)
    };
    let beta = DVector::from_vec(scaling.destandardize(beta_std.as_slice()));

    let eta = &design * &beta;
    if use_logistic {
        Ok(logistic_summary(y, &eta, beta))
    } else {
        Ok(linear_summary(y, &eta, beta))
    }
}

fn linear_cd(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
    alpha: f64,
    with_intercept: bool,
    opts: &LassoOptions,
) -> DVector<f64> {
    let (n, p) = x.shape();
    let nf = n as f64;
    let start = usize::from(with_intercept);

    let col_sq: Vec<f64> = (0..p).map(|j| x.column(j).norm_squared() / nf).collect();
    let gram: Vec<f64> = col_sq.iter().map(|g| if *g == 0.0 { GRAM_FLOOR } else { *g }).collect();

    let mut beta: DVector<f64> = DVector::zeros(p);
    let mut resid = y.clone();

    for iter in 0..opts.max_iter {
        let mut max_change = 0.0f64;

        if with_intercept {
            // Unpenalised coordinate: β0 ← mean(y - Σ_{j≥1} X_j β_j).
            let delta: f64 = resid.mean();
            beta[0] += delta;
            resid.add_scalar_mut(-delta);
            max_change = max_change.max(delta.abs());
        }

        for j in start..p {
            let col = x.column(j);
            let rho = col.dot(&resid) / nf + col_sq[j] * beta[j];
            let mut updated: f64 = soft_threshold(rho, alpha) / gram[j];
            if !updated.is_finite() {
                updated = 0.0;
            }
            let delta: f64 = updated - beta[j];
            if delta != 0.0 {
                resid.axpy(-delta, &col, 1.0);
                beta[j] = updated;
            }
            max_change = max_change.max(delta.abs());
        }

        if max_change < opts.tol {
            debug!(iterations = iter + 1, "linear LASSO converged");
            return beta;
        }
    }

    warn!(max_iter = opts.max_iter, "linear LASSO stopped before converging");
    beta
}

fn logistic_ista(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
    alpha: f64,
    with_intercept: bool,
    opts: &LassoOptions,
) -> DVector<f64> {
    let (n, p) = x.shape();
    let nf = n as f64;

    let max_col_sq = (0..p)
        .map(|j| x.column(j).norm_squared())
        .fold(0.0, f64::max);
    let lipschitz = max_col_sq / nf * 0.25;
    let mut step = if lipschitz > 0.0 { 1.0 / lipschitz } else { 1.0 };

    let mut beta: DVector<f64> = DVector::zeros(p);

    for iter in 0..opts.max_iter {
        let prob = (x * &beta).map(sigmoid);
        let grad = x.tr_mul(&(prob - y)) / nf;

        let current = logistic_objective(x, y, &beta, alpha, with_intercept);
        let mut proposal = prox_step(&beta, &grad, step, alpha, with_intercept);
        for _ in 0..opts.max_backtracks {
            if logistic_objective(x, y, &proposal, alpha, with_intercept) <= current {
                break;
            }
            step *= 0.5;
            proposal = prox_step(&beta, &grad, step, alpha, with_intercept);
        }

        let max_change = (&proposal - &beta).amax();
        beta = proposal;
        if max_change < opts.tol {
            debug!(iterations = iter + 1, step, "logistic LASSO converged");
            return beta;
        }
    }

    warn!(max_iter = opts.max_iter, step, "logistic LASSO stopped before converging");
    beta
}

/// Gradient step followed by the L1 proximal operator; the intercept only
/// takes the gradient step.
fn prox_step(
    beta: &DVector<f64>,
    grad: &DVector<f64>,
    step: f64,
    alpha: f64,
    with_intercept: bool,
) -> DVector<f64> {
    let mut next = beta - grad * step;
    let start = usize::from(with_intercept);
    for v in next.iter_mut().skip(start) {
        *v = soft_threshold(*v, step * alpha);
    }
    next
}

/// Penalised logistic loss. The intercept (column 0 when `with_intercept`) is
/// excluded from the L1 term.
pub fn logistic_objective(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
    beta: &DVector<f64>,
    alpha: f64,
    with_intercept: bool,
) -> f64 {
    let eta = x * beta;
    let loss: f64 = eta
        .iter()
        .zip(y.iter())
        .map(|(&s, &yi)| {
            if s > LOGIT_SATURATION {
                s - yi * s
            } else if s < -LOGIT_SATURATION {
                -yi * s
            } else {
                s.exp().ln_1p() - yi * s
            }
        })
        .sum::<f64>()
        / x.nrows() as f64;

    let start = usize::from(with_intercept);
    let l1: f64 = beta.iter().skip(start).map(|b| b.abs()).sum();
    loss + alpha * l1
}

fn sigmoid(s: f64) -> f64 {
    if s > LOGIT_SATURATION {
        1.0
    } else if s < -LOGIT_SATURATION {
        0.0
    } else {
        1.0 / (1.0 + (-s).exp())
    }
}

fn undefined_inference(k: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    (vec![f64::NAN; k], vec![f64::NAN; k], vec![f64::NAN; k])
}

fn linear_summary(y: &DVector<f64>, fitted: &DVector<f64>, beta: DVector<f64>) -> RegressionResult {
    let (n, k) = (y.len(), beta.len());
    let resid = y - fitted;
    let rss = resid.norm_squared();
    let tss = total_sum_of_squares(y);
    let (r2, adj) = r_squared(rss, tss, n, k);

    let (sigma2, aic, bic) = if n > k {
        let (aic, bic) = information_criteria(gaussian_log_likelihood(rss, n), n, k);
        (rss / (n - k) as f64, aic, bic)
    } else {
        (f64::NAN, f64::NAN, f64::NAN)
    };

    let (std_errors, t_stats, p_values) = undefined_inference(k);
    RegressionResult {
        coeffs: beta.iter().copied().collect(),
        std_errors,
        t_stats,
        p_values,
        resids: resid.iter().copied().collect(),
        sigma2,
        r_squared: r2,
        adj_r_squared: adj,
        aic,
        bic,
    }
}

fn logistic_summary(y: &DVector<f64>, eta: &DVector<f64>, beta: DVector<f64>) -> RegressionResult {
    let (n, k) = (y.len(), beta.len());
    let prob = eta.map(|s| sigmoid(s).clamp(PROB_EPS, 1.0 - PROB_EPS));

    let log_lik: f64 = prob
        .iter()
        .zip(y.iter())
        .map(|(&p, &yi)| yi * p.ln() + (1.0 - yi) * (1.0 - p).ln())
        .sum();

    let y_bar = y.mean();
    let null_log_lik =
        n as f64 * (y_bar * (y_bar + PROB_EPS).ln() + (1.0 - y_bar) * (1.0 - y_bar + PROB_EPS).ln());
    let pseudo_r2 = if null_log_lik != 0.0 {
        1.0 - log_lik / null_log_lik
    } else {
        f64::NAN
    };

    let (aic, bic) = information_criteria(log_lik, n, k);
    let resid = y - prob;
    let (std_errors, t_stats, p_values) = undefined_inference(k);
    RegressionResult {
        coeffs: beta.iter().copied().collect(),
        std_errors,
        t_stats,
        p_values,
        resids: resid.iter().copied().collect(),
        sigma2: f64::NAN,
        r_squared: pseudo_r2,
        adj_r_squared: f64::NAN,
        aic,
        bic,
    }
}
