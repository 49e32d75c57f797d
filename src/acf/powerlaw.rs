//! Power-law fit of ACF decay: `ACF(k) ≈ A · k^{-γ}`.
//!
//! Taking logs gives the linear model `ln ACF(k) = ln A - γ ln k`, fitted by
//! OLS with intercept. Only strictly positive, finite ACF values can enter
//! the regression.

use crate::domain::LogAcfFit;
use crate::error::StatsError;
use crate::regression::ols;

/// Fewer positive lags than this and [`auto_fit_range`] falls back to a fixed
/// window.
const MIN_POSITIVE_LAGS: usize = 20;

fn is_positive(v: f64) -> bool {
    v > 0.0 && !v.is_nan()
}

/// Fit over the first run of consecutive positive lags starting at `k >= 1`.
pub fn fit_log_acf(acf: &[f64], min_points: usize) -> Result<LogAcfFit, StatsError> {
    let n = acf.len();
    if n < 3 {
        return Err(StatsError::invalid(format!("ACF needs at least 3 lags for a fit, got {n}")));
    }

    let start = (1..n)
        .find(|&k| is_positive(acf[k]))
        .ok_or_else(|| StatsError::invalid("ACF has no positive lag"))?;
    let end = (start..n).find(|&k| !is_positive(acf[k])).unwrap_or(n);

    if end - start < min_points {
        return Err(StatsError::invalid(format!(
            "positive ACF run has {} lags, need at least {min_points}",
            end - start
        )));
    }
    fit_lags(acf, start, end)
}

/// Fit over the positive lags inside `[start, end)`, e.g. the window chosen by
/// [`auto_fit_range`].
pub fn fit_log_acf_window(
    acf: &[f64],
    start: usize,
    end: usize,
    min_points: usize,
) -> Result<LogAcfFit, StatsError> {
    let start = start.max(1);
    let end = end.min(acf.len());
    if start >= end {
        return Err(StatsError::invalid(format!("empty ACF fit window [{start}, {end})")));
    }
    let usable = acf[start..end].iter().filter(|v| is_positive(**v)).count();
    if usable < min_points {
        return Err(StatsError::invalid(format!(
            "ACF window [{start}, {end}) has {usable} positive lags, need at least {min_points}"
        )));
    }
    fit_lags(acf, start, end)
}

fn fit_lags(acf: &[f64], start: usize, end: usize) -> Result<LogAcfFit, StatsError> {
    let (x, y): (Vec<Vec<f64>>, Vec<f64>) = (start..end)
        .filter(|&k| is_positive(acf[k]))
        .map(|k| (vec![(k as f64).ln()], acf[k].ln()))
        .unzip();

    let model = ols(&x, &y, true)
        .map_err(|e| StatsError::invalid(format!("log-log ACF regression failed: {}", e.message())))?;
    if model.coeffs.len() < 2 {
        return Err(StatsError::invalid("log-log ACF regression has no slope term"));
    }

    Ok(LogAcfFit {
        gamma: -model.coeffs[1],
        intercept: model.coeffs[0],
        r_squared: model.r_squared,
        lag_range: (start, end),
        model,
    })
}

/// Central 60% of the positive lags `k >= 2`, as `(start, end)`.
///
/// With fewer than 20 positive lags returns `(2, ⌊0.3·n⌋)`. The window is at
/// least 5 lags wide and `end` stays below `n`.
pub fn auto_fit_range(acf: &[f64]) -> (usize, usize) {
    let n = acf.len();
    let valid: Vec<usize> = (2..n).filter(|&k| acf[k] > 0.0).collect();
    if valid.len() < MIN_POSITIVE_LAGS {
        return (2, (n as f64 * 0.3) as usize);
    }

    let at = |q: f64| valid[(valid.len() as f64 * q) as usize];
    let start = at(0.2);
    let mut end = at(0.8);
    if end <= start + 5 {
        end = start + 5;
    }
    if end >= n {
        end = n - 1;
    }
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acf::MultiSegments;
    use crate::data::ar1_segments;

    fn power_law(n: usize, gamma: f64) -> Vec<f64> {
        (0..n)
            .map(|k| if k == 0 { 1.0 } else { 0.8 * (k as f64).powf(-gamma) })
            .collect()
    }

    #[test]
    fn exact_power_law_is_recovered() {
        let acf = power_law(40, 0.7);
        let fit = fit_log_acf(&acf, 5).unwrap();
        assert!((fit.gamma - 0.7).abs() < 1e-10, "gamma {}", fit.gamma);
        assert!((fit.intercept - 0.8f64.ln()).abs() < 1e-10);
        assert!((fit.r_squared - 1.0).abs() < 1e-10);
        assert_eq!(fit.lag_range, (1, 40));
    }

    #[test]
    fn fit_stops_at_first_non_positive_lag() {
        let mut acf = power_law(30, 0.5);
        acf[10] = -0.01;
        acf[20] = f64::NAN;
        let fit = fit_log_acf(&acf, 3).unwrap();
        assert_eq!(fit.lag_range, (1, 10));
        assert_eq!(fit.model.resids.len(), 9);
    }

    #[test]
    fn short_or_non_positive_input_fails() {
        assert!(fit_log_acf(&[1.0, 0.5], 1).is_err());
        assert!(fit_log_acf(&[1.0, -0.2, -0.1, 0.0], 1).is_err());
        let acf = [1.0, 0.5, 0.3, -0.1, 0.2];
        assert!(fit_log_acf(&acf, 3).is_err());
    }

    #[test]
    fn auto_range_takes_central_positive_lags() {
        let acf = power_law(101, 0.4);
        // 99 positive lags from k = 2: indices 19 and 79 of that list.
        assert_eq!(auto_fit_range(&acf), (21, 81));
    }

    #[test]
    fn auto_range_falls_back_when_few_positive_lags() {
        let mut acf = vec![-0.1; 50];
        acf[0] = 1.0;
        acf[3] = 0.2;
        assert_eq!(auto_fit_range(&acf), (2, (50.0 * 0.3) as usize));
    }

    #[test]
    fn window_fit_skips_non_positive_lags() {
        let mut acf = power_law(60, 0.9);
        acf[30] = -0.05;
        let fit = fit_log_acf_window(&acf, 21, 41, 5).unwrap();
        assert!((fit.gamma - 0.9).abs() < 1e-10);
        assert_eq!(fit.model.resids.len(), 19);
        assert!(fit_log_acf_window(&acf, 10, 10, 1).is_err());
    }

    #[test]
    fn ar1_decay_has_positive_exponent() {
        let segs = MultiSegments::new(ar1_segments(5, 2000, 0.6, 1.0, 7).unwrap()).unwrap();
        let acf = segs.auto_corr(40).unwrap();
        assert!((acf[1] - 0.6).abs() < 0.025, "acf[1] = {}", acf[1]);

        let fit = fit_log_acf(&acf, 3).unwrap();
        assert!(fit.gamma > 0.0, "gamma {}", fit.gamma);
        assert!((fit.model.coeffs[1] + fit.gamma).abs() < 1e-12);

        // Geometric decay: ln ACF[k] falls by ln(phi) per lag.
        let lags: Vec<f64> = (1..=4).map(|k| k as f64).collect();
        let log_acf: Vec<f64> = (1..=4).map(|k| acf[k].ln()).collect();
        let decay = crate::regression::simple_regression(&lags, &log_acf).unwrap();
        assert!((decay.slope - 0.6f64.ln()).abs() < 0.1, "slope {}", decay.slope);
    }
}
