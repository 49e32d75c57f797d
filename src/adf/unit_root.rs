//! Augmented Dickey–Fuller unit-root test.
//!
//! For a (log-)price series `y` and a maximum lag `L`, each candidate lag
//! `p = 0..=L` fits
//!
//! ```text
//! Δy_t = γ·y_{t-1} [+ c] [+ τ·t] + Σ_{i=1..p} φ_i·Δy_{t-i} + ε_t
//! ```
//!
//! on the same sample (the first `L` differences are always dropped, so every
//! candidate sees identical rows and the information criteria are comparable).
//! The ADF statistic is the t-statistic of `γ` in the selected regression.
//!
//! Lag selection:
//! - `AIC` / `BIC`: smallest criterion wins
//! - `t-stat`: most negative statistic wins
//!
//! Left tail tests unit root vs stationarity; right tail tests unit root vs
//! explosive behaviour. Critical values are the tabulated asymptotic ones.

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::domain::{AdfResult, CriticalValues, LagMode, RegressionResult, Tail, Trend};
use crate::error::StatsError;
use crate::math::{mean, sum_sq_dev};
use crate::regression::ols_mat;

/// Minimum number of regression rows for a candidate to be fitted.
pub const MIN_ADF_OBS: usize = 10;

/// Residual (or difference) variance at or below this fraction of the
/// response's mean square counts as an exact fit.
const EXACT_FIT_RATIO: f64 = 1e-20;

/// Build the ADF design for one candidate lag.
///
/// Rows correspond to `Δy[max_lag..]`; columns are `y_{t-1}`, then the
/// deterministic terms of `trend` (constant `1`, trend `1..=T`), then
/// `Δy_{t-1} … Δy_{t-lag}`.
pub fn adf_design(
    series: &[f64],
    trend: Trend,
    lag: usize,
    max_lag: usize,
) -> Result<(DMatrix<f64>, DVector<f64>), StatsError> {
    if lag > max_lag {
        return Err(StatsError::invalid(format!("lag {lag} exceeds max_lag {max_lag}")));
    }
    if series.len() < 2 {
        return Err(StatsError::empty("ADF needs at least two observations"));
    }
    let dy: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();
    if max_lag >= dy.len() {
        return Err(StatsError::invalid(format!(
            "max_lag {max_lag} leaves no rows for a series of {} observations",
            series.len()
        )));
    }

    let rows = dy.len() - max_lag;
    let det = trend.deterministic_columns();
    let cols = 1 + det + lag;

    let x = DMatrix::from_fn(rows, cols, |i, c| {
        let t = max_lag + i;
        match c {
            0 => series[t],
            1 if det >= 1 => 1.0,
            2 if det >= 2 => (i + 1) as f64,
            _ => dy[t - (c - det)],
        }
    });
    let y = DVector::from_column_slice(&dy[max_lag..]);
    Ok((x, y))
}

struct Candidate {
    lag: usize,
    n_obs: usize,
    fit: RegressionResult,
}

fn improves(mode: LagMode, fit: &RegressionResult, best: Option<&Candidate>) -> bool {
    match mode {
        LagMode::Aic => fit.aic < best.map_or(f64::INFINITY, |b| b.fit.aic),
        LagMode::Bic => fit.bic < best.map_or(f64::INFINITY, |b| b.fit.bic),
        LagMode::TStat => match best {
            None => true,
            Some(b) => b.fit.t_stats[0] == 0.0 || fit.t_stats[0] < b.fit.t_stats[0],
        },
    }
}

/// `ss` is a sum of squares taken over `response`; true when it is negligible
/// next to `Σ response²`.
fn is_exact(ss: f64, response: &[f64]) -> bool {
    let scale: f64 = response.iter().map(|v| v * v).sum();
    ss <= EXACT_FIT_RATIO * scale
}

/// Run the ADF test, selecting the lag in `0..=max_lag` by `lag_mode`.
pub fn adf_test(
    series: &[f64],
    trend: Trend,
    max_lag: usize,
    lag_mode: LagMode,
    tail: Tail,
) -> Result<AdfResult, StatsError> {
    if series.is_empty() {
        return Err(StatsError::empty("ADF input series is empty"));
    }
    if series.iter().any(|v| !v.is_finite()) {
        return Err(StatsError::invalid("ADF input series contains non-finite values"));
    }
    let diffs: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();
    if !diffs.is_empty() && is_exact(sum_sq_dev(&diffs, mean(&diffs)), &diffs) {
        return Err(StatsError::invalid(
            "ADF input has constant first differences; nothing stochastic to test",
        ));
    }

    let mut best: Option<Candidate> = None;
    for lag in 0..=max_lag {
        let (x, y) = adf_design(series, trend, lag, max_lag)?;
        if y.len() < MIN_ADF_OBS {
            debug!(lag, rows = y.len(), "ADF candidate skipped: too few rows");
            continue;
        }
        let fit = match ols_mat(&x, &y) {
            Ok(fit) => fit,
            Err(e) => {
                debug!(lag, error = %e, "ADF candidate regression failed");
                continue;
            }
        };
        if !fit.t_stats[0].is_finite() {
            debug!(lag, t_stat = fit.t_stats[0], "ADF candidate skipped: undefined t-statistic");
            continue;
        }
        let rss: f64 = fit.resids.iter().map(|r| r * r).sum();
        if is_exact(rss, y.as_slice()) {
            debug!(lag, sigma2 = fit.sigma2, "ADF candidate skipped: exact fit");
            continue;
        }
        debug!(lag, t_stat = fit.t_stats[0], aic = fit.aic, bic = fit.bic, "ADF candidate");
        if improves(lag_mode, &fit, best.as_ref()) {
            best = Some(Candidate {
                lag,
                n_obs: y.len(),
                fit,
            });
        }
    }

    let Some(Candidate { lag, n_obs, fit }) = best else {
        return Err(StatsError::invalid(
            "ADF test failed: no candidate regression (sample too small or degenerate data)",
        ));
    };
    let t_stat = fit.t_stats[0];
    if fit.aic == f64::INFINITY || fit.bic == f64::INFINITY || t_stat == 0.0 || t_stat.is_nan() {
        return Err(StatsError::invalid(format!(
            "ADF test failed: degenerate selected regression (t={t_stat}, aic={})",
            fit.aic
        )));
    }

    Ok(AdfResult {
        gamma: fit.coeffs[0],
        t_stat,
        p_value: fit.p_values[0],
        used_lag: lag,
        n_obs,
        aic: fit.aic,
        bic: fit.bic,
        method: lag_mode,
        trend,
        criticals: CriticalValues::lookup(trend, tail),
        tail,
        resids: fit.resids,
        coeffs: fit.coeffs,
    })
}

impl AdfResult {
    /// Deterministic-term estimates `(trend, μ̂, τ̂)` from the selected fit.
    pub fn estimate(&self) -> (Trend, f64, f64) {
        let coeff = |i: usize| self.coeffs.get(i).copied().unwrap_or(0.0);
        match self.trend {
            Trend::None => (self.trend, 0.0, 0.0),
            Trend::Constant => (self.trend, coeff(1), 0.0),
            Trend::ConstantTrend => (self.trend, coeff(1), coeff(2)),
        }
    }

    /// Whether the null is rejected at `level` (`"1%"`, `"5%"` or `"10%"`).
    pub fn rejects_at(&self, level: &str) -> Result<bool, StatsError> {
        let cv = self
            .criticals
            .get(level)
            .ok_or_else(|| StatsError::invalid(format!("unknown significance level '{level}'")))?;
        Ok(match self.tail {
            Tail::Left => self.t_stat < cv,
            Tail::Right => self.t_stat > cv,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ar1, random_walk};
    use crate::error::ErrorCode;
    use crate::regression::ols;

    #[test]
    fn design_columns_follow_trend_and_lags() {
        let y = [1.0, 3.0, 2.0, 5.0, 4.0, 8.0];
        // dy = [2, -1, 3, -1, 4]
        let (x, dy) = adf_design(&y, Trend::ConstantTrend, 2, 2).unwrap();
        assert_eq!(x.shape(), (3, 5));
        assert_eq!(dy.as_slice(), &[3.0, -1.0, 4.0]);
        // Row 0 is Δy_3 = y_3 - y_2.
        assert_eq!(x.row(0).iter().copied().collect::<Vec<_>>(), vec![2.0, 1.0, 1.0, -1.0, 2.0]);
        assert_eq!(x[(2, 0)], 4.0);
        assert_eq!(x[(2, 2)], 3.0);

        let (x, _) = adf_design(&y, Trend::None, 0, 2).unwrap();
        assert_eq!(x.shape(), (3, 1));
        assert!(adf_design(&y, Trend::None, 3, 2).is_err());
        assert!(adf_design(&y, Trend::None, 0, 5).is_err());
    }

    #[test]
    fn random_walk_keeps_the_unit_root() {
        let accepted = (0..10)
            .filter(|seed| {
                let w = random_walk(1000, 1.0, 100 + seed).unwrap();
                let res = adf_test(&w, Trend::Constant, 5, LagMode::Aic, Tail::Left).unwrap();
                res.t_stat > -2.86
            })
            .count();
        assert!(accepted >= 7, "unit root kept in only {accepted}/10 walks");
    }

    #[test]
    fn stationary_ar1_rejects_the_unit_root() {
        let x = ar1(1000, 0.3, 1.0, 5).unwrap();
        let res = adf_test(&x, Trend::Constant, 5, LagMode::Aic, Tail::Left).unwrap();
        assert!(res.t_stat < -3.43, "t = {}", res.t_stat);
        assert!(res.rejects_at("1%").unwrap());
        assert_eq!(res.n_obs, 999 - 5);
        assert_eq!(res.criticals.five_pct, -2.86);
        assert!(res.gamma < 0.0);
    }

    #[test]
    fn statistic_matches_standalone_regression_at_selected_lag() {
        let x = ar1(400, 0.5, 1.0, 17).unwrap();
        let max_lag = 4;
        for mode in [LagMode::Aic, LagMode::Bic, LagMode::TStat] {
            let res = adf_test(&x, Trend::Constant, max_lag, mode, Tail::Left).unwrap();
            let p = res.used_lag;

            let mut rows = Vec::new();
            let mut target = Vec::new();
            for t in (max_lag + 1)..x.len() {
                let mut row = vec![x[t - 1]];
                row.extend((1..=p).map(|i| x[t - i] - x[t - i - 1]));
                rows.push(row);
                target.push(x[t] - x[t - 1]);
            }
            // Intercept lands in column 0 here, the level in column 1.
            let reference = ols(&rows, &target, true).unwrap();
            assert!(
                (reference.t_stats[1] - res.t_stat).abs() < 1e-8,
                "{mode}: {} vs {}",
                reference.t_stats[1],
                res.t_stat
            );
            assert!((reference.coeffs[0] - res.estimate().1).abs() < 1e-8);
        }
    }

    #[test]
    fn t_stat_mode_picks_the_most_negative_candidate() {
        let x = ar1(300, 0.2, 1.0, 3).unwrap();
        let chosen = adf_test(&x, Trend::Constant, 3, LagMode::TStat, Tail::Left).unwrap();
        for lag in 0..=3 {
            let (d, y) = adf_design(&x, Trend::Constant, lag, 3).unwrap();
            let t = ols_mat(&d, &y).unwrap().t_stats[0];
            assert!(chosen.t_stat <= t + 1e-12, "lag {lag}: {t} < {}", chosen.t_stat);
        }
    }

    #[test]
    fn right_tail_uses_positive_criticals() {
        let x = ar1(200, 0.1, 1.0, 8).unwrap();
        let res = adf_test(&x, Trend::ConstantTrend, 2, LagMode::Bic, Tail::Right).unwrap();
        assert_eq!(res.criticals.one_pct, 3.96);
        assert!(!res.rejects_at("5%").unwrap());
        assert!(res.rejects_at("2%").is_err());
        let (trend, _, tau) = res.estimate();
        assert_eq!(trend, Trend::ConstantTrend);
        assert_eq!(tau, res.coeffs[2]);
    }

    #[test]
    fn short_or_degenerate_series_fail() {
        let short: Vec<f64> = (0..8).map(|i| (i as f64).sin()).collect();
        let err = adf_test(&short, Trend::Constant, 1, LagMode::Aic, Tail::Left).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidValue);

        assert_eq!(
            adf_test(&[], Trend::Constant, 1, LagMode::Aic, Tail::Left).unwrap_err().code(),
            ErrorCode::EmptyValue
        );
        let mut bad = ar1(100, 0.5, 1.0, 1).unwrap();
        bad[10] = f64::NAN;
        assert!(adf_test(&bad, Trend::Constant, 1, LagMode::Aic, Tail::Left).is_err());
    }

    #[test]
    fn deterministic_drift_is_invalid() {
        let drift: Vec<f64> = (0..200).map(|i| 0.01 * i as f64).collect();
        for trend in [Trend::None, Trend::Constant, Trend::ConstantTrend] {
            let err = adf_test(&drift, trend, 2, LagMode::Aic, Tail::Left).unwrap_err();
            assert_eq!(err.code(), ErrorCode::InvalidValue, "{trend}");
        }
        let flat = vec![3.0; 100];
        let err = adf_test(&flat, Trend::Constant, 1, LagMode::TStat, Tail::Left).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidValue);
    }

    #[test]
    fn noisy_drift_is_still_tested() {
        // Drift plus white noise keeps a stochastic component.
        let noise = ar1(200, 0.0, 1.0, 17).unwrap();
        let series: Vec<f64> = noise.iter().enumerate().map(|(i, e)| 0.01 * i as f64 + e).collect();
        let res = adf_test(&series, Trend::ConstantTrend, 2, LagMode::Aic, Tail::Left).unwrap();
        assert!(res.t_stat.is_finite());
        assert!((0.0..=1.0).contains(&res.p_value));
    }
}
