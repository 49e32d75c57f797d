//! Autocorrelation of one series via full self-correlation.

use crate::domain::CorrelateMode;
use crate::error::StatsError;
use crate::math::{correlate, mean};

/// ACF of `series` for lags `0..max_lag` (fewer if the series is shorter).
///
/// `ACF[k] = Σ_t u_t u_{t+k} / (var · (n - k))` with `u = series - mean` and
/// `var = Σ u² / n`, so each lag is normalised by its own pair count.
pub fn auto_corr_single(series: &[f64], max_lag: usize) -> Result<Vec<f64>, StatsError> {
    let n = series.len();
    if n == 0 {
        return Err(StatsError::empty("input series is empty"));
    }
    if max_lag == 0 {
        return Err(StatsError::invalid("max_lag must be > 0"));
    }

    let mu = mean(series);
    let u: Vec<f64> = series.iter().map(|v| v - mu).collect();
    let var = u.iter().map(|v| v * v).sum::<f64>() / n as f64;
    if !(var.is_finite() && var > 0.0) {
        return Err(StatsError::invalid(format!("series variance must be finite and > 0, got {var}")));
    }

    let full = correlate(&u, &u, CorrelateMode::Full)?;
    let acf = full[n - 1..]
        .iter()
        .take(max_lag)
        .enumerate()
        .map(|(k, c)| c / (var * (n - k) as f64))
        .collect();
    Ok(acf)
}
