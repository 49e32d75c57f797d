//! Ljung–Box portmanteau test for residual autocorrelation.
//!
//! ```text
//! ρ_k = Σ_{t≥k} (r_t - r̄)(r_{t-k} - r̄) / Σ_t (r_t - r̄)²
//! Q   = n(n+2) Σ_{k=1..L} ρ_k² / (n - k)          ~ χ²_L under H0
//! ```
//!
//! H0: the residuals are white noise. `reject == true` means significant
//! autocorrelation at level `alpha`.

use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::domain::LjungBoxResult;
use crate::error::StatsError;
use crate::math::{mean, sum_sq_dev};

pub fn ljung_box_test(resid: &[f64], lags: usize, alpha: f64) -> Result<LjungBoxResult, StatsError> {
    let n = resid.len();
    if n == 0 {
        return Err(StatsError::empty("Ljung-Box residuals are empty"));
    }
    if lags == 0 || lags >= n {
        return Err(StatsError::invalid(format!(
            "Ljung-Box needs 0 < lags < n, got lags={lags}, n={n}"
        )));
    }
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(StatsError::invalid(format!("alpha must lie in (0, 1), got {alpha}")));
    }

    let r_bar = mean(resid);
    let denom = sum_sq_dev(resid, r_bar);
    if denom == 0.0 {
        // Constant residuals carry no autocorrelation.
        return Ok(LjungBoxResult {
            reject: false,
            q: 0.0,
            p_value: 1.0,
        });
    }

    let nf = n as f64;
    let q = (1..=lags)
        .map(|k| {
            let num: f64 = resid[k..]
                .iter()
                .zip(resid)
                .map(|(a, b)| (a - r_bar) * (b - r_bar))
                .sum();
            let rho = num / denom;
            rho * rho / (nf - k as f64)
        })
        .sum::<f64>()
        * nf
        * (nf + 2.0);

    let chi2 = ChiSquared::new(lags as f64)
        .map_err(|e| StatsError::invalid(format!("chi-squared distribution with {lags} dof: {e}")))?;
    let p_value = chi2.sf(q).clamp(0.0, 1.0);

    Ok(LjungBoxResult {
        reject: p_value < alpha,
        q,
        p_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ar1, white_noise};
    use crate::error::ErrorCode;

    #[test]
    fn white_noise_is_rarely_rejected() {
        // Nominal size is 1%; the bound leaves room for binomial noise over
        // 1000 seeded trials (mean 10, sd ~3.1).
        let trials = 1000u64;
        let rejected = (0..trials)
            .filter(|seed| {
                let r = white_noise(500, 1.0, 1_000 + seed).unwrap();
                let res = ljung_box_test(&r, 10, 0.01).unwrap();
                assert!(res.q >= 0.0);
                assert!((0.0..=1.0).contains(&res.p_value));
                res.reject
            })
            .count();
        assert!(rejected <= 20, "{rejected}/{trials} white-noise samples rejected");
    }

    #[test]
    fn autocorrelated_residuals_are_rejected() {
        let r = ar1(500, 0.5, 1.0, 4).unwrap();
        let res = ljung_box_test(&r, 10, 0.05).unwrap();
        assert!(res.reject, "Q = {}, p = {}", res.q, res.p_value);
        assert!(res.p_value < 1e-6);
    }

    #[test]
    fn first_lag_only_matches_hand_computation() {
        let r = [1.0, -1.0, 1.0, -1.0];
        // r̄ = 0, Σr² = 4, ρ_1 = -3/4, Q = 4·6·(9/16)/3.
        let res = ljung_box_test(&r, 1, 0.05).unwrap();
        assert!((res.q - 4.5).abs() < 1e-12, "Q = {}", res.q);
    }

    #[test]
    fn constant_residuals_give_zero_statistic() {
        let res = ljung_box_test(&[2.0; 20], 5, 0.05).unwrap();
        assert_eq!(res.q, 0.0);
        assert_eq!(res.p_value, 1.0);
        assert!(!res.reject);
    }

    #[test]
    fn invalid_lag_counts_fail() {
        assert_eq!(ljung_box_test(&[], 1, 0.05).unwrap_err().code(), ErrorCode::EmptyValue);
        assert_eq!(ljung_box_test(&[1.0, 2.0], 2, 0.05).unwrap_err().code(), ErrorCode::InvalidValue);
        assert!(ljung_box_test(&[1.0, 2.0, 3.0], 0, 0.05).is_err());
        assert!(ljung_box_test(&[1.0, 2.0, 3.0], 1, 1.5).is_err());
    }
}
