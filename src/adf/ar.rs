//! AR order detection on residuals.
//!
//! The AR(0) baseline is white noise around the sample mean; AR(p) candidates
//! regress `r_t` on `r_{t-1} … r_{t-p}` plus a constant. All orders are scored
//! with the same Gaussian likelihood, and the smallest AIC wins.

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::domain::ArFit;
use crate::error::StatsError;
use crate::math::{mean, sum_sq_dev};
use crate::regression::ols::{gaussian_log_likelihood, information_criteria};
use crate::regression::ols_mat;

/// Fit AR(0..=p_max) to `resid`; returns the AIC-best order and every fit
/// that succeeded (AR(0) first).
pub fn detect_ar(resid: &[f64], p_max: usize) -> Result<(usize, Vec<ArFit>), StatsError> {
    let n = resid.len();
    if n == 0 {
        return Err(StatsError::empty("AR detection input is empty"));
    }

    let mu = mean(resid);
    let (aic0, bic0) = information_criteria(gaussian_log_likelihood(sum_sq_dev(resid, mu), n), n, 1);
    let mut fits = vec![ArFit {
        p: 0,
        coeffs: vec![mu],
        aic: aic0,
        bic: bic0,
        p_values: None,
    }];
    let (mut best_p, mut best_aic) = (0, aic0);

    for p in 1..=p_max {
        if p >= n {
            break;
        }
        let rows = n - p;
        let x = DMatrix::from_fn(rows, p + 1, |i, j| if j < p { resid[i + p - j - 1] } else { 1.0 });
        let y = DVector::from_column_slice(&resid[p..]);

        let fit = match ols_mat(&x, &y) {
            Ok(fit) => fit,
            Err(e) => {
                debug!(p, error = %e, "AR candidate skipped");
                continue;
            }
        };
        if fit.aic < best_aic {
            best_aic = fit.aic;
            best_p = p;
        }
        fits.push(ArFit {
            p,
            coeffs: fit.coeffs,
            aic: fit.aic,
            bic: fit.bic,
            p_values: Some(fit.p_values),
        });
    }

    Ok((best_p, fits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ar1, white_noise};

    #[test]
    fn ar1_residuals_pick_a_positive_order() {
        let r = ar1(800, 0.6, 1.0, 2).unwrap();
        let (best, fits) = detect_ar(&r, 4).unwrap();
        assert!(best >= 1, "best order {best}");
        assert_eq!(fits.len(), 5);
        assert_eq!(fits[0].p, 0);
        assert!(fits[0].p_values.is_none());
        let ar1_fit = &fits[1];
        assert!((ar1_fit.coeffs[0] - 0.6).abs() < 0.1, "φ̂ = {}", ar1_fit.coeffs[0]);
    }

    #[test]
    fn white_noise_has_no_material_ar_term() {
        let r = white_noise(800, 1.0, 6).unwrap();
        let (_, fits) = detect_ar(&r, 3).unwrap();
        assert_eq!(fits.len(), 4);
        assert!(fits.iter().skip(1).all(|f| f.coeffs.len() == f.p + 1));
        assert!(fits[1].coeffs[0].abs() < 0.15, "φ̂ = {}", fits[1].coeffs[0]);
        // Extra parameters cost AIC but barely move the likelihood.
        assert!((fits[1].aic - fits[0].aic).abs() < 20.0);
    }

    #[test]
    fn baseline_uses_the_gaussian_likelihood() {
        let r = [1.0, -1.0, 2.0, -2.0, 0.5];
        let (_, fits) = detect_ar(&r, 0).unwrap();
        let ss = sum_sq_dev(&r, mean(&r));
        let (aic, bic) = information_criteria(gaussian_log_likelihood(ss, 5), 5, 1);
        assert_eq!(fits.len(), 1);
        assert!((fits[0].aic - aic).abs() < 1e-12);
        assert!((fits[0].bic - bic).abs() < 1e-12);
    }

    #[test]
    fn orders_beyond_the_sample_are_skipped() {
        let (_, fits) = detect_ar(&[0.1, -0.3, 0.2, 0.5], 10).unwrap();
        assert!(fits.iter().all(|f| f.p < 4));
        assert!(detect_ar(&[], 2).is_err());
    }
}
