//! Residual resampling for simulation under the white-noise null.

use chrono::Utc;
use rand::prelude::*;
use rand::rngs::StdRng;

use crate::domain::BootstrapMethod;
use crate::error::StatsError;

/// Resample `length` values from `resid`, seeding from the wall clock.
pub fn simulate_white_noise(
    resid: &[f64],
    length: usize,
    method: BootstrapMethod,
) -> Result<Vec<f64>, StatsError> {
    let seed = Utc::now().timestamp_nanos_opt().unwrap_or_default() as u64;
    let mut rng = StdRng::seed_from_u64(seed);
    simulate_white_noise_with_rng(resid, length, method, &mut rng)
}

/// Resample `length` values from `resid` using `rng`.
///
/// Only the nonparametric bootstrap (uniform draws with replacement) is
/// available; the parametric and wild variants return `INVALID_VALUE`.
pub fn simulate_white_noise_with_rng<R: Rng + ?Sized>(
    resid: &[f64],
    length: usize,
    method: BootstrapMethod,
    rng: &mut R,
) -> Result<Vec<f64>, StatsError> {
    match method {
        BootstrapMethod::Nonparametric => {
            if resid.is_empty() {
                return Err(StatsError::empty("cannot resample from empty residuals"));
            }
            Ok((0..length)
                .map(|_| resid[rng.gen_range(0..resid.len())])
                .collect())
        }
        BootstrapMethod::Parametric | BootstrapMethod::Wild => Err(StatsError::invalid(format!(
            "{method} bootstrap is not implemented"
        ))),
    }
}
