//! Descriptive statistics over slices.

/// Arithmetic mean; `NaN` for an empty slice.
pub fn mean(x: &[f64]) -> f64 {
    if x.is_empty() {
        return f64::NAN;
    }
    x.iter().sum::<f64>() / x.len() as f64
}

/// Population variance (divide by `n`) using Welford's single-pass update.
///
/// Returns `NaN` for an empty slice.
pub fn welford_variance_population<'a, I>(values: I) -> f64
where
    I: IntoIterator<Item = &'a f64>,
{
    let mut n = 0usize;
    let mut mu = 0.0;
    let mut m2 = 0.0;
    for &v in values {
        n += 1;
        let delta = v - mu;
        mu += delta / n as f64;
        m2 += delta * (v - mu);
    }
    if n == 0 { f64::NAN } else { m2 / n as f64 }
}

/// Sum of squared deviations from `center`.
pub fn sum_sq_dev(x: &[f64], center: f64) -> f64 {
    x.iter().map(|v| (v - center) * (v - center)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn welford_matches_two_pass() {
        let x = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&x) - 5.0).abs() < 1e-12);
        assert!((welford_variance_population(&x) - 4.0).abs() < 1e-12);
        assert!((sum_sq_dev(&x, 5.0) / 8.0 - 4.0).abs() < 1e-12);
    }

    #[test]
    fn empty_inputs_are_nan() {
        assert!(mean(&[]).is_nan());
        assert!(welford_variance_population(&[]).is_nan());
    }
}
