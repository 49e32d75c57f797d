//! Closed-form two-variable regression `y = m·x + b`.

use crate::domain::SimpleFit;
use crate::error::StatsError;

/// Slope and intercept of `y` on `x`, ignoring any pair where either value is
/// `NaN`.
///
/// A degenerate `x` (all surviving values equal) yields a non-finite slope.
pub fn simple_regression(x: &[f64], y: &[f64]) -> Result<SimpleFit, StatsError> {
    if x.len() != y.len() {
        return Err(StatsError::invalid(format!(
            "simple regression length mismatch: x has {}, y has {}",
            x.len(),
            y.len()
        )));
    }

    let (mut n, mut sx, mut sy, mut sxy, mut sxx) = (0usize, 0.0, 0.0, 0.0, 0.0);
    for (&xi, &yi) in x.iter().zip(y) {
        if xi.is_nan() || yi.is_nan() {
            continue;
        }
        n += 1;
        sx += xi;
        sy += yi;
        sxy += xi * yi;
        sxx += xi * xi;
    }
    if n == 0 {
        return Err(StatsError::empty("simple regression has no complete pairs"));
    }

    let nf = n as f64;
    let (x_bar, y_bar) = (sx / nf, sy / nf);
    let slope = (sxy - nf * x_bar * y_bar) / (sxx - nf * x_bar * x_bar);
    Ok(SimpleFit {
        slope,
        intercept: y_bar - slope * x_bar,
    })
}
