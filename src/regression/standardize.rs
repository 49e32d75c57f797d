//! Column standardisation for penalised regression.
//!
//! The LASSO penalty is not scale invariant, so every non-intercept column is
//! centred and divided by its population standard deviation before solving.
//! Coefficients are mapped back to the original scale afterwards:
//!
//! ```text
//! β_j        = β̃_j / s_j                    (j ≥ 1)
//! β_0        = β̃_0 - Σ_j (μ_j / s_j) β̃_j
//! ```
//!
//! A constant column (`s_j == 0`) keeps scale 1 so it is centred to zero
//! instead of producing `NaN`.

use nalgebra::DMatrix;

/// Per-column location/scale recorded by [`standardize_columns`].
#[derive(Debug, Clone)]
pub struct Standardization {
    pub means: Vec<f64>,
    pub stds: Vec<f64>,
    /// Column 0 is an intercept and was left untouched.
    pub with_intercept: bool,
}

/// Centre and scale every column of `x` in place, skipping column 0 when it
/// holds the intercept.
pub fn standardize_columns(x: &mut DMatrix<f64>, with_intercept: bool) -> Standardization {
    let (n, p) = x.shape();
    let nf = n as f64;
    let mut means = vec![0.0; p];
    let mut stds = vec![1.0; p];

    let start = usize::from(with_intercept);
    for j in start..p {
        let mut col = x.column_mut(j);
        let mu = col.sum() / nf;
        col.add_scalar_mut(-mu);
        let var = col.norm_squared() / nf;
        let sd = if var > 0.0 { var.sqrt() } else { 1.0 };
        col.scale_mut(1.0 / sd);
        means[j] = mu;
        stds[j] = sd;
    }

    Standardization {
        means,
        stds,
        with_intercept,
    }
}

impl Standardization {
    /// Map coefficients fitted on standardised columns back to raw units.
    pub fn destandardize(&self, beta: &[f64]) -> Vec<f64> {
        let mut out = beta.to_vec();
        let start = usize::from(self.with_intercept);
        let mut shift = 0.0;
        for j in start..out.len() {
            out[j] = beta[j] / self.stds[j];
            shift += self.means[j] * out[j];
        }
        if self.with_intercept {
            out[0] -= shift;
        }
        out
    }
}
