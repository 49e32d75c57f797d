//! Direct 1-D cross-correlation and convolution.
//!
//! `same` and `valid` are not the NumPy lengths; they are shifted windows of
//! the full correlation:
//!
//! | mode    | length       |
//! |---------|--------------|
//! | `full`  | `n + m - 1`  |
//! | `same`  | `n - m + 1`  |
//! | `valid` | `n`          |
//!
//! The output index `i` is `Σ_j a[i + start + j - (m - 1)] * v[j]`, with
//! `start = 0` (full), `(m - 1) / 2` (same) or `m - 1` (valid). Out-of-range
//! terms of `a` contribute zero. In `full` mode index `n - 1 + k` is the
//! lag-`k` cross product `Σ_j a[j + k] * v[j]`.

use crate::domain::CorrelateMode;
use crate::error::StatsError;

/// Minimum length accepted for either input.
const MIN_LEN: usize = 3;

/// Correlate `a` (length n) with `v` (length m).
pub fn correlate(a: &[f64], v: &[f64], mode: CorrelateMode) -> Result<Vec<f64>, StatsError> {
    let (n, m) = (a.len(), v.len());
    if n < MIN_LEN || m < MIN_LEN {
        return Err(StatsError::invalid(format!(
            "correlate needs at least {MIN_LEN} samples per input, got n={n}, m={m}"
        )));
    }

    let (out_len, start) = match mode {
        CorrelateMode::Full => (n + m - 1, 0),
        CorrelateMode::Valid => {
            if m > n {
                return Err(StatsError::invalid(format!(
                    "valid mode requires m <= n, got n={n}, m={m}"
                )));
            }
            (n, m - 1)
        }
        CorrelateMode::Same => {
            if m > n {
                return Err(StatsError::invalid(format!(
                    "same mode requires m <= n, got n={n}, m={m}"
                )));
            }
            (n + 1 - m, (m - 1) / 2)
        }
    };

    let out = (0..out_len)
        .map(|i| {
            // a index is shift + j - (m - 1); keep it inside 0..n.
            let shift = i + start;
            let j_lo = (m - 1).saturating_sub(shift);
            let Some(j_hi) = (n + m - 2).checked_sub(shift).map(|h| h.min(m - 1)) else {
                return 0.0;
            };
            if j_lo > j_hi {
                return 0.0;
            }
            (j_lo..=j_hi).map(|j| a[shift + j - (m - 1)] * v[j]).sum()
        })
        .collect();

    Ok(out)
}

/// Convolve `a` with `v`: `correlate(a, reverse(v), mode)`.
pub fn convolve(a: &[f64], v: &[f64], mode: CorrelateMode) -> Result<Vec<f64>, StatsError> {
    let reversed: Vec<f64> = v.iter().rev().copied().collect();
    correlate(a, &reversed, mode)
}
