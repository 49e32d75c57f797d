//! Real-input FFT of power-of-two length.
//!
//! Conventions:
//! - [`RealFft::forward`] returns the `len/2 + 1` non-negative frequency bins.
//! - [`RealFft::inverse`] is **unnormalised**: `inverse(forward(x)) == len * x`.
//!   Callers apply the `1/len` scale explicitly.
//!
//! `rustfft` only provides complex transforms, so the real transform is built
//! by zero-extending the imaginary part on the way in and by rebuilding the
//! Hermitian-symmetric spectrum on the way back.

use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::error::StatsError;

/// Smallest power of two `>= n` (with `next_pow2(0) == 1`).
pub fn next_pow2(n: usize) -> usize {
    n.max(1).next_power_of_two()
}

/// Planned forward/inverse transform pair for a fixed length.
#[derive(Clone)]
pub struct RealFft {
    len: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

impl std::fmt::Debug for RealFft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealFft").field("len", &self.len).finish()
    }
}

impl RealFft {
    /// Plan a transform with a fresh planner.
    pub fn new(len: usize) -> Result<Self, StatsError> {
        let mut planner = FftPlanner::new();
        Self::with_planner(&mut planner, len)
    }

    /// Plan a transform reusing `planner`'s twiddle caches.
    pub fn with_planner(planner: &mut FftPlanner<f64>, len: usize) -> Result<Self, StatsError> {
        if len == 0 || !len.is_power_of_two() {
            return Err(StatsError::invalid(format!(
                "FFT length must be a positive power of two, got {len}"
            )));
        }
        Ok(Self {
            len,
            forward: planner.plan_fft_forward(len),
            inverse: planner.plan_fft_inverse(len),
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Forward transform of a real sequence of exactly `len` samples.
    pub fn forward(&self, input: &[f64]) -> Result<Vec<Complex<f64>>, StatsError> {
        if input.len() != self.len {
            return Err(StatsError::invalid(format!(
                "FFT input has {} samples, plan expects {}",
                input.len(),
                self.len
            )));
        }
        let mut buf: Vec<Complex<f64>> = input.iter().map(|&x| Complex::new(x, 0.0)).collect();
        self.forward.process(&mut buf);
        buf.truncate(self.len / 2 + 1);
        Ok(buf)
    }

    /// Unnormalised inverse transform from `len/2 + 1` half-spectrum bins.
    pub fn inverse(&self, coeffs: &[Complex<f64>]) -> Result<Vec<f64>, StatsError> {
        let half = self.len / 2 + 1;
        if coeffs.len() != half {
            return Err(StatsError::invalid(format!(
                "inverse FFT expects {half} coefficients, got {}",
                coeffs.len()
            )));
        }
        let mut buf = Vec::with_capacity(self.len);
        buf.extend_from_slice(coeffs);
        // Hermitian symmetry: X[len - k] = conj(X[k]).
        for k in half..self.len {
            buf.push(coeffs[self.len - k].conj());
        }
        self.inverse.process(&mut buf);
        Ok(buf.into_iter().map(|c| c.re).collect())
    }
}
