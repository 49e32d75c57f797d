//! Seeded synthetic series for demos and tests.
//!
//! Every generator takes an explicit `u64` seed and draws from a `StdRng`,
//! so the same arguments always reproduce the same path.
//!
//! - `white_noise`: i.i.d. `N(0, σ²)`
//! - `ar1`: `x_t = φ x_{t-1} + ε_t`, started from the stationary law when
//!   `|φ| < 1` and from zero otherwise
//! - `random_walk`: `ar1` with `φ = 1`
//! - `ar1_segments`: independent AR(1) segments of equal length

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::error::StatsError;

fn noise(sigma: f64) -> Result<Normal<f64>, StatsError> {
    if !(sigma.is_finite() && sigma > 0.0) {
        return Err(StatsError::invalid(format!("noise scale must be finite and > 0, got {sigma}")));
    }
    Normal::new(0.0, sigma).map_err(|e| StatsError::invalid(format!("noise distribution error: {e}")))
}

pub fn white_noise(n: usize, sigma: f64, seed: u64) -> Result<Vec<f64>, StatsError> {
    let normal = noise(sigma)?;
    let mut rng = StdRng::seed_from_u64(seed);
    Ok((0..n).map(|_| normal.sample(&mut rng)).collect())
}

pub fn ar1(n: usize, phi: f64, sigma: f64, seed: u64) -> Result<Vec<f64>, StatsError> {
    let mut rng = StdRng::seed_from_u64(seed);
    ar1_with_rng(n, phi, sigma, &mut rng)
}

pub fn random_walk(n: usize, sigma: f64, seed: u64) -> Result<Vec<f64>, StatsError> {
    ar1(n, 1.0, sigma, seed)
}

/// `count` independent AR(1) segments of length `len`, all drawn from one
/// seeded stream.
pub fn ar1_segments(
    count: usize,
    len: usize,
    phi: f64,
    sigma: f64,
    seed: u64,
) -> Result<Vec<Vec<f64>>, StatsError> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count).map(|_| ar1_with_rng(len, phi, sigma, &mut rng)).collect()
}

/// AR(1) path drawn from a caller-supplied generator.
pub fn ar1_with_rng<R: Rng + ?Sized>(
    n: usize,
    phi: f64,
    sigma: f64,
    rng: &mut R,
) -> Result<Vec<f64>, StatsError> {
    if !phi.is_finite() {
        return Err(StatsError::invalid(format!("AR coefficient must be finite, got {phi}")));
    }
    let normal = noise(sigma)?;
    if n == 0 {
        return Ok(Vec::new());
    }

    let mut x = if phi.abs() < 1.0 {
        normal.sample(rng) / (1.0 - phi * phi).sqrt()
    } else {
        0.0
    };
    let mut out = Vec::with_capacity(n);
    out.push(x);
    for _ in 1..n {
        x = phi * x + normal.sample(rng);
        out.push(x);
    }
    Ok(out)
}
