//! Pooled autocorrelation across independent segments.
//!
//! Segments are treated as draws from one process: the mean `μ` and the
//! population variance `σ²` are computed once over all samples, and lag-`k`
//! products are pooled across segments without crossing segment boundaries:
//!
//! ```text
//!            Σ_j Σ_t (s_t^(j) - μ)(s_{t+k}^(j) - μ)
//! ACF[k] = ---------------------------------------
//!                 σ² · Σ_j max(0, n_j - k)
//! ```
//!
//! Once no segment is longer than `k`, that lag and every later one is `NaN`.
//!
//! Three evaluations of the same estimator are provided:
//! - [`MultiSegments::auto_corr`]: direct `O(N·L)` loop
//! - [`MultiSegments::auto_corr_parallel`]: the direct loop with one rayon task
//!   per lag, each writing its own output slot
//! - [`MultiSegments::auto_corr_fft`]: per-segment zero-padded FFT, `O(N log N)`

use rayon::prelude::*;
use rustfft::FftPlanner;
use tracing::debug;

use crate::error::StatsError;
use crate::math::{next_pow2, welford_variance_population, RealFft};

/// Immutable segment collection with its pooled moments.
#[derive(Debug, Clone)]
pub struct MultiSegments {
    segments: Vec<Vec<f64>>,
    total_len: usize,
    mean: f64,
    variance: f64,
}

impl MultiSegments {
    pub fn new(segments: Vec<Vec<f64>>) -> Result<Self, StatsError> {
        if segments.is_empty() {
            return Err(StatsError::empty("segment set is empty"));
        }
        let total_len: usize = segments.iter().map(Vec::len).sum();
        if total_len == 0 {
            return Err(StatsError::empty("all segments are empty"));
        }

        let mean = segments.iter().flatten().sum::<f64>() / total_len as f64;
        let variance = welford_variance_population(segments.iter().flatten());
        if !(variance.is_finite() && variance > 0.0) {
            return Err(StatsError::invalid(format!(
                "pooled variance must be finite and > 0, got {variance}"
            )));
        }

        debug!(segments = segments.len(), total_len, mean, variance, "segments summarised");
        Ok(Self {
            segments,
            total_len,
            mean,
            variance,
        })
    }

    pub fn segments(&self) -> &[Vec<f64>] {
        &self.segments
    }

    pub fn total_len(&self) -> usize {
        self.total_len
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn variance(&self) -> f64 {
        self.variance
    }

    fn max_segment_len(&self) -> usize {
        self.segments.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Lag-`k` cross-product sum and pair count over all segments.
    fn lag_sum(&self, k: usize) -> (f64, usize) {
        let mu = self.mean;
        let mut num = 0.0;
        let mut pairs = 0;
        for seg in &self.segments {
            let Some(nk) = seg.len().checked_sub(k).filter(|nk| *nk > 0) else {
                continue;
            };
            num += seg[..nk]
                .iter()
                .zip(&seg[k..])
                .map(|(a, b)| (a - mu) * (b - mu))
                .sum::<f64>();
            pairs += nk;
        }
        (num, pairs)
    }

    fn normalise(&self, num: f64, pairs: usize) -> f64 {
        if pairs == 0 {
            f64::NAN
        } else {
            num / (self.variance * pairs as f64)
        }
    }

    /// Direct pooled ACF for lags `0..max_lag`.
    pub fn auto_corr(&self, max_lag: usize) -> Result<Vec<f64>, StatsError> {
        check_max_lag(max_lag)?;
        let mut acf = vec![f64::NAN; max_lag];
        for (k, slot) in acf.iter_mut().enumerate() {
            let (num, pairs) = self.lag_sum(k);
            if pairs == 0 {
                break;
            }
            *slot = self.normalise(num, pairs);
        }
        Ok(acf)
    }

    /// Same estimator as [`auto_corr`](Self::auto_corr), one rayon task per lag.
    pub fn auto_corr_parallel(&self, max_lag: usize) -> Result<Vec<f64>, StatsError> {
        check_max_lag(max_lag)?;
        let mut acf = vec![0.0; max_lag];
        acf.par_iter_mut().enumerate().for_each(|(k, slot)| {
            let (num, pairs) = self.lag_sum(k);
            *slot = self.normalise(num, pairs);
        });
        Ok(acf)
    }

    /// Same estimator via per-segment FFT autocorrelation.
    ///
    /// Each segment of length `T` is de-meaned with the pooled mean and
    /// zero-padded to `next_pow2(2T)` so the circular correlation has no
    /// wrap-around at the lags we keep.
    pub fn auto_corr_fft(&self, max_lag: usize) -> Result<Vec<f64>, StatsError> {
        check_max_lag(max_lag)?;
        let mut numerator = vec![0.0; max_lag];
        let mut pairs = vec![0usize; max_lag];
        let mut planner = FftPlanner::new();

        for seg in self.segments.iter().filter(|s| !s.is_empty()) {
            let t = seg.len();
            let len = next_pow2(2 * t);
            let fft = RealFft::with_planner(&mut planner, len)?;

            let mut padded = vec![0.0; len];
            for (dst, v) in padded.iter_mut().zip(seg) {
                *dst = v - self.mean;
            }

            let mut spectrum = fft.forward(&padded)?;
            for c in spectrum.iter_mut() {
                *c = c.norm_sqr().into();
            }
            let autocov = fft.inverse(&spectrum)?;

            let scale = 1.0 / len as f64;
            for k in 0..max_lag.min(t) {
                numerator[k] += autocov[k] * scale;
                pairs[k] += t - k;
            }
        }

        let mut acf = vec![f64::NAN; max_lag];
        for (k, slot) in acf.iter_mut().enumerate() {
            if pairs[k] == 0 {
                break;
            }
            *slot = self.normalise(numerator[k], pairs[k]);
        }
        Ok(acf)
    }

    /// Running sign balance per position, averaged across segments.
    ///
    /// For each segment and each prefix `0..=i`, with `A = Σ|v|` and
    /// `P = Σ max(v, 0)`:
    /// - the first output accumulates `P / A` (0 while `A == 0`)
    /// - the second accumulates `(A - 2P) / sum_qty`
    ///
    /// Both are divided by the number of segments. Positions past the end of a
    /// segment receive nothing from it.
    pub fn signal_weights(&self, sum_qty: f64) -> Result<(Vec<f64>, Vec<f64>), StatsError> {
        if sum_qty == 0.0 || !sum_qty.is_finite() {
            return Err(StatsError::invalid(format!("sum_qty must be finite and non-zero, got {sum_qty}")));
        }
        let width = self.max_segment_len();
        let mut pos_share = vec![0.0; width];
        let mut neg_qty = vec![0.0; width];

        for seg in &self.segments {
            let (mut abs_sum, mut pos_sum) = (0.0, 0.0);
            for (i, &v) in seg.iter().enumerate() {
                abs_sum += v.abs();
                if v > 0.0 {
                    pos_sum += v;
                }
                if abs_sum > 0.0 {
                    pos_share[i] += pos_sum / abs_sum;
                }
                neg_qty[i] += (abs_sum - 2.0 * pos_sum) / sum_qty;
            }
        }

        let count = self.segments.len() as f64;
        pos_share.iter_mut().for_each(|v| *v /= count);
        neg_qty.iter_mut().for_each(|v| *v /= count);
        Ok((pos_share, neg_qty))
    }
}

fn check_max_lag(max_lag: usize) -> Result<(), StatsError> {
    if max_lag == 0 {
        return Err(StatsError::invalid("max_lag must be > 0"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acf::auto_corr_single;
    use crate::data::ar1_segments;
    use crate::error::ErrorCode;

    fn ragged() -> MultiSegments {
        MultiSegments::new(vec![
            vec![0.3, -1.2, 2.5, 0.7, -0.4, 1.9, -2.2, 0.1],
            vec![1.5, -0.5, 0.8],
            vec![],
            vec![-1.0, 2.0, 0.5, -0.3, 1.1],
        ])
        .unwrap()
    }

    #[test]
    fn direct_parallel_and_fft_agree() {
        let segs = ragged();
        let direct = segs.auto_corr(12).unwrap();
        let parallel = segs.auto_corr_parallel(12).unwrap();
        let fft = segs.auto_corr_fft(12).unwrap();

        for k in 0..12 {
            if k < 8 {
                assert!((direct[k] - parallel[k]).abs() < 1e-12, "lag {k}");
                assert!((direct[k] - fft[k]).abs() < 1e-6, "lag {k}: {} vs {}", direct[k], fft[k]);
            } else {
                // Longest segment has 8 samples.
                assert!(direct[k].is_nan() && parallel[k].is_nan() && fft[k].is_nan(), "lag {k}");
            }
        }
    }

    #[test]
    fn lag_zero_of_pooled_acf_is_one() {
        let acf = ragged().auto_corr(3).unwrap();
        assert!((acf[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn single_segment_matches_single_series_acf() {
        let x = vec![1.0, 4.0, 2.0, 8.0, 5.0, 7.0, 3.0, 6.0];
        let pooled = MultiSegments::new(vec![x.clone()]).unwrap().auto_corr(5).unwrap();
        let single = auto_corr_single(&x, 5).unwrap();
        for (a, b) in pooled.iter().zip(&single) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn ar1_segments_recover_phi() {
        let phi = 0.6;
        let segs = MultiSegments::new(ar1_segments(5, 2000, phi, 1.0, 42).unwrap()).unwrap();
        let acf = segs.auto_corr_fft(30).unwrap();
        assert!((acf[1] - phi).abs() < 0.025, "acf[1] = {}", acf[1]);
        assert!((acf[2] - phi * phi).abs() < 0.04, "acf[2] = {}", acf[2]);
    }

    #[test]
    fn signal_weights_average_running_shares() {
        let segs = MultiSegments::new(vec![vec![1.0, -1.0, 2.0], vec![-2.0]]).unwrap();
        let (pos, neg) = segs.signal_weights(4.0).unwrap();
        assert_eq!(pos.len(), 3);
        // Position 0: (1/1 + 0/2) / 2.
        assert!((pos[0] - 0.5).abs() < 1e-12);
        // Position 1: only the first segment, (1/2) / 2.
        assert!((pos[1] - 0.25).abs() < 1e-12);
        // Position 2: (3/4) / 2.
        assert!((pos[2] - 0.375).abs() < 1e-12);
        // Position 0: ((1 - 2)/4 + (2 - 0)/4) / 2.
        assert!((neg[0] - 0.125).abs() < 1e-12);
        assert!(segs.signal_weights(0.0).is_err());
    }

    #[test]
    fn non_finite_samples_are_rejected() {
        let err = MultiSegments::new(vec![vec![1.0, 2.0, f64::NAN, 4.0]]).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidValue);
        let err = MultiSegments::new(vec![vec![1.0, 2.0], vec![f64::INFINITY, 3.0]]).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidValue);
    }

    #[test]
    fn construction_and_lag_validation() {
        assert_eq!(MultiSegments::new(vec![]).unwrap_err().code(), ErrorCode::EmptyValue);
        assert_eq!(MultiSegments::new(vec![vec![], vec![]]).unwrap_err().code(), ErrorCode::EmptyValue);
        assert_eq!(
            MultiSegments::new(vec![vec![1.0, 1.0], vec![1.0]]).unwrap_err().code(),
            ErrorCode::InvalidValue
        );
        let segs = ragged();
        assert!(segs.auto_corr(0).is_err());
        assert!(segs.auto_corr_parallel(0).is_err());
        assert!(segs.auto_corr_fft(0).is_err());
        assert_eq!(segs.total_len(), 16);
    }
}
