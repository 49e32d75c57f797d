//! Equal-width histogram.

use crate::domain::HistogramBin;
use crate::error::StatsError;

/// Widening applied to `[min, max]` when every value is identical.
const DEGENERATE_WIDTH: f64 = 1e-9;

/// Bucket `data` into `bins` equal-width bins spanning `[min, max]`.
///
/// Non-finite values are ignored. The maximum lands in the last bin.
pub fn hist(data: &[f64], bins: usize) -> Result<Vec<HistogramBin>, StatsError> {
    if bins == 0 {
        return Err(StatsError::invalid("histogram needs at least one bin"));
    }

    let mut finite = data.iter().copied().filter(|v| v.is_finite()).peekable();
    let Some(&first) = finite.peek() else {
        return Err(StatsError::empty("histogram input has no finite values"));
    };

    let (min_v, mut max_v) = data
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if max_v == min_v {
        max_v = min_v + DEGENERATE_WIDTH;
    }

    let width = (max_v - min_v) / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            from: min_v + i as f64 * width,
            to: min_v + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();

    for v in finite {
        let idx = (((v - min_v) / width).floor() as usize).min(bins - 1);
        out[idx].count += 1;
    }

    Ok(out)
}
