// =============================================================================
// Simple Moving Average (SMA) and SMA slope
// =============================================================================

use super::Series;
use crate::numeric::finite;

/// Rolling arithmetic mean of the trailing `window` values.
///
/// One element per input; absent until `window` values exist.
pub fn calculate_sma(values: &[f64], window: usize) -> Series {
    if window == 0 {
        return vec![None; values.len()];
    }

    let mut result = vec![None; values.len()];
    for end in window..=values.len() {
        let sum: f64 = values[end - window..end].iter().sum();
        result[end - 1] = finite(sum / window as f64);
    }
    result
}

/// Percentage rate of change across the present values of an SMA series.
///
/// Compares the latest present value with the one `lag - 1` present values
/// before it (the `lag`-th most recent), skipping absent warm-up elements.
///
/// Returns `None` when fewer than `lag` values are present, the earlier value
/// is zero, or the result is non-finite.
pub fn sma_slope(sma: &[Option<f64>], lag: usize) -> Option<f64> {
    let present: Vec<f64> = sma.iter().flatten().copied().collect();
    if lag == 0 || present.len() < lag {
        return None;
    }

    let last = present[present.len() - 1];
    let prev = present[present.len() - lag];
    if prev == 0.0 {
        return None;
    }
    finite((last - prev) / prev * 100.0)
}
