// =============================================================================
// MACD (Moving Average Convergence Divergence)
// =============================================================================
//
//   line      = EMA(fast) - EMA(slow)
//   signal    = EMA(signal_span) of line
//   histogram = line - signal
//
// Cross classification uses the two most recent present histogram values.
// =============================================================================

use super::ema::calculate_ema;
use super::{to_series, Series};
use crate::numeric::finite;
use crate::types::MacdCross;

/// Full MACD series, one element per close.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub line: Series,
    pub signal: Series,
    pub hist: Series,
}

impl MacdSeries {
    /// Cross classification of the latest histogram transition.
    pub fn cross(&self) -> MacdCross {
        macd_cross(&self.hist)
    }
}

fn subtract(a: &[Option<f64>], b: &[Option<f64>]) -> Series {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) => finite(x - y),
            _ => None,
        })
        .collect()
}

/// Compute MACD with the given spans (standard: 12 / 26 / 9).
pub fn calculate_macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let closes = to_series(closes);
    let line = subtract(&calculate_ema(&closes, fast), &calculate_ema(&closes, slow));
    let signal = calculate_ema(&line, signal);
    let hist = subtract(&line, &signal);
    MacdSeries { line, signal, hist }
}

/// Classify the last two present histogram values `(prev, last)`:
/// - `Bull` when `prev <= 0 < last`
/// - `Bear` when `prev >= 0 > last`
/// - `None` otherwise, or with fewer than two present values.
pub fn macd_cross(hist: &[Option<f64>]) -> MacdCross {
    let mut present = hist.iter().rev().flatten();
    let (Some(&last), Some(&prev)) = (present.next(), present.next()) else {
        return MacdCross::None;
    };

    if prev <= 0.0 && last > 0.0 {
        MacdCross::Bull
    } else if prev >= 0.0 && last < 0.0 {
        MacdCross::Bear
    } else {
        MacdCross::None
    }
}
