// =============================================================================
// Average True Range (ATR): Wilder's Smoothing Method
// =============================================================================
//
// True Range (TR) for each bar:
//   TR_0 = H - L                       (no previous close)
//   TR_t = max(H - L, |H - prevClose|, |L - prevClose|)
//
// ATR is the Wilder-smoothed TR (alpha = 1/period, seeded by TR_0), absent
// until `period` bars have been seen.
//
// Default period: 14
// =============================================================================

use super::ema::wilder;
use super::Series;
use crate::market_data::Bar;
use crate::numeric::finite;

/// True range of every bar, oldest first.
pub fn true_range(bars: &[Bar]) -> Series {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let hl = bar.high - bar.low;
            let tr = match i.checked_sub(1).map(|p| bars[p].close) {
                Some(prev_close) => {
                    let hc = (bar.high - prev_close).abs();
                    let lc = (bar.low - prev_close).abs();
                    hl.max(hc).max(lc)
                }
                None => hl,
            };
            finite(tr)
        })
        .collect()
}

/// ATR series for `bars`, one element per bar.
pub fn calculate_atr(bars: &[Bar], period: usize) -> Series {
    wilder(&true_range(bars), period)
}

/// Latest present ATR expressed as a percentage of the last close.
///
/// Returns `None` when no ATR value is present or the last close is zero
/// or absent.
pub fn calculate_atr_pct(bars: &[Bar], period: usize) -> Option<f64> {
    let atr = calculate_atr(bars, period).into_iter().flatten().last()?;
    let last_close = finite(bars.last()?.close)?;
    if last_close == 0.0 {
        return None;
    }
    finite(atr / last_close * 100.0)
}
