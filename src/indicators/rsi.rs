// =============================================================================
// Relative Strength Index (RSI): Wilder's Smoothing
// =============================================================================
//
// Step 1: Price changes from consecutive closes.  The first bar has no
//          predecessor and contributes a zero gain and a zero loss.
// Step 2: Wilder smoothing (alpha = 1/period) of gains and losses, seeded by
//          the first value; absent until `period` bars have been seen.
// Step 3: RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// A zero average loss makes RS non-finite, and the RSI is then absent.  It is
// NOT clamped to 100.
// =============================================================================

use super::ema::wilder;
use super::Series;
use crate::numeric::finite;

/// Compute the full RSI series for `closes`, one element per close.
///
/// # Edge cases
/// - `period == 0` => every element `None`
/// - fewer than `period` closes => every element `None`
/// - zero average loss (no down moves) => `None` at that element
pub fn calculate_rsi(closes: &[f64], period: usize) -> Series {
    if closes.is_empty() {
        return Vec::new();
    }

    // --- Gains / losses -------------------------------------------------------
    let mut gains: Series = Vec::with_capacity(closes.len());
    let mut losses: Series = Vec::with_capacity(closes.len());
    gains.push(Some(0.0));
    losses.push(Some(0.0));

    for w in closes.windows(2) {
        let delta = finite(w[1] - w[0]);
        gains.push(delta.map(|d| d.max(0.0)));
        losses.push(delta.map(|d| (-d).max(0.0)));
    }

    // --- Wilder smoothing -----------------------------------------------------
    let avg_gain = wilder(&gains, period);
    let avg_loss = wilder(&losses, period);

    avg_gain
        .iter()
        .zip(avg_loss.iter())
        .map(|(g, l)| match (g, l) {
            (Some(g), Some(l)) => rsi_from_averages(*g, *l),
            _ => None,
        })
        .collect()
}

/// RSI at the most recent close.
pub fn current_rsi(closes: &[f64], period: usize) -> Option<f64> {
    calculate_rsi(closes, period).last().copied().flatten()
}

/// Convert average gain / average loss into an RSI value in [0, 100].
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let rs = finite(avg_gain / avg_loss)?;
    finite(100.0 - 100.0 / (1.0 + rs))
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_empty_input() {
        assert!(calculate_rsi(&[], 14).is_empty());
    }

    #[test]
    fn rsi_period_zero() {
        assert!(calculate_rsi(&[1.0, 2.0, 3.0], 0).iter().all(Option::is_none));
    }

    #[test]
    fn rsi_insufficient_data() {
        let closes = [44.0, 43.0, 45.0, 44.5, 46.0];
        assert!(current_rsi(&closes, 14).is_none());
    }

    #[test]
    fn rsi_present_from_period_bars() {
        let closes: Vec<f64> = (0..14).map(|i| 100.0 + if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let series = calculate_rsi(&closes, 14);
        assert!(series[..13].iter().all(Option::is_none));
        assert!(series[13].is_some());
    }

    #[test]
    fn rsi_all_gains_is_absent() {
        // Strictly ascending prices => zero average loss => RS non-finite.
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        assert!(current_rsi(&closes, 14).is_none());
    }

    #[test]
    fn rsi_flat_market_is_absent() {
        // 0 / 0 => NaN => absent.
        assert!(current_rsi(&[100.0; 30], 14).is_none());
    }

    #[test]
    fn rsi_all_losses() {
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        let val = current_rsi(&closes, 14).unwrap();
        assert!(val.abs() < 1e-10, "expected 0.0, got {val}");
    }

    #[test]
    fn rsi_known_value() {
        // Single up move then a single down move at alpha = 1/2.
        // gains: 0, 2, 0 -> 0, 1, 0.5 ; losses: 0, 0, 1 -> 0, 0, 0.5
        let series = calculate_rsi(&[10.0, 12.0, 11.0], 2);
        assert!(series[0].is_none());
        assert!(series[1].is_none()); // avg_loss == 0
        let val = series[2].unwrap();
        assert!((val - 50.0).abs() < 1e-10, "expected 50.0, got {val}");
    }

    #[test]
    fn rsi_range_check() {
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ];
        let series = calculate_rsi(&closes, 14);
        assert!(series.iter().flatten().count() > 0);
        for &v in series.iter().flatten() {
            assert!((0.0..=100.0).contains(&v), "RSI {v} out of range");
        }
    }
}
