// =============================================================================
// Exponential smoothing (EMA / Wilder)
// =============================================================================
//
// Recursive form, seeded by the first observation (no SMA seeding phase):
//
//   y_0 = x_0
//   y_t = (1 - alpha) * y_{t-1} + alpha * x_t
//
// EMA(span)      : alpha = 2 / (span + 1)
// Wilder(period) : alpha = 1 / period
// =============================================================================

use super::Series;
use crate::numeric::finite;

/// Exponentially smooth `values` with factor `alpha`.
///
/// The output has one element per input.  Element `i` is `None` when fewer
/// than `min_periods` observations have been consumed (`i + 1 < min_periods`).
///
/// # Edge cases
/// - `alpha` outside `(0, 1]` => every element `None`
/// - An absent input, or a non-finite intermediate value, breaks the
///   recursion: that element and every later one is `None`.
pub fn ewm(values: &[Option<f64>], alpha: f64, min_periods: usize) -> Series {
    if !(alpha > 0.0 && alpha <= 1.0) {
        return vec![None; values.len()];
    }

    let mut result = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;

    for (i, value) in values.iter().enumerate() {
        let next = match (i, prev, *value) {
            (0, _, Some(x)) => finite(x),
            (_, Some(p), Some(x)) => finite((1.0 - alpha) * p + alpha * x),
            _ => None,
        };
        prev = next;
        result.push(if i + 1 >= min_periods { next } else { None });
    }

    result
}

/// Standard EMA over `values` with the given `span`.
pub fn calculate_ema(values: &[Option<f64>], span: usize) -> Series {
    ewm(values, 2.0 / (span as f64 + 1.0), 1)
}

/// Wilder smoothing (factor `1 / period`), absent until `period` observations.
pub fn wilder(values: &[Option<f64>], period: usize) -> Series {
    if period == 0 {
        return vec![None; values.len()];
    }
    ewm(values, 1.0 / period as f64, period)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::to_series;

    #[test]
    fn ewm_empty_input() {
        assert!(ewm(&[], 0.5, 1).is_empty());
    }

    #[test]
    fn ewm_invalid_alpha() {
        let out = ewm(&to_series(&[1.0, 2.0]), 0.0, 1);
        assert_eq!(out, vec![None, None]);
        let out = ewm(&to_series(&[1.0, 2.0]), 1.5, 1);
        assert_eq!(out, vec![None, None]);
    }

    #[test]
    fn ewm_seeded_by_first_value() {
        let out = ewm(&to_series(&[10.0, 20.0, 30.0]), 0.5, 1);
        assert_eq!(out, vec![Some(10.0), Some(15.0), Some(22.5)]);
    }

    #[test]
    fn ewm_respects_min_periods() {
        let out = ewm(&to_series(&[10.0, 20.0, 30.0]), 0.5, 3);
        assert_eq!(out, vec![None, None, Some(22.5)]);
    }

    #[test]
    fn ewm_breaks_on_absent_input() {
        let out = ewm(&[Some(1.0), None, Some(3.0)], 0.5, 1);
        assert_eq!(out, vec![Some(1.0), None, None]);
    }

    #[test]
    fn ema_known_values() {
        // span 3 => alpha 0.5
        let closes: Vec<f64> = (1..=5).map(|x| x as f64).collect();
        let ema = calculate_ema(&to_series(&closes), 3);
        let mut expected = 1.0;
        for (i, &c) in closes.iter().enumerate() {
            if i > 0 {
                expected = 0.5 * expected + 0.5 * c;
            }
            let got = ema[i].unwrap();
            assert!((got - expected).abs() < 1e-12, "got {got}, expected {expected}");
        }
    }

    #[test]
    fn ema_of_flat_series_is_flat() {
        let ema = calculate_ema(&to_series(&[100.0; 40]), 12);
        assert!(ema.iter().all(|v| *v == Some(100.0)));
    }

    #[test]
    fn wilder_period_zero() {
        assert_eq!(wilder(&to_series(&[1.0, 2.0]), 0), vec![None, None]);
    }

    #[test]
    fn wilder_absent_until_period() {
        let out = wilder(&to_series(&[1.0; 20]), 14);
        assert!(out[..13].iter().all(Option::is_none));
        assert!(out[13..].iter().all(|v| *v == Some(1.0)));
    }
}
