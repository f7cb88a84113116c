// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Middle band = SMA(period), upper / lower = middle ± k·σ with the population
// (divide-by-N) standard deviation over the same window.
//
//   %B    = (close - lower) / (upper - lower)
//   width = (upper - lower) / middle
//
// %B is absent for a zero-width band; width is absent for a zero middle.

use crate::numeric::finite;

/// Bands evaluated over the most recent window.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerResult {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

impl BollingerResult {
    /// Position of `close` within the band: 0 at the lower band, 1 at the upper.
    pub fn percent_b(&self, close: f64) -> Option<f64> {
        let band = self.upper - self.lower;
        if band == 0.0 {
            return None;
        }
        finite((close - self.lower) / band)
    }

    /// Band width normalised by the middle band.
    pub fn width(&self) -> Option<f64> {
        if self.middle == 0.0 {
            return None;
        }
        finite((self.upper - self.lower) / self.middle)
    }
}

/// Calculate Bollinger Bands over the last `period` closing prices.
///
/// Returns `None` when:
/// - `period` is zero or fewer than `period` data points exist.
/// - The middle band or deviation is non-finite.
pub fn calculate_bollinger(closes: &[f64], period: usize, num_std: f64) -> Option<BollingerResult> {
    if period == 0 || closes.len() < period {
        return None;
    }

    let window = &closes[closes.len() - period..];
    let middle = finite(window.iter().sum::<f64>() / period as f64)?;

    // A window of identical values has exactly zero deviation; the mean of
    // such a window can differ from the values by an ulp.
    let std_dev = if window.iter().all(|&x| x == window[0]) {
        0.0
    } else {
        let variance = window.iter().map(|x| (x - middle).powi(2)).sum::<f64>() / period as f64;
        finite(variance.sqrt())?
    };

    Some(BollingerResult {
        upper: middle + num_std * std_dev,
        middle,
        lower: middle - num_std * std_dev,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bollinger_basic() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let bb = calculate_bollinger(&closes, 20, 2.0).unwrap();
        assert!(bb.upper > bb.middle);
        assert!(bb.lower < bb.middle);
        assert!((bb.middle - 10.5).abs() < 1e-12);

        // Population σ of 1..=20 is sqrt((20² - 1) / 12).
        let sigma = ((400.0_f64 - 1.0) / 12.0).sqrt();
        assert!((bb.upper - (10.5 + 2.0 * sigma)).abs() < 1e-9);

        let pctb = bb.percent_b(20.0).unwrap();
        assert!(pctb > 0.5 && pctb < 1.0);
        assert!(bb.width().unwrap() > 0.0);
    }

    #[test]
    fn bollinger_insufficient_data() {
        assert!(calculate_bollinger(&[1.0, 2.0, 3.0], 20, 2.0).is_none());
    }

    #[test]
    fn bollinger_flat_has_no_percent_b() {
        let bb = calculate_bollinger(&[100.1; 25], 20, 2.0).unwrap();
        assert_eq!(bb.upper, bb.lower);
        assert!(bb.percent_b(100.1).is_none());
        assert_eq!(bb.width(), Some(0.0));
    }

    #[test]
    fn bollinger_zero_middle_has_no_width() {
        let closes: Vec<f64> = (0..20).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let bb = calculate_bollinger(&closes, 20, 2.0).unwrap();
        assert_eq!(bb.middle, 0.0);
        assert!(bb.width().is_none());
        assert!(bb.percent_b(-1.0).is_some());
    }
}
