use chrono::{DateTime, Utc};

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single daily OHLCV bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(time: DateTime<Utc>, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

// ---------------------------------------------------------------------------
// PriceSeries -- validated, read-only bar sequence
// ---------------------------------------------------------------------------

/// Ordered bar sequence handed to the indicator engine.
///
/// Invariants enforced by [`PriceSeries::new`]:
/// * at least one bar,
/// * timestamps strictly increasing (no duplicates),
/// * every price / volume field finite.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Build a series, returning the list of violated invariants on failure.
    pub fn new(bars: Vec<Bar>) -> Result<Self, Vec<String>> {
        let mut issues = Vec::new();

        if bars.is_empty() {
            issues.push("empty dataset".to_string());
            return Err(issues);
        }

        if bars.windows(2).any(|w| w[1].time <= w[0].time) {
            issues.push("timestamps not strictly increasing".to_string());
        }

        let non_finite = bars.iter().any(|b| {
            ![b.open, b.high, b.low, b.close, b.volume]
                .iter()
                .all(|v| v.is_finite())
        });
        if non_finite {
            issues.push("non-finite price or volume".to_string());
        }

        if issues.is_empty() {
            Ok(Self { bars })
        } else {
            Err(issues)
        }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Close prices, oldest first.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn bar_at(day: i64, close: f64) -> Bar {
        let t0 = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        Bar::new(t0 + Duration::days(day), close, close + 1.0, close - 1.0, close, 10.0)
    }

    #[test]
    fn accepts_increasing_series() {
        let series = PriceSeries::new(vec![bar_at(0, 1.0), bar_at(1, 2.0)]).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![1.0, 2.0]);
        assert_eq!(series.last().map(|b| b.high), Some(3.0));
    }

    #[test]
    fn rejects_empty_series() {
        let issues = PriceSeries::new(Vec::new()).unwrap_err();
        assert_eq!(issues, vec!["empty dataset".to_string()]);
    }

    #[test]
    fn rejects_duplicate_timestamps() {
        let issues = PriceSeries::new(vec![bar_at(0, 1.0), bar_at(0, 2.0)]).unwrap_err();
        assert!(issues[0].contains("strictly increasing"));
    }

    #[test]
    fn rejects_non_finite_values() {
        let issues = PriceSeries::new(vec![bar_at(0, f64::NAN)]).unwrap_err();
        assert!(issues.iter().any(|i| i.contains("non-finite")));
    }
}
