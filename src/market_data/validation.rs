// =============================================================================
// OHLCV payload validation
// =============================================================================
//
// Turns raw JSON records from a data provider into a `PriceSeries`, or into a
// list of human-readable issues.  An invalid payload never reaches the
// indicator engine.
// =============================================================================

use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{Bar, PriceSeries, RawRecord};
use crate::numeric::safe_num;

/// Column holding the bar timestamp.
pub const TIME_COLUMN: &str = "time";

/// Numeric columns, in output order.
pub const NUMERIC_COLUMNS: [&str; 5] = ["open", "high", "low", "close", "volume"];

/// Parse an RFC 3339 timestamp (or a bare `YYYY-MM-DD` date) into UTC.
pub fn parse_time(value: &Value) -> Option<DateTime<Utc>> {
    let text = value.as_str()?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Validate raw records and build a `PriceSeries`.
///
/// Issues are reported in a fixed order: missing columns and an empty
/// dataset short-circuit; timestamp and per-column issues accumulate.
pub fn validate_ohlcv(records: &[RawRecord]) -> Result<PriceSeries, Vec<String>> {
    let mut issues = Vec::new();

    // --- Required columns ----------------------------------------------------
    let present: HashSet<&str> = records
        .iter()
        .flat_map(|r| r.keys().map(String::as_str))
        .collect();
    let missing: BTreeSet<&str> = std::iter::once(TIME_COLUMN)
        .chain(NUMERIC_COLUMNS)
        .filter(|c| !present.contains(c))
        .collect();
    if !missing.is_empty() {
        let names: Vec<String> = missing.iter().map(|c| format!("'{c}'")).collect();
        issues.push(format!("missing columns: [{}]", names.join(", ")));
        return Err(issues);
    }

    if records.is_empty() {
        issues.push("empty dataset".to_string());
        return Err(issues);
    }

    // --- Timestamps ----------------------------------------------------------
    let times: Vec<Option<DateTime<Utc>>> = records
        .iter()
        .map(|r| r.get(TIME_COLUMN).and_then(parse_time))
        .collect();

    if times.iter().any(Option::is_none) {
        issues.push(format!("column {TIME_COLUMN} contains unparseable timestamps"));
    }

    let parsed: Vec<DateTime<Utc>> = times.iter().flatten().copied().collect();
    if parsed.windows(2).any(|w| w[1] < w[0]) {
        issues.push("timestamps not sorted".to_string());
    }

    let mut seen = HashSet::with_capacity(parsed.len());
    if parsed.iter().any(|t| !seen.insert(*t)) {
        issues.push("duplicate timestamps".to_string());
    }

    // --- Numeric columns -----------------------------------------------------
    let mut columns: Vec<Vec<f64>> = Vec::with_capacity(NUMERIC_COLUMNS.len());
    for col in NUMERIC_COLUMNS {
        let values: Vec<Option<f64>> = records
            .iter()
            .map(|r| r.get(col).and_then(safe_num))
            .collect();

        if values.iter().all(Option::is_none) {
            issues.push(format!("column {col} entirely missing"));
        } else if values.iter().any(Option::is_none) {
            issues.push(format!("column {col} contains non-numeric values"));
        }
        columns.push(values.into_iter().flatten().collect());
    }

    if !issues.is_empty() {
        return Err(issues);
    }

    let bars = parsed
        .iter()
        .enumerate()
        .map(|(i, &time)| {
            Bar::new(
                time,
                columns[0][i],
                columns[1][i],
                columns[2][i],
                columns[3][i],
                columns[4][i],
            )
        })
        .collect();

    PriceSeries::new(bars)
}
