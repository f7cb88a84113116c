// =============================================================================
// Safe numeric guards
// =============================================================================
//
// Every derived value in the engine passes through `finite` before it is
// stored.  NaN and ±Infinity never leave this module as numbers; they become
// `None` so that absence propagates field-by-field instead of defaulting to
// zero.
// =============================================================================

use serde_json::Value;

/// Map a raw `f64` to `Some(value)` only when it is finite.
#[inline]
pub fn finite(value: f64) -> Option<f64> {
    if value.is_finite() {
        Some(value)
    } else {
        None
    }
}

/// Convert a JSON payload value (number or numeric string) into a finite
/// `f64`.  Anything else (null, bool, arrays, non-numeric text, non-finite
/// results) is `None`.
pub fn safe_num(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().and_then(finite),
        Value::String(s) => s.trim().parse::<f64>().ok().and_then(finite),
        _ => None,
    }
}

/// Round `value` to `decimals` places, ties to even.
///
/// Rounds the exact binary value through decimal formatting, so `0.15`
/// (stored just below the half) goes down and `0.8500000000000001` goes up.
pub fn round_dp(value: f64, decimals: u32) -> f64 {
    format!("{:.*}", decimals as usize, value)
        .parse::<f64>()
        .unwrap_or(value)
}
