// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators behind the signal
// snapshot.  Series are `Vec<Option<f64>>` aligned one-to-one with the input
// bars; `None` marks warm-up positions and degenerate arithmetic so callers
// are forced to handle absence explicitly.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod snapshot;

pub use snapshot::{compute_snapshot, BollingerSnapshot, IndicatorSnapshot, MacdSnapshot};

use crate::numeric::finite;

/// An indicator series aligned with its input; `None` means absent.
pub type Series = Vec<Option<f64>>;

/// Lift raw values into a series, mapping non-finite values to `None`.
pub fn to_series(values: &[f64]) -> Series {
    values.iter().map(|&v| finite(v)).collect()
}
