// =============================================================================
// Indicator Snapshot: fixed-shape technical read of one price series
// =============================================================================

use chrono::{DateTime, Utc};

use super::atr::calculate_atr_pct;
use super::bollinger::calculate_bollinger;
use super::macd::calculate_macd;
use super::rsi::current_rsi;
use super::sma::{calculate_sma, sma_slope};
use crate::market_data::PriceSeries;
use crate::numeric::finite;
use crate::types::MacdCross;

pub const RSI_PERIOD: usize = 14;
pub const SMA_PERIOD: usize = 50;
/// SMA slope compares against the 5th most recent present SMA value.
pub const SMA_SLOPE_LAG: usize = 5;
pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_STD: f64 = 2.0;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;
pub const ATR_PERIOD: usize = 14;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BollingerSnapshot {
    pub pctb: Option<f64>,
    pub width: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacdSnapshot {
    pub line: Option<f64>,
    pub signal: Option<f64>,
    pub hist: Option<f64>,
    pub cross: MacdCross,
}

/// Latest indicator values for one asset.  Any field may be absent when the
/// series is too short or the arithmetic degenerates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorSnapshot {
    pub rsi14: Option<f64>,
    pub sma50: Option<f64>,
    pub sma50_slope: Option<f64>,
    pub bollinger: BollingerSnapshot,
    pub macd: MacdSnapshot,
    pub atr_pct: Option<f64>,
    pub last_close: Option<f64>,
    pub last_time: Option<DateTime<Utc>>,
}

fn last(series: &[Option<f64>]) -> Option<f64> {
    series.last().copied().flatten().and_then(finite)
}

/// Compute the full snapshot for `series`.  Pure and deterministic.
pub fn compute_snapshot(series: &PriceSeries) -> IndicatorSnapshot {
    let closes = series.closes();
    let last_close = closes.last().copied().and_then(finite);

    let sma50 = calculate_sma(&closes, SMA_PERIOD);

    let bollinger = calculate_bollinger(&closes, BOLLINGER_PERIOD, BOLLINGER_STD)
        .map(|bb| BollingerSnapshot {
            pctb: last_close.and_then(|c| bb.percent_b(c)),
            width: bb.width(),
        })
        .unwrap_or_default();

    let macd = calculate_macd(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL);

    IndicatorSnapshot {
        rsi14: current_rsi(&closes, RSI_PERIOD),
        sma50: last(&sma50),
        sma50_slope: sma_slope(&sma50, SMA_SLOPE_LAG),
        bollinger,
        macd: MacdSnapshot {
            line: last(&macd.line),
            signal: last(&macd.signal),
            hist: last(&macd.hist),
            cross: macd.cross(),
        },
        atr_pct: calculate_atr_pct(series.bars(), ATR_PERIOD),
        last_close,
        last_time: series.last().map(|b| b.time),
    }
}
