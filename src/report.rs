// =============================================================================
// Signal Report: the JSON artifact read by dashboards
// =============================================================================
//
// All display rounding happens here; the engine's values are full precision.
//
//   price / RSI / SMA / slope / ATR%  : 2 decimals
//   MACD line / signal, %B, width     : 4 decimals
//   MACD histogram                    : 6 decimals
//   score                             : 2 decimals
// =============================================================================

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::indicators::IndicatorSnapshot;
use crate::numeric::round_dp;
use crate::portfolio::symbol_for;
use crate::signals::{ScorePart, ScoreResult};
use crate::types::{Decision, MacdCross};

fn rounded(value: Option<f64>, decimals: u32) -> Option<f64> {
    value.map(|v| round_dp(v, decimals))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacdSummary {
    pub macd: Option<f64>,
    pub signal: Option<f64>,
    pub hist: Option<f64>,
    pub cross: MacdCross,
}

/// Display-rounded view of an [`IndicatorSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSummary {
    pub rsi14: Option<f64>,
    pub sma50: Option<f64>,
    pub sma50_slope: Option<f64>,
    pub macd: MacdSummary,
    pub bb_pctb: Option<f64>,
    pub bb_width: Option<f64>,
    pub atr_pct: Option<f64>,
}

impl From<&IndicatorSnapshot> for IndicatorSummary {
    fn from(ind: &IndicatorSnapshot) -> Self {
        Self {
            rsi14: rounded(ind.rsi14, 2),
            sma50: rounded(ind.sma50, 2),
            sma50_slope: rounded(ind.sma50_slope, 2),
            macd: MacdSummary {
                macd: rounded(ind.macd.line, 4),
                signal: rounded(ind.macd.signal, 4),
                hist: rounded(ind.macd.hist, 6),
                cross: ind.macd.cross,
            },
            bb_pctb: rounded(ind.bollinger.pctb, 4),
            bb_width: rounded(ind.bollinger.width, 4),
            atr_pct: rounded(ind.atr_pct, 2),
        }
    }
}

/// Successful per-asset entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalPayload {
    pub symbol: String,
    pub date: Option<DateTime<Utc>>,
    pub close: Option<f64>,
    pub indicators: IndicatorSummary,
    pub parts: BTreeMap<ScorePart, f64>,
    pub score: Option<f64>,
    pub decision: Decision,
    pub percent: Option<u32>,
}

impl SignalPayload {
    pub fn build(id: &str, ind: &IndicatorSnapshot, result: &ScoreResult) -> Self {
        Self {
            symbol: symbol_for(id),
            date: ind.last_time,
            close: rounded(ind.last_close, 2),
            indicators: IndicatorSummary::from(ind),
            parts: result.parts.clone(),
            score: rounded(result.score, 2),
            decision: result.decision,
            percent: result.percent,
        }
    }
}

/// Per-asset outcome: a signal, or the reason there is none.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AssetSignal {
    Signal(Box<SignalPayload>),
    Error { error: String },
}

impl AssetSignal {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    pub fn is_signal(&self) -> bool {
        matches!(self, Self::Signal(_))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub generated_at_utc: DateTime<Utc>,
    pub vs_currency: String,
    pub lookback_days: u32,
    pub asset_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignalReport {
    pub meta: ReportMeta,
    pub signals: BTreeMap<String, AssetSignal>,
}

impl SignalReport {
    /// Write the report as pretty JSON using an atomic write (write to
    /// `.tmp`, then rename).  Missing parent directories are created.
    pub fn write_atomic(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create output directory {}", parent.display()))?;
        }

        let content =
            serde_json::to_string_pretty(self).context("failed to serialise signal report to JSON")?;

        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp report to {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp report to {}", path.display()))?;

        info!(path = %path.display(), assets = self.signals.len(), "signal report written");
        Ok(())
    }
}
