// =============================================================================
// Runtime Configuration: portfolio, fetch and scoring settings
// =============================================================================
//
// Every tunable parameter of the signal generator lives here.  All fields
// carry `#[serde(default)]` so that a partial (or empty) JSON file loads with
// the remaining values at their defaults.
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_ids() -> Vec<String> {
    vec![
        "btc-bitcoin".to_string(),
        "eth-ethereum".to_string(),
        "solana-solana".to_string(),
    ]
}

fn default_lookback_days() -> u32 {
    200
}

fn default_vs_currency() -> String {
    "usd".to_string()
}

fn default_portfolio_file() -> PathBuf {
    PathBuf::from("public/portfolio_ids.json")
}

fn default_output_file() -> PathBuf {
    PathBuf::from("public/signals_by_asset.json")
}

fn default_base_url() -> String {
    "https://api.coinpaprika.com/v1".to_string()
}

fn default_retries() -> u32 {
    2
}

fn default_backoff_seconds() -> u64 {
    2
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_concurrency() -> usize {
    4
}

fn default_base() -> f64 {
    0.5
}

fn default_rsi_adjustment() -> f64 {
    0.2
}

fn default_bollinger_adjustment() -> f64 {
    0.15
}

fn default_macd_adjustment() -> f64 {
    0.1
}

fn default_max_slope_adjustment() -> f64 {
    0.05
}

fn default_low_volatility_threshold() -> f64 {
    5.0
}

fn default_high_volatility_threshold() -> f64 {
    10.0
}

fn default_volatility_adjustment() -> f64 {
    0.05
}

// =============================================================================
// ScoringWeights
// =============================================================================

/// Coefficients of the composite score.  Read-only for the scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Starting score before any rule applies.
    #[serde(default = "default_base")]
    pub base: f64,

    /// Added when RSI < 30 (oversold).
    #[serde(default = "default_rsi_adjustment")]
    pub rsi_bonus: f64,

    /// Subtracted when RSI > 70 (overbought).
    #[serde(default = "default_rsi_adjustment")]
    pub rsi_penalty: f64,

    /// Added when %B < 0.2.
    #[serde(default = "default_bollinger_adjustment")]
    pub bollinger_bonus: f64,

    /// Subtracted when %B > 0.8.
    #[serde(default = "default_bollinger_adjustment")]
    pub bollinger_penalty: f64,

    /// Added when the MACD histogram is positive.
    #[serde(default = "default_macd_adjustment")]
    pub macd_bonus: f64,

    /// Subtracted when the MACD histogram is zero or negative.
    #[serde(default = "default_macd_adjustment")]
    pub macd_penalty: f64,

    /// Cap on |slope / 10|.
    #[serde(default = "default_max_slope_adjustment")]
    pub max_slope_adjustment: f64,

    /// ATR% below this adds `volatility_adjustment`.
    #[serde(default = "default_low_volatility_threshold")]
    pub low_volatility_threshold: f64,

    /// ATR% above this subtracts `volatility_adjustment`.
    #[serde(default = "default_high_volatility_threshold")]
    pub high_volatility_threshold: f64,

    #[serde(default = "default_volatility_adjustment")]
    pub volatility_adjustment: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            base: default_base(),
            rsi_bonus: default_rsi_adjustment(),
            rsi_penalty: default_rsi_adjustment(),
            bollinger_bonus: default_bollinger_adjustment(),
            bollinger_penalty: default_bollinger_adjustment(),
            macd_bonus: default_macd_adjustment(),
            macd_penalty: default_macd_adjustment(),
            max_slope_adjustment: default_max_slope_adjustment(),
            low_volatility_threshold: default_low_volatility_threshold(),
            high_volatility_threshold: default_high_volatility_threshold(),
            volatility_adjustment: default_volatility_adjustment(),
        }
    }
}

// =============================================================================
// FetchParams
// =============================================================================

/// HTTP retrieval settings for the OHLCV provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchParams {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Extra attempts after the first failure.
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Linear backoff unit: attempt `n` waits `backoff_seconds * (n + 1)`.
    #[serde(default = "default_backoff_seconds")]
    pub backoff_seconds: u64,

    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Assets fetched and scored at the same time.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for FetchParams {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            retries: default_retries(),
            backoff_seconds: default_backoff_seconds(),
            timeout_seconds: default_timeout_seconds(),
            concurrency: default_concurrency(),
        }
    }
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level configuration for one signal generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Asset ids used when neither the CLI nor the portfolio file supply any.
    #[serde(default = "default_ids")]
    pub default_ids: Vec<String>,

    /// Days of history fetched per asset.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    /// Quote currency requested from the provider and echoed in the report.
    #[serde(default = "default_vs_currency")]
    pub vs_currency: String,

    /// JSON array of asset ids.
    #[serde(default = "default_portfolio_file")]
    pub portfolio_file: PathBuf,

    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,

    #[serde(default)]
    pub fetch: FetchParams,

    #[serde(default)]
    pub weights: ScoringWeights,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            default_ids: default_ids(),
            lookback_days: default_lookback_days(),
            vs_currency: default_vs_currency(),
            portfolio_file: default_portfolio_file(),
            output_file: default_output_file(),
            fetch: FetchParams::default(),
            weights: ScoringWeights::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            default_ids = ?config.default_ids,
            lookback_days = config.lookback_days,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Replace `default_ids` from a comma-separated list (e.g. `SIGNAL_IDS`).
    /// Blank entries are ignored; an all-blank list leaves the ids unchanged.
    pub fn apply_ids_override(&mut self, raw: &str) {
        let ids: Vec<String> = raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if !ids.is_empty() {
            self.default_ids = ids;
        }
    }

    /// Fetch window ending at `end` and reaching back `lookback_days`.
    pub fn fetch_window(&self, end: DateTime<Utc>) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
        let start = end
            .checked_sub_signed(Duration::days(i64::from(self.lookback_days)))
            .with_context(|| {
                format!("lookback of {} days is out of the supported date range", self.lookback_days)
            })?;
        Ok((start, end))
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.default_ids, vec!["btc-bitcoin", "eth-ethereum", "solana-solana"]);
        assert_eq!(cfg.lookback_days, 200);
        assert_eq!(cfg.vs_currency, "usd");
        assert_eq!(cfg.portfolio_file, PathBuf::from("public/portfolio_ids.json"));
        assert_eq!(cfg.fetch.retries, 2);
        assert_eq!(cfg.fetch.backoff_seconds, 2);
        assert_eq!(cfg.fetch.timeout_seconds, 30);
    }

    #[test]
    fn default_weights_match_reference_values() {
        let w = ScoringWeights::default();
        assert!((w.base - 0.5).abs() < f64::EPSILON);
        assert!((w.rsi_bonus - 0.2).abs() < f64::EPSILON);
        assert!((w.rsi_penalty - 0.2).abs() < f64::EPSILON);
        assert!((w.bollinger_bonus - 0.15).abs() < f64::EPSILON);
        assert!((w.bollinger_penalty - 0.15).abs() < f64::EPSILON);
        assert!((w.macd_bonus - 0.1).abs() < f64::EPSILON);
        assert!((w.macd_penalty - 0.1).abs() < f64::EPSILON);
        assert!((w.max_slope_adjustment - 0.05).abs() < f64::EPSILON);
        assert!((w.low_volatility_threshold - 5.0).abs() < f64::EPSILON);
        assert!((w.high_volatility_threshold - 10.0).abs() < f64::EPSILON);
        assert!((w.volatility_adjustment - 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: RuntimeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.lookback_days, 200);
        assert_eq!(cfg.weights, ScoringWeights::default());
        assert_eq!(cfg.fetch.concurrency, 4);
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "lookback_days": 90, "weights": { "rsi_bonus": 0.3 } }"#;
        let cfg: RuntimeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.lookback_days, 90);
        assert!((cfg.weights.rsi_bonus - 0.3).abs() < f64::EPSILON);
        assert!((cfg.weights.rsi_penalty - 0.2).abs() < f64::EPSILON);
        assert_eq!(cfg.vs_currency, "usd");
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signal_config.json");
        std::fs::write(&path, r#"{ "vs_currency": "eur" }"#).unwrap();
        let cfg = RuntimeConfig::load(&path).unwrap();
        assert_eq!(cfg.vs_currency, "eur");
    }

    #[test]
    fn load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(RuntimeConfig::load(dir.path().join("absent.json")).is_err());
    }

    #[test]
    fn ids_override() {
        let mut cfg = RuntimeConfig::default();
        cfg.apply_ids_override(" ada-cardano, ,xrp-xrp ");
        assert_eq!(cfg.default_ids, vec!["ada-cardano", "xrp-xrp"]);

        cfg.apply_ids_override(" , ");
        assert_eq!(cfg.default_ids, vec!["ada-cardano", "xrp-xrp"]);
    }

    #[test]
    fn fetch_window_reaches_back_lookback_days() {
        let end = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let cfg = RuntimeConfig {
            lookback_days: 30,
            ..Default::default()
        };
        let (start, until) = cfg.fetch_window(end).unwrap();
        assert_eq!(until, end);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap());
    }

    #[test]
    fn fetch_window_rejects_out_of_range_lookback() {
        let end = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let cfg = RuntimeConfig {
            lookback_days: u32::MAX,
            ..Default::default()
        };
        let err = cfg.fetch_window(end).unwrap_err();
        assert!(err.to_string().contains("out of the supported date range"));
    }
}
