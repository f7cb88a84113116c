// =============================================================================
// CoinPaprika REST client: historical daily OHLCV
// =============================================================================
//
// GET {base}/tickers/{id}/ohlcv/historical?start=YYYY-MM-DD&end=YYYY-MM-DD&quote={vs}
//
// The payload is a JSON array of objects with `time_open`, `time_close`,
// `open`, `high`, `low`, `close`, `volume` and `market_cap`.  Records are
// returned unvalidated (validation happens downstream) but sorted by time,
// with `time_open` exposed as `time`.
// =============================================================================

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, instrument};

use super::retry::with_retry;
use crate::market_data::validation::{parse_time, TIME_COLUMN};
use crate::market_data::RawRecord;
use crate::runtime_config::FetchParams;

/// Anything able to deliver raw OHLCV records for an asset id.
pub trait OhlcvSource {
    fn fetch_ohlcv(
        &self,
        id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<RawRecord>>> + Send;
}

/// CoinPaprika client with timeout and linear-backoff retries.
#[derive(Clone)]
pub struct CoinPaprikaClient {
    base_url: String,
    quote: String,
    retries: u32,
    backoff: Duration,
    client: reqwest::Client,
}

impl CoinPaprikaClient {
    pub fn new(params: &FetchParams, quote: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(params.timeout_seconds))
            .build()
            .context("failed to build HTTP client")?;

        debug!(base_url = %params.base_url, "CoinPaprikaClient initialised");

        Ok(Self {
            base_url: params.base_url.trim_end_matches('/').to_string(),
            quote: quote.into(),
            retries: params.retries,
            backoff: Duration::from_secs(params.backoff_seconds),
            client,
        })
    }

    fn historical_url(&self, id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> String {
        format!(
            "{}/tickers/{}/ohlcv/historical?start={}&end={}&quote={}",
            self.base_url,
            id,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d"),
            self.quote
        )
    }

    /// Single GET without retries.
    #[instrument(skip(self), name = "coinpaprika::fetch_once")]
    async fn fetch_once(
        &self,
        id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RawRecord>> {
        let url = self.historical_url(id, start, end);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET ohlcv/historical for {id} failed"))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .with_context(|| format!("failed to read OHLCV response for {id}"))?;

        let body = decode_body(id, status, &text)?;
        let records = parse_payload(id, body)?;
        debug!(id, count = records.len(), "ohlcv fetched");
        Ok(records)
    }
}

impl OhlcvSource for CoinPaprikaClient {
    async fn fetch_ohlcv(
        &self,
        id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RawRecord>> {
        with_retry(self.retries, self.backoff, |_| self.fetch_once(id, start, end)).await
    }
}

impl std::fmt::Debug for CoinPaprikaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoinPaprikaClient")
            .field("base_url", &self.base_url)
            .field("quote", &self.quote)
            .field("retries", &self.retries)
            .finish()
    }
}

const ERROR_BODY_LIMIT: usize = 200;

/// Fail on a non-success status before touching the body as JSON.
fn decode_body(id: &str, status: StatusCode, text: &str) -> Result<Value> {
    if !status.is_success() {
        let snippet: String = text.trim().chars().take(ERROR_BODY_LIMIT).collect();
        anyhow::bail!("CoinPaprika ohlcv/historical for {} returned {}: {}", id, status, snippet);
    }
    serde_json::from_str(text).with_context(|| format!("failed to parse OHLCV response for {id}"))
}

/// Turn a response body into time-sorted records.
///
/// Errors when the body is not a non-empty array of objects.
pub fn parse_payload(id: &str, body: Value) -> Result<Vec<RawRecord>> {
    let Value::Array(entries) = body else {
        anyhow::bail!("Empty OHLCV for {id}");
    };
    if entries.is_empty() {
        anyhow::bail!("Empty OHLCV for {id}");
    }

    let mut records = Vec::with_capacity(entries.len());
    for entry in entries {
        let Value::Object(mut record) = entry else {
            anyhow::bail!("OHLCV entry for {id} is not an object");
        };
        if !record.contains_key(TIME_COLUMN) {
            if let Some(open_time) = record.get("time_open").cloned() {
                record.insert(TIME_COLUMN.to_string(), open_time);
            }
        }
        records.push(record);
    }

    records.sort_by_key(|r| r.get(TIME_COLUMN).and_then(parse_time));
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_is_sorted_and_time_normalised() {
        let body = json!([
            {"time_open": "2024-01-02T00:00:00Z", "open": 2, "high": 3, "low": 1, "close": 2.5, "volume": 10},
            {"time_open": "2024-01-01T00:00:00Z", "open": 1, "high": 2, "low": 0.5, "close": 1.5, "volume": 9},
        ]);
        let records = parse_payload("btc-bitcoin", body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["time"], json!("2024-01-01T00:00:00Z"));
        assert_eq!(records[1]["close"], json!(2.5));
    }

    #[test]
    fn error_status_is_reported_before_parsing() {
        let err = decode_body(
            "btc-bitcoin",
            StatusCode::TOO_MANY_REQUESTS,
            "<html>slow down</html>",
        )
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("429"));
        assert!(msg.contains("<html>slow down</html>"));

        let err = decode_body("btc-bitcoin", StatusCode::BAD_GATEWAY, "").unwrap_err();
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn success_body_must_be_json() {
        let body = decode_body("btc-bitcoin", StatusCode::OK, r#"[{"close": 1}]"#).unwrap();
        assert_eq!(body, json!([{"close": 1}]));

        let err = decode_body("btc-bitcoin", StatusCode::OK, "not json").unwrap_err();
        assert!(err.to_string().contains("failed to parse OHLCV response"));
    }

    #[test]
    fn explicit_time_column_is_kept() {
        let body = json!([{"time": "2024-01-05", "time_open": "2024-01-01T00:00:00Z"}]);
        let records = parse_payload("x", body).unwrap();
        assert_eq!(records[0]["time"], json!("2024-01-05"));
    }

    #[test]
    fn empty_or_non_array_payload_errors() {
        let err = parse_payload("btc-bitcoin", json!([])).unwrap_err();
        assert_eq!(err.to_string(), "Empty OHLCV for btc-bitcoin");
        assert!(parse_payload("btc-bitcoin", json!({"error": "id not found"})).is_err());
        assert!(parse_payload("btc-bitcoin", json!([1, 2])).is_err());
    }

    #[test]
    fn url_contains_window_and_quote() {
        let params = FetchParams {
            base_url: "https://api.example.test/v1/".to_string(),
            ..Default::default()
        };
        let client = CoinPaprikaClient::new(&params, "usd").unwrap();
        let start = DateTime::parse_from_rfc3339("2024-01-01T12:00:00Z").unwrap().with_timezone(&Utc);
        let end = DateTime::parse_from_rfc3339("2024-07-19T08:30:00Z").unwrap().with_timezone(&Utc);
        assert_eq!(
            client.historical_url("eth-ethereum", start, end),
            "https://api.example.test/v1/tickers/eth-ethereum/ohlcv/historical?start=2024-01-01&end=2024-07-19&quote=usd"
        );
    }
}
