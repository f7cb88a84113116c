// =============================================================================
// Signal Pipeline: fetch → validate → indicators → score, per asset
// =============================================================================
//
// Assets are independent: each one is fetched and scored in its own future,
// with at most `concurrency` in flight.  A failure for one asset becomes an
// error entry in the report and never affects the others.
// =============================================================================

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use futures_util::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::coinpaprika::OhlcvSource;
use crate::indicators::compute_snapshot;
use crate::market_data::{validate_ohlcv, PriceSeries};
use crate::report::{AssetSignal, SignalPayload};
use crate::signals::WeightedScorer;

pub const INCOMPLETE_INDICATORS: &str = "incomplete indicators";
pub const SCORE_UNAVAILABLE: &str = "score unavailable";

/// Score an already validated series.  Pure.
pub fn evaluate_series(id: &str, series: &PriceSeries, scorer: &WeightedScorer) -> AssetSignal {
    let ind = compute_snapshot(series);

    let required = [
        ind.rsi14,
        ind.sma50,
        ind.bollinger.pctb,
        ind.last_close,
        ind.macd.hist,
    ];
    if required.iter().any(Option::is_none) {
        return AssetSignal::error(INCOMPLETE_INDICATORS);
    }

    let result = scorer.score(&ind);
    if result.score.is_none() {
        return AssetSignal::error(SCORE_UNAVAILABLE);
    }

    AssetSignal::Signal(Box::new(SignalPayload::build(id, &ind, &result)))
}

/// Fetch, validate and score a single asset.
pub async fn process_asset<S: OhlcvSource>(
    source: &S,
    scorer: &WeightedScorer,
    id: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> AssetSignal {
    let records = match source.fetch_ohlcv(id, start, end).await {
        Ok(records) => records,
        Err(e) => {
            warn!(asset = %id, error = %e, "fetch failed");
            return AssetSignal::error(format!("{e:#}"));
        }
    };

    let series = match validate_ohlcv(&records) {
        Ok(series) => series,
        Err(issues) => {
            let msg = issues.join("; ");
            warn!(asset = %id, reason = %msg, "skipped: invalid OHLCV");
            return AssetSignal::error(msg);
        }
    };

    let signal = evaluate_series(id, &series, scorer);
    match &signal {
        AssetSignal::Signal(payload) => info!(
            asset = %id,
            bars = series.len(),
            decision = %payload.decision,
            percent = ?payload.percent,
            "signal generated"
        ),
        AssetSignal::Error { error } => warn!(asset = %id, reason = %error, "skipped"),
    }
    signal
}

/// Run the pipeline over `ids` with bounded concurrency.
pub async fn generate_signals<S: OhlcvSource>(
    source: &S,
    scorer: &WeightedScorer,
    ids: &[String],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    concurrency: usize,
) -> BTreeMap<String, AssetSignal> {
    stream::iter(ids)
        .map(|id| async move {
            let signal = process_asset(source, scorer, id, start, end).await;
            (id.clone(), signal)
        })
        .buffered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect()
}
