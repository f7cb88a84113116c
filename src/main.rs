// =============================================================================
// Signal Desk: Main Entry Point
// =============================================================================
//
// One run = one snapshot: resolve the portfolio, fetch each asset's daily
// OHLCV history, compute indicators, score, and write the JSON artifact the
// dashboard reads.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod cli;
mod coinpaprika;
mod indicators;
mod market_data;
mod numeric;
mod pipeline;
mod portfolio;
mod report;
mod runtime_config;
mod signals;
mod types;

use chrono::Utc;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::coinpaprika::CoinPaprikaClient;
use crate::report::{ReportMeta, SignalReport};
use crate::runtime_config::RuntimeConfig;
use crate::signals::WeightedScorer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = RuntimeConfig::load(&cli.config).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });

    if let Ok(ids) = std::env::var("SIGNAL_IDS") {
        config.apply_ids_override(&ids);
    }
    cli.apply_overrides(&mut config);

    let ids = portfolio::collect_ids(&cli.ids, &config.portfolio_file, &config.default_ids);
    info!(
        ids = ?ids,
        lookback_days = config.lookback_days,
        vs_currency = %config.vs_currency,
        "Configured portfolio"
    );

    // ── 2. Fetch window ──────────────────────────────────────────────────
    let (start, end) = config.fetch_window(Utc::now())?;

    // ── 3. Pipeline ──────────────────────────────────────────────────────
    let client = CoinPaprikaClient::new(&config.fetch, config.vs_currency.clone())?;
    let scorer = WeightedScorer::new(config.weights.clone());

    let signals = pipeline::generate_signals(
        &client,
        &scorer,
        &ids,
        start,
        end,
        config.fetch.concurrency,
    )
    .await;

    let ok = signals.values().filter(|s| s.is_signal()).count();

    // ── 4. Report ────────────────────────────────────────────────────────
    let report = SignalReport {
        meta: ReportMeta {
            generated_at_utc: Utc::now(),
            vs_currency: config.vs_currency.clone(),
            lookback_days: config.lookback_days,
            asset_count: ids.len(),
        },
        signals,
    };
    report.write_atomic(&config.output_file)?;

    info!(
        output = %config.output_file.display(),
        assets = ids.len(),
        signals = ok,
        errors = ids.len() - ok,
        "Signal generation complete"
    );
    Ok(())
}
