use std::path::PathBuf;

use clap::Parser;

use crate::runtime_config::RuntimeConfig;

/// Generate per-asset technical trading signals for the dashboard.
#[derive(Debug, Parser)]
#[command(name = "signal-desk", version)]
pub struct Cli {
    /// Override the asset ids to process. Defaults to the portfolio file or built-ins.
    #[arg(long, num_args = 0..)]
    pub ids: Vec<String>,

    /// Number of days to fetch for each asset (default: config value).
    #[arg(long)]
    pub lookback: Option<u32>,

    /// Reporting currency (default: config value).
    #[arg(long)]
    pub vs_currency: Option<String>,

    /// Where to write the resulting JSON payload (default: config value).
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Runtime configuration file.
    #[arg(long, env = "SIGNAL_CONFIG", default_value = "signal_config.json")]
    pub config: PathBuf,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut RuntimeConfig) {
        if let Some(days) = self.lookback.filter(|d| *d > 0) {
            config.lookback_days = days;
        }
        if let Some(vs) = self.vs_currency.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            config.vs_currency = vs.to_string();
        }
        if let Some(output) = &self.output {
            config.output_file = output.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ids_and_overrides() {
        let cli = Cli::parse_from([
            "signal-desk",
            "--ids",
            "btc-bitcoin",
            "eth-ethereum",
            "--lookback",
            "90",
            "--vs-currency",
            "eur",
            "--output",
            "out/signals.json",
        ]);
        assert_eq!(cli.ids, vec!["btc-bitcoin", "eth-ethereum"]);

        let mut config = RuntimeConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.lookback_days, 90);
        assert_eq!(config.vs_currency, "eur");
        assert_eq!(config.output_file, PathBuf::from("out/signals.json"));
    }

    #[test]
    fn no_flags_keeps_config() {
        let cli = Cli::parse_from(["signal-desk"]);
        assert!(cli.ids.is_empty());

        let mut config = RuntimeConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.lookback_days, 200);
        assert_eq!(config.vs_currency, "usd");
    }

    #[test]
    fn zero_lookback_is_ignored() {
        let cli = Cli::parse_from(["signal-desk", "--lookback", "0"]);
        let mut config = RuntimeConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.lookback_days, 200);
    }
}
