// =============================================================================
// Portfolio: asset id resolution
// =============================================================================
//
// Precedence: explicit CLI ids > portfolio file > configured defaults.
// =============================================================================

use std::collections::HashSet;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

/// Load asset ids from a JSON array on disk, falling back to `fallback` when
/// the file is missing, unreadable, not an array, or holds no usable id.
pub fn load_portfolio_ids(path: &Path, fallback: &[String]) -> Vec<String> {
    if !path.exists() {
        debug!(path = %path.display(), "portfolio file not found, using defaults");
        return fallback.to_vec();
    }

    let parsed = std::fs::read_to_string(path)
        .map_err(anyhow::Error::from)
        .and_then(|text| serde_json::from_str::<Value>(&text).map_err(anyhow::Error::from));

    let ids = match parsed {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            warn!(path = %path.display(), "portfolio file is not a JSON array, using defaults");
            return fallback.to_vec();
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to load portfolio file, using defaults");
            return fallback.to_vec();
        }
    };

    let raw: Vec<String> = ids
        .iter()
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();
    let cleaned = dedupe_ids(&raw);

    if cleaned.is_empty() {
        fallback.to_vec()
    } else {
        cleaned
    }
}

/// Trim, drop blanks, and remove duplicates keeping the first occurrence.
pub fn dedupe_ids(ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_string()))
        .map(str::to_string)
        .collect()
}

/// Resolve the ids to process for this run.
pub fn collect_ids(cli_ids: &[String], portfolio_file: &Path, defaults: &[String]) -> Vec<String> {
    let explicit = dedupe_ids(cli_ids);
    if !explicit.is_empty() {
        return explicit;
    }
    dedupe_ids(&load_portfolio_ids(portfolio_file, defaults))
}

/// Display symbol for a provider id: `"btc-bitcoin"` => `"BTC"`.
pub fn symbol_for(id: &str) -> String {
    id.split('-').next().unwrap_or(id).to_uppercase()
}
