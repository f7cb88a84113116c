pub mod bar;
pub mod validation;

pub use bar::{Bar, PriceSeries};
pub use validation::validate_ohlcv;

/// One raw OHLCV record as delivered by a provider (a JSON object).
pub type RawRecord = serde_json::Map<String, serde_json::Value>;
