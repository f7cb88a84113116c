// =============================================================================
// Weighted Composite Scorer: indicator snapshot to BUY / SELL / HOLD
// =============================================================================
//
// score = base
//       ± RSI rule        (< 30 bonus, > 70 penalty)
//       ± Bollinger rule  (%B < 0.2 bonus, %B > 0.8 penalty)
//       ± MACD rule       (hist > 0 bonus, otherwise penalty)
//       + clamp(slope / 10, ±max_slope_adjustment)      when slope present
//       ± volatility rule (ATR% above high / below low)  when ATR% present
//
// The result is clamped to [0, 1].  RSI, %B and the MACD histogram are
// mandatory; without any of them no score is produced and the decision is
// HOLD.
// =============================================================================

use std::collections::BTreeMap;

use serde::Serialize;

use crate::indicators::IndicatorSnapshot;
use crate::numeric::round_dp;
use crate::runtime_config::ScoringWeights;
use crate::types::Decision;

/// Scores at or above this are BUY.
pub const BUY_THRESHOLD: f64 = 0.65;
/// Scores at or below this are SELL.
pub const SELL_THRESHOLD: f64 = 0.35;

const RSI_OVERSOLD: f64 = 30.0;
const RSI_OVERBOUGHT: f64 = 70.0;
const PCTB_LOW: f64 = 0.2;
const PCTB_HIGH: f64 = 0.8;

/// Named entry of the contribution breakdown, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorePart {
    Base,
    Rsi,
    Bollinger,
    Macd,
    #[serde(rename = "sma50_slope")]
    Sma50Slope,
    Atr,
    Total,
}

/// Result of scoring one snapshot.
///
/// `parts` holds percentage-point contributions; `parts[Total]` equals
/// `percent`.  `score` is unrounded.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub score: Option<f64>,
    pub decision: Decision,
    pub percent: Option<u32>,
    pub parts: BTreeMap<ScorePart, f64>,
}

impl ScoreResult {
    /// No score: HOLD with an empty breakdown.
    pub fn unavailable() -> Self {
        Self {
            score: None,
            decision: Decision::Hold,
            percent: None,
            parts: BTreeMap::new(),
        }
    }
}

/// Map a clamped score to a decision.
pub fn decide(score: f64) -> Decision {
    if score >= BUY_THRESHOLD {
        Decision::Buy
    } else if score <= SELL_THRESHOLD {
        Decision::Sell
    } else {
        Decision::Hold
    }
}

/// Signed adjustment for a two-sided threshold rule.
fn band_rule(value: f64, low: f64, high: f64, bonus: f64, penalty: f64) -> f64 {
    if value < low {
        bonus
    } else if value > high {
        -penalty
    } else {
        0.0
    }
}

/// The composite scoring engine.
#[derive(Debug, Clone, Default)]
pub struct WeightedScorer {
    weights: ScoringWeights,
}

impl WeightedScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    /// Score `snapshot` and derive the decision.
    pub fn score(&self, snapshot: &IndicatorSnapshot) -> ScoreResult {
        let w = &self.weights;

        let (Some(rsi), Some(pctb), Some(hist)) = (
            snapshot.rsi14,
            snapshot.bollinger.pctb,
            snapshot.macd.hist,
        ) else {
            return ScoreResult::unavailable();
        };

        let mut parts = BTreeMap::new();
        let mut score = w.base;
        parts.insert(ScorePart::Base, w.base * 100.0);

        let rsi_adj = band_rule(rsi, RSI_OVERSOLD, RSI_OVERBOUGHT, w.rsi_bonus, w.rsi_penalty);
        score += rsi_adj;
        parts.insert(ScorePart::Rsi, rsi_adj * 100.0);

        let bb_adj = band_rule(pctb, PCTB_LOW, PCTB_HIGH, w.bollinger_bonus, w.bollinger_penalty);
        score += bb_adj;
        parts.insert(ScorePart::Bollinger, bb_adj * 100.0);

        // Two-way: a zero histogram counts as bearish.
        let macd_adj = if hist > 0.0 { w.macd_bonus } else { -w.macd_penalty };
        score += macd_adj;
        parts.insert(ScorePart::Macd, macd_adj * 100.0);

        if let Some(slope) = snapshot.sma50_slope {
            let cap = w.max_slope_adjustment;
            let slope_adj = (slope / 10.0).min(cap).max(-cap);
            score += slope_adj;
            parts.insert(ScorePart::Sma50Slope, round_dp(slope_adj * 100.0, 1));
        }

        if let Some(atr_pct) = snapshot.atr_pct {
            let vol_adj = if atr_pct > w.high_volatility_threshold {
                -w.volatility_adjustment
            } else if atr_pct < w.low_volatility_threshold {
                w.volatility_adjustment
            } else {
                0.0
            };
            score += vol_adj;
            parts.insert(ScorePart::Atr, vol_adj * 100.0);
        }

        let score = score.clamp(0.0, 1.0);
        let percent = (score * 100.0).round_ties_even() as u32;
        parts.insert(ScorePart::Total, f64::from(percent));

        ScoreResult {
            score: Some(score),
            decision: decide(score),
            percent: Some(percent),
            parts,
        }
    }
}
