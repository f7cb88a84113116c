// =============================================================================
// Signals Module
// =============================================================================
//
// Scoring and decision layer: turns an indicator snapshot into a bounded
// composite score, a contribution breakdown and a BUY / SELL / HOLD label.

pub mod weighted_score;

pub use weighted_score::{ScorePart, ScoreResult, WeightedScorer};
