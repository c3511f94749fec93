//! Composite score derivation and score colorizing.
//!
//! The final score is a fixed 40/40/20 weighting of the cost, safety and
//! services sub-scores, rounded to one decimal.

use lima_housing_listing_models::ScoreBucket;

/// Weight of the cost sub-score.
pub const COST_WEIGHT: f64 = 0.4;
/// Weight of the safety sub-score.
pub const SAFETY_WEIGHT: f64 = 0.4;
/// Weight of the services sub-score.
pub const SERVICES_WEIGHT: f64 = 0.2;

/// Upper bound of every sub-score.
pub const MAX_SCORE: f64 = 10.0;

/// Rounds `value` half away from zero to `decimals` places.
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

/// Derives the final score from the three sub-scores.
#[must_use]
pub fn weighted_score(cost: f64, safety: f64, services: f64) -> f64 {
    round_to(
        cost * COST_WEIGHT + safety * SAFETY_WEIGHT + services * SERVICES_WEIGHT,
        1,
    )
}

/// Derives a cost sub-score from the price per square meter.
///
/// Every 100 soles/m² costs one point; the result is clamped to `0..=10`.
#[must_use]
pub fn cost_score_from_price_per_area(price_per_area: f64) -> f64 {
    round_to((MAX_SCORE - price_per_area / 100.0).clamp(0.0, MAX_SCORE), 1)
}

/// Maps a final score to its presentation bucket.
///
/// Lower bounds are inclusive. Anything below the lowest threshold,
/// including `NaN`, is [`ScoreBucket::Poor`].
#[must_use]
pub fn colorize(score: f64) -> ScoreBucket {
    ScoreBucket::THRESHOLDS
        .iter()
        .find(|(_, lower)| score >= *lower)
        .map_or(ScoreBucket::Poor, |(bucket, _)| *bucket)
}
