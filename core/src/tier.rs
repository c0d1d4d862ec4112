//! Tier evaluation — the one place a monetary amount meets a commission
//! schedule. Called by the per-rep aggregator and the manager rollup.

use serde::{Deserialize, Serialize};

/// How a matched tier pays out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum TierRate {
    /// The carried value is a percentage of the evaluated amount.
    Percent(f64),
    /// The carried value is paid flat, independent of the amount.
    Fixed(f64),
}

/// One band of a commission schedule. Bounds are inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub min: f64,
    pub max: f64,
    #[serde(flatten)]
    pub rate: TierRate,
}

/// Evaluate `amount` against an ordered schedule.
///
/// Non-positive amounts and empty schedules pay zero. The first tier in
/// array order whose band contains the amount wins; overlapping bands are
/// legal and resolved by that order. An amount outside every band (this
/// includes NaN) pays zero.
pub fn evaluate(amount: f64, tiers: &[Tier]) -> f64 {
    if amount <= 0.0 || tiers.is_empty() {
        return 0.0;
    }
    let Some(tier) = tiers.iter().find(|t| amount >= t.min && amount <= t.max) else {
        return 0.0;
    };
    match tier.rate {
        TierRate::Percent(pct) => amount * pct / 100.0,
        TierRate::Fixed(value) => value,
    }
}
