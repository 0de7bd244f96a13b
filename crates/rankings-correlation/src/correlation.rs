//! Per-sector and overall correlation between sector moves and stock rankings

use crate::anomalies::AnomalyType;
use crate::mapping::SectorRankingTally;
use serde::{Deserialize, Serialize};

/// Appearances needed before a (mis)match counts as strong
const STRONG_APPEARANCES: usize = 3;
/// Absolute % change above which a mismatch is called strongly negative
const STRONG_MISMATCH_CHANGE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CorrelationStrength {
    StrongPositive,
    Positive,
    Neutral,
    Negative,
    StrongNegative,
}

impl CorrelationStrength {
    /// Fixed lookup, not interpolated
    pub fn score(&self) -> f64 {
        match self {
            CorrelationStrength::StrongPositive => 90.0,
            CorrelationStrength::Positive => 70.0,
            CorrelationStrength::Neutral => 50.0,
            CorrelationStrength::Negative => 30.0,
            CorrelationStrength::StrongNegative => 10.0,
        }
    }

    /// Bucket a 0-100 score; each boundary belongs to the upper tier
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 80.0 => CorrelationStrength::StrongPositive,
            s if s >= 60.0 => CorrelationStrength::Positive,
            s if s >= 40.0 => CorrelationStrength::Neutral,
            s if s >= 20.0 => CorrelationStrength::Negative,
            _ => CorrelationStrength::StrongNegative,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CorrelationStrength::StrongPositive => "Strong Positive",
            CorrelationStrength::Positive => "Positive",
            CorrelationStrength::Neutral => "Neutral",
            CorrelationStrength::Negative => "Negative",
            CorrelationStrength::StrongNegative => "Strong Negative",
        }
    }
}

/// Correlation of one sector's move with its stocks' rankings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationRecord {
    pub sector_id: String,
    pub sector_name: String,
    pub sector_change: f64,
    /// Total appearances of the sector's stocks in the ranked lists
    pub ranking_count: usize,
    /// Appearances the sector would get in proportion to its market cap
    pub expected_count: f64,
    pub strength: CorrelationStrength,
    pub score: f64,
    pub anomaly: AnomalyType,
}

/// Classify how well a sector's direction agrees with the rank lists.
///
/// The dominant list direction comes from gainers vs. losers; ties, flat
/// sectors and sectors without appearances are Neutral.
pub fn classify_sector_correlation(change: f64, tally: &SectorRankingTally) -> CorrelationStrength {
    let sector_up = change > 0.0;
    let sector_down = change < 0.0;
    if !sector_up && !sector_down {
        return CorrelationStrength::Neutral;
    }

    let rankings_up = tally.gainers > tally.losers;
    let rankings_down = tally.losers > tally.gainers;
    if !rankings_up && !rankings_down {
        return CorrelationStrength::Neutral;
    }

    let matches = (sector_up && rankings_up) || (sector_down && rankings_down);
    if matches {
        let matching = if sector_up { tally.gainers } else { tally.losers };
        if matching >= STRONG_APPEARANCES {
            CorrelationStrength::StrongPositive
        } else {
            CorrelationStrength::Positive
        }
    } else {
        let contrary = if rankings_up { tally.gainers } else { tally.losers };
        if contrary < STRONG_APPEARANCES {
            CorrelationStrength::Neutral
        } else if change.abs() >= STRONG_MISMATCH_CHANGE {
            CorrelationStrength::StrongNegative
        } else {
            CorrelationStrength::Negative
        }
    }
}

/// Mean of the per-sector scores, re-bucketed on the same scale.
/// No records means a neutral 50.
pub fn overall_correlation(records: &[CorrelationRecord]) -> (CorrelationStrength, f64) {
    if records.is_empty() {
        return (CorrelationStrength::Neutral, 50.0);
    }
    let avg = records.iter().map(|r| r.score).sum::<f64>() / records.len() as f64;
    (CorrelationStrength::from_score(avg), avg)
}

/// Proportional share of `total_appearances` for a sector, by market cap.
/// Falls back to an equal split when market caps are unknown.
pub fn expected_count(
    total_appearances: usize,
    sector_market_cap: f64,
    total_market_cap: f64,
    sector_count: usize,
) -> f64 {
    if total_market_cap > 0.0 {
        total_appearances as f64 * sector_market_cap.max(0.0) / total_market_cap
    } else if sector_count > 0 {
        total_appearances as f64 / sector_count as f64
    } else {
        0.0
    }
}
