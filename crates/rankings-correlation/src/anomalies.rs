//! Anomaly detection: sectors whose move disagrees with what the rank lists show

use crate::mapping::SectorRankingTally;
use serde::{Deserialize, Serialize};

/// % change that makes a sector move worth explaining
const MOVE_THRESHOLD: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnomalyType {
    None,
    /// Sector up more than 1% but none of its stocks are top gainers
    SectorUpNoRankings,
    /// Sector down more than 1% while its stocks crowd the lists
    SectorDownManyRankings,
    /// Sector direction opposite to its stocks' rankings
    DivergentPerformance,
}

impl AnomalyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyType::None => "None",
            AnomalyType::SectorUpNoRankings => "Sector Up No Rankings",
            AnomalyType::SectorDownManyRankings => "Sector Down Many Rankings",
            AnomalyType::DivergentPerformance => "Divergent Performance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnomalySeverity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorAnomaly {
    pub sector_id: String,
    pub sector_name: String,
    pub anomaly: AnomalyType,
    pub severity: AnomalySeverity,
    pub sector_change: f64,
    pub ranking_count: usize,
    pub description: String,
}

/// First matching anomaly for a sector. A missing tally means no appearances.
pub fn detect_anomaly(change: f64, tally: Option<&SectorRankingTally>) -> AnomalyType {
    let gainers = tally.map(|t| t.gainers).unwrap_or(0);
    let losers = tally.map(|t| t.losers).unwrap_or(0);
    let total = tally.map(|t| t.total).unwrap_or(0);

    if change > MOVE_THRESHOLD && gainers == 0 {
        AnomalyType::SectorUpNoRankings
    } else if change < -MOVE_THRESHOLD && total >= 3 {
        AnomalyType::SectorDownManyRankings
    } else if (change > MOVE_THRESHOLD && losers > gainers)
        || (change < -MOVE_THRESHOLD && gainers > losers)
    {
        AnomalyType::DivergentPerformance
    } else {
        AnomalyType::None
    }
}

pub fn anomaly_severity(change: f64, ranking_count: usize) -> AnomalySeverity {
    let magnitude = change.abs();
    if magnitude > 2.0 && ranking_count == 0 {
        AnomalySeverity::High
    } else if magnitude > 1.5 || (magnitude > 1.0 && ranking_count == 0) {
        AnomalySeverity::Medium
    } else {
        AnomalySeverity::Low
    }
}

pub(crate) fn describe(anomaly: AnomalyType, sector_name: &str, change: f64, count: usize) -> String {
    match anomaly {
        AnomalyType::SectorUpNoRankings => format!(
            "{} gained {:.2}% without a single top gainer; the move may be index-weight driven",
            sector_name, change
        ),
        AnomalyType::SectorDownManyRankings => format!(
            "{} fell {:.2}% while its stocks took {} ranking spots; heavy selling activity",
            sector_name,
            change.abs(),
            count
        ),
        AnomalyType::DivergentPerformance => format!(
            "{} moved {:+.2}% against the direction of its ranked stocks",
            sector_name, change
        ),
        AnomalyType::None => String::new(),
    }
}
