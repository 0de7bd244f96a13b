//! Sector Performance
//!
//! Classifies each sector's momentum relative to the market and infers the
//! direction money is moving in or out of it.

use market_core::stats::{cmp_desc, mean, percent_of};
use market_core::SectorSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maximum confidence a single-day rotation signal can carry
pub const MAX_SIGNAL_CONFIDENCE: f64 = 85.0;

/// Percentage-point improvement over the previous day that upgrades
/// Accumulate to Entry (and Distribute to Exit)
const IMPROVEMENT_THRESHOLD: f64 = 0.5;

/// Momentum of a sector relative to the market average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Momentum {
    StrongOutperform,
    Outperform,
    InLine,
    Underperform,
    SignificantLag,
}

impl Momentum {
    pub fn name(&self) -> &'static str {
        match self {
            Momentum::StrongOutperform => "Strong Outperform",
            Momentum::Outperform => "Outperform",
            Momentum::InLine => "In-line",
            Momentum::Underperform => "Underperform",
            Momentum::SignificantLag => "Significant Lag",
        }
    }

    pub fn is_leading(&self) -> bool {
        matches!(self, Momentum::StrongOutperform | Momentum::Outperform)
    }

    pub fn is_lagging(&self) -> bool {
        matches!(self, Momentum::Underperform | Momentum::SignificantLag)
    }
}

/// Direction money appears to be flowing for a sector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RotationSignal {
    Entry,
    Accumulate,
    Hold,
    Distribute,
    Exit,
}

impl RotationSignal {
    pub fn name(&self) -> &'static str {
        match self {
            RotationSignal::Entry => "Entry",
            RotationSignal::Accumulate => "Accumulate",
            RotationSignal::Hold => "Hold",
            RotationSignal::Distribute => "Distribute",
            RotationSignal::Exit => "Exit",
        }
    }
}

/// Result of `detect_rotation_signal`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationReading {
    pub signal: RotationSignal,
    /// 0-85
    pub confidence: f64,
    pub vs_market: f64,
    pub momentum: Momentum,
}

/// A sector snapshot enriched with its relative performance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorPerformance {
    pub sector: SectorSnapshot,
    /// Sector % change minus the average % change across all sectors
    pub vs_market: f64,
    /// 1 = best % change of the day
    pub rank: usize,
    pub momentum: Momentum,
    pub signal: RotationSignal,
    pub confidence: f64,
    pub value: f64,
    /// Share of total sector traded value, in percent
    pub value_ratio: f64,
    /// Appearances of the sector's stocks across the ranked lists
    pub ranking_appearances: usize,
}

impl SectorPerformance {
    pub fn id(&self) -> &str {
        &self.sector.id
    }

    pub fn change_percent(&self) -> f64 {
        self.sector.change_percent
    }
}

/// Classify `vs_market` into one of five contiguous bins.
///
/// Boundaries resolve to the lower-magnitude tier: exactly -0.5 is In-line,
/// exactly -1.5 is Underperform. NaN lands in Significant Lag.
pub fn classify_momentum(vs_market: f64) -> Momentum {
    if vs_market >= 1.5 {
        Momentum::StrongOutperform
    } else if vs_market >= 0.5 {
        Momentum::Outperform
    } else if vs_market >= -0.5 {
        Momentum::InLine
    } else if vs_market >= -1.5 {
        Momentum::Underperform
    } else {
        Momentum::SignificantLag
    }
}

/// Infer the rotation signal for one sector.
///
/// `historical_change` is the sector's % change on the comparison day; when
/// present it can upgrade the signal to Entry/Exit.
pub fn detect_rotation_signal(
    sector: &SectorSnapshot,
    market_change: f64,
    historical_change: Option<f64>,
) -> RotationReading {
    let vs_market = sector.change_percent - market_change;
    let momentum = classify_momentum(vs_market);
    let magnitude = vs_market.abs();

    let (signal, confidence) = if momentum.is_leading() {
        let improving = historical_change
            .map(|prev| sector.change_percent - prev > IMPROVEMENT_THRESHOLD)
            .unwrap_or(false);
        if improving {
            (RotationSignal::Entry, 60.0 + magnitude * 10.0)
        } else {
            (RotationSignal::Accumulate, 50.0 + magnitude * 8.0)
        }
    } else if momentum.is_lagging() {
        let deteriorating = historical_change
            .map(|prev| prev - sector.change_percent > IMPROVEMENT_THRESHOLD)
            .unwrap_or(false);
        if deteriorating {
            (RotationSignal::Exit, 60.0 + magnitude * 10.0)
        } else {
            (RotationSignal::Distribute, 50.0 + magnitude * 8.0)
        }
    } else {
        (RotationSignal::Hold, 50.0)
    };

    RotationReading {
        signal,
        confidence: confidence.min(MAX_SIGNAL_CONFIDENCE),
        vs_market,
        momentum,
    }
}

/// Simple average % change across all sectors
pub fn market_average(sectors: &[SectorSnapshot]) -> f64 {
    let changes: Vec<f64> = sectors.iter().map(|s| s.change_percent).collect();
    mean(&changes)
}

/// Build `SectorPerformance` for every snapshot, ordered best first.
///
/// `appearances` maps sector id → count of ranked-list appearances;
/// `previous` supplies the comparison day for Entry/Exit detection.
pub fn analyze_sectors(
    sectors: &[SectorSnapshot],
    appearances: &HashMap<String, usize>,
    previous: Option<&[SectorSnapshot]>,
) -> Vec<SectorPerformance> {
    let market_change = market_average(sectors);
    let total_value: f64 = sectors.iter().map(|s| s.value).sum();

    let previous_changes: HashMap<&str, f64> = previous
        .unwrap_or_default()
        .iter()
        .map(|s| (s.id.as_str(), s.change_percent))
        .collect();

    let mut ordered: Vec<&SectorSnapshot> = sectors.iter().collect();
    ordered.sort_by(|a, b| cmp_desc(a.change_percent, b.change_percent));

    ordered
        .into_iter()
        .enumerate()
        .map(|(i, sector)| {
            let reading = detect_rotation_signal(
                sector,
                market_change,
                previous_changes.get(sector.id.as_str()).copied(),
            );
            SectorPerformance {
                sector: sector.clone(),
                vs_market: reading.vs_market,
                rank: i + 1,
                momentum: reading.momentum,
                signal: reading.signal,
                confidence: reading.confidence,
                value: sector.value,
                value_ratio: percent_of(sector.value, total_value),
                ranking_appearances: appearances
                    .get(&sector.id)
                    .or_else(|| appearances.get(&sector.id.to_uppercase()))
                    .copied()
                    .unwrap_or(0),
            }
        })
        .collect()
}

/// Leaders and laggards picked by percentile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PercentileSelection {
    /// Best first
    pub leaders: Vec<SectorPerformance>,
    /// Worst first
    pub laggards: Vec<SectorPerformance>,
}

/// Number of sectors taken from each end for a given percentile
pub fn percentile_count(total: usize, pct: f64) -> usize {
    let raw = (pct / 100.0 * total as f64).ceil();
    let raw = if raw.is_finite() && raw > 0.0 { raw as usize } else { 0 };
    raw.clamp(3, 6).min(total)
}

/// Pick the top and bottom `pct`% of sectors by % change.
///
/// At least three sectors are returned on each side (fewer only when the
/// snapshot itself has fewer), at most six. With fewer than six sectors the
/// two sides can overlap.
pub fn select_sectors_by_percentile(
    sectors: &[SectorPerformance],
    pct: f64,
) -> PercentileSelection {
    let mut sorted: Vec<&SectorPerformance> = sectors.iter().collect();
    sorted.sort_by(|a, b| cmp_desc(a.change_percent(), b.change_percent()));

    let count = percentile_count(sorted.len(), pct);

    let leaders = sorted.iter().take(count).map(|s| (*s).clone()).collect();
    let laggards = sorted.iter().rev().take(count).map(|s| (*s).clone()).collect();

    PercentileSelection { leaders, laggards }
}
