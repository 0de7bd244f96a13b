//! Rotation Detection
//!
//! Summarizes momentum across all sectors into a named rotation pattern.

use crate::performance::SectorPerformance;
use market_core::stats::{clamp_score, mean, mean_opt};
use market_core::{EngineError, EngineResult, ReferenceData};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Market-wide rotation pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RotationPattern {
    /// Most sectors lead and the market is up
    BroadBasedAdvance,
    /// Most sectors lag and the market is down
    BroadBasedDecline,
    /// Cyclical/growth sectors beat defensives
    RiskOnRotation,
    /// Defensive sectors beat cyclical/growth
    RiskOffRotation,
    /// A handful of sectors move on their own story
    SectorSpecific,
    /// No clear pattern
    Mixed,
}

impl RotationPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            RotationPattern::BroadBasedAdvance => "Broad-Based Advance",
            RotationPattern::BroadBasedDecline => "Broad-Based Decline",
            RotationPattern::RiskOnRotation => "Risk-On Rotation",
            RotationPattern::RiskOffRotation => "Risk-Off Rotation",
            RotationPattern::SectorSpecific => "Sector-Specific",
            RotationPattern::Mixed => "Mixed/No Clear Pattern",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RotationPattern::BroadBasedAdvance => {
                "Buying spread across most sectors with the market moving higher"
            }
            RotationPattern::BroadBasedDecline => {
                "Selling spread across most sectors with the market moving lower"
            }
            RotationPattern::RiskOnRotation => {
                "Money moving into cyclical and growth sectors at the expense of defensives"
            }
            RotationPattern::RiskOffRotation => {
                "Money seeking safety in defensive sectors while cyclicals lag"
            }
            RotationPattern::SectorSpecific => {
                "Only a few sectors are moving; leadership is driven by sector-level news"
            }
            RotationPattern::Mixed => "No significant rotation pattern detected",
        }
    }

    pub fn is_risk_on(&self) -> bool {
        matches!(
            self,
            RotationPattern::BroadBasedAdvance | RotationPattern::RiskOnRotation
        )
    }

    pub fn is_risk_off(&self) -> bool {
        matches!(
            self,
            RotationPattern::BroadBasedDecline | RotationPattern::RiskOffRotation
        )
    }
}

/// Result of rotation detection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationSummary {
    pub pattern: RotationPattern,
    /// Mean raw % change across sectors
    pub avg_change: f64,
    /// Sectors with Outperform or Strong Outperform momentum
    pub leaders_count: usize,
    /// Sectors with Underperform or Significant Lag momentum
    pub laggards_count: usize,
    pub cyclical_avg: Option<f64>,
    pub defensive_avg: Option<f64>,
    /// 0-100, higher when fewer sectors beat the market
    pub concentration_score: f64,
    pub leading_sectors: Vec<String>,
    pub lagging_sectors: Vec<String>,
    pub description: String,
}

/// Mean % change of the sectors matching `predicate`, `None` if there are none
pub(crate) fn group_average<F>(sectors: &[SectorPerformance], predicate: F) -> Option<f64>
where
    F: Fn(&str) -> bool,
{
    mean_opt(
        sectors
            .iter()
            .filter(|s| predicate(s.id()))
            .map(|s| s.change_percent()),
    )
}

/// 100 minus the percentage of sectors beating the market
pub fn concentration_score(sectors: &[SectorPerformance]) -> f64 {
    if sectors.is_empty() {
        return 100.0;
    }
    let outperformers = sectors.iter().filter(|s| s.vs_market > 0.0).count();
    clamp_score(100.0 - outperformers as f64 / sectors.len() as f64 * 100.0)
}

/// Detects rotation patterns
pub struct RotationDetector {
    reference: Arc<ReferenceData>,
    /// Share of sectors that must lead (or lag) for a broad-based move
    broad_share: f64,
    /// Percentage-point gap between groups that counts as rotation
    group_spread: f64,
}

impl Default for RotationDetector {
    fn default() -> Self {
        Self::new(Arc::new(ReferenceData::default()))
    }
}

impl RotationDetector {
    pub fn new(reference: Arc<ReferenceData>) -> Self {
        Self {
            reference,
            broad_share: 0.6,
            group_spread: 1.0,
        }
    }

    /// Detect the rotation pattern from analyzed sectors
    pub fn detect(&self, sectors: &[SectorPerformance]) -> EngineResult<RotationSummary> {
        if sectors.is_empty() {
            return Err(EngineError::missing("no sector performance to analyze"));
        }

        let total = sectors.len() as f64;
        let changes: Vec<f64> = sectors.iter().map(|s| s.change_percent()).collect();
        let avg_change = mean(&changes);

        let leading: Vec<&SectorPerformance> =
            sectors.iter().filter(|s| s.momentum.is_leading()).collect();
        let lagging: Vec<&SectorPerformance> =
            sectors.iter().filter(|s| s.momentum.is_lagging()).collect();

        let cyclical_avg =
            group_average(sectors, |id| self.reference.is_cyclical_or_growth(id));
        let defensive_avg = group_average(sectors, |id| self.reference.is_defensive(id));

        let pattern = self.classify(
            leading.len() as f64 / total,
            lagging.len() as f64 / total,
            avg_change,
            cyclical_avg,
            defensive_avg,
            leading.len(),
            lagging.len(),
        );

        debug!(
            pattern = pattern.as_str(),
            avg_change,
            leaders = leading.len(),
            laggards = lagging.len(),
            "Rotation pattern detected"
        );

        let description = match (cyclical_avg, defensive_avg) {
            (Some(c), Some(d)) => format!(
                "{} (avg {:+.2}%, cyclical {:+.2}%, defensive {:+.2}%)",
                pattern.description(),
                avg_change,
                c,
                d
            ),
            _ => format!("{} (avg {:+.2}%)", pattern.description(), avg_change),
        };

        Ok(RotationSummary {
            pattern,
            avg_change,
            leaders_count: leading.len(),
            laggards_count: lagging.len(),
            cyclical_avg,
            defensive_avg,
            concentration_score: concentration_score(sectors),
            leading_sectors: leading.iter().map(|s| s.id().to_string()).collect(),
            lagging_sectors: lagging.iter().map(|s| s.id().to_string()).collect(),
            description,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn classify(
        &self,
        leader_share: f64,
        laggard_share: f64,
        avg_change: f64,
        cyclical_avg: Option<f64>,
        defensive_avg: Option<f64>,
        leaders: usize,
        laggards: usize,
    ) -> RotationPattern {
        if leader_share >= self.broad_share && avg_change > 0.0 {
            return RotationPattern::BroadBasedAdvance;
        }
        if laggard_share >= self.broad_share && avg_change < 0.0 {
            return RotationPattern::BroadBasedDecline;
        }

        if let (Some(cyclical), Some(defensive)) = (cyclical_avg, defensive_avg) {
            if cyclical > defensive + self.group_spread {
                return RotationPattern::RiskOnRotation;
            }
            if defensive > cyclical + self.group_spread {
                return RotationPattern::RiskOffRotation;
            }
        }

        if leaders <= 3 && laggards <= 3 {
            RotationPattern::SectorSpecific
        } else {
            RotationPattern::Mixed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::performance::analyze_sectors;
    use market_core::SectorSnapshot;
    use std::collections::HashMap;

    fn sector(id: &str, change: f64) -> SectorSnapshot {
        SectorSnapshot {
            id: id.to_string(),
            name: id.to_string(),
            index: 100.0,
            change,
            change_percent: change,
            market_cap: 1000.0,
            volume: 1000.0,
            value: 100.0,
        }
    }

    fn perf(changes: &[(&str, f64)]) -> Vec<SectorPerformance> {
        let sectors: Vec<SectorSnapshot> =
            changes.iter().map(|(id, c)| sector(id, *c)).collect();
        analyze_sectors(&sectors, &HashMap::new(), None)
    }

    #[test]
    fn test_rotation_pattern_properties() {
        assert!(RotationPattern::RiskOnRotation.is_risk_on());
        assert!(RotationPattern::RiskOffRotation.is_risk_off());
        assert!(!RotationPattern::Mixed.is_risk_on());
        assert!(!RotationPattern::SectorSpecific.is_risk_off());
    }

    #[test]
    fn test_empty_is_missing_prerequisite() {
        let detector = RotationDetector::default();
        assert!(matches!(
            detector.detect(&[]),
            Err(EngineError::MissingPrerequisite(_))
        ));
    }

    #[test]
    fn test_risk_on_rotation() {
        let detector = RotationDetector::default();
        let sectors = perf(&[
            ("BANK", 2.5),
            ("ICT", 2.0),
            ("ENERG", 0.2),
            ("FOOD", -0.5),
            ("HELTH", -1.0),
            ("COMM", 0.1),
        ]);

        let summary = detector.detect(&sectors).unwrap();
        assert_eq!(summary.pattern, RotationPattern::RiskOnRotation);
        assert!(summary.cyclical_avg.unwrap() > summary.defensive_avg.unwrap());
    }

    #[test]
    fn test_risk_off_rotation() {
        let detector = RotationDetector::default();
        let sectors = perf(&[
            ("BANK", -1.5),
            ("ICT", -1.0),
            ("FOOD", 1.5),
            ("HELTH", 1.0),
            ("COMM", 0.2),
            ("ENERG", -0.2),
        ]);

        let summary = detector.detect(&sectors).unwrap();
        assert_eq!(summary.pattern, RotationPattern::RiskOffRotation);
    }

    #[test]
    fn test_sector_specific_without_groups() {
        let detector = RotationDetector::new(Arc::new(ReferenceData::empty()));
        let sectors = perf(&[("A", 3.0), ("B", 0.0), ("C", 0.1), ("D", -0.1), ("E", -0.2)]);

        let summary = detector.detect(&sectors).unwrap();
        assert_eq!(summary.pattern, RotationPattern::SectorSpecific);
        assert!(summary.cyclical_avg.is_none());
    }

    #[test]
    fn test_concentration_score_bounds() {
        // Identical changes: nothing beats the market
        let flat = perf(&[("A", 1.0), ("B", 1.0), ("C", 1.0)]);
        assert_eq!(concentration_score(&flat), 100.0);

        let narrow = perf(&[("A", 5.0), ("B", 0.0), ("C", 0.0), ("D", 0.0)]);
        let broad = perf(&[("A", 5.0), ("B", 4.0), ("C", 4.0), ("D", 0.0)]);
        let narrow_score = concentration_score(&narrow);
        let broad_score = concentration_score(&broad);
        assert!(narrow_score > broad_score);
        assert!((0.0..=100.0).contains(&broad_score));
        assert_eq!(narrow_score, 75.0);
        assert_eq!(broad_score, 25.0);
    }
}
