//! Sector rotation analysis: performance, leadership, pattern and regime
//! context for one trading day.

use crate::performance::{analyze_sectors, market_average, select_sectors_by_percentile, SectorPerformance};
use crate::regime::{analyze_regime_context, RegimeContext};
use crate::rotation::{RotationDetector, RotationSummary};
use market_core::{EngineError, EngineResult, ReferenceData, SectorSnapshot};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_PERCENTILE: f64 = 30.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorRotationAnalysis {
    /// All sectors, best first
    pub performances: Vec<SectorPerformance>,
    pub leaders: Vec<SectorPerformance>,
    pub laggards: Vec<SectorPerformance>,
    pub rotation: RotationSummary,
    pub regime_context: RegimeContext,
    /// Simple average % change across sectors
    pub market_average: f64,
}

impl SectorRotationAnalysis {
    pub fn find(&self, sector_id: &str) -> Option<&SectorPerformance> {
        self.performances
            .iter()
            .find(|p| p.id().eq_ignore_ascii_case(sector_id))
    }
}

pub struct SectorRotationAnalyzer {
    reference: Arc<ReferenceData>,
    detector: RotationDetector,
    percentile: f64,
}

impl Default for SectorRotationAnalyzer {
    fn default() -> Self {
        Self::new(Arc::new(ReferenceData::default()))
    }
}

impl SectorRotationAnalyzer {
    pub fn new(reference: Arc<ReferenceData>) -> Self {
        Self {
            detector: RotationDetector::new(reference.clone()),
            reference,
            percentile: DEFAULT_PERCENTILE,
        }
    }

    pub fn with_percentile(mut self, percentile: f64) -> Self {
        self.percentile = percentile;
        self
    }

    pub fn analyze(
        &self,
        sectors: &[SectorSnapshot],
        appearances: &HashMap<String, usize>,
        previous: Option<&[SectorSnapshot]>,
    ) -> EngineResult<SectorRotationAnalysis> {
        if sectors.is_empty() {
            return Err(EngineError::missing("sector snapshot is empty"));
        }

        let performances = analyze_sectors(sectors, appearances, previous);
        let selection = select_sectors_by_percentile(&performances, self.percentile);
        let rotation = self.detector.detect(&performances)?;
        let regime_context = analyze_regime_context(&performances, &self.reference);

        info!(
            "Sector rotation: {} across {} sectors, regime {}",
            rotation.pattern.as_str(),
            performances.len(),
            regime_context.regime.name()
        );

        Ok(SectorRotationAnalysis {
            market_average: market_average(sectors),
            leaders: selection.leaders,
            laggards: selection.laggards,
            performances,
            rotation,
            regime_context,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::performance::RotationSignal;
    use market_core::RiskRegime;

    fn sector(id: &str, change: f64) -> SectorSnapshot {
        SectorSnapshot {
            id: id.to_string(),
            name: id.to_string(),
            index: 100.0,
            change,
            change_percent: change,
            market_cap: 1000.0,
            volume: 1000.0,
            value: 50.0,
        }
    }

    #[test]
    fn test_full_analysis() {
        let analyzer = SectorRotationAnalyzer::default();
        let today = vec![
            sector("BANK", 2.0),
            sector("ENERG", 1.5),
            sector("ICT", 1.0),
            sector("FOOD", -0.5),
            sector("HELTH", -1.0),
            sector("COMM", -0.8),
            sector("PROP", 0.3),
        ];
        let yesterday = vec![sector("BANK", 0.5)];

        let analysis = analyzer
            .analyze(&today, &HashMap::new(), Some(&yesterday))
            .unwrap();

        assert_eq!(analysis.performances.len(), 7);
        assert_eq!(analysis.leaders[0].id(), "BANK");
        assert_eq!(analysis.laggards[0].id(), "HELTH");
        assert_eq!(analysis.find("bank").unwrap().signal, RotationSignal::Entry);
        assert_eq!(analysis.regime_context.regime, RiskRegime::RiskOn);
    }

    #[test]
    fn test_empty_sectors() {
        let analyzer = SectorRotationAnalyzer::default();
        assert!(analyzer.analyze(&[], &HashMap::new(), None).is_err());
    }
}
