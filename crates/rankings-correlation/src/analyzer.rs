//! Correlation analysis between sector moves and the day's ranked stocks

use crate::anomalies::{anomaly_severity, describe, detect_anomaly, AnomalyType, SectorAnomaly};
use crate::correlation::{
    classify_sector_correlation, expected_count, overall_correlation, CorrelationRecord,
    CorrelationStrength,
};
use crate::cross_reference::{build_cross_reference, CrossReferenceSummary};
use crate::impact::{analyze_rankings_impact, RankingsImpact};
use crate::mapping::{map_rankings_by_sector, RankingSectorMap};
use market_core::{EngineError, EngineResult, RankingLists, ReferenceData, SectorSnapshot};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationAnalysis {
    /// One record per sector with at least one ranking appearance
    pub records: Vec<CorrelationRecord>,
    pub overall_strength: CorrelationStrength,
    pub overall_score: f64,
    /// Highest severity first
    pub anomalies: Vec<SectorAnomaly>,
    pub impact: RankingsImpact,
    pub cross_reference: CrossReferenceSummary,
    pub mapping: RankingSectorMap,
}

impl CorrelationAnalysis {
    pub fn record(&self, sector_id: &str) -> Option<&CorrelationRecord> {
        self.records
            .iter()
            .find(|r| r.sector_id.eq_ignore_ascii_case(sector_id))
    }
}

pub struct CorrelationAnalyzer {
    reference: Arc<ReferenceData>,
}

impl Default for CorrelationAnalyzer {
    fn default() -> Self {
        Self::new(Arc::new(ReferenceData::default()))
    }
}

impl CorrelationAnalyzer {
    pub fn new(reference: Arc<ReferenceData>) -> Self {
        Self { reference }
    }

    pub fn analyze(
        &self,
        sectors: &[SectorSnapshot],
        rankings: &RankingLists,
    ) -> EngineResult<CorrelationAnalysis> {
        if sectors.is_empty() {
            return Err(EngineError::missing("sector snapshot is empty"));
        }
        if rankings.is_empty() {
            return Err(EngineError::missing("ranking lists are empty"));
        }

        let mapping = map_rankings_by_sector(rankings, &self.reference);
        let total_appearances = mapping.total_appearances();
        let total_cap: f64 = sectors.iter().map(|s| s.market_cap.max(0.0)).sum();

        let mut records = Vec::new();
        let mut anomalies = Vec::new();

        for sector in sectors {
            let tally = mapping.get(&sector.id);
            let ranking_count = tally.map(|t| t.total).unwrap_or(0);
            let sector_name = self.display_name(sector);

            let anomaly = detect_anomaly(sector.change_percent, tally);
            if anomaly != AnomalyType::None {
                anomalies.push(SectorAnomaly {
                    sector_id: sector.id.clone(),
                    sector_name: sector_name.clone(),
                    anomaly,
                    severity: anomaly_severity(sector.change_percent, ranking_count),
                    sector_change: sector.change_percent,
                    ranking_count,
                    description: describe(anomaly, &sector_name, sector.change_percent, ranking_count),
                });
            }

            if let Some(tally) = tally {
                let strength = classify_sector_correlation(sector.change_percent, tally);
                records.push(CorrelationRecord {
                    sector_id: sector.id.clone(),
                    sector_name,
                    sector_change: sector.change_percent,
                    ranking_count,
                    expected_count: expected_count(
                        total_appearances,
                        sector.market_cap,
                        total_cap,
                        sectors.len(),
                    ),
                    strength,
                    score: strength.score(),
                    anomaly,
                });
            }
        }

        anomalies.sort_by(|a, b| {
            b.severity
                .cmp(&a.severity)
                .then_with(|| a.sector_id.cmp(&b.sector_id))
        });

        let (overall_strength, overall_score) = overall_correlation(&records);
        let impact = analyze_rankings_impact(&mapping, sectors.len());
        let cross_reference = build_cross_reference(rankings, &self.reference);

        debug!(
            mapped = mapping.sectors.len(),
            unmapped = mapping.unmapped.len(),
            "Rankings mapped to sectors"
        );
        info!(
            "Rankings correlation: {} ({:.1}), {} anomalies, impact {:?}",
            overall_strength.name(),
            overall_score,
            anomalies.len(),
            impact.impact_level
        );

        Ok(CorrelationAnalysis {
            records,
            overall_strength,
            overall_score,
            anomalies,
            impact,
            cross_reference,
            mapping,
        })
    }

    fn display_name(&self, sector: &SectorSnapshot) -> String {
        if sector.name.trim().is_empty() {
            self.reference.sector_name(&sector.id).to_string()
        } else {
            sector.name.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anomalies::AnomalySeverity;
    use chrono::Utc;
    use market_core::RankedStock;

    fn sector(id: &str, change: f64, cap: f64) -> SectorSnapshot {
        SectorSnapshot {
            id: id.to_string(),
            name: String::new(),
            index: 100.0,
            change,
            change_percent: change,
            market_cap: cap,
            volume: 1000.0,
            value: 100.0,
        }
    }

    fn stock(symbol: &str) -> RankedStock {
        RankedStock {
            symbol: symbol.to_string(),
            name: None,
            value: 1000.0,
            volume: 1000.0,
            change_percent: 1.0,
            price: None,
            sector: None,
        }
    }

    fn rankings() -> RankingLists {
        RankingLists {
            gainers: vec![stock("KBANK"), stock("SCB"), stock("BBL")],
            losers: vec![stock("CPALL")],
            by_volume: vec![stock("KBANK")],
            by_value: vec![stock("KBANK"), stock("PTT")],
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_correlation_analysis() {
        let analyzer = CorrelationAnalyzer::default();
        let sectors = vec![
            sector("BANK", 1.8, 600.0),
            sector("COMM", -0.6, 200.0),
            sector("ENERG", -1.6, 100.0),
            sector("HELTH", 2.5, 100.0),
        ];

        let result = analyzer.analyze(&sectors, &rankings()).unwrap();

        let bank = result.record("BANK").unwrap();
        assert_eq!(bank.strength, CorrelationStrength::StrongPositive);
        assert_eq!(bank.ranking_count, 5);
        assert!((bank.expected_count - 4.2).abs() < 1e-9);

        // One loser against a falling sector
        assert_eq!(result.record("COMM").unwrap().strength, CorrelationStrength::Positive);
        // Only a value-list appearance, no dominant direction
        assert_eq!(result.record("ENERG").unwrap().strength, CorrelationStrength::Neutral);
        assert!(result.record("HELTH").is_none());

        // (90 + 70 + 50) / 3
        assert!((result.overall_score - 70.0).abs() < 1e-9);
        assert_eq!(result.overall_strength, CorrelationStrength::Positive);

        assert_eq!(result.anomalies[0].sector_id, "HELTH");
        assert_eq!(result.anomalies[0].anomaly, AnomalyType::SectorUpNoRankings);
        assert_eq!(result.anomalies[0].severity, AnomalySeverity::High);
        assert!(!result.anomalies[0].description.is_empty());
        assert_eq!(result.anomalies.len(), 1);

        assert_eq!(result.impact.dominance.top_sectors[0].0, "BANK");
        assert_eq!(result.cross_reference.stocks.len(), 5);
    }

    #[test]
    fn test_requires_both_inputs() {
        let analyzer = CorrelationAnalyzer::default();
        let empty = RankingLists {
            gainers: vec![],
            losers: vec![],
            by_volume: vec![],
            by_value: vec![],
            timestamp: Utc::now(),
        };
        assert!(matches!(
            analyzer.analyze(&[sector("BANK", 1.0, 1.0)], &empty),
            Err(EngineError::MissingPrerequisite(_))
        ));
        assert!(matches!(
            analyzer.analyze(&[], &rankings()),
            Err(EngineError::MissingPrerequisite(_))
        ));
    }
}
