//! Rankings Correlation Module
//!
//! Maps the day's ranked stocks (top gainers, losers, volume and value) onto
//! their sectors and checks whether sector moves agree with what the lists
//! show: per-sector correlation, anomalies, ranking concentration and a
//! per-symbol cross-reference.

pub mod analyzer;
pub mod anomalies;
pub mod correlation;
pub mod cross_reference;
pub mod impact;
pub mod mapping;

pub use analyzer::{CorrelationAnalysis, CorrelationAnalyzer};
pub use anomalies::{anomaly_severity, detect_anomaly, AnomalySeverity, AnomalyType, SectorAnomaly};
pub use correlation::{
    classify_sector_correlation, expected_count, overall_correlation, CorrelationRecord,
    CorrelationStrength,
};
pub use cross_reference::{
    build_cross_reference, CrossReferenceSummary, SectorAggregate, StockCrossReference,
};
pub use impact::{
    analyze_rankings_impact, Breadth, BreadthClass, ConcentrationClass, Dominance, ImpactLevel,
    RankingsImpact,
};
pub use mapping::{map_rankings_by_sector, resolve_sector, RankingSectorMap, SectorRankingTally};
