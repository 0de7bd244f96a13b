//! Active-stocks analysis: top names by value, cross-ranked names and
//! value concentration.

use crate::concentration::{analyze_concentration, value_percent_of_total, ConcentrationMetrics};
use crate::cross_ranking::{detect_cross_ranked, CrossRankedStock, CrossRankingLimits};
use market_core::{EngineError, EngineResult, MarketOverview, RankingLists, ReferenceData};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_TOP_COUNT: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopStock {
    pub rank: usize,
    pub symbol: String,
    pub name: Option<String>,
    pub sector: Option<String>,
    pub value: f64,
    pub volume: f64,
    pub change_percent: f64,
    pub price: Option<f64>,
    /// Share of the market's total traded value; `None` when that is unknown
    pub value_percent: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveStocksAnalysis {
    pub top_by_value: Vec<TopStock>,
    pub cross_ranked: Vec<CrossRankedStock>,
    pub concentration: ConcentrationMetrics,
}

pub struct ActiveStocksAnalyzer {
    reference: Arc<ReferenceData>,
    limits: CrossRankingLimits,
    top_count: usize,
}

impl Default for ActiveStocksAnalyzer {
    fn default() -> Self {
        Self::new(Arc::new(ReferenceData::default()))
    }
}

impl ActiveStocksAnalyzer {
    pub fn new(reference: Arc<ReferenceData>) -> Self {
        Self {
            reference,
            limits: CrossRankingLimits::default(),
            top_count: DEFAULT_TOP_COUNT,
        }
    }

    pub fn with_limits(mut self, limits: CrossRankingLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_top_count(mut self, top_count: usize) -> Self {
        self.top_count = top_count;
        self
    }

    pub fn analyze(
        &self,
        rankings: &RankingLists,
        market: Option<&MarketOverview>,
    ) -> EngineResult<ActiveStocksAnalysis> {
        if rankings.is_empty() {
            return Err(EngineError::missing("ranking lists are empty"));
        }

        let market_total = market.map(|m| m.total_value);

        let top_by_value = rankings
            .by_value
            .iter()
            .take(self.top_count)
            .enumerate()
            .map(|(idx, stock)| TopStock {
                rank: idx + 1,
                symbol: stock.symbol.to_uppercase(),
                name: stock.name.clone(),
                sector: self.reference.resolve_sector(stock),
                value: stock.value,
                volume: stock.volume,
                change_percent: stock.change_percent,
                price: stock.price,
                value_percent: market_total
                    .and_then(|total| value_percent_of_total(stock.value, total).ok()),
            })
            .collect::<Vec<_>>();

        let cross_ranked = detect_cross_ranked(rankings, &self.reference, self.limits);
        let concentration = analyze_concentration(&rankings.by_value, market_total);

        info!(
            "Active stocks: {} top by value, {} cross-ranked, {:?} (HHI {:.0})",
            top_by_value.len(),
            cross_ranked.len(),
            concentration.level,
            concentration.hhi
        );

        Ok(ActiveStocksAnalysis {
            top_by_value,
            cross_ranked,
            concentration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concentration::ConcentrationLevel;
    use chrono::Utc;
    use market_core::RankedStock;

    fn stock(symbol: &str, value: f64) -> RankedStock {
        RankedStock {
            symbol: symbol.to_string(),
            name: None,
            value,
            volume: value * 10.0,
            change_percent: 1.0,
            price: Some(20.0),
            sector: None,
        }
    }

    fn market(total_value: f64) -> MarketOverview {
        MarketOverview {
            index: 1400.0,
            change: 5.0,
            change_percent: 0.36,
            total_value,
            total_volume: 1.0e9,
            timestamp: Utc::now(),
        }
    }

    fn rankings() -> RankingLists {
        RankingLists {
            gainers: vec![stock("DELTA", 3000.0)],
            losers: vec![],
            by_volume: vec![stock("KBANK", 2000.0), stock("DELTA", 3000.0)],
            by_value: vec![stock("DELTA", 3000.0), stock("KBANK", 2000.0), stock("PTT", 1000.0)],
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_analysis_with_market_total() {
        let analyzer = ActiveStocksAnalyzer::default().with_top_count(2);
        let result = analyzer.analyze(&rankings(), Some(&market(60_000.0))).unwrap();

        assert_eq!(result.top_by_value.len(), 2);
        assert_eq!(result.top_by_value[0].symbol, "DELTA");
        assert_eq!(result.top_by_value[0].sector.as_deref(), Some("ETRON"));
        assert!((result.top_by_value[0].value_percent.unwrap() - 5.0).abs() < 1e-9);

        assert_eq!(result.cross_ranked.len(), 2);
        assert_eq!(result.cross_ranked[0].symbol, "DELTA");
        assert_eq!(result.cross_ranked[0].ranking_count, 3);

        assert!(result.concentration.market_based);
        assert_eq!(result.concentration.level, ConcentrationLevel::BroadlyDistributed);
    }

    #[test]
    fn test_without_market_total() {
        let result = ActiveStocksAnalyzer::default().analyze(&rankings(), None).unwrap();
        assert!(result.top_by_value.iter().all(|s| s.value_percent.is_none()));
        assert!(!result.concentration.market_based);
        assert_eq!(result.concentration.level, ConcentrationLevel::HighlyConcentrated);
    }

    #[test]
    fn test_empty_rankings() {
        let empty = RankingLists {
            gainers: vec![],
            losers: vec![],
            by_volume: vec![],
            by_value: vec![],
            timestamp: Utc::now(),
        };
        assert!(matches!(
            ActiveStocksAnalyzer::default().analyze(&empty, None),
            Err(EngineError::MissingPrerequisite(_))
        ));
    }
}
