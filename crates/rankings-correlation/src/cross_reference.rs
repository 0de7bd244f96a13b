//! Cross-reference rollup: each unique ranked symbol with every list it
//! appears in, aggregated per sector.

use crate::mapping::resolve_sector;
use market_core::stats::{clamp_score, sum_of_squares};
use market_core::{RankCategory, RankingLists, ReferenceData};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Sector key for symbols that could not be mapped
pub const UNMAPPED_SECTOR: &str = "UNMAPPED";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockCrossReference {
    pub symbol: String,
    pub name: Option<String>,
    pub sector: Option<String>,
    pub categories: BTreeSet<RankCategory>,
    pub value: f64,
    pub change_percent: f64,
}

impl StockCrossReference {
    pub fn is_gainer(&self) -> bool {
        self.categories.contains(&RankCategory::Gainer)
    }

    pub fn is_loser(&self) -> bool {
        self.categories.contains(&RankCategory::Loser)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SectorAggregate {
    pub sector_id: String,
    pub stock_count: usize,
    pub gainers: usize,
    pub losers: usize,
    pub total_value: f64,
    /// Percentage of the summed value of all ranked symbols
    pub value_share: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossReferenceSummary {
    /// Sorted by symbol
    pub stocks: Vec<StockCrossReference>,
    pub sectors: BTreeMap<String, SectorAggregate>,
    /// Herfindahl-style score over sector value shares, 0-100
    pub concentration_score: f64,
}

impl CrossReferenceSummary {
    pub fn stock(&self, symbol: &str) -> Option<&StockCrossReference> {
        self.stocks
            .iter()
            .find(|s| s.symbol.eq_ignore_ascii_case(symbol))
    }
}

pub fn build_cross_reference(
    rankings: &RankingLists,
    reference: &ReferenceData,
) -> CrossReferenceSummary {
    let mut by_symbol: BTreeMap<String, StockCrossReference> = BTreeMap::new();

    for (category, stock) in rankings.iter_all() {
        let key = stock.symbol.to_uppercase();
        let entry = by_symbol
            .entry(key.clone())
            .or_insert_with(|| StockCrossReference {
                symbol: key,
                name: stock.name.clone(),
                sector: resolve_sector(stock, reference),
                categories: BTreeSet::new(),
                value: stock.value,
                change_percent: stock.change_percent,
            });
        entry.categories.insert(category);
        // Lists may be captured at slightly different times; keep the largest value seen
        if stock.value > entry.value {
            entry.value = stock.value;
        }
        if entry.name.is_none() {
            entry.name = stock.name.clone();
        }
    }

    let mut sectors: BTreeMap<String, SectorAggregate> = BTreeMap::new();
    for stock in by_symbol.values() {
        let sector_id = stock
            .sector
            .clone()
            .unwrap_or_else(|| UNMAPPED_SECTOR.to_string());
        let agg = sectors
            .entry(sector_id.clone())
            .or_insert_with(|| SectorAggregate {
                sector_id,
                ..Default::default()
            });
        agg.stock_count += 1;
        agg.total_value += stock.value.max(0.0);
        if stock.is_gainer() {
            agg.gainers += 1;
        }
        if stock.is_loser() {
            agg.losers += 1;
        }
    }

    let grand_total: f64 = sectors.values().map(|a| a.total_value).sum();
    let concentration_score = if grand_total > 0.0 {
        for agg in sectors.values_mut() {
            agg.value_share = agg.total_value / grand_total * 100.0;
        }
        clamp_score(sum_of_squares(sectors.values().map(|a| a.value_share / 100.0)) * 100.0)
    } else {
        0.0
    };

    CrossReferenceSummary {
        stocks: by_symbol.into_values().collect(),
        sectors,
        concentration_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use market_core::RankedStock;

    fn stock(symbol: &str, value: f64) -> RankedStock {
        RankedStock {
            symbol: symbol.to_string(),
            name: None,
            value,
            volume: 1000.0,
            change_percent: 0.5,
            price: None,
            sector: None,
        }
    }

    fn lists() -> RankingLists {
        RankingLists {
            gainers: vec![stock("KBANK", 3000.0), stock("DELTA", 1000.0)],
            losers: vec![stock("PTT", 1000.0)],
            by_volume: vec![stock("kbank", 3000.0)],
            by_value: vec![stock("KBANK", 3000.0), stock("PTT", 1000.0)],
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_merges_categories_per_symbol() {
        let summary = build_cross_reference(&lists(), &ReferenceData::default());
        assert_eq!(summary.stocks.len(), 3);

        let kbank = summary.stock("KBANK").unwrap();
        assert_eq!(kbank.categories.len(), 3);
        assert!(kbank.is_gainer());
        assert_eq!(kbank.sector.as_deref(), Some("BANK"));

        let ptt = summary.stock("PTT").unwrap();
        assert!(ptt.is_loser());
        assert!(ptt.categories.contains(&RankCategory::Value));
    }

    #[test]
    fn test_sector_aggregates_and_hhi() {
        let summary = build_cross_reference(&lists(), &ReferenceData::default());
        let bank = &summary.sectors["BANK"];
        assert_eq!(bank.stock_count, 1);
        assert_eq!(bank.gainers, 1);
        assert!((bank.value_share - 60.0).abs() < 1e-9);

        // 0.6² + 0.2² + 0.2² = 0.44
        assert!((summary.concentration_score - 44.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_sector_is_fully_concentrated() {
        let rankings = RankingLists {
            gainers: vec![stock("KBANK", 500.0), stock("SCB", 500.0)],
            losers: vec![],
            by_volume: vec![],
            by_value: vec![],
            timestamp: Utc::now(),
        };
        let summary = build_cross_reference(&rankings, &ReferenceData::default());
        assert!((summary.concentration_score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_unmapped_and_empty() {
        let rankings = RankingLists {
            gainers: vec![stock("NOPE", 0.0)],
            losers: vec![],
            by_volume: vec![],
            by_value: vec![],
            timestamp: Utc::now(),
        };
        let summary = build_cross_reference(&rankings, &ReferenceData::default());
        assert_eq!(summary.sectors[UNMAPPED_SECTOR].stock_count, 1);
        assert_eq!(summary.concentration_score, 0.0);
    }
}
