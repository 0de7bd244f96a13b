//! Cross-ranked stocks: names that show up in two or more top lists

use market_core::stats::cmp_desc;
use market_core::{RankCategory, RankingLists, ReferenceData};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Processing caps for cross-ranking. These bound the work of a single call
/// and do not affect which stocks qualify within the capped lists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossRankingLimits {
    pub max_per_category: usize,
    pub max_results: usize,
}

impl Default for CrossRankingLimits {
    fn default() -> Self {
        Self {
            max_per_category: 50,
            max_results: 20,
        }
    }
}

/// A stock's 1-based position in one list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRank {
    pub category: RankCategory,
    pub rank: usize,
}

impl CategoryRank {
    /// 100 for #1, 10 points less per place, floored at 0
    pub fn score(&self) -> f64 {
        (100.0 - (self.rank.saturating_sub(1)) as f64 * 10.0).max(0.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossRankedStock {
    pub symbol: String,
    pub name: Option<String>,
    pub sector: Option<String>,
    pub rankings: Vec<CategoryRank>,
    pub ranking_count: usize,
    pub strength_score: f64,
    pub value: f64,
    pub change_percent: f64,
}

impl CrossRankedStock {
    pub fn rank_in(&self, category: RankCategory) -> Option<usize> {
        self.rankings
            .iter()
            .find(|r| r.category == category)
            .map(|r| r.rank)
    }
}

struct Candidate {
    name: Option<String>,
    sector: Option<String>,
    rankings: Vec<CategoryRank>,
    value: f64,
    change_percent: f64,
}

/// Find stocks ranked in at least two lists, strongest first
pub fn detect_cross_ranked(
    rankings: &RankingLists,
    reference: &ReferenceData,
    limits: CrossRankingLimits,
) -> Vec<CrossRankedStock> {
    let mut candidates: HashMap<String, Candidate> = HashMap::new();

    for category in RankCategory::ALL {
        let list = rankings.list(category);
        for (idx, stock) in list.iter().take(limits.max_per_category).enumerate() {
            let symbol = stock.symbol.to_uppercase();
            let candidate = candidates.entry(symbol.clone()).or_insert_with(|| Candidate {
                name: stock.name.clone(),
                sector: reference.resolve_sector(stock),
                rankings: Vec::new(),
                value: stock.value,
                change_percent: stock.change_percent,
            });
            // A duplicate within one list keeps its best position
            if candidate.rankings.iter().all(|r| r.category != category) {
                candidate.rankings.push(CategoryRank {
                    category,
                    rank: idx + 1,
                });
            }
        }
    }

    let mut result: Vec<CrossRankedStock> = candidates
        .into_iter()
        .filter(|(_, c)| c.rankings.len() >= 2)
        .map(|(symbol, c)| {
            let strength_score =
                c.rankings.iter().map(CategoryRank::score).sum::<f64>() / c.rankings.len() as f64;
            CrossRankedStock {
                symbol,
                name: c.name,
                sector: c.sector,
                ranking_count: c.rankings.len(),
                rankings: c.rankings,
                strength_score,
                value: c.value,
                change_percent: c.change_percent,
            }
        })
        .collect();

    result.sort_by(|a, b| {
        cmp_desc(a.strength_score, b.strength_score)
            .then_with(|| b.ranking_count.cmp(&a.ranking_count))
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
    result.truncate(limits.max_results);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use market_core::RankedStock;

    fn stock(symbol: &str) -> RankedStock {
        RankedStock {
            symbol: symbol.to_string(),
            name: None,
            value: 100.0,
            volume: 100.0,
            change_percent: 0.0,
            price: None,
            sector: None,
        }
    }

    fn lists(value: &[&str], volume: &[&str], gainers: &[&str], losers: &[&str]) -> RankingLists {
        let to_vec = |s: &[&str]| s.iter().map(|x| stock(x)).collect::<Vec<_>>();
        RankingLists {
            gainers: to_vec(gainers),
            losers: to_vec(losers),
            by_volume: to_vec(volume),
            by_value: to_vec(value),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_value_one_volume_two() {
        let rankings = lists(&["PTT", "KBANK"], &["DELTA", "PTT"], &[], &[]);
        let result = detect_cross_ranked(&rankings, &ReferenceData::default(), CrossRankingLimits::default());

        assert_eq!(result.len(), 1);
        let ptt = &result[0];
        assert_eq!(ptt.symbol, "PTT");
        assert_eq!(ptt.ranking_count, 2);
        assert_eq!(ptt.strength_score, 95.0);
        assert_eq!(ptt.rank_in(RankCategory::Value), Some(1));
        assert_eq!(ptt.rank_in(RankCategory::Volume), Some(2));
        assert_eq!(ptt.sector.as_deref(), Some("ENERG"));
    }

    #[test]
    fn test_sorted_by_strength_then_count() {
        let rankings = lists(
            &["A", "B", "C"],
            &["B", "A", "C"],
            &["X", "Y", "C"],
            &[],
        );
        let result = detect_cross_ranked(&rankings, &ReferenceData::empty(), CrossRankingLimits::default());

        // A: (100 + 90) / 2, B: (90 + 100) / 2, C: 80 in three lists
        let symbols: Vec<&str> = result.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["A", "B", "C"]);
        assert_eq!(result[2].ranking_count, 3);
        assert_eq!(result[2].strength_score, 80.0);
    }

    #[test]
    fn test_explicit_sector_is_normalized() {
        let mut rankings = lists(&["NEWCO", "PTT"], &["PTT", "NEWCO"], &[], &[]);
        for stock in rankings.by_value.iter_mut().chain(rankings.by_volume.iter_mut()) {
            if stock.symbol == "NEWCO" {
                stock.sector = Some(" bank ".to_string());
            }
        }

        let result = detect_cross_ranked(&rankings, &ReferenceData::default(), CrossRankingLimits::default());
        let newco = result.iter().find(|s| s.symbol == "NEWCO").unwrap();
        assert_eq!(newco.sector.as_deref(), Some("BANK"));
    }

    #[test]
    fn test_deep_ranks_floor_at_zero() {
        let rank = CategoryRank {
            category: RankCategory::Gainer,
            rank: 15,
        };
        assert_eq!(rank.score(), 0.0);
    }

    #[test]
    fn test_limits_cap_work() {
        let long: Vec<String> = (0..80).map(|i| format!("S{}", i)).collect();
        let refs: Vec<&str> = long.iter().map(String::as_str).collect();
        let rankings = lists(&refs, &refs, &[], &[]);

        let result = detect_cross_ranked(&rankings, &ReferenceData::empty(), CrossRankingLimits::default());
        assert_eq!(result.len(), 20);
        assert_eq!(result[0].symbol, "S0");

        let tight = CrossRankingLimits {
            max_per_category: 3,
            max_results: 10,
        };
        assert_eq!(detect_cross_ranked(&rankings, &ReferenceData::empty(), tight).len(), 3);
    }
}
