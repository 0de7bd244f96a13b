//! Ranking → sector mapping

use market_core::{RankCategory, RankedStock, RankingLists, ReferenceData};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// How often a sector's stocks show up in the ranked lists
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectorRankingTally {
    pub sector_id: String,
    pub gainers: usize,
    pub losers: usize,
    pub volume_leaders: usize,
    pub value_leaders: usize,
    /// Appearances across all four lists (a stock can count more than once)
    pub total: usize,
    pub symbols: BTreeSet<String>,
}

impl SectorRankingTally {
    fn record(&mut self, category: RankCategory, symbol: &str) {
        match category {
            RankCategory::Gainer => self.gainers += 1,
            RankCategory::Loser => self.losers += 1,
            RankCategory::Volume => self.volume_leaders += 1,
            RankCategory::Value => self.value_leaders += 1,
        }
        self.total += 1;
        self.symbols.insert(symbol.to_uppercase());
    }
}

/// Per-sector tallies plus the symbols no sector could be found for
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankingSectorMap {
    /// Only sectors with at least one appearance
    pub sectors: BTreeMap<String, SectorRankingTally>,
    pub unmapped: BTreeSet<String>,
}

impl RankingSectorMap {
    pub fn get(&self, sector_id: &str) -> Option<&SectorRankingTally> {
        self.sectors.get(&sector_id.to_uppercase())
    }

    pub fn total_appearances(&self) -> usize {
        self.sectors.values().map(|t| t.total).sum()
    }

    /// Sector id → total appearances
    pub fn appearance_counts(&self) -> std::collections::HashMap<String, usize> {
        self.sectors
            .iter()
            .map(|(id, t)| (id.clone(), t.total))
            .collect()
    }
}

/// Sector for a ranked stock: its own field first, then the reference table
pub fn resolve_sector(stock: &RankedStock, reference: &ReferenceData) -> Option<String> {
    reference.resolve_sector(stock)
}

/// Tally every ranked stock under its sector
pub fn map_rankings_by_sector(
    rankings: &RankingLists,
    reference: &ReferenceData,
) -> RankingSectorMap {
    let mut map = RankingSectorMap::default();

    for (category, stock) in rankings.iter_all() {
        match resolve_sector(stock, reference) {
            Some(sector_id) => {
                map.sectors
                    .entry(sector_id.clone())
                    .or_insert_with(|| SectorRankingTally {
                        sector_id,
                        ..Default::default()
                    })
                    .record(category, &stock.symbol);
            }
            None => {
                map.unmapped.insert(stock.symbol.to_uppercase());
            }
        }
    }

    map
}
