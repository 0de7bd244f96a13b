//! Rankings impact: how concentrated the day's ranked activity is by sector

use crate::mapping::RankingSectorMap;
use market_core::stats::{clamp_score, percent_of};
use serde::{Deserialize, Serialize};

const TOP_SECTORS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BreadthClass {
    Broad,
    Mixed,
    Narrow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConcentrationClass {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImpactLevel {
    High,
    Medium,
    Low,
    Unclear,
}

impl ImpactLevel {
    pub fn from_concentration(score: f64) -> Self {
        match score {
            s if s >= 60.0 => ImpactLevel::High,
            s if s >= 40.0 => ImpactLevel::Medium,
            s if s > 0.0 => ImpactLevel::Low,
            _ => ImpactLevel::Unclear,
        }
    }
}

/// Sectors holding the most ranking appearances
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dominance {
    /// (sector id, appearances), most first
    pub top_sectors: Vec<(String, usize)>,
    /// Percentage of all appearances held by `top_sectors`
    pub share: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Breadth {
    pub represented: usize,
    pub total_sectors: usize,
    /// Percentage of sectors with at least one appearance
    pub ratio: f64,
    pub class: BreadthClass,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingsImpact {
    pub dominance: Dominance,
    pub breadth: Breadth,
    pub concentration_score: f64,
    pub concentration: ConcentrationClass,
    /// Driven by the concentration score alone
    pub impact_level: ImpactLevel,
    pub explanation: String,
}

/// Analyze ranked-list concentration against `total_sectors` in the snapshot
pub fn analyze_rankings_impact(map: &RankingSectorMap, total_sectors: usize) -> RankingsImpact {
    let total_appearances = map.total_appearances();

    let mut counts: Vec<(String, usize)> = map
        .sectors
        .values()
        .map(|t| (t.sector_id.clone(), t.total))
        .collect();
    // Most appearances first; ties in id order for stable output
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts.truncate(TOP_SECTORS);

    let top_total: usize = counts.iter().map(|(_, c)| c).sum();
    let share = clamp_score(percent_of(top_total as f64, total_appearances as f64));

    let represented = map.sectors.len();
    let denominator = total_sectors.max(represented);
    let ratio = percent_of(represented as f64, denominator as f64);
    let breadth_class = if ratio >= 70.0 {
        BreadthClass::Broad
    } else if ratio <= 40.0 {
        BreadthClass::Narrow
    } else {
        BreadthClass::Mixed
    };

    let concentration = if share >= 60.0 {
        ConcentrationClass::High
    } else if share >= 40.0 {
        ConcentrationClass::Medium
    } else {
        ConcentrationClass::Low
    };

    let impact_level = ImpactLevel::from_concentration(share);

    let explanation = if total_appearances == 0 {
        "No ranked stocks could be mapped to a sector".to_string()
    } else {
        let leaders: Vec<&str> = counts.iter().map(|(id, _)| id.as_str()).collect();
        format!(
            "{} hold {:.0}% of ranking appearances; {} of {} sectors represented ({:?} breadth)",
            leaders.join(", "),
            share,
            represented,
            denominator,
            breadth_class
        )
    };

    RankingsImpact {
        dominance: Dominance {
            top_sectors: counts,
            share,
        },
        breadth: Breadth {
            represented,
            total_sectors: denominator,
            ratio,
            class: breadth_class,
        },
        concentration_score: share,
        concentration,
        impact_level,
        explanation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::SectorRankingTally;

    fn map_of(counts: &[(&str, usize)]) -> RankingSectorMap {
        let mut map = RankingSectorMap::default();
        for (id, n) in counts {
            map.sectors.insert(
                id.to_string(),
                SectorRankingTally {
                    sector_id: id.to_string(),
                    total: *n,
                    value_leaders: *n,
                    ..Default::default()
                },
            );
        }
        map
    }

    #[test]
    fn test_high_concentration_narrow() {
        let map = map_of(&[("BANK", 6), ("ENERG", 3), ("ICT", 1)]);
        let impact = analyze_rankings_impact(&map, 10);

        assert_eq!(impact.concentration_score, 100.0);
        assert_eq!(impact.impact_level, ImpactLevel::High);
        assert_eq!(impact.concentration, ConcentrationClass::High);
        assert_eq!(impact.breadth.class, BreadthClass::Narrow);
        assert_eq!(impact.dominance.top_sectors[0], ("BANK".to_string(), 6));
    }

    #[test]
    fn test_spread_out_activity() {
        let counts: Vec<(String, usize)> = (0..8).map(|i| (format!("S{}", i), 2)).collect();
        let refs: Vec<(&str, usize)> = counts.iter().map(|(s, n)| (s.as_str(), *n)).collect();
        let impact = analyze_rankings_impact(&map_of(&refs), 10);

        assert_eq!(impact.concentration_score, 37.5);
        assert_eq!(impact.impact_level, ImpactLevel::Low);
        assert_eq!(impact.concentration, ConcentrationClass::Low);
        assert_eq!(impact.breadth.class, BreadthClass::Broad);
    }

    #[test]
    fn test_empty_is_unclear() {
        let impact = analyze_rankings_impact(&RankingSectorMap::default(), 8);
        assert_eq!(impact.impact_level, ImpactLevel::Unclear);
        assert_eq!(impact.breadth.represented, 0);
    }

    #[test]
    fn test_medium_impact() {
        let map = map_of(&[("A", 2), ("B", 2), ("C", 1), ("D", 1), ("E", 1), ("F", 1), ("G", 1), ("H", 1)]);
        let impact = analyze_rankings_impact(&map, 12);
        assert_eq!(impact.concentration_score, 50.0);
        assert_eq!(impact.impact_level, ImpactLevel::Medium);
        assert_eq!(impact.breadth.class, BreadthClass::Mixed);
    }
}
