//! Build diagnostic contexts from the market-wide analyses

use crate::models::{SectorContext, SmartMoneyContext, TechnicalContext};
use market_core::{RankCategory, RankingLists};
use sector_rotation::SectorRotationAnalysis;
use smart_money_flow::SmartMoneyAnalysis;

impl SectorContext {
    /// Context for `sector_id`, or `None` when the sector is not in the analysis
    pub fn from_rotation(analysis: &SectorRotationAnalysis, sector_id: &str) -> Option<Self> {
        let performance = analysis.find(sector_id)?;
        Some(Self {
            sector_id: performance.id().to_string(),
            momentum: Some(performance.momentum),
            signal: Some(performance.signal),
            signal_confidence: performance.confidence,
            regime: Some(analysis.regime_context.regime),
            regime_confirmed: analysis.regime_context.confirmed,
        })
    }
}

impl SmartMoneyContext {
    pub fn from_analysis(analysis: &SmartMoneyAnalysis) -> Self {
        Self {
            foreign_net: analysis.foreign.as_ref().map(|r| r.today_net),
            institution_net: analysis.institution.as_ref().map(|r| r.today_net),
            score: Some(analysis.score),
            five_day_net: Some(analysis.smart_money_5day()),
        }
    }
}

impl TechnicalContext {
    /// List membership for `symbol`; price fields are left for the caller
    pub fn from_rankings(rankings: &RankingLists, symbol: &str) -> Self {
        Self {
            is_top_loser: rankings.contains(RankCategory::Loser, symbol),
            in_rankings: RankCategory::ALL
                .iter()
                .any(|c| rankings.contains(*c, symbol)),
            ..Default::default()
        }
    }

    pub fn with_week52_position(mut self, position: f64) -> Self {
        self.week52_position = Some(position);
        self
    }

    pub fn with_trends(mut self, trend_5d: f64, trend_20d: f64) -> Self {
        self.trend_5d = Some(trend_5d);
        self.trend_20d = Some(trend_20d);
        self
    }
}
