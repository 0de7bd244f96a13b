use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One sector's end-of-day snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorSnapshot {
    pub id: String,
    pub name: String,
    pub index: f64,
    pub change: f64,
    pub change_percent: f64,
    pub market_cap: f64,
    pub volume: f64,
    /// Traded value in millions
    #[serde(default)]
    pub value: f64,
}

/// Investor category reported by the exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvestorCategory {
    Foreign,
    Institution,
    Retail,
    Prop,
}

impl InvestorCategory {
    pub const ALL: [InvestorCategory; 4] = [
        InvestorCategory::Foreign,
        InvestorCategory::Institution,
        InvestorCategory::Retail,
        InvestorCategory::Prop,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            InvestorCategory::Foreign => "Foreign",
            InvestorCategory::Institution => "Institution",
            InvestorCategory::Retail => "Retail",
            InvestorCategory::Prop => "Proprietary",
        }
    }

    /// Foreign and institutional flow carry the conviction signal
    pub fn is_smart_money(&self) -> bool {
        matches!(self, InvestorCategory::Foreign | InvestorCategory::Institution)
    }
}

/// Buy/sell/net value (millions) of one investor category on one date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestorCategoryFlow {
    pub category: InvestorCategory,
    pub buy: f64,
    pub sell: f64,
    pub net: f64,
    pub date: NaiveDate,
}

/// The four category flows published for a single trading date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestorFlows {
    #[serde(default)]
    pub foreign: Option<InvestorCategoryFlow>,
    #[serde(default)]
    pub institution: Option<InvestorCategoryFlow>,
    #[serde(default)]
    pub retail: Option<InvestorCategoryFlow>,
    #[serde(default)]
    pub prop: Option<InvestorCategoryFlow>,
    pub timestamp: DateTime<Utc>,
}

impl InvestorFlows {
    pub fn get(&self, category: InvestorCategory) -> Option<&InvestorCategoryFlow> {
        match category {
            InvestorCategory::Foreign => self.foreign.as_ref(),
            InvestorCategory::Institution => self.institution.as_ref(),
            InvestorCategory::Retail => self.retail.as_ref(),
            InvestorCategory::Prop => self.prop.as_ref(),
        }
    }

    pub fn net_of(&self, category: InvestorCategory) -> f64 {
        self.get(category).map(|f| f.net).unwrap_or(0.0)
    }

    pub fn has_smart_money(&self) -> bool {
        self.foreign.is_some() || self.institution.is_some()
    }
}

/// Previous trading days per category, oldest first, today excluded
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvestorHistory {
    #[serde(default)]
    pub foreign: Vec<InvestorCategoryFlow>,
    #[serde(default)]
    pub institution: Vec<InvestorCategoryFlow>,
    #[serde(default)]
    pub retail: Vec<InvestorCategoryFlow>,
    #[serde(default)]
    pub prop: Vec<InvestorCategoryFlow>,
}

impl InvestorHistory {
    pub fn get(&self, category: InvestorCategory) -> &[InvestorCategoryFlow] {
        match category {
            InvestorCategory::Foreign => &self.foreign,
            InvestorCategory::Institution => &self.institution,
            InvestorCategory::Retail => &self.retail,
            InvestorCategory::Prop => &self.prop,
        }
    }

    pub fn is_empty(&self) -> bool {
        InvestorCategory::ALL.iter().all(|c| self.get(*c).is_empty())
    }
}

/// Index-level market summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketOverview {
    pub index: f64,
    pub change: f64,
    pub change_percent: f64,
    /// Total traded value in millions
    pub total_value: f64,
    pub total_volume: f64,
    pub timestamp: DateTime<Utc>,
}

/// A stock as it appears in one of the exchange's top lists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedStock {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    pub value: f64,
    pub volume: f64,
    pub change_percent: f64,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub sector: Option<String>,
}

/// Top list a stock was ranked in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RankCategory {
    Value,
    Volume,
    Gainer,
    Loser,
}

impl RankCategory {
    pub const ALL: [RankCategory; 4] = [
        RankCategory::Value,
        RankCategory::Volume,
        RankCategory::Gainer,
        RankCategory::Loser,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RankCategory::Value => "Top Value",
            RankCategory::Volume => "Top Volume",
            RankCategory::Gainer => "Top Gainer",
            RankCategory::Loser => "Top Loser",
        }
    }
}

/// The four ranked lists of a trading day. Position in a list is the rank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingLists {
    #[serde(default)]
    pub gainers: Vec<RankedStock>,
    #[serde(default)]
    pub losers: Vec<RankedStock>,
    #[serde(default)]
    pub by_volume: Vec<RankedStock>,
    #[serde(default)]
    pub by_value: Vec<RankedStock>,
    pub timestamp: DateTime<Utc>,
}

impl RankingLists {
    pub fn list(&self, category: RankCategory) -> &[RankedStock] {
        match category {
            RankCategory::Value => &self.by_value,
            RankCategory::Volume => &self.by_volume,
            RankCategory::Gainer => &self.gainers,
            RankCategory::Loser => &self.losers,
        }
    }

    /// Every (category, stock) pair across the four lists
    pub fn iter_all(&self) -> impl Iterator<Item = (RankCategory, &RankedStock)> {
        RankCategory::ALL
            .into_iter()
            .flat_map(move |c| self.list(c).iter().map(move |s| (c, s)))
    }

    pub fn is_empty(&self) -> bool {
        RankCategory::ALL.iter().all(|c| self.list(*c).is_empty())
    }

    pub fn contains(&self, category: RankCategory, symbol: &str) -> bool {
        self.list(category)
            .iter()
            .any(|s| s.symbol.eq_ignore_ascii_case(symbol))
    }
}

/// Risk appetite regime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskRegime {
    RiskOn,
    Neutral,
    RiskOff,
}

impl RiskRegime {
    pub fn name(&self) -> &'static str {
        match self {
            RiskRegime::RiskOn => "Risk-On",
            RiskRegime::Neutral => "Neutral",
            RiskRegime::RiskOff => "Risk-Off",
        }
    }
}
