//! Smart money data models

use market_core::InvestorCategory;
use serde::{Deserialize, Serialize};

/// Direction and pace of a category's flow over recent days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowTrend {
    AcceleratingBuy,
    StableBuy,
    DecreasingBuy,
    Neutral,
    DecreasingSell,
    StableSell,
    AcceleratingSell,
}

impl FlowTrend {
    pub fn name(&self) -> &'static str {
        match self {
            FlowTrend::AcceleratingBuy => "Accelerating Buy",
            FlowTrend::StableBuy => "Stable Buy",
            FlowTrend::DecreasingBuy => "Decreasing Buy",
            FlowTrend::Neutral => "Neutral",
            FlowTrend::DecreasingSell => "Decreasing Sell",
            FlowTrend::StableSell => "Stable Sell",
            FlowTrend::AcceleratingSell => "Accelerating Sell",
        }
    }

    pub fn is_buying(&self) -> bool {
        matches!(
            self,
            FlowTrend::AcceleratingBuy | FlowTrend::StableBuy | FlowTrend::DecreasingBuy
        )
    }

    pub fn is_selling(&self) -> bool {
        matches!(
            self,
            FlowTrend::AcceleratingSell | FlowTrend::StableSell | FlowTrend::DecreasingSell
        )
    }
}

/// Size of today's net flow relative to the category's normal range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowStrength {
    StrongBuy,
    Buy,
    Neutral,
    Sell,
    StrongSell,
}

impl FlowStrength {
    pub fn name(&self) -> &'static str {
        match self {
            FlowStrength::StrongBuy => "Strong Buy",
            FlowStrength::Buy => "Buy",
            FlowStrength::Neutral => "Neutral",
            FlowStrength::Sell => "Sell",
            FlowStrength::StrongSell => "Strong Sell",
        }
    }
}

/// One category's flow reading for the day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryFlowReading {
    pub category: InvestorCategory,
    /// Net value in millions
    pub today_net: f64,
    pub trend: FlowTrend,
    /// Net over today plus up to four prior days
    pub trend_5day: f64,
    pub strength: FlowStrength,
}

/// Combined smart-money direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombinedSignal {
    StrongBuy,
    Buy,
    Neutral,
    Sell,
    StrongSell,
}

impl CombinedSignal {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 75.0 => CombinedSignal::StrongBuy,
            s if s >= 60.0 => CombinedSignal::Buy,
            s if s > 40.0 => CombinedSignal::Neutral,
            s if s > 25.0 => CombinedSignal::Sell,
            _ => CombinedSignal::StrongSell,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CombinedSignal::StrongBuy => "Strong Buy",
            CombinedSignal::Buy => "Buy",
            CombinedSignal::Neutral => "Neutral",
            CombinedSignal::Sell => "Sell",
            CombinedSignal::StrongSell => "Strong Sell",
        }
    }
}

/// Risk appetite implied by smart-money flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskSignal {
    StrongRiskOn,
    RiskOn,
    Neutral,
    RiskOff,
    StrongRiskOff,
}

impl RiskSignal {
    pub fn name(&self) -> &'static str {
        match self {
            RiskSignal::StrongRiskOn => "Strong Risk-On",
            RiskSignal::RiskOn => "Risk-On",
            RiskSignal::Neutral => "Neutral",
            RiskSignal::RiskOff => "Risk-Off",
            RiskSignal::StrongRiskOff => "Strong Risk-Off",
        }
    }
}

/// Category moving the most money today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimaryDriver {
    Foreign,
    Institution,
    Retail,
    Prop,
    Balanced,
}

impl From<InvestorCategory> for PrimaryDriver {
    fn from(category: InvestorCategory) -> Self {
        match category {
            InvestorCategory::Foreign => PrimaryDriver::Foreign,
            InvestorCategory::Institution => PrimaryDriver::Institution,
            InvestorCategory::Retail => PrimaryDriver::Retail,
            InvestorCategory::Prop => PrimaryDriver::Prop,
        }
    }
}

/// Combined smart-money analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmartMoneyAnalysis {
    pub foreign: Option<CategoryFlowReading>,
    pub institution: Option<CategoryFlowReading>,
    pub retail: Option<CategoryFlowReading>,
    pub prop: Option<CategoryFlowReading>,
    /// Foreign + institution net, millions
    pub smart_money_net: f64,
    /// Retail + prop net, millions
    pub context_net: f64,
    pub combined_signal: CombinedSignal,
    pub risk_signal: RiskSignal,
    /// 0-100, 50 = balanced
    pub score: f64,
    /// 0-100
    pub confidence: f64,
    pub primary_driver: PrimaryDriver,
}

impl SmartMoneyAnalysis {
    /// Foreign + institution cumulative net over the last five days
    pub fn smart_money_5day(&self) -> f64 {
        self.foreign.as_ref().map(|r| r.trend_5day).unwrap_or(0.0)
            + self.institution.as_ref().map(|r| r.trend_5day).unwrap_or(0.0)
    }

    pub fn foreign_net(&self) -> f64 {
        self.foreign.as_ref().map(|r| r.today_net).unwrap_or(0.0)
    }

    pub fn institution_net(&self) -> f64 {
        self.institution.as_ref().map(|r| r.today_net).unwrap_or(0.0)
    }
}
