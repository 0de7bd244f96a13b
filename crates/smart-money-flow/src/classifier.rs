//! Per-category flow classification

use crate::models::{CategoryFlowReading, FlowStrength, FlowTrend};
use market_core::stats::mean;
use market_core::{InvestorCategory, InvestorCategoryFlow};
use serde::{Deserialize, Serialize};

/// Prior days looked at for trend and 5-day totals (today makes five)
const TREND_LOOKBACK: usize = 4;

/// Net flow bands (millions) for one investor category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowThresholds {
    pub strong: f64,
    pub normal: f64,
}

impl FlowThresholds {
    pub fn for_category(category: InvestorCategory) -> Self {
        match category {
            InvestorCategory::Foreign => Self { strong: 1000.0, normal: 200.0 },
            InvestorCategory::Institution => Self { strong: 500.0, normal: 100.0 },
            InvestorCategory::Retail => Self { strong: 1000.0, normal: 200.0 },
            InvestorCategory::Prop => Self { strong: 300.0, normal: 50.0 },
        }
    }
}

pub fn classify_strength(net: f64, thresholds: FlowThresholds) -> FlowStrength {
    if net >= thresholds.strong {
        FlowStrength::StrongBuy
    } else if net >= thresholds.normal {
        FlowStrength::Buy
    } else if net <= -thresholds.strong {
        FlowStrength::StrongSell
    } else if net <= -thresholds.normal {
        FlowStrength::Sell
    } else {
        FlowStrength::Neutral
    }
}

/// Classify the pace of flow. `prior` holds earlier nets, oldest first.
pub fn classify_trend(today: f64, prior: &[f64], thresholds: FlowThresholds) -> FlowTrend {
    if today.abs() < thresholds.normal / 2.0 {
        return FlowTrend::Neutral;
    }
    let buying = today > 0.0;

    let recent = &prior[prior.len().saturating_sub(TREND_LOOKBACK)..];
    let same_side: Vec<f64> = recent
        .iter()
        .filter(|v| if buying { **v > 0.0 } else { **v < 0.0 })
        .map(|v| v.abs())
        .collect();

    let pace = if same_side.is_empty() {
        1.0
    } else {
        let baseline = mean(&same_side);
        if baseline > 0.0 {
            today.abs() / baseline
        } else {
            1.0
        }
    };

    match (buying, pace) {
        (true, p) if p > 1.2 => FlowTrend::AcceleratingBuy,
        (true, p) if p < 0.8 => FlowTrend::DecreasingBuy,
        (true, _) => FlowTrend::StableBuy,
        (false, p) if p > 1.2 => FlowTrend::AcceleratingSell,
        (false, p) if p < 0.8 => FlowTrend::DecreasingSell,
        (false, _) => FlowTrend::StableSell,
    }
}

/// Build a category reading from today's flow and its history
pub fn classify_category(
    today: &InvestorCategoryFlow,
    history: &[InvestorCategoryFlow],
    thresholds: FlowThresholds,
) -> CategoryFlowReading {
    let prior: Vec<f64> = history.iter().map(|f| f.net).collect();
    let recent = &prior[prior.len().saturating_sub(TREND_LOOKBACK)..];

    CategoryFlowReading {
        category: today.category,
        today_net: today.net,
        trend: classify_trend(today.net, &prior, thresholds),
        trend_5day: today.net + recent.iter().sum::<f64>(),
        strength: classify_strength(today.net, thresholds),
    }
}
