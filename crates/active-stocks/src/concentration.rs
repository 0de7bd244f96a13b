//! Trading-value concentration among the most active stocks

use market_core::stats::sum_of_squares;
use market_core::{EngineError, EngineResult, RankedStock};
use serde::{Deserialize, Serialize};

/// Stocks that enter the HHI
pub const HHI_TOP_N: usize = 10;
/// Stocks that enter the top-N share
pub const SHARE_TOP_N: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConcentrationLevel {
    HighlyConcentrated,
    ModeratelyConcentrated,
    BroadlyDistributed,
}

impl ConcentrationLevel {
    pub fn classify(top5_share: f64, hhi: f64) -> Self {
        if top5_share > 50.0 || hhi > 2000.0 {
            ConcentrationLevel::HighlyConcentrated
        } else if top5_share > 30.0 || hhi > 1500.0 {
            ConcentrationLevel::ModeratelyConcentrated
        } else {
            ConcentrationLevel::BroadlyDistributed
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ConcentrationLevel::HighlyConcentrated => {
                "Trading dominated by a handful of names"
            }
            ConcentrationLevel::ModeratelyConcentrated => {
                "Activity leans on the largest names"
            }
            ConcentrationLevel::BroadlyDistributed => "Activity spread across the market",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcentrationMetrics {
    /// Σ share² × 10000 over the top 10 by value
    pub hhi: f64,
    /// Percentage of the base value held by the top 5
    pub top5_share: f64,
    pub level: ConcentrationLevel,
    /// Value the shares are measured against
    pub base_value: f64,
    /// True when `base_value` is the market's total traded value
    pub market_based: bool,
}

/// `stock_value / total_value × 100`
pub fn value_percent_of_total(stock_value: f64, total_value: f64) -> EngineResult<f64> {
    if total_value <= 0.0 {
        return Err(EngineError::invalid(format!(
            "total value must be positive, got {}",
            total_value
        )));
    }
    if stock_value < 0.0 {
        return Err(EngineError::invalid(format!(
            "stock value cannot be negative, got {}",
            stock_value
        )));
    }
    Ok(stock_value / total_value * 100.0)
}

/// Concentration of the by-value list. Shares are of `market_total_value`
/// when it is known and positive, else of the list's own sum.
pub fn analyze_concentration(
    by_value: &[RankedStock],
    market_total_value: Option<f64>,
) -> ConcentrationMetrics {
    let mut values: Vec<f64> = by_value.iter().map(|s| s.value.max(0.0)).collect();
    values.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

    let (base_value, market_based) = match market_total_value {
        Some(total) if total > 0.0 => (total, true),
        _ => (values.iter().sum::<f64>(), false),
    };

    if base_value <= 0.0 {
        return ConcentrationMetrics {
            hhi: 0.0,
            top5_share: 0.0,
            level: ConcentrationLevel::BroadlyDistributed,
            base_value: 0.0,
            market_based,
        };
    }

    let hhi = sum_of_squares(values.iter().take(HHI_TOP_N).map(|v| v / base_value)) * 10_000.0;
    let top5_share = values.iter().take(SHARE_TOP_N).sum::<f64>() / base_value * 100.0;

    ConcentrationMetrics {
        hhi,
        top5_share,
        level: ConcentrationLevel::classify(top5_share, hhi),
        base_value,
        market_based,
    }
}
