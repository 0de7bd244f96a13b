//! Combined smart-money signal
//!
//! Foreign and institutional flow drive the score; retail and prop flow are
//! lower-weight context.

use crate::classifier::{classify_category, FlowThresholds};
use crate::models::{
    CategoryFlowReading, CombinedSignal, FlowTrend, PrimaryDriver, RiskSignal, SmartMoneyAnalysis,
};
use market_core::stats::clamp_score;
use market_core::{EngineError, EngineResult, InvestorCategory, InvestorFlows, InvestorHistory};
use std::collections::HashMap;
use tracing::debug;

/// Net flow (millions) that saturates each component of the score
const PRIMARY_SCALE: f64 = 2000.0;
const CONTEXT_SCALE: f64 = 2000.0;
const PRIMARY_WEIGHT: f64 = 40.0;
const CONTEXT_WEIGHT: f64 = 10.0;
/// Below this no single category is called the driver
const DRIVER_FLOOR: f64 = 50.0;

pub struct SmartMoneyAnalyzer {
    thresholds: HashMap<InvestorCategory, FlowThresholds>,
}

impl Default for SmartMoneyAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SmartMoneyAnalyzer {
    pub fn new() -> Self {
        Self {
            thresholds: InvestorCategory::ALL
                .iter()
                .map(|c| (*c, FlowThresholds::for_category(*c)))
                .collect(),
        }
    }

    pub fn with_thresholds(mut self, category: InvestorCategory, thresholds: FlowThresholds) -> Self {
        self.thresholds.insert(category, thresholds);
        self
    }

    fn thresholds_for(&self, category: InvestorCategory) -> FlowThresholds {
        self.thresholds
            .get(&category)
            .copied()
            .unwrap_or_else(|| FlowThresholds::for_category(category))
    }

    /// Analyze one day of investor flow. Needs foreign or institution data.
    pub fn analyze(
        &self,
        flows: &InvestorFlows,
        history: Option<&InvestorHistory>,
    ) -> EngineResult<SmartMoneyAnalysis> {
        if !flows.has_smart_money() {
            return Err(EngineError::missing(
                "foreign and institution flow are both unavailable",
            ));
        }

        let reading = |category: InvestorCategory| -> Option<CategoryFlowReading> {
            flows.get(category).map(|today| {
                let past = history.map(|h| h.get(category)).unwrap_or_default();
                classify_category(today, past, self.thresholds_for(category))
            })
        };

        let foreign = reading(InvestorCategory::Foreign);
        let institution = reading(InvestorCategory::Institution);
        let retail = reading(InvestorCategory::Retail);
        let prop = reading(InvestorCategory::Prop);

        let net = |r: &Option<CategoryFlowReading>| r.as_ref().map(|r| r.today_net).unwrap_or(0.0);
        let smart_money_net = net(&foreign) + net(&institution);
        let context_net = net(&retail) + net(&prop);

        let trend_adjustment = trend_adjustment(foreign.as_ref(), 5.0)
            + trend_adjustment(institution.as_ref(), 3.0);

        let score = clamp_score(
            50.0
                + (smart_money_net / PRIMARY_SCALE).clamp(-1.0, 1.0) * PRIMARY_WEIGHT
                + (context_net / CONTEXT_SCALE).clamp(-1.0, 1.0) * CONTEXT_WEIGHT
                + trend_adjustment,
        );

        let agree = match (&foreign, &institution) {
            (Some(f), Some(i)) => {
                (f.today_net > 0.0 && i.today_net > 0.0) || (f.today_net < 0.0 && i.today_net < 0.0)
            }
            _ => false,
        };

        let combined_signal = CombinedSignal::from_score(score);
        let risk_signal = risk_signal(combined_signal, agree);

        let accelerating_agrees = foreign
            .as_ref()
            .map(|f| {
                (score > 50.0 && f.trend == FlowTrend::AcceleratingBuy)
                    || (score < 50.0 && f.trend == FlowTrend::AcceleratingSell)
            })
            .unwrap_or(false);

        let confidence = clamp_score(
            40.0
                + if agree { 20.0 } else { 0.0 }
                + if accelerating_agrees { 10.0 } else { 0.0 }
                + (score - 50.0).abs() * 0.6,
        );

        let primary_driver = [&foreign, &institution, &retail, &prop]
            .into_iter()
            .flatten()
            .max_by(|a, b| {
                a.today_net
                    .abs()
                    .partial_cmp(&b.today_net.abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .filter(|r| r.today_net.abs() > DRIVER_FLOOR)
            .map(|r| PrimaryDriver::from(r.category))
            .unwrap_or(PrimaryDriver::Balanced);

        debug!(
            score,
            smart_money_net,
            context_net,
            signal = combined_signal.name(),
            "Smart money combined"
        );

        Ok(SmartMoneyAnalysis {
            foreign,
            institution,
            retail,
            prop,
            smart_money_net,
            context_net,
            combined_signal,
            risk_signal,
            score,
            confidence,
            primary_driver,
        })
    }
}

fn trend_adjustment(reading: Option<&CategoryFlowReading>, weight: f64) -> f64 {
    match reading.map(|r| r.trend) {
        Some(FlowTrend::AcceleratingBuy) => weight,
        Some(FlowTrend::AcceleratingSell) => -weight,
        _ => 0.0,
    }
}

/// Strong tiers need foreign and institution pulling the same way
fn risk_signal(signal: CombinedSignal, agree: bool) -> RiskSignal {
    match signal {
        CombinedSignal::StrongBuy if agree => RiskSignal::StrongRiskOn,
        CombinedSignal::StrongBuy | CombinedSignal::Buy => RiskSignal::RiskOn,
        CombinedSignal::Neutral => RiskSignal::Neutral,
        CombinedSignal::StrongSell if agree => RiskSignal::StrongRiskOff,
        CombinedSignal::StrongSell | CombinedSignal::Sell => RiskSignal::RiskOff,
    }
}
