//! Regime context from sector leadership: are cyclicals or defensives leading?

use crate::performance::SectorPerformance;
use crate::rotation::group_average;
use market_core::{ReferenceData, RiskRegime};
use serde::{Deserialize, Serialize};

/// Gap between group averages needed to call a regime
const REGIME_SPREAD: f64 = 0.5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimeContext {
    pub regime: RiskRegime,
    pub defensive_avg: f64,
    pub cyclical_avg: f64,
    /// Whether the gap between the groups is wide enough to trust
    pub confirmed: bool,
}

impl RegimeContext {
    pub fn spread(&self) -> f64 {
        self.cyclical_avg - self.defensive_avg
    }

    pub fn is_confirmed_risk_off(&self) -> bool {
        self.confirmed && self.regime == RiskRegime::RiskOff
    }
}

/// Compare cyclical/growth against defensive sectors.
///
/// A group with no sectors in the snapshot counts as a flat 0% baseline, and
/// the result is never confirmed.
pub fn analyze_regime_context(
    sectors: &[SectorPerformance],
    reference: &ReferenceData,
) -> RegimeContext {
    let cyclical = group_average(sectors, |id| reference.is_cyclical_or_growth(id));
    let defensive = group_average(sectors, |id| reference.is_defensive(id));
    let both_present = cyclical.is_some() && defensive.is_some();
    let cyclical_avg = cyclical.unwrap_or(0.0);
    let defensive_avg = defensive.unwrap_or(0.0);

    let regime = if cyclical_avg > defensive_avg + REGIME_SPREAD {
        RiskRegime::RiskOn
    } else if defensive_avg > cyclical_avg + REGIME_SPREAD {
        RiskRegime::RiskOff
    } else {
        RiskRegime::Neutral
    };

    RegimeContext {
        regime,
        defensive_avg,
        cyclical_avg,
        confirmed: both_present && (cyclical_avg - defensive_avg).abs() > REGIME_SPREAD,
    }
}
