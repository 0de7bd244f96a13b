use chrono::{DateTime, Utc};
use market_core::stats::clamp_score;
use market_core::RiskRegime;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How much the two regime scores disagree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    pub fn name(&self) -> &'static str {
        match self {
            ConfidenceTier::High => "High",
            ConfidenceTier::Medium => "Medium",
            ConfidenceTier::Low => "Low",
        }
    }
}

/// Rule family a reason came from. Declaration order is the tie-break
/// priority when two reasons carry the same weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RegimeFactor {
    IndexMomentum,
    SmartMoneyFlow,
    SectorBehavior,
    Liquidity,
}

/// One explanatory reason behind the regime call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimeReason {
    pub factor: RegimeFactor,
    /// Which side the rule pushed
    pub direction: RiskRegime,
    pub weight: f64,
    pub text: String,
}

/// Inputs to the regime classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimeInputs {
    /// Index % change for the day
    pub index_change_percent: f64,
    /// Foreign + institution net flow in millions, if investor data exists
    pub smart_money_net: Option<f64>,
    /// Average % change of defensive sectors
    pub defensive_avg: Option<f64>,
    /// Average % change across all sectors
    pub overall_avg: Option<f64>,
    /// Traded value relative to its baseline (1.0 = normal)
    pub liquidity_ratio: f64,
}

impl RegimeInputs {
    pub fn from_index(index_change_percent: f64) -> Self {
        Self {
            index_change_percent,
            smart_money_net: None,
            defensive_avg: None,
            overall_avg: None,
            liquidity_ratio: 1.0,
        }
    }
}

/// Regime detection result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketRegimeAnalysis {
    pub regime: RiskRegime,
    pub confidence_tier: ConfidenceTier,
    /// 0-100
    pub confidence: f64,
    pub risk_on_score: f64,
    pub risk_off_score: f64,
    /// At most three, most important first
    pub reasons: Vec<RegimeReason>,
    pub inputs: RegimeInputs,
    pub detected_at: DateTime<Utc>,
}

/// Traded value relative to a baseline; 1.0 when no usable baseline exists
pub fn liquidity_ratio(total_value: f64, baseline: Option<f64>) -> f64 {
    match baseline {
        Some(b) if b > 0.0 && total_value >= 0.0 => total_value / b,
        _ => 1.0,
    }
}

/// Coarse Risk-On / Neutral / Risk-Off classifier
pub struct MarketRegimeDetector {
    /// Net flow (millions) that counts as heavy buying or selling
    flow_band: f64,
    high_liquidity: f64,
    low_liquidity: f64,
    /// Score gap required to leave Neutral
    min_margin: f64,
    max_reasons: usize,
}

impl MarketRegimeDetector {
    pub fn new() -> Self {
        Self {
            flow_band: 200.0,
            high_liquidity: 1.2,
            low_liquidity: 0.8,
            min_margin: 2.0,
            max_reasons: 3,
        }
    }

    /// Classify the regime from today's inputs
    pub fn detect(&self, inputs: RegimeInputs) -> MarketRegimeAnalysis {
        self.detect_at(inputs, Utc::now())
    }

    pub fn detect_at(&self, inputs: RegimeInputs, now: DateTime<Utc>) -> MarketRegimeAnalysis {
        let mut risk_on = 0.0;
        let mut risk_off = 0.0;
        let mut reasons = Vec::new();

        let mut push = |factor: RegimeFactor, direction: RiskRegime, weight: f64, text: String| {
            match direction {
                RiskRegime::RiskOn => risk_on += weight,
                RiskRegime::RiskOff => risk_off += weight,
                RiskRegime::Neutral => {}
            }
            reasons.push(RegimeReason {
                factor,
                direction,
                weight,
                text,
            });
        };

        // Index direction
        let idx = inputs.index_change_percent;
        let index_weight = match idx.abs() {
            a if a > 1.0 => 3.0,
            a if a > 0.3 => 2.0,
            a if a > 0.0 => 1.0,
            _ => 0.0,
        };
        if index_weight > 0.0 {
            let (direction, verb) = if idx > 0.0 {
                (RiskRegime::RiskOn, "up")
            } else {
                (RiskRegime::RiskOff, "down")
            };
            push(
                RegimeFactor::IndexMomentum,
                direction,
                index_weight,
                format!("Index {} {:.2}%", verb, idx.abs()),
            );
        }

        // Smart-money flow
        if let Some(net) = inputs.smart_money_net {
            let weight = if net.abs() > self.flow_band {
                3.0
            } else if net != 0.0 {
                1.0
            } else {
                0.0
            };
            if weight > 0.0 {
                let (direction, verb) = if net > 0.0 {
                    (RiskRegime::RiskOn, "net buying")
                } else {
                    (RiskRegime::RiskOff, "net selling")
                };
                push(
                    RegimeFactor::SmartMoneyFlow,
                    direction,
                    weight,
                    format!("Foreign and institutional investors {} {:.0}M", verb, net.abs()),
                );
            }
        }

        // Sector leadership
        if let (Some(defensive), Some(overall)) = (inputs.defensive_avg, inputs.overall_avg) {
            if defensive > overall {
                push(
                    RegimeFactor::SectorBehavior,
                    RiskRegime::RiskOff,
                    2.0,
                    format!(
                        "Defensive sectors leading ({:+.2}% vs market {:+.2}%)",
                        defensive, overall
                    ),
                );
            } else if defensive < overall {
                push(
                    RegimeFactor::SectorBehavior,
                    RiskRegime::RiskOn,
                    2.0,
                    format!(
                        "Defensive sectors lagging ({:+.2}% vs market {:+.2}%)",
                        defensive, overall
                    ),
                );
            }
        }

        // Liquidity
        let ratio = inputs.liquidity_ratio;
        if ratio >= self.high_liquidity {
            push(
                RegimeFactor::Liquidity,
                RiskRegime::RiskOn,
                1.0,
                format!("Strong participation ({:.2}x normal value)", ratio),
            );
        } else if ratio <= self.low_liquidity {
            push(
                RegimeFactor::Liquidity,
                RiskRegime::RiskOff,
                1.0,
                format!("Thin participation ({:.2}x normal value)", ratio),
            );
        }

        let net = risk_on - risk_off;
        let regime = if net >= self.min_margin {
            RiskRegime::RiskOn
        } else if net <= -self.min_margin {
            RiskRegime::RiskOff
        } else {
            RiskRegime::Neutral
        };

        let confidence_tier = match net.abs() {
            m if m >= 5.0 => ConfidenceTier::High,
            m if m >= 3.0 => ConfidenceTier::Medium,
            _ => ConfidenceTier::Low,
        };

        let total = risk_on + risk_off;
        let confidence = if total > 0.0 {
            clamp_score(net.abs() / total * 100.0)
        } else {
            0.0
        };

        // Heaviest first; the stable sort keeps the fixed factor priority on ties
        reasons.sort_by(|a, b| {
            b.weight
                .partial_cmp(&a.weight)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.factor.cmp(&b.factor))
        });
        reasons.truncate(self.max_reasons);

        debug!(
            risk_on,
            risk_off,
            regime = regime.name(),
            "Market regime classified"
        );

        MarketRegimeAnalysis {
            regime,
            confidence_tier,
            confidence,
            risk_on_score: risk_on,
            risk_off_score: risk_off,
            reasons,
            inputs,
            detected_at: now,
        }
    }
}

impl Default for MarketRegimeDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strong_risk_on() {
        let detector = MarketRegimeDetector::new();
        let result = detector.detect(RegimeInputs {
            index_change_percent: 1.5,
            smart_money_net: Some(800.0),
            defensive_avg: Some(0.2),
            overall_avg: Some(1.0),
            liquidity_ratio: 1.3,
        });

        assert_eq!(result.regime, RiskRegime::RiskOn);
        assert_eq!(result.risk_on_score, 9.0);
        assert_eq!(result.risk_off_score, 0.0);
        assert_eq!(result.confidence_tier, ConfidenceTier::High);
        assert_eq!(result.confidence, 100.0);
        assert_eq!(result.reasons.len(), 3);
        // Index and flow tie at 3.0; index wins on priority
        assert_eq!(result.reasons[0].factor, RegimeFactor::IndexMomentum);
        assert_eq!(result.reasons[1].factor, RegimeFactor::SmartMoneyFlow);
        assert_eq!(result.reasons[2].factor, RegimeFactor::SectorBehavior);
    }

    #[test]
    fn test_risk_off() {
        let detector = MarketRegimeDetector::new();
        let result = detector.detect(RegimeInputs {
            index_change_percent: -0.8,
            smart_money_net: Some(-1200.0),
            defensive_avg: Some(0.3),
            overall_avg: Some(-0.6),
            liquidity_ratio: 1.0,
        });

        assert_eq!(result.regime, RiskRegime::RiskOff);
        assert_eq!(result.risk_off_score, 7.0);
        assert_eq!(result.confidence_tier, ConfidenceTier::High);
        // Flow (3) outranks index (2)
        assert_eq!(result.reasons[0].factor, RegimeFactor::SmartMoneyFlow);
    }

    #[test]
    fn test_neutral_on_conflict() {
        let detector = MarketRegimeDetector::new();
        let result = detector.detect(RegimeInputs {
            index_change_percent: 0.5,
            smart_money_net: Some(-50.0),
            defensive_avg: None,
            overall_avg: None,
            liquidity_ratio: 1.0,
        });

        assert_eq!(result.regime, RiskRegime::Neutral);
        assert_eq!(result.confidence_tier, ConfidenceTier::Low);
        assert_eq!(result.reasons.len(), 2);
    }

    #[test]
    fn test_flat_market_has_no_reasons() {
        let detector = MarketRegimeDetector::new();
        let result = detector.detect(RegimeInputs::from_index(0.0));
        assert_eq!(result.regime, RiskRegime::Neutral);
        assert!(result.reasons.is_empty());
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_liquidity_ratio() {
        assert_eq!(liquidity_ratio(60_000.0, None), 1.0);
        assert_eq!(liquidity_ratio(60_000.0, Some(0.0)), 1.0);
        assert!((liquidity_ratio(60_000.0, Some(50_000.0)) - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_thin_liquidity_pushes_risk_off() {
        let detector = MarketRegimeDetector::new();
        let mut inputs = RegimeInputs::from_index(-0.2);
        inputs.liquidity_ratio = 0.7;
        let result = detector.detect(inputs);
        assert_eq!(result.risk_off_score, 2.0);
        assert_eq!(result.regime, RiskRegime::RiskOff);
    }
}
