//! Decline diagnostic: run every applicable check and turn the flag counts
//! into an action and a risk level.

use crate::checks::{check_sector, check_smart_money, check_technical, check_valuation, check_volume};
use crate::models::{DeclineDiagnosis, DiagnosticFlag, DiagnosticInput, OverallAction};
use market_core::stats::clamp_score;
use tracing::debug;

const BASE_RISK: f64 = 10.0;
const RED_WEIGHT: f64 = 25.0;
const YELLOW_WEIGHT: f64 = 8.0;

/// First match wins:
///
/// | red | yellow | action |
/// |-----|--------|--------|
/// | ≥3  | any    | IMMEDIATE_SELL |
/// | 2   | ≥2     | STRONG_SELL |
/// | 1-2 | any    | TRIM |
/// | 0   | any    | HOLD |
pub fn determine_action(red: usize, yellow: usize) -> OverallAction {
    match (red, yellow) {
        (r, _) if r >= 3 => OverallAction::ImmediateSell,
        (2, y) if y >= 2 => OverallAction::StrongSell,
        (1..=2, _) => OverallAction::Trim,
        _ => OverallAction::Hold,
    }
}

/// 0-100, non-decreasing in both counts
pub fn risk_level(red: usize, yellow: usize) -> f64 {
    clamp_score(BASE_RISK + RED_WEIGHT * red as f64 + YELLOW_WEIGHT * yellow as f64)
}

pub struct DeclineDiagnostic;

impl Default for DeclineDiagnostic {
    fn default() -> Self {
        Self::new()
    }
}

impl DeclineDiagnostic {
    pub fn new() -> Self {
        Self
    }

    pub fn diagnose(&self, input: &DiagnosticInput) -> DeclineDiagnosis {
        let mut flags: Vec<DiagnosticFlag> = Vec::new();

        if let Some(ctx) = &input.volume {
            flags.extend(check_volume(ctx));
        }
        if let Some(ctx) = &input.sector {
            flags.extend(check_sector(ctx));
        }
        if let Some(ctx) = &input.smart_money {
            flags.extend(check_smart_money(ctx));
        }
        if let Some(ctx) = &input.technical {
            flags.extend(check_technical(ctx));
        }
        if let Some(ctx) = &input.valuation {
            flags.extend(check_valuation(ctx));
        }

        // Stable: keeps check order within each severity
        flags.sort_by_key(|f| f.severity);

        let red_count = flags.iter().filter(|f| f.is_red()).count();
        let yellow_count = flags.len() - red_count;
        let action = determine_action(red_count, yellow_count);
        let risk_level = risk_level(red_count, yellow_count);

        let summary = if flags.is_empty() {
            format!("{}: no warning signs", input.symbol)
        } else {
            let signals: Vec<&str> = flags.iter().map(|f| f.signal.as_str()).collect();
            format!(
                "{}: {} red / {} yellow ({}) -> {}",
                input.symbol,
                red_count,
                yellow_count,
                signals.join(", "),
                action.as_str()
            )
        };

        debug!(symbol = %input.symbol, red_count, yellow_count, risk_level, "Decline diagnosis");

        DeclineDiagnosis {
            symbol: input.symbol.clone(),
            flags,
            red_count,
            yellow_count,
            action,
            risk_level,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        FlagSeverity, SmartMoneyContext, TechnicalContext, ValuationContext, VolumeContext,
    };

    #[test]
    fn test_three_red_flags_immediate_sell() {
        let input = DiagnosticInput::new("xyz")
            .with_volume(VolumeContext {
                health_score: Some(20.0),
                ..Default::default()
            })
            .with_smart_money(SmartMoneyContext {
                foreign_net: Some(-800.0),
                ..Default::default()
            })
            .with_technical(TechnicalContext {
                is_top_loser: true,
                in_rankings: true,
                ..Default::default()
            });

        let result = DeclineDiagnostic::new().diagnose(&input);
        assert_eq!(result.red_count, 3);
        assert_eq!(result.action, OverallAction::ImmediateSell);
        assert!(result.risk_level > 70.0);
        assert!(result.has_flag("Anemic Volume"));
        assert!(result.has_flag("Foreign Strong Sell"));
        assert!(result.has_flag("Top Loser"));
        assert_eq!(result.symbol, "XYZ");
    }

    #[test]
    fn test_no_flags_hold() {
        let input = DiagnosticInput::new("PTT").with_valuation(ValuationContext {
            pe: Some(10.0),
            sector_pe: Some(12.0),
            historical_pe: Some(11.0),
        });
        let result = DeclineDiagnostic::new().diagnose(&input);
        assert!(result.flags.is_empty());
        assert_eq!(result.action, OverallAction::Hold);
        assert!(result.risk_level < 30.0);
    }

    #[test]
    fn test_action_table() {
        assert_eq!(determine_action(3, 0), OverallAction::ImmediateSell);
        assert_eq!(determine_action(5, 4), OverallAction::ImmediateSell);
        assert_eq!(determine_action(2, 2), OverallAction::StrongSell);
        assert_eq!(determine_action(2, 1), OverallAction::Trim);
        assert_eq!(determine_action(1, 5), OverallAction::Trim);
        assert_eq!(determine_action(0, 3), OverallAction::Hold);
        assert_eq!(determine_action(0, 0), OverallAction::Hold);
    }

    #[test]
    fn test_risk_level_monotone_and_bounded() {
        for red in 0..6 {
            for yellow in 0..6 {
                let r = risk_level(red, yellow);
                assert!((0.0..=100.0).contains(&r));
                assert!(risk_level(red + 1, yellow) >= r);
                assert!(risk_level(red, yellow + 1) >= r);
                // a red flag never weighs less than a yellow one
                assert!(risk_level(red + 1, yellow) >= risk_level(red, yellow + 1));
            }
        }
        assert_eq!(risk_level(10, 10), 100.0);
    }

    #[test]
    fn test_red_flags_listed_first() {
        let input = DiagnosticInput::new("ABC")
            .with_volume(VolumeContext {
                relative_volume: Some(0.2),
                ..Default::default()
            })
            .with_technical(TechnicalContext {
                is_top_loser: true,
                in_rankings: true,
                ..Default::default()
            });
        let result = DeclineDiagnostic::new().diagnose(&input);
        assert_eq!(result.flags[0].severity, FlagSeverity::Red);
        assert_eq!(result.flags[1].severity, FlagSeverity::Yellow);
        assert_eq!(result.action, OverallAction::Trim);
    }
}
