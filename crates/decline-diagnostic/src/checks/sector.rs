use crate::models::{DiagnosticFlag, FlagCategory, SectorContext};
use market_core::RiskRegime;
use sector_rotation::RotationSignal;

const EXIT_CONFIDENCE: f64 = 70.0;

pub fn check_sector(ctx: &SectorContext) -> Vec<DiagnosticFlag> {
    let mut flags = Vec::new();

    if let Some(momentum) = ctx.momentum.filter(|m| m.is_lagging()) {
        flags.push(DiagnosticFlag::red(
            FlagCategory::Sector,
            "Sector Underperforming",
            format!("{} is rated {} against the market", ctx.sector_id, momentum.name()),
            "Rotate toward leading sectors",
        ));
    }

    if ctx.signal == Some(RotationSignal::Exit) && ctx.signal_confidence >= EXIT_CONFIDENCE {
        flags.push(DiagnosticFlag::red(
            FlagCategory::Sector,
            "Sector Exit Signal",
            format!(
                "Money is leaving {} ({:.0}% confidence)",
                ctx.sector_id, ctx.signal_confidence
            ),
            "Follow the flow out of the sector",
        ));
    }

    if ctx.regime == Some(RiskRegime::RiskOff) && ctx.regime_confirmed {
        flags.push(DiagnosticFlag::red(
            FlagCategory::Sector,
            "Risk-Off Regime",
            "Defensive sectors are leading by a confirmed margin",
            "Cut exposure to cyclical names",
        ));
    }

    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use sector_rotation::Momentum;

    fn ctx() -> SectorContext {
        SectorContext {
            sector_id: "BANK".to_string(),
            momentum: Some(Momentum::InLine),
            signal: Some(RotationSignal::Hold),
            signal_confidence: 0.0,
            regime: Some(RiskRegime::Neutral),
            regime_confirmed: false,
        }
    }

    #[test]
    fn test_lagging_sector() {
        let mut c = ctx();
        c.momentum = Some(Momentum::SignificantLag);
        let flags = check_sector(&c);
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].signal, "Sector Underperforming");
    }

    #[test]
    fn test_exit_needs_confidence() {
        let mut c = ctx();
        c.signal = Some(RotationSignal::Exit);
        c.signal_confidence = 69.0;
        assert!(check_sector(&c).is_empty());
        c.signal_confidence = 70.0;
        assert_eq!(check_sector(&c)[0].signal, "Sector Exit Signal");
    }

    #[test]
    fn test_risk_off_needs_confirmation() {
        let mut c = ctx();
        c.regime = Some(RiskRegime::RiskOff);
        assert!(check_sector(&c).is_empty());
        c.regime_confirmed = true;
        assert_eq!(check_sector(&c)[0].signal, "Risk-Off Regime");
    }
}
