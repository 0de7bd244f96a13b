use crate::models::{DiagnosticFlag, FlagCategory, SmartMoneyContext};

const FOREIGN_STRONG_SELL: f64 = -500.0;
const INSTITUTION_SELLING: f64 = -100.0;
const WEAK_SCORE: f64 = 40.0;
const PERSISTENT_OUTFLOW: f64 = -200.0;

pub fn check_smart_money(ctx: &SmartMoneyContext) -> Vec<DiagnosticFlag> {
    let mut flags = Vec::new();

    if let Some(net) = ctx.foreign_net.filter(|n| *n < FOREIGN_STRONG_SELL) {
        flags.push(DiagnosticFlag::red(
            FlagCategory::SmartMoney,
            "Foreign Strong Sell",
            format!("Foreign investors net sold {:.0}M", net.abs()),
            "Foreign selling often leads large caps lower",
        ));
    }

    if let Some(net) = ctx.institution_net.filter(|n| *n < INSTITUTION_SELLING) {
        flags.push(DiagnosticFlag::red(
            FlagCategory::SmartMoney,
            "Institution Selling",
            format!("Local institutions net sold {:.0}M", net.abs()),
            "Expect limited domestic support",
        ));
    }

    if let Some(score) = ctx.score.filter(|s| *s < WEAK_SCORE) {
        flags.push(DiagnosticFlag::red(
            FlagCategory::SmartMoney,
            "Weak Smart Money Score",
            format!("Combined smart money score {:.0} below {:.0}", score, WEAK_SCORE),
            "Wait for flows to turn before adding",
        ));
    }

    if let Some(net) = ctx.five_day_net.filter(|n| *n < PERSISTENT_OUTFLOW) {
        flags.push(DiagnosticFlag::red(
            FlagCategory::SmartMoney,
            "Persistent Outflow",
            format!("Smart money withdrew {:.0}M over five days", net.abs()),
            "Treat rallies as exit opportunities",
        ));
    }

    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selling_pressure() {
        let flags = check_smart_money(&SmartMoneyContext {
            foreign_net: Some(-800.0),
            institution_net: Some(-150.0),
            score: Some(30.0),
            five_day_net: Some(-1200.0),
        });
        let signals: Vec<&str> = flags.iter().map(|f| f.signal.as_str()).collect();
        assert_eq!(
            signals,
            vec![
                "Foreign Strong Sell",
                "Institution Selling",
                "Weak Smart Money Score",
                "Persistent Outflow"
            ]
        );
    }

    #[test]
    fn test_thresholds_are_strict() {
        let flags = check_smart_money(&SmartMoneyContext {
            foreign_net: Some(-500.0),
            institution_net: Some(-100.0),
            score: Some(40.0),
            five_day_net: Some(-200.0),
        });
        assert!(flags.is_empty());
    }
}
