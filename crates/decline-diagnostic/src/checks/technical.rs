use crate::models::{DiagnosticFlag, FlagCategory, TechnicalContext};
use market_core::{EngineError, EngineResult};

const NEAR_LOW_POSITION: f64 = 20.0;

/// Where `price` sits in its 52-week range, 0 (low) to 100 (high).
/// A flat range reports the midpoint.
pub fn week52_position(price: f64, low: f64, high: f64) -> EngineResult<f64> {
    if !(price > 0.0) {
        return Err(EngineError::invalid(format!("price must be positive, got {}", price)));
    }
    if !(high >= low) {
        return Err(EngineError::invalid(format!(
            "52-week high {} is below low {}",
            high, low
        )));
    }
    if high == low {
        return Ok(50.0);
    }
    Ok(((price - low) / (high - low) * 100.0).clamp(0.0, 100.0))
}

pub fn check_technical(ctx: &TechnicalContext) -> Vec<DiagnosticFlag> {
    let mut flags = Vec::new();

    if ctx.is_top_loser {
        flags.push(DiagnosticFlag::red(
            FlagCategory::Technical,
            "Top Loser",
            "Listed among today's top losers",
            "Do not average down into the drop",
        ));
    }

    if let Some(pos) = ctx.week52_position.filter(|p| *p < NEAR_LOW_POSITION) {
        flags.push(DiagnosticFlag::red(
            FlagCategory::Technical,
            "Near 52-Week Low",
            format!("Trading in the bottom {:.0}% of its 52-week range", pos),
            "Support is being tested",
        ));
    }

    if let (Some(t5), Some(t20)) = (ctx.trend_5d, ctx.trend_20d) {
        if t5 < 0.0 && t20 < 0.0 {
            flags.push(DiagnosticFlag::red(
                FlagCategory::Technical,
                "Downtrend Confirmed",
                format!("Down {:.1}% over 5 days and {:.1}% over 20 days", t5.abs(), t20.abs()),
                "Wait for the trend to turn",
            ));
        }
    }

    if !ctx.in_rankings {
        flags.push(DiagnosticFlag::yellow(
            FlagCategory::Technical,
            "No Ranking Presence",
            "Absent from every top list today",
            "Little market attention on the name",
        ));
    }

    flags
}
