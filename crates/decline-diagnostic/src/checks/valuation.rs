use crate::models::{DiagnosticFlag, FlagCategory, ValuationContext};

/// Premium over the comparison P/E that raises a flag, as a ratio
const PREMIUM_LIMIT: f64 = 1.3;

fn premium(pe: f64, reference: f64) -> Option<f64> {
    if pe <= 0.0 || reference <= 0.0 {
        return None;
    }
    (pe > reference * PREMIUM_LIMIT).then(|| (pe / reference - 1.0) * 100.0)
}

pub fn check_valuation(ctx: &ValuationContext) -> Vec<DiagnosticFlag> {
    let mut flags = Vec::new();
    let Some(pe) = ctx.pe else {
        return flags;
    };

    if let Some(p) = ctx.sector_pe.and_then(|sector| premium(pe, sector)) {
        flags.push(DiagnosticFlag::red(
            FlagCategory::Valuation,
            "Premium to Sector P/E",
            format!("P/E {:.1} trades {:.0}% above its sector", pe, p),
            "Valuation leaves little room for disappointment",
        ));
    }

    if let Some(p) = ctx.historical_pe.and_then(|hist| premium(pe, hist)) {
        flags.push(DiagnosticFlag::red(
            FlagCategory::Valuation,
            "Above Historical P/E",
            format!("P/E {:.1} is {:.0}% above its own history", pe, p),
            "Expect mean reversion in the multiple",
        ));
    }

    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_premiums() {
        let flags = check_valuation(&ValuationContext {
            pe: Some(26.0),
            sector_pe: Some(15.0),
            historical_pe: Some(21.0),
        });
        // 73% over the sector, 24% over its history
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].signal, "Premium to Sector P/E");
    }

    #[test]
    fn test_non_positive_pe_skipped() {
        let ctx = ValuationContext {
            pe: Some(-5.0),
            sector_pe: Some(10.0),
            historical_pe: Some(10.0),
        };
        assert!(check_valuation(&ctx).is_empty());

        let ctx = ValuationContext {
            pe: Some(30.0),
            sector_pe: Some(0.0),
            historical_pe: None,
        };
        assert!(check_valuation(&ctx).is_empty());
    }
}
