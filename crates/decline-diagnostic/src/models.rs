use market_core::RiskRegime;
use sector_rotation::{Momentum, RotationSignal};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FlagSeverity {
    Red,
    Yellow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlagCategory {
    Volume,
    Sector,
    SmartMoney,
    Technical,
    Valuation,
}

impl FlagCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagCategory::Volume => "Volume",
            FlagCategory::Sector => "Sector",
            FlagCategory::SmartMoney => "Smart Money",
            FlagCategory::Technical => "Technical",
            FlagCategory::Valuation => "Valuation",
        }
    }
}

/// One warning raised by a diagnostic check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticFlag {
    pub category: FlagCategory,
    pub severity: FlagSeverity,
    /// Short signal name, e.g. "Top Loser"
    pub signal: String,
    pub description: String,
    pub action: String,
}

impl DiagnosticFlag {
    pub fn red(
        category: FlagCategory,
        signal: &str,
        description: impl Into<String>,
        action: &str,
    ) -> Self {
        Self {
            category,
            severity: FlagSeverity::Red,
            signal: signal.to_string(),
            description: description.into(),
            action: action.to_string(),
        }
    }

    pub fn yellow(
        category: FlagCategory,
        signal: &str,
        description: impl Into<String>,
        action: &str,
    ) -> Self {
        Self {
            category,
            severity: FlagSeverity::Yellow,
            signal: signal.to_string(),
            description: description.into(),
            action: action.to_string(),
        }
    }

    pub fn is_red(&self) -> bool {
        self.severity == FlagSeverity::Red
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverallAction {
    ImmediateSell,
    StrongSell,
    Trim,
    Hold,
}

impl OverallAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallAction::ImmediateSell => "IMMEDIATE_SELL",
            OverallAction::StrongSell => "STRONG_SELL",
            OverallAction::Trim => "TRIM",
            OverallAction::Hold => "HOLD",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            OverallAction::ImmediateSell => "Multiple independent warnings; exit the position",
            OverallAction::StrongSell => "Two red flags backed by further warnings; reduce sharply",
            OverallAction::Trim => "Isolated red flags; reduce exposure and tighten stops",
            OverallAction::Hold => "No red flags; keep monitoring",
        }
    }
}

/// Volume-health readings for the stock
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumeContext {
    /// 0-100 composite volume health
    pub health_score: Option<f64>,
    /// Volume-weighted advance/decline, -100..100
    pub vwad: Option<f64>,
    /// Share of the day's volume in the stock's top trades, percent
    pub concentration: Option<f64>,
    /// Today's volume relative to its average (1.0 = normal)
    pub relative_volume: Option<f64>,
}

/// Where the stock's sector stands today
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorContext {
    pub sector_id: String,
    pub momentum: Option<Momentum>,
    pub signal: Option<RotationSignal>,
    /// Confidence of `signal`, 0-100
    pub signal_confidence: f64,
    pub regime: Option<RiskRegime>,
    pub regime_confirmed: bool,
}

/// Market-wide smart-money readings, millions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SmartMoneyContext {
    pub foreign_net: Option<f64>,
    pub institution_net: Option<f64>,
    /// 0-100 combined score
    pub score: Option<f64>,
    /// Cumulative foreign + institution net over five days
    pub five_day_net: Option<f64>,
}

/// Price action and list membership for the stock
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicalContext {
    pub is_top_loser: bool,
    /// Present in any of the four ranked lists
    pub in_rankings: bool,
    /// Position within the 52-week range, percent (0 = at the low)
    pub week52_position: Option<f64>,
    /// % change over 5 and 20 trading days
    pub trend_5d: Option<f64>,
    pub trend_20d: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValuationContext {
    pub pe: Option<f64>,
    pub sector_pe: Option<f64>,
    pub historical_pe: Option<f64>,
}

/// Everything known about one stock. Absent contexts skip their check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticInput {
    pub symbol: String,
    pub volume: Option<VolumeContext>,
    pub sector: Option<SectorContext>,
    pub smart_money: Option<SmartMoneyContext>,
    pub technical: Option<TechnicalContext>,
    pub valuation: Option<ValuationContext>,
}

impl DiagnosticInput {
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_uppercase(),
            ..Default::default()
        }
    }

    pub fn with_volume(mut self, ctx: VolumeContext) -> Self {
        self.volume = Some(ctx);
        self
    }

    pub fn with_sector(mut self, ctx: SectorContext) -> Self {
        self.sector = Some(ctx);
        self
    }

    pub fn with_smart_money(mut self, ctx: SmartMoneyContext) -> Self {
        self.smart_money = Some(ctx);
        self
    }

    pub fn with_technical(mut self, ctx: TechnicalContext) -> Self {
        self.technical = Some(ctx);
        self
    }

    pub fn with_valuation(mut self, ctx: ValuationContext) -> Self {
        self.valuation = Some(ctx);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclineDiagnosis {
    pub symbol: String,
    /// Red flags first
    pub flags: Vec<DiagnosticFlag>,
    pub red_count: usize,
    pub yellow_count: usize,
    pub action: OverallAction,
    /// 0-100
    pub risk_level: f64,
    pub summary: String,
}

impl DeclineDiagnosis {
    pub fn has_flag(&self, signal: &str) -> bool {
        self.flags.iter().any(|f| f.signal == signal)
    }
}
