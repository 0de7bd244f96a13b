//! Decline Diagnostic Module
//!
//! Explains why a single stock is falling. Five independent checks (volume,
//! sector, smart money, technical, valuation) raise red or yellow flags, and
//! the flag counts map to an overall action and a 0-100 risk level.

pub mod checks;
pub mod context;
pub mod diagnostic;
pub mod models;

pub use checks::week52_position;
pub use diagnostic::{determine_action, risk_level, DeclineDiagnostic};
pub use models::{
    DeclineDiagnosis, DiagnosticFlag, DiagnosticInput, FlagCategory, FlagSeverity, OverallAction,
    SectorContext, SmartMoneyContext, TechnicalContext, ValuationContext, VolumeContext,
};
