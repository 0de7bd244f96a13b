//! Sector Rotation Module
//!
//! Classifies sector momentum against the market, detects rotation patterns
//! and reads the risk regime from cyclical vs. defensive leadership.

pub mod analyzer;
pub mod performance;
pub mod regime;
pub mod rotation;

pub use analyzer::{SectorRotationAnalysis, SectorRotationAnalyzer, DEFAULT_PERCENTILE};
pub use performance::{
    analyze_sectors, classify_momentum, detect_rotation_signal, select_sectors_by_percentile,
    Momentum, PercentileSelection, RotationReading, RotationSignal, SectorPerformance,
};
pub use regime::{analyze_regime_context, RegimeContext};
pub use rotation::{concentration_score, RotationDetector, RotationPattern, RotationSummary};
