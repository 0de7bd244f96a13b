//! Smart Money Flow Module
//!
//! Classifies per-category investor flow (foreign, institution, retail,
//! proprietary) and combines it into a single conviction signal, with
//! foreign and institutional money as the primary driver.

pub mod classifier;
pub mod combined;
pub mod models;

pub use classifier::{classify_category, classify_strength, classify_trend, FlowThresholds};
pub use combined::SmartMoneyAnalyzer;
pub use models::{
    CategoryFlowReading, CombinedSignal, FlowStrength, FlowTrend, PrimaryDriver, RiskSignal,
    SmartMoneyAnalysis,
};
