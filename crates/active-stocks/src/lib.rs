//! Active Stocks Module
//!
//! Looks at the exchange's most active names: the top stocks by traded
//! value, stocks ranked in several top lists at once, and how concentrated
//! trading value is among the leaders.

pub mod analyzer;
pub mod concentration;
pub mod cross_ranking;

pub use analyzer::{ActiveStocksAnalysis, ActiveStocksAnalyzer, TopStock, DEFAULT_TOP_COUNT};
pub use concentration::{
    analyze_concentration, value_percent_of_total, ConcentrationLevel, ConcentrationMetrics,
};
pub use cross_ranking::{detect_cross_ranked, CategoryRank, CrossRankedStock, CrossRankingLimits};
