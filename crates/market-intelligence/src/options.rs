use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Feature toggles and tuning for one aggregation.
///
/// P0 = regime + smart money, P1 = sector rotation, P2 = active stocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationOptions {
    // P0
    pub include_regime: bool,
    pub include_smart_money: bool,
    // P1
    pub include_sector_rotation: bool,
    // P2
    pub include_active_stocks: bool,

    pub top_stock_count: usize,             // 10
    pub max_data_age_minutes: f64,          // 30
    pub percentile_cutoff: f64,             // 30%
    /// Normal daily traded value (millions) for the liquidity ratio
    pub liquidity_baseline_value: Option<f64>,
    pub max_stocks_per_category: usize,     // 50
    pub max_cross_ranked: usize,            // 20
}

impl Default for AggregationOptions {
    fn default() -> Self {
        Self {
            include_regime: true,
            include_smart_money: true,
            include_sector_rotation: true,
            include_active_stocks: true,
            top_stock_count: 10,
            max_data_age_minutes: 30.0,
            percentile_cutoff: 30.0,
            liquidity_baseline_value: None,
            max_stocks_per_category: 50,
            max_cross_ranked: 20,
        }
    }
}

impl AggregationOptions {
    /// Read `MI_*` variables, loading `.env` first when present
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let options = Self {
            include_regime: env::var("MI_INCLUDE_REGIME")
                .unwrap_or_else(|_| "true".to_string())
                .parse()?,
            include_smart_money: env::var("MI_INCLUDE_SMART_MONEY")
                .unwrap_or_else(|_| "true".to_string())
                .parse()?,
            include_sector_rotation: env::var("MI_INCLUDE_SECTOR_ROTATION")
                .unwrap_or_else(|_| "true".to_string())
                .parse()?,
            include_active_stocks: env::var("MI_INCLUDE_ACTIVE_STOCKS")
                .unwrap_or_else(|_| "true".to_string())
                .parse()?,
            top_stock_count: env::var("MI_TOP_STOCK_COUNT")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,
            max_data_age_minutes: env::var("MI_MAX_DATA_AGE_MINUTES")
                .unwrap_or_else(|_| "30".to_string())
                .parse()?,
            percentile_cutoff: env::var("MI_PERCENTILE_CUTOFF")
                .unwrap_or_else(|_| "30".to_string())
                .parse()?,
            liquidity_baseline_value: env::var("MI_LIQUIDITY_BASELINE_VALUE")
                .ok()
                .map(|v| v.parse())
                .transpose()
                .context("MI_LIQUIDITY_BASELINE_VALUE must be a number")?,
            max_stocks_per_category: env::var("MI_MAX_STOCKS_PER_CATEGORY")
                .unwrap_or_else(|_| "50".to_string())
                .parse()?,
            max_cross_ranked: env::var("MI_MAX_CROSS_RANKED")
                .unwrap_or_else(|_| "20".to_string())
                .parse()?,
        };

        Ok(options)
    }

    /// Options from a JSON object; omitted fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse aggregation options")
    }

    /// Disable every feature group except P0
    pub fn core_only() -> Self {
        Self {
            include_sector_rotation: false,
            include_active_stocks: false,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = AggregationOptions::default();
        assert!(options.include_regime && options.include_active_stocks);
        assert_eq!(options.top_stock_count, 10);
        assert_eq!(options.max_data_age_minutes, 30.0);
        assert_eq!(options.max_stocks_per_category, 50);
        assert_eq!(options.max_cross_ranked, 20);
    }

    #[test]
    fn test_partial_json() {
        let options =
            AggregationOptions::from_json_str(r#"{ "include_active_stocks": false, "top_stock_count": 5 }"#)
                .unwrap();
        assert!(!options.include_active_stocks);
        assert_eq!(options.top_stock_count, 5);
        assert!(options.include_regime);
        assert_eq!(options.percentile_cutoff, 30.0);

        assert!(AggregationOptions::from_json_str(r#"{ "top_stock_count": "ten" }"#).is_err());
    }

    #[test]
    fn test_core_only() {
        let options = AggregationOptions::core_only();
        assert!(options.include_regime && options.include_smart_money);
        assert!(!options.include_sector_rotation && !options.include_active_stocks);
    }
}
