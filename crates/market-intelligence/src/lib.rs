//! Market Intelligence Engine
//!
//! Runs every market-wide analysis that today's snapshots allow and returns
//! them in one envelope. A missing snapshot or a failing analysis leaves its
//! field empty; aggregation itself never fails.

pub mod freshness;
pub mod options;


pub use freshness::{compute_freshness, DataFreshness, SourceAges};
pub use options::AggregationOptions;

use active_stocks::{ActiveStocksAnalysis, ActiveStocksAnalyzer, CrossRankingLimits};
use chrono::{DateTime, Utc};
use decline_diagnostic::{
    DeclineDiagnosis, DeclineDiagnostic, DiagnosticInput, SectorContext, SmartMoneyContext,
    TechnicalContext,
};
use market_core::stats::mean_opt;
use market_core::{
    EngineResult, HistoricalDataSource, InvestorCategory, InvestorFlows, InvestorHistory,
    MarketOverview, RankingLists, ReferenceData, SectorSnapshot,
};
use market_regime_detector::{liquidity_ratio, MarketRegimeAnalysis, MarketRegimeDetector, RegimeInputs};
use rankings_correlation::{map_rankings_by_sector, CorrelationAnalysis, CorrelationAnalyzer};
use sector_rotation::{SectorRotationAnalysis, SectorRotationAnalyzer};
use serde::{Deserialize, Serialize};
use smart_money_flow::{SmartMoneyAnalysis, SmartMoneyAnalyzer};
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Today's snapshots. Every source is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketInput {
    pub market: Option<MarketOverview>,
    pub investors: Option<InvestorFlows>,
    /// Prior days of investor flow, oldest first
    pub investor_history: Option<InvestorHistory>,
    pub sectors: Option<Vec<SectorSnapshot>>,
    /// When the sector snapshot was taken; falls back to the market timestamp
    pub sectors_timestamp: Option<DateTime<Utc>>,
    pub previous_sectors: Option<Vec<SectorSnapshot>>,
    pub rankings: Option<RankingLists>,
}

impl MarketInput {
    fn sectors(&self) -> Option<&[SectorSnapshot]> {
        self.sectors.as_deref().filter(|s| !s.is_empty())
    }

    fn rankings(&self) -> Option<&RankingLists> {
        self.rankings.as_ref().filter(|r| !r.is_empty())
    }

    fn sector_timestamp(&self) -> Option<DateTime<Utc>> {
        self.sectors()?;
        self.sectors_timestamp
            .or_else(|| self.market.as_ref().map(|m| m.timestamp))
    }
}

/// Sector rotation plus, when rankings exist, how they line up with it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorRotationReport {
    pub rotation: SectorRotationAnalysis,
    pub correlation: Option<CorrelationAnalysis>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketIntelligence {
    pub regime: Option<MarketRegimeAnalysis>,
    pub smart_money: Option<SmartMoneyAnalysis>,
    pub sector_rotation: Option<SectorRotationReport>,
    pub active_stocks: Option<ActiveStocksAnalysis>,
    pub timestamp: DateTime<Utc>,
    pub freshness: DataFreshness,
}

impl MarketIntelligence {
    pub fn available_count(&self) -> usize {
        [
            self.regime.is_some(),
            self.smart_money.is_some(),
            self.sector_rotation.is_some(),
            self.active_stocks.is_some(),
        ]
        .iter()
        .filter(|b| **b)
        .count()
    }
}

/// Run `analysis`, turning an error or a panic into `None`
pub(crate) fn guarded<T>(name: &str, analysis: impl FnOnce() -> EngineResult<T>) -> Option<T> {
    match catch_unwind(AssertUnwindSafe(analysis)) {
        Ok(Ok(result)) => Some(result),
        Ok(Err(e)) => {
            warn!(analysis = name, error = %e, "Analysis unavailable");
            None
        }
        Err(_) => {
            warn!(analysis = name, "Analysis panicked; result dropped");
            None
        }
    }
}

pub struct MarketIntelligenceEngine {
    reference: Arc<ReferenceData>,
    history: Option<Arc<dyn HistoricalDataSource>>,
    regime_detector: MarketRegimeDetector,
    smart_money: SmartMoneyAnalyzer,
    correlation: CorrelationAnalyzer,
    diagnostic: DeclineDiagnostic,
}

impl Default for MarketIntelligenceEngine {
    fn default() -> Self {
        Self::new(Arc::new(ReferenceData::default()))
    }
}

impl MarketIntelligenceEngine {
    pub fn new(reference: Arc<ReferenceData>) -> Self {
        Self {
            correlation: CorrelationAnalyzer::new(reference.clone()),
            reference,
            history: None,
            regime_detector: MarketRegimeDetector::new(),
            smart_money: SmartMoneyAnalyzer::new(),
            diagnostic: DeclineDiagnostic::new(),
        }
    }

    /// Fetch prior-day context from `source` when the input lacks it
    pub fn with_history_source(mut self, source: Arc<dyn HistoricalDataSource>) -> Self {
        self.history = Some(source);
        self
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub async fn aggregate(&self, input: &MarketInput, options: &AggregationOptions) -> MarketIntelligence {
        self.aggregate_at(input, options, Utc::now()).await
    }

    /// Aggregate as of `now`, which stamps the envelope and drives freshness
    pub async fn aggregate_at(
        &self,
        input: &MarketInput,
        options: &AggregationOptions,
        now: DateTime<Utc>,
    ) -> MarketIntelligence {
        info!(
            "Aggregating market intelligence (market: {}, investors: {}, sectors: {}, rankings: {})",
            input.market.is_some(),
            input.investors.is_some(),
            input.sectors().map(|s| s.len()).unwrap_or(0),
            input.rankings().is_some()
        );

        let (fetched_history, fetched_previous) = self.load_history(input, options).await;
        let history = input.investor_history.as_ref().or(fetched_history.as_ref());
        let previous = input
            .previous_sectors
            .as_deref()
            .or(fetched_previous.as_deref());

        // P0
        let regime = match (&input.market, options.include_regime) {
            (Some(market), true) => guarded("regime", || {
                Ok(self.regime_detector.detect_at(self.regime_inputs(market, input, options), now))
            }),
            _ => None,
        };

        let smart_money = match (&input.investors, options.include_smart_money) {
            (Some(flows), true) => guarded("smart_money", || self.smart_money.analyze(flows, history)),
            _ => None,
        };

        // P1
        let sector_rotation = match (input.sectors(), options.include_sector_rotation) {
            (Some(sectors), true) => guarded("sector_rotation", || {
                self.sector_rotation(sectors, input.rankings(), previous, options)
            }),
            _ => None,
        };

        // P2
        let active_stocks = match (input.rankings(), options.include_active_stocks) {
            (Some(rankings), true) => guarded("active_stocks", || {
                ActiveStocksAnalyzer::new(self.reference.clone())
                    .with_top_count(options.top_stock_count)
                    .with_limits(CrossRankingLimits {
                        max_per_category: options.max_stocks_per_category,
                        max_results: options.max_cross_ranked,
                    })
                    .analyze(rankings, input.market.as_ref())
            }),
            _ => None,
        };

        let freshness = compute_freshness(
            input.market.as_ref().map(|m| m.timestamp),
            input.investors.as_ref().map(|i| i.timestamp),
            input.sector_timestamp(),
            input.rankings().map(|r| r.timestamp),
            now,
            options.max_data_age_minutes,
        );

        let result = MarketIntelligence {
            regime,
            smart_money,
            sector_rotation,
            active_stocks,
            timestamp: now,
            freshness,
        };

        info!(
            "Market intelligence ready: {}/4 analyses, fresh: {}",
            result.available_count(),
            result.freshness.is_fresh
        );

        result
    }

    /// Diagnose one stock against today's market picture. Contexts already
    /// present in `base` are kept; missing sector, smart-money and
    /// technical contexts are filled from `intel` and `input`.
    pub fn diagnose(
        &self,
        base: DiagnosticInput,
        intel: &MarketIntelligence,
        input: &MarketInput,
    ) -> DeclineDiagnosis {
        let mut diagnostic_input = base;

        if diagnostic_input.sector.is_none() {
            let sector_id = self.sector_of(&diagnostic_input.symbol, input);
            diagnostic_input.sector = intel
                .sector_rotation
                .as_ref()
                .zip(sector_id)
                .and_then(|(report, id)| SectorContext::from_rotation(&report.rotation, &id));
        }
        if diagnostic_input.smart_money.is_none() {
            diagnostic_input.smart_money = intel.smart_money.as_ref().map(SmartMoneyContext::from_analysis);
        }
        if diagnostic_input.technical.is_none() {
            diagnostic_input.technical = input
                .rankings()
                .map(|r| TechnicalContext::from_rankings(r, &diagnostic_input.symbol));
        }

        self.diagnostic.diagnose(&diagnostic_input)
    }

    /// A ranked stock's own sector wins over the symbol table
    fn sector_of(&self, symbol: &str, input: &MarketInput) -> Option<String> {
        input
            .rankings()
            .and_then(|r| {
                r.iter_all()
                    .map(|(_, stock)| stock)
                    .filter(|stock| stock.symbol.eq_ignore_ascii_case(symbol))
                    .find_map(|stock| self.reference.resolve_sector(stock))
            })
            .or_else(|| self.reference.sector_for(symbol).map(str::to_string))
    }

    async fn load_history(
        &self,
        input: &MarketInput,
        options: &AggregationOptions,
    ) -> (Option<InvestorHistory>, Option<Vec<SectorSnapshot>>) {
        let Some(source) = &self.history else {
            return (None, None);
        };

        let need_investors =
            options.include_smart_money && input.investors.is_some() && input.investor_history.is_none();
        let need_sectors = options.include_sector_rotation
            && input.sectors().is_some()
            && input.previous_sectors.is_none();

        let investors = async {
            if !need_investors {
                return None;
            }
            match source.investor_history().await {
                Ok(history) => Some(history),
                Err(e) => {
                    warn!("Investor history unavailable: {:#}", e);
                    None
                }
            }
        };
        let sectors = async {
            if !need_sectors {
                return None;
            }
            match source.previous_sectors().await {
                Ok(previous) => Some(previous),
                Err(e) => {
                    warn!("Previous sector snapshot unavailable: {:#}", e);
                    None
                }
            }
        };

        tokio::join!(investors, sectors)
    }

    fn regime_inputs(
        &self,
        market: &MarketOverview,
        input: &MarketInput,
        options: &AggregationOptions,
    ) -> RegimeInputs {
        let smart_money_net = input
            .investors
            .as_ref()
            .filter(|f| f.has_smart_money())
            .map(|f| f.net_of(InvestorCategory::Foreign) + f.net_of(InvestorCategory::Institution));

        let sectors = input.sectors().unwrap_or_default();
        let defensive_avg = mean_opt(
            sectors
                .iter()
                .filter(|s| self.reference.is_defensive(&s.id))
                .map(|s| s.change_percent),
        );
        let overall_avg = mean_opt(sectors.iter().map(|s| s.change_percent));

        RegimeInputs {
            index_change_percent: market.change_percent,
            smart_money_net,
            defensive_avg,
            overall_avg,
            liquidity_ratio: liquidity_ratio(market.total_value, options.liquidity_baseline_value),
        }
    }

    fn sector_rotation(
        &self,
        sectors: &[SectorSnapshot],
        rankings: Option<&RankingLists>,
        previous: Option<&[SectorSnapshot]>,
        options: &AggregationOptions,
    ) -> EngineResult<SectorRotationReport> {
        let appearances: HashMap<String, usize> = rankings
            .map(|r| map_rankings_by_sector(r, &self.reference).appearance_counts())
            .unwrap_or_default();

        let rotation = SectorRotationAnalyzer::new(self.reference.clone())
            .with_percentile(options.percentile_cutoff)
            .analyze(sectors, &appearances, previous)?;

        let correlation = rankings.and_then(|r| {
            guarded("rankings_correlation", || self.correlation.analyze(sectors, r))
        });
        debug!(with_correlation = correlation.is_some(), "Sector rotation report built");

        Ok(SectorRotationReport {
            rotation,
            correlation,
        })
    }
}
