use async_trait::async_trait;
use crate::{InvestorHistory, SectorSnapshot};

/// Source of prior-day context, implemented by the caller's data layer.
///
/// Failures are reported with `anyhow` and treated by the engine as
/// "no history available".
#[async_trait]
pub trait HistoricalDataSource: Send + Sync {
    /// Previous days of investor-category flow, oldest first
    async fn investor_history(&self) -> anyhow::Result<InvestorHistory>;

    /// The previous trading day's sector snapshots
    async fn previous_sectors(&self) -> anyhow::Result<Vec<SectorSnapshot>>;
}
