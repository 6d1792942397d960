//! Trait for reading the bin fleet.

use crate::bins::BinRecord;
use crate::error::DataSourceError;

/// Read-only access to the monitored bin fleet.
///
/// Every call is an independent query; the aggregator issues several of them
/// concurrently within one run.
#[async_trait::async_trait]
pub trait BinSource: Send + Sync {
    /// Returns every bin currently known, in the source's natural order.
    async fn fetch_bins(&self) -> Result<Vec<BinRecord>, DataSourceError>;
}
