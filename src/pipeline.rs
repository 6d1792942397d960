//! One insight run end to end: aggregate, request, fall back, persist.

use crate::analyzers::{AggregatedSummary, compute_summary};
use crate::error::{DataSourceError, PersistenceError};
use crate::insights::history::{DEFAULT_HISTORY_DEPTH, load_recent};
use crate::insights::{FallbackSynthesizer, InsightPayload, InsightRequester, SystemErrorPayload};
use crate::services::{BinSource, InsightRecord, InsightStore};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Zone label of a regular run's record.
pub const ALL_WARDS_ZONE: &str = "All Wards";
/// Zone label of the record written when the regular write fails.
pub const SYSTEM_ERROR_ZONE: &str = "System Error";

pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(30);

pub struct InsightPipeline {
    bins: Arc<dyn BinSource>,
    store: Arc<dyn InsightStore>,
    requester: InsightRequester,
    fallback: FallbackSynthesizer,
    history_depth: usize,
    store_timeout: Duration,
}

impl InsightPipeline {
    pub fn new(
        bins: Arc<dyn BinSource>,
        store: Arc<dyn InsightStore>,
        requester: InsightRequester,
    ) -> Self {
        Self {
            bins,
            store,
            requester,
            fallback: FallbackSynthesizer::default(),
            history_depth: DEFAULT_HISTORY_DEPTH,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_fallback(mut self, fallback: FallbackSynthesizer) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_history_depth(mut self, depth: usize) -> Self {
        self.history_depth = depth;
        self
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    /// Produces this run's payload. Never fails: every failure on the way
    /// ends in a fallback payload with `success == false`.
    #[tracing::instrument(skip(self))]
    pub async fn generate(&self) -> InsightPayload {
        let (summary, history) = tokio::join!(
            compute_summary(self.bins.as_ref()),
            load_recent(self.store.as_ref(), self.history_depth),
        );

        match summary {
            Ok(summary) => match self.requester.request_insights(&summary, &history).await {
                Ok(payload) => payload,
                Err(e) => {
                    warn!(error = %e, "AI insight generation failed, using fallback insights");
                    let fresh = self.fallback_summary(Some(summary)).await;
                    self.fallback.synthesize(&fresh, &e)
                }
            },
            Err(e) => {
                warn!(error = %e, "Fleet aggregation failed, using fallback insights");
                let fresh = self.fallback_summary(None).await;
                self.fallback.synthesize(&fresh, &e)
            }
        }
    }

    /// Recomputes the summary for the fallback, reusing `earlier` and then a
    /// zeroed summary if the source is still unavailable.
    async fn fallback_summary(&self, earlier: Option<AggregatedSummary>) -> AggregatedSummary {
        match compute_summary(self.bins.as_ref()).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(error = %e, reused = earlier.is_some(), "Could not recompute summary for fallback");
                earlier.unwrap_or_default()
            }
        }
    }

    /// Runs the pipeline and appends the result to the insight store.
    ///
    /// If the regular write fails, a minimal system-error record is written
    /// instead and returned.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] only when both writes fail.
    #[tracing::instrument(skip(self))]
    pub async fn run_and_persist(&self) -> Result<InsightRecord, PersistenceError> {
        info!("Starting AI insights generation");
        let payload = self.generate().await;
        let success = payload.success;

        let primary = match self.write(&payload, ALL_WARDS_ZONE).await {
            Ok(record) => {
                info!(id = %record.id, success, "AI insights saved");
                return Ok(record);
            }
            Err(e) => e,
        };
        error!(error = %primary, "Failed to save AI insights, writing system error record");

        match self
            .write(&SystemErrorPayload::new(Utc::now()), SYSTEM_ERROR_ZONE)
            .await
        {
            Ok(record) => {
                info!(id = %record.id, "System error record saved");
                Ok(record)
            }
            Err(fallback) => {
                error!(error = %fallback, "Failed to save system error record");
                Err(PersistenceError { primary, fallback })
            }
        }
    }

    async fn write(
        &self,
        payload: &impl Serialize,
        zone: &str,
    ) -> Result<InsightRecord, DataSourceError> {
        let record = InsightRecord::new(serde_json::to_string(payload)?, zone);

        tokio::time::timeout(self.store_timeout, self.store.append(&record))
            .await
            .map_err(|_| DataSourceError::Timeout(self.store_timeout))??;

        Ok(record)
    }
}
