//! Trait and record type for the insight history store.

use crate::error::DataSourceError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One persisted pipeline result. Never modified after it is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightRecord {
    pub id: String,
    /// Serialized insight payload, handed to readers as-is.
    pub text: String,
    pub related_zone: String,
    pub created_at: DateTime<Utc>,
}

impl InsightRecord {
    /// Creates a record stamped with the current time.
    pub fn new(text: String, related_zone: &str) -> Self {
        Self::at(Utc::now(), text, related_zone)
    }

    /// Creates a record with an explicit creation time. The id is derived from
    /// it so that lexicographic id order is creation order.
    pub fn at(created_at: DateTime<Utc>, text: String, related_zone: &str) -> Self {
        Self {
            id: created_at.format("%Y%m%dT%H%M%S%.9fZ").to_string(),
            text,
            related_zone: related_zone.to_string(),
            created_at,
        }
    }
}

/// Append-only history of insight records.
#[async_trait::async_trait]
pub trait InsightStore: Send + Sync {
    /// Returns at most `limit` records, newest first.
    async fn recent(&self, limit: usize) -> Result<Vec<InsightRecord>, DataSourceError>;

    /// Appends a new record.
    async fn append(&self, record: &InsightRecord) -> Result<(), DataSourceError>;
}
