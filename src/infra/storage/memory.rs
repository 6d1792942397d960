use crate::error::DataSourceError;
use crate::services::{InsightRecord, InsightStore};
use std::sync::Mutex;

/// Insight history held in process memory, in append order.
#[derive(Debug, Default)]
pub struct MemoryInsightStore {
    records: Mutex<Vec<InsightRecord>>,
}

impl MemoryInsightStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with existing records, oldest first.
    pub fn with_records(records: Vec<InsightRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    /// All records in append order.
    pub fn snapshot(&self) -> Vec<InsightRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl InsightStore for MemoryInsightStore {
    async fn recent(&self, limit: usize) -> Result<Vec<InsightRecord>, DataSourceError> {
        let records = self
            .records
            .lock()
            .map_err(|_| anyhow::anyhow!("insight store lock poisoned"))?;

        let mut newest: Vec<InsightRecord> = records.iter().rev().cloned().collect();
        newest.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        newest.truncate(limit);
        Ok(newest)
    }

    async fn append(&self, record: &InsightRecord) -> Result<(), DataSourceError> {
        self.records
            .lock()
            .map_err(|_| anyhow::anyhow!("insight store lock poisoned"))?
            .push(record.clone());
        Ok(())
    }
}
