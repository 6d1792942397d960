//! Reads recent insight records back as trend context.
//!
//! Records are decoded along one of two paths: structured JSON payloads, or
//! legacy records whose text predates structured storage and is plain prose.

use crate::error::DataSourceError;
use crate::insights::types::HistoricalInsight;
use crate::services::{InsightRecord, InsightStore};
use crate::insights::extract::string_items;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Number of previous records consulted per run.
pub const DEFAULT_HISTORY_DEPTH: usize = 3;

fn string_list(payload: &Map<String, Value>, key: &str) -> Vec<String> {
    payload
        .get(key)
        .and_then(Value::as_array)
        .map(|items| string_items(items))
        .unwrap_or_default()
}

/// Decodes a record whose text is a JSON payload object. Returns `None` if the
/// text is not such an object.
///
/// Fields are read leniently: missing or non-array lists are empty, non-string
/// items are kept as compact JSON, and `success` is false unless stored as `true`.
pub fn decode_structured(record: &InsightRecord) -> Option<HistoricalInsight> {
    let value: Value = serde_json::from_str(&record.text).ok()?;
    let payload = value.as_object()?;
    Some(HistoricalInsight {
        timestamp: record.created_at,
        insights: string_list(payload, "insights"),
        alerts: string_list(payload, "alerts"),
        success: payload
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    })
}

/// Treats the whole record text as a single insight.
pub fn decode_legacy(record: &InsightRecord) -> HistoricalInsight {
    HistoricalInsight {
        timestamp: record.created_at,
        insights: vec![record.text.clone()],
        alerts: Vec::new(),
        success: true,
    }
}

pub fn decode_record(record: &InsightRecord) -> HistoricalInsight {
    decode_structured(record).unwrap_or_else(|| {
        debug!(id = %record.id, "Record is not a structured payload, decoding as legacy text");
        decode_legacy(record)
    })
}

/// Loads and decodes the `limit` most recent records, newest first.
///
/// History only enriches the prompt, so a failing store yields an empty list.
#[tracing::instrument(skip(store))]
pub async fn load_recent(store: &dyn InsightStore, limit: usize) -> Vec<HistoricalInsight> {
    match store.recent(limit).await {
        Ok(records) => records.iter().map(decode_record).collect(),
        Err(e) => {
            warn!(error = %e, "Failed to load previous insights, continuing without history");
            Vec::new()
        }
    }
}

/// Returns the most recent records exactly as stored, newest first.
pub async fn latest(
    store: &dyn InsightStore,
    limit: usize,
) -> Result<Vec<InsightRecord>, DataSourceError> {
    store.recent(limit).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::storage::MemoryInsightStore;

    struct BrokenStore;

    #[async_trait::async_trait]
    impl InsightStore for BrokenStore {
        async fn recent(&self, _limit: usize) -> Result<Vec<InsightRecord>, DataSourceError> {
            Err(DataSourceError::S3("AccessDenied".to_string()))
        }

        async fn append(&self, _record: &InsightRecord) -> Result<(), DataSourceError> {
            Err(DataSourceError::S3("AccessDenied".to_string()))
        }
    }

    fn record(text: &str) -> InsightRecord {
        InsightRecord::new(text.to_string(), "All Wards")
    }

    #[test]
    fn test_structured_record() {
        let rec = record(r#"{"success": true, "insights": ["a", "b"], "alerts": ["c"], "rawData": {}}"#);
        let decoded = decode_structured(&rec).unwrap();
        assert_eq!(decoded.insights, vec!["a", "b"]);
        assert_eq!(decoded.alerts, vec!["c"]);
        assert!(decoded.success);
        assert_eq!(decoded.timestamp, rec.created_at);
    }

    #[test]
    fn test_structured_defaults() {
        let decoded = decode_structured(&record("{}")).unwrap();
        assert!(decoded.insights.is_empty());
        assert!(decoded.alerts.is_empty());
        assert!(!decoded.success);
    }

    #[test]
    fn test_structured_non_string_items_stay_structured() {
        let decoded = decode_record(&record(
            r#"{"success": false, "insights": [{"title": "x"}, 7], "alerts": ["late"]}"#,
        ));
        assert_eq!(decoded.insights, vec![r#"{"title":"x"}"#, "7"]);
        assert_eq!(decoded.alerts, vec!["late"]);
        assert!(!decoded.success);
    }

    #[test]
    fn test_structured_null_fields() {
        let decoded =
            decode_record(&record(r#"{"success": null, "insights": null, "alerts": null}"#));
        assert!(decoded.insights.is_empty());
        assert!(decoded.alerts.is_empty());
        assert!(!decoded.success);
    }

    #[test]
    fn test_prose_is_not_structured() {
        assert!(decode_structured(&record("Empty bins in Ikeja before Friday.")).is_none());
        assert!(decode_structured(&record("42")).is_none());
    }

    #[test]
    fn test_legacy_prose_decodes_to_single_insight() {
        let text = "Collection in Surulere should move to mornings.";
        let decoded = decode_record(&record(text));
        assert_eq!(decoded.insights, vec![text]);
        assert!(decoded.alerts.is_empty());
        assert!(decoded.success);
    }

    #[test]
    fn test_legacy_decode_of_truncated_json() {
        let decoded = decode_record(&record(r#"{"insights": ["cut off"#));
        assert_eq!(decoded.insights.len(), 1);
        assert!(decoded.success);
    }

    #[tokio::test]
    async fn test_load_recent_store_failure_is_empty() {
        assert!(load_recent(&BrokenStore, DEFAULT_HISTORY_DEPTH).await.is_empty());
    }

    #[tokio::test]
    async fn test_load_recent_mixes_paths_newest_first() {
        let old = InsightRecord::at(
            chrono::Utc::now() - chrono::Duration::hours(2),
            "Legacy advice".to_string(),
            "All Wards",
        );
        let new = InsightRecord::at(
            chrono::Utc::now() - chrono::Duration::hours(1),
            r#"{"success": false, "insights": ["x"], "alerts": []}"#.to_string(),
            "All Wards",
        );
        let store = MemoryInsightStore::with_records(vec![old, new]);

        let history = load_recent(&store, DEFAULT_HISTORY_DEPTH).await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].insights, vec!["x"]);
        assert!(!history[0].success);
        assert_eq!(history[1].insights, vec!["Legacy advice"]);
        assert!(history[1].success);
    }
}
