//! Insight payloads and their decoded history form.

use crate::analyzers::AggregatedSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The result of one pipeline run, successful or synthesized as a fallback.
/// Serialized as-is into an [`crate::services::InsightRecord`]'s text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightPayload {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub data_analyzed: u64,
    pub insights: Vec<String>,
    pub alerts: Vec<String>,
    pub raw_data: AggregatedSummary,
    pub previous_insights: usize,
}

/// Minimal payload written when the primary write fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemErrorPayload {
    pub success: bool,
    pub error: String,
    pub timestamp: DateTime<Utc>,
    pub insights: Vec<String>,
    pub alerts: Vec<String>,
}

impl SystemErrorPayload {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            success: false,
            error: "System error during insights generation".to_string(),
            timestamp,
            insights: vec![
                "System monitoring active".to_string(),
                "Manual review recommended".to_string(),
            ],
            alerts: vec!["AI insights generation failed - check system logs".to_string()],
        }
    }
}

/// A previous run's insights, decoded for use as prompt context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalInsight {
    pub timestamp: DateTime<Utc>,
    pub insights: Vec<String>,
    pub alerts: Vec<String>,
    pub success: bool,
}
