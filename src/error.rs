//! Error taxonomy for the insight pipeline.
//!
//! Only [`PersistenceError`] ever escapes [`crate::pipeline::InsightPipeline::run_and_persist`];
//! the other two are absorbed inside the run.

use std::time::Duration;
use thiserror::Error;

/// A read or write against the bin source or the insight history store failed.
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("S3 request failed: {0}")]
    S3(String),
    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DataSourceError {
    pub(crate) fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// The reasoning service could not produce a usable insight object.
///
/// The messages of the validation variants are stored verbatim in the
/// fallback payload's `error` field.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("AI API request failed: {0}")]
    Transport(String),
    #[error("AI API returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("AI API call timed out after {0:?}")]
    Timeout(Duration),
    #[error("failed to build AI prompt: {0}")]
    Prompt(#[from] serde_json::Error),
    #[error("AI API returned invalid response structure")]
    NoChoices,
    #[error("AI API returned empty response")]
    EmptyResponse,
    #[error("Invalid JSON response from AI: no JSON object found")]
    NoJsonObject,
    #[error("Invalid JSON response from AI: {0}")]
    MalformedJson(String),
    #[error("Invalid response format - missing insights array")]
    MissingInsights,
    #[error("Invalid response format - missing alerts array")]
    MissingAlerts,
}

/// Both the primary write and the system-error write failed.
#[derive(Debug, Error)]
#[error("failed to persist insights ({primary}); system-error record also failed ({fallback})")]
pub struct PersistenceError {
    pub primary: DataSourceError,
    pub fallback: DataSourceError,
}
