//! Process configuration read from environment variables (after `.env`).

use anyhow::{Context, Result, anyhow};
use std::str::FromStr;
use std::time::Duration;

use crate::infra::openrouter::DEFAULT_BASE_URL;
use crate::insights::fallback::DEFAULT_REGION;
use crate::insights::history::DEFAULT_HISTORY_DEPTH;
use crate::insights::requester::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use crate::insights::RequestSettings;

/// Where the fleet is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinSourceConfig {
    File(String),
    Http { url: String, token: Option<String> },
}

/// Where insight records are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Csv(String),
    S3 { bucket: String, prefix: String },
}

impl StoreConfig {
    /// Parses `s3://bucket/prefix` or a file path.
    pub fn parse(value: &str) -> Result<Self> {
        match value.strip_prefix("s3://") {
            Some(rest) => {
                let (bucket, prefix) = rest.split_once('/').unwrap_or((rest, ""));
                if bucket.is_empty() {
                    return Err(anyhow!("INSIGHT_STORE '{value}' has no bucket name"));
                }
                let prefix = if prefix.trim_matches('/').is_empty() {
                    "insights"
                } else {
                    prefix
                };
                Ok(Self::S3 {
                    bucket: bucket.to_string(),
                    prefix: prefix.to_string(),
                })
            }
            None => Ok(Self::Csv(value.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub ai_api_key: Option<String>,
    pub ai_base_url: String,
    pub request: RequestSettings,
    pub bins: BinSourceConfig,
    pub store: StoreConfig,
    pub history_depth: usize,
    pub store_timeout: Duration,
    pub region: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bins_source = get("BINS_SOURCE").unwrap_or_else(|| "data/bins.json".to_string());
        let bins = if bins_source.starts_with("http://") || bins_source.starts_with("https://") {
            BinSourceConfig::Http {
                url: bins_source,
                token: get("BINS_API_TOKEN"),
            }
        } else {
            BinSourceConfig::File(bins_source)
        };

        let store = StoreConfig::parse(
            &get("INSIGHT_STORE").unwrap_or_else(|| "data/insights.csv".to_string()),
        )?;

        let request = RequestSettings {
            model: get("AI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: parse_or(&get, "AI_TEMPERATURE", DEFAULT_TEMPERATURE)?,
            max_tokens: parse_or(&get, "AI_MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
            timeout: Duration::from_secs(parse_or(&get, "AI_TIMEOUT_SECS", 30u64)?),
        };

        Ok(Self {
            ai_api_key: get("AI_API_KEY"),
            ai_base_url: get("AI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            request,
            bins,
            store,
            history_depth: parse_or(&get, "INSIGHT_HISTORY_DEPTH", DEFAULT_HISTORY_DEPTH)?,
            store_timeout: Duration::from_secs(parse_or(&get, "STORE_TIMEOUT_SECS", 30u64)?),
            region: get("FLEET_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
        })
    }

    /// The reasoning service key, required by commands that call the model.
    pub fn require_api_key(&self) -> Result<&str> {
        self.ai_api_key
            .as_deref()
            .ok_or_else(|| anyhow!("AI_API_KEY must be set"))
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {key}: '{raw}'")),
        None => Ok(default),
    }
}
