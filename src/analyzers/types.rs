//! Data types produced by the aggregation pipeline.
//!
//! Serialized field names are the ones the dashboard reads, so they differ
//! from the Rust names in a few places.

use crate::bins::GeoPoint;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fleet-wide statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverallStats {
    pub total: u64,
    pub average_fill: i64,
    pub max_fill: f64,
    pub min_fill: f64,
    pub total_weight: i64,
}

/// Statistics for a single ward.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ZoneStats {
    pub name: String,
    pub bins: u64,
    pub avg_fill: i64,
    pub critical: u64,
    pub warning: u64,
    pub weight: i64,
}

/// A bin at or above the critical fill threshold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CriticalBin {
    pub id: String,
    pub name: String,
    pub ward: String,
    pub fill: f64,
    pub location: GeoPoint,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Totals for one waste category across all bins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WasteTypeStats {
    #[serde(rename = "type")]
    pub waste_type: String,
    pub count: u64,
    pub weight: i64,
    pub avg_weight: i64,
}

/// One bucket of the fill histogram.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillBucket {
    pub range: String,
    pub count: u64,
    pub bins: Vec<String>,
}

/// Everything the insight requester and fallback synthesizer know about the
/// fleet for one run. Recomputed on every run and only persisted inside an
/// insight payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AggregatedSummary {
    #[serde(rename = "summary")]
    pub overall: OverallStats,
    #[serde(rename = "wards")]
    pub per_zone: Vec<ZoneStats>,
    pub critical_bins: Vec<CriticalBin>,
    #[serde(rename = "wasteTypes")]
    pub waste_composition: Vec<WasteTypeStats>,
    #[serde(rename = "fillDistribution")]
    pub fill_histogram: Vec<FillBucket>,
}
