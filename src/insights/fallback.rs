//! Deterministic insights used when the reasoning service cannot deliver.
//!
//! Templates are plain strings with `{placeholder}` slots filled from the
//! fleet summary, so the wording can change without touching the renderer.

use crate::analyzers::AggregatedSummary;
use crate::insights::types::InsightPayload;
use chrono::Utc;
use std::fmt::Display;

pub const DEFAULT_REGION: &str = "Lagos State";

static INSIGHT_TEMPLATES: [&str; 10] = [
    "Total of {total_bins} bins monitored across {region}",
    "System average fill level is {average_fill}%",
    "{critical_bins} bins currently at critical capacity (>80%)",
    "{zones} wards actively participating in smart waste monitoring",
    "AI analysis temporarily unavailable - using fallback insights",
    "Manual review recommended for critical bins requiring immediate attention",
    "Ward performance monitoring continues with real-time data collection",
    "Collection route optimization needed based on current fill levels",
    "Real-time IoT monitoring system operational and collecting data",
    "Recommend immediate attention to bins exceeding 80% capacity",
];

static ALERT_TEMPLATES: [&str; 3] = [
    "URGENT: {critical_bins} bins require immediate collection",
    "AI system temporarily unavailable - manual monitoring in effect",
    "Continue surveillance - system data collection remains operational",
];

/// Renders fallback payloads from the summary.
#[derive(Debug, Clone)]
pub struct FallbackSynthesizer {
    region: String,
}

impl Default for FallbackSynthesizer {
    fn default() -> Self {
        Self::new(DEFAULT_REGION)
    }
}

impl FallbackSynthesizer {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
        }
    }

    fn slots(&self, summary: &AggregatedSummary) -> [(&'static str, String); 5] {
        [
            ("{total_bins}", summary.overall.total.to_string()),
            ("{average_fill}", summary.overall.average_fill.to_string()),
            ("{critical_bins}", summary.critical_bins.len().to_string()),
            ("{zones}", summary.per_zone.len().to_string()),
            ("{region}", self.region.clone()),
        ]
    }

    fn render(templates: &[&str], slots: &[(&str, String)]) -> Vec<String> {
        templates
            .iter()
            .map(|template| {
                slots
                    .iter()
                    .fold(template.to_string(), |text, (slot, value)| text.replace(slot, value))
            })
            .collect()
    }

    /// Builds an unsuccessful payload describing the fleet, recording `cause`
    /// as the error. Pass [`AggregatedSummary::default`] when no summary is
    /// available.
    pub fn synthesize(&self, summary: &AggregatedSummary, cause: &dyn Display) -> InsightPayload {
        let slots = self.slots(summary);

        InsightPayload {
            success: false,
            error: Some(cause.to_string()),
            timestamp: Utc::now(),
            data_analyzed: summary.overall.total,
            insights: Self::render(&INSIGHT_TEMPLATES, &slots),
            alerts: Self::render(&ALERT_TEMPLATES, &slots),
            raw_data: summary.clone(),
            previous_insights: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::{CriticalBin, OverallStats, ZoneStats};
    use crate::error::GenerationError;

    fn zone(name: &str, critical: u64) -> ZoneStats {
        ZoneStats {
            name: name.to_string(),
            critical,
            ..Default::default()
        }
    }

    fn critical(i: usize) -> CriticalBin {
        CriticalBin {
            id: format!("LAG-{i:03}"),
            fill: 90.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_critical_count_follows_listed_bins() {
        // 12 critical bins in the ward, but only the listed top 10 are reported.
        let summary = AggregatedSummary {
            per_zone: vec![zone("Ikeja", 12)],
            critical_bins: (0..10).map(critical).collect(),
            ..Default::default()
        };
        let payload = FallbackSynthesizer::default().synthesize(&summary, &"offline");

        assert_eq!(payload.insights[2], "10 bins currently at critical capacity (>80%)");
        assert_eq!(payload.alerts[0], "URGENT: 10 bins require immediate collection");
    }

    #[test]
    fn test_zeroed_summary() {
        let payload = FallbackSynthesizer::default()
            .synthesize(&AggregatedSummary::default(), &GenerationError::EmptyResponse);

        assert!(!payload.success);
        assert_eq!(payload.error.as_deref(), Some("AI API returned empty response"));
        assert_eq!(payload.insights.len(), 10);
        assert_eq!(payload.alerts.len(), 3);
        assert!(payload.insights[0].contains("Total of 0 bins"));
        assert!(payload.insights[3].contains("0 wards"));
        assert_eq!(payload.previous_insights, 0);
    }

    #[test]
    fn test_live_values_substituted() {
        let summary = AggregatedSummary {
            overall: OverallStats {
                total: 42,
                average_fill: 63,
                ..Default::default()
            },
            per_zone: vec![zone("Ikeja", 4), zone("Yaba", 1), zone("Apapa", 0)],
            critical_bins: (0..5).map(critical).collect(),
            ..Default::default()
        };
        let payload = FallbackSynthesizer::new("Abuja")
            .synthesize(&summary, &"service unreachable");

        assert_eq!(payload.insights[0], "Total of 42 bins monitored across Abuja");
        assert_eq!(payload.insights[1], "System average fill level is 63%");
        assert_eq!(payload.insights[2], "5 bins currently at critical capacity (>80%)");
        assert_eq!(payload.insights[3], "3 wards actively participating in smart waste monitoring");
        assert_eq!(payload.alerts[0], "URGENT: 5 bins require immediate collection");
        assert_eq!(payload.data_analyzed, 42);
        assert_eq!(payload.raw_data, summary);
    }

    #[test]
    fn test_no_placeholders_left() {
        let payload = FallbackSynthesizer::default()
            .synthesize(&AggregatedSummary::default(), &"x");
        assert!(
            payload
                .insights
                .iter()
                .chain(payload.alerts.iter())
                .all(|line| !line.contains('{'))
        );
    }
}
