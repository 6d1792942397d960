//! Prompt construction for the reasoning service.

use crate::analyzers::AggregatedSummary;
use crate::insights::types::HistoricalInsight;
use crate::services::ChatMessage;
use serde_json::json;

pub const SYSTEM_PROMPT: &str = "You are a waste management analyst with access to historical data. \
Analyze patterns and trends to provide predictive insights. \
Return ONLY valid JSON with no additional text.";

/// What each of the ten requested insights should cover, in order.
pub static INSIGHT_THEMES: [&str; 10] = [
    "Trend analysis comparing current vs previous patterns",
    "Ward performance evolution and changes",
    "Fill rate progression and predictive insights",
    "Resource optimization based on historical patterns",
    "Collection efficiency improvements identified",
    "Geographic hotspot pattern recognition",
    "Waste type distribution trends over time",
    "Operational efficiency changes observed",
    "Risk management patterns and predictions",
    "Strategic improvements based on historical data",
];

/// What each of the three requested alerts should cover, in order.
pub static ALERT_THEMES: [&str; 3] = [
    "Brief alert message with trend context and solutions",
    "Pattern-based warning with historical comparison",
    "Predictive alert based on observed trends",
];

static GUIDELINES: &[&str] = &[
    "Compare current metrics with previous insights",
    "Identify improving or deteriorating trends",
    "Look for recurring patterns in critical bins",
    "Analyze ward performance changes over time",
    "Provide predictive insights based on historical data",
    "Focus on actionable recommendations",
    "Highlight successful interventions from previous periods",
    "Keep every item short enough to read at a glance on a dashboard",
];

/// The exact JSON shape the model is asked to return.
pub fn target_shape() -> serde_json::Value {
    json!({
        "insights": INSIGHT_THEMES,
        "alerts": ALERT_THEMES,
    })
}

/// Builds the user prompt embedding the current summary and prior insights.
pub fn user_prompt(
    summary: &AggregatedSummary,
    history: &[HistoricalInsight],
) -> serde_json::Result<String> {
    let guidelines: String = GUIDELINES.iter().map(|g| format!("- {g}\n")).collect();

    Ok(format!(
        "Analyze this waste management data and return ONLY valid JSON. \
Use previous insights for pattern recognition and trend analysis.\n\n\
CURRENT DATA:\n{current}\n\n\
PREVIOUS INSIGHTS (for pattern recognition):\n{previous}\n\n\
Based on current data and previous patterns, return EXACTLY this JSON structure with no additional text:\n\n\
{shape}\n\n\
ANALYSIS GUIDELINES:\n{guidelines}\n\
IMPORTANT: Return ONLY the JSON object, no additional text or explanations.\n",
        current = serde_json::to_string_pretty(summary)?,
        previous = serde_json::to_string_pretty(history)?,
        shape = serde_json::to_string_pretty(&target_shape())?,
    ))
}

/// System and user messages for one insight request.
pub fn build_messages(
    summary: &AggregatedSummary,
    history: &[HistoricalInsight],
) -> serde_json::Result<Vec<ChatMessage>> {
    Ok(vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(user_prompt(summary, history)?),
    ])
}
