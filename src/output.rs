//! Output formatting for CLI commands.
//!
//! JSON goes to stdout so it can be piped; everything else is logged.

use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use tracing::{debug, info, warn};

use crate::insights::InsightPayload;

/// Writes a value as pretty-printed JSON followed by a newline.
pub fn write_json(mut out: impl Write, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Writes a value as pretty-printed JSON to stdout.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    write_json(std::io::stdout().lock(), value)
}

/// Logs a payload's insights and alerts line by line.
pub fn log_payload(payload: &InsightPayload) {
    if payload.success {
        info!(bins = payload.data_analyzed, history = payload.previous_insights, "AI insights");
    } else {
        warn!(
            bins = payload.data_analyzed,
            error = payload.error.as_deref().unwrap_or("unknown"),
            "Fallback insights"
        );
    }

    for (i, insight) in payload.insights.iter().enumerate() {
        info!(n = i + 1, "{insight}");
    }
    for alert in &payload.alerts {
        warn!("{alert}");
    }
    debug!("{:#?}", payload.raw_data);
}
