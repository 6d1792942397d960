//! Fleet data aggregation.
//!
//! This module queries the bin source, computes overall, per-ward,
//! critical-bin, waste-composition and fill-distribution statistics, and
//! combines them into one [`types::AggregatedSummary`].

pub mod aggregate;
pub mod analyzer;
pub mod types;
pub mod utility;

pub use analyzer::compute_summary;
pub use types::AggregatedSummary;
