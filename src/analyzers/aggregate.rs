use crate::analyzers::types::{
    CriticalBin, FillBucket, OverallStats, WasteTypeStats, ZoneStats,
};
use crate::analyzers::utility::{mean, round_half_up};
use crate::bins::BinRecord;
use std::collections::HashMap;

/// Maximum number of entries in the critical-bin list.
pub const CRITICAL_LIST_LIMIT: usize = 10;

/// Fill histogram buckets as `(label, lower, upper)` half-open ranges.
/// Values outside every range land in [`OVERFLOW_BUCKET`].
static FILL_BUCKETS: &[(&str, f64, f64)] = &[
    ("0%", 0.0, 25.0),
    ("25%", 25.0, 50.0),
    ("50%", 50.0, 75.0),
    ("75%", 75.0, 80.0),
    ("80%", 80.0, 100.0),
];

/// Label of the catch-all bucket for fills at or above 100, below 0, or NaN.
pub const OVERFLOW_BUCKET: &str = "100+";

/// Fleet-wide count, mean, extremes and total weight.
pub fn overall_stats(bins: &[BinRecord]) -> OverallStats {
    if bins.is_empty() {
        return OverallStats::default();
    }

    let fills: Vec<f64> = bins.iter().map(|b| b.bin_fill_percent).collect();
    let max_fill = fills.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min_fill = fills.iter().copied().fold(f64::INFINITY, f64::min);
    let total_weight: f64 = bins.iter().map(BinRecord::total_weight).sum();

    OverallStats {
        total: bins.len() as u64,
        average_fill: round_half_up(mean(&fills)),
        max_fill,
        min_fill,
        total_weight: round_half_up(total_weight),
    }
}

/// Per-ward statistics, sorted by mean fill descending.
///
/// Wards appear in first-seen order before sorting and the sort is stable,
/// so wards with equal means keep that order.
pub fn zone_stats(bins: &[BinRecord]) -> Vec<ZoneStats> {
    struct Acc {
        name: String,
        fills: Vec<f64>,
        critical: u64,
        warning: u64,
        weight: f64,
    }

    let mut order: Vec<Acc> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for bin in bins {
        let slot = *index.entry(bin.ward.as_str()).or_insert_with(|| {
            order.push(Acc {
                name: bin.ward.clone(),
                fills: Vec::new(),
                critical: 0,
                warning: 0,
                weight: 0.0,
            });
            order.len() - 1
        });

        let acc = &mut order[slot];
        acc.fills.push(bin.bin_fill_percent);
        acc.weight += bin.total_weight();
        if bin.is_critical() {
            acc.critical += 1;
        }
        if bin.is_warning() {
            acc.warning += 1;
        }
    }

    let mut ranked: Vec<(f64, ZoneStats)> = order
        .into_iter()
        .map(|acc| {
            let avg = mean(&acc.fills);
            (
                avg,
                ZoneStats {
                    name: acc.name,
                    bins: acc.fills.len() as u64,
                    avg_fill: round_half_up(avg),
                    critical: acc.critical,
                    warning: acc.warning,
                    weight: round_half_up(acc.weight),
                },
            )
        })
        .collect();

    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
    ranked.into_iter().map(|(_, zone)| zone).collect()
}

/// The fullest critical bins, at most [`CRITICAL_LIST_LIMIT`], fill descending.
pub fn critical_bins(bins: &[BinRecord]) -> Vec<CriticalBin> {
    let mut critical: Vec<&BinRecord> = bins.iter().filter(|b| b.is_critical()).collect();
    critical.sort_by(|a, b| b.bin_fill_percent.total_cmp(&a.bin_fill_percent));

    critical
        .into_iter()
        .take(CRITICAL_LIST_LIMIT)
        .map(|b| CriticalBin {
            id: b.bin_id.clone(),
            name: b.name.clone(),
            ward: b.ward.clone(),
            fill: b.bin_fill_percent,
            location: b.location,
            last_updated: b.updated_at,
        })
        .collect()
}

/// Per waste category entry count, total and mean weight; most frequent first.
pub fn waste_composition(bins: &[BinRecord]) -> Vec<WasteTypeStats> {
    let mut order: Vec<(String, Vec<f64>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for entry in bins.iter().flat_map(|b| b.waste_breakdown.iter()) {
        let slot = *index.entry(entry.waste_type.as_str()).or_insert_with(|| {
            order.push((entry.waste_type.clone(), Vec::new()));
            order.len() - 1
        });
        order[slot].1.push(entry.weight);
    }

    let mut stats: Vec<WasteTypeStats> = order
        .into_iter()
        .map(|(waste_type, weights)| WasteTypeStats {
            waste_type,
            count: weights.len() as u64,
            weight: round_half_up(weights.iter().sum()),
            avg_weight: round_half_up(mean(&weights)),
        })
        .collect();

    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}

/// Buckets every bin by fill. All buckets are always present, in order,
/// with the overflow bucket last.
pub fn fill_histogram(bins: &[BinRecord]) -> Vec<FillBucket> {
    let mut buckets: Vec<FillBucket> = FILL_BUCKETS
        .iter()
        .map(|(label, _, _)| label)
        .chain(std::iter::once(&OVERFLOW_BUCKET))
        .map(|label| FillBucket {
            range: label.to_string(),
            count: 0,
            bins: Vec::new(),
        })
        .collect();

    for bin in bins {
        let fill = bin.bin_fill_percent;
        let slot = FILL_BUCKETS
            .iter()
            .position(|(_, lower, upper)| fill >= *lower && fill < *upper)
            .unwrap_or(FILL_BUCKETS.len());

        buckets[slot].count += 1;
        buckets[slot].bins.push(bin.bin_id.clone());
    }

    buckets
}
