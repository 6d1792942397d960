use crate::analyzers::aggregate::{
    critical_bins, fill_histogram, overall_stats, waste_composition, zone_stats,
};
use crate::analyzers::types::AggregatedSummary;
use crate::bins::BinRecord;
use crate::error::DataSourceError;
use crate::services::BinSource;
use tracing::{debug, info};

/// Runs one read-only query against the source and reduces it with `compute`.
async fn query<T>(
    source: &dyn BinSource,
    name: &'static str,
    compute: fn(&[BinRecord]) -> T,
) -> Result<T, DataSourceError> {
    let bins = source.fetch_bins().await?;
    debug!(query = name, bins = bins.len(), "Aggregate query complete");
    Ok(compute(&bins))
}

/// Computes the fleet summary by running the five aggregate queries
/// concurrently and joining them.
///
/// # Errors
///
/// Returns the first [`DataSourceError`] raised by any query.
#[tracing::instrument(skip(source))]
pub async fn compute_summary(source: &dyn BinSource) -> Result<AggregatedSummary, DataSourceError> {
    let (overall, per_zone, critical, waste, histogram) = tokio::try_join!(
        query(source, "overall", overall_stats),
        query(source, "zones", zone_stats),
        query(source, "critical", critical_bins),
        query(source, "waste_types", waste_composition),
        query(source, "fill_distribution", fill_histogram),
    )?;

    info!(
        bins = overall.total,
        average_fill = overall.average_fill,
        wards = per_zone.len(),
        critical = critical.len(),
        "Fleet summary computed"
    );

    Ok(AggregatedSummary {
        overall,
        per_zone,
        critical_bins: critical,
        waste_composition: waste,
        fill_histogram: histogram,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bins::GeoPoint;
    use crate::infra::bins::InMemoryBinSource;

    struct Unavailable;

    #[async_trait::async_trait]
    impl BinSource for Unavailable {
        async fn fetch_bins(&self) -> Result<Vec<BinRecord>, DataSourceError> {
            Err(DataSourceError::Other(anyhow::anyhow!("connection refused")))
        }
    }

    fn bin(id: usize, ward: &str, fill: f64) -> BinRecord {
        BinRecord {
            bin_id: format!("LAG-{id:03}"),
            name: format!("Bin {id}"),
            ward: ward.to_string(),
            bin_fill_percent: fill,
            location: GeoPoint::default(),
            waste_breakdown: Vec::new(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_empty_fleet_is_valid() {
        let summary = compute_summary(&InMemoryBinSource::new(Vec::new()))
            .await
            .unwrap();

        assert_eq!(summary.overall.total, 0);
        assert_eq!(summary.overall.average_fill, 0);
        assert_eq!(summary.overall.max_fill, 0.0);
        assert!(summary.per_zone.is_empty());
        assert!(summary.critical_bins.is_empty());
        assert!(summary.waste_composition.is_empty());
        assert_eq!(summary.fill_histogram.len(), 6);
        assert!(summary.fill_histogram.iter().all(|b| b.count == 0));
    }

    #[tokio::test]
    async fn test_fifteen_bins_three_critical_two_wards() {
        let mut bins: Vec<BinRecord> = (0..12).map(|i| bin(i, "Ikeja", 20.0 + i as f64)).collect();
        bins.push(bin(12, "Ikeja", 88.0));
        bins.push(bin(13, "Yaba", 81.0));
        bins.push(bin(14, "Yaba", 97.0));

        let summary = compute_summary(&InMemoryBinSource::new(bins)).await.unwrap();

        assert_eq!(summary.overall.total, 15);
        assert_eq!(summary.critical_bins.len(), 3);
        assert_eq!(summary.per_zone.iter().map(|z| z.critical).sum::<u64>(), 3);
        assert_eq!(summary.per_zone.len(), 2);
        assert_eq!(summary.critical_bins[0].id, "LAG-014");
    }

    #[tokio::test]
    async fn test_source_failure_propagates() {
        let result = compute_summary(&Unavailable).await;
        assert!(matches!(result, Err(DataSourceError::Other(_))));
    }
}
