//! Bin records as stored by the bin data service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fill percentage at or above which a bin needs collection.
pub const CRITICAL_FILL: f64 = 80.0;
/// Lower edge of the warning band; the band ends at [`CRITICAL_FILL`].
pub const WARNING_FILL: f64 = 60.0;

/// Geographic position of a bin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// One entry of a bin's waste composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteEntry {
    pub waste_type: String,
    pub weight: f64,
}

/// A single monitored bin.
///
/// `bin_fill_percent` is nominally within 0–100 but is not re-validated here;
/// out-of-range values flow into the aggregates as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinRecord {
    pub bin_id: String,
    pub name: String,
    pub ward: String,
    pub bin_fill_percent: f64,
    #[serde(default)]
    pub location: GeoPoint,
    #[serde(default)]
    pub waste_breakdown: Vec<WasteEntry>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl BinRecord {
    /// Sum of all waste entry weights.
    pub fn total_weight(&self) -> f64 {
        self.waste_breakdown.iter().map(|w| w.weight).sum()
    }

    pub fn is_critical(&self) -> bool {
        self.bin_fill_percent >= CRITICAL_FILL
    }

    pub fn is_warning(&self) -> bool {
        self.bin_fill_percent >= WARNING_FILL && self.bin_fill_percent < CRITICAL_FILL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bin(fill: f64) -> BinRecord {
        BinRecord {
            bin_id: "b1".to_string(),
            name: "Market Road".to_string(),
            ward: "Ikeja".to_string(),
            bin_fill_percent: fill,
            location: GeoPoint::default(),
            waste_breakdown: vec![
                WasteEntry {
                    waste_type: "plastic".to_string(),
                    weight: 2.5,
                },
                WasteEntry {
                    waste_type: "organic".to_string(),
                    weight: 4.0,
                },
            ],
            updated_at: None,
        }
    }

    #[test]
    fn test_total_weight() {
        assert_eq!(bin(10.0).total_weight(), 6.5);
    }

    #[test]
    fn test_thresholds() {
        assert!(bin(80.0).is_critical());
        assert!(!bin(79.9).is_critical());
        assert!(bin(60.0).is_warning());
        assert!(bin(79.9).is_warning());
        assert!(!bin(80.0).is_warning());
        assert!(!bin(59.9).is_warning());
    }

    #[test]
    fn test_deserialize_document_shape() {
        let json = r#"{
            "bin_id": "LAG-001",
            "name": "Allen Avenue",
            "ward": "Ikeja",
            "bin_fill_percent": 91,
            "location": {"lat": 6.6018, "lng": 3.3515},
            "waste_breakdown": [{"waste_type": "plastic", "weight": 12.4}],
            "updatedAt": "2025-06-01T10:00:00Z"
        }"#;
        let record: BinRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.bin_id, "LAG-001");
        assert_eq!(record.bin_fill_percent, 91.0);
        assert_eq!(record.waste_breakdown.len(), 1);
        assert!(record.updated_at.is_some());
    }

    #[test]
    fn test_deserialize_without_optional_fields() {
        let json = r#"{"bin_id": "x", "name": "n", "ward": "w", "bin_fill_percent": 5}"#;
        let record: BinRecord = serde_json::from_str(json).unwrap();
        assert!(record.waste_breakdown.is_empty());
        assert_eq!(record.updated_at, None);
    }
}
