use crate::bins::BinRecord;
use crate::error::DataSourceError;
use crate::services::BinSource;
use std::path::PathBuf;

/// Reads the fleet from a JSON file holding an array of bin documents.
///
/// The file is re-read on every query so each run sees the latest export.
pub struct JsonFileBinSource {
    path: PathBuf,
}

impl JsonFileBinSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl BinSource for JsonFileBinSource {
    async fn fetch_bins(&self) -> Result<Vec<BinRecord>, DataSourceError> {
        let content = tokio::fs::read(&self.path)
            .await
            .map_err(|e| DataSourceError::io(self.path.display().to_string(), e))?;
        Ok(serde_json::from_slice(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    #[tokio::test]
    async fn test_reads_bin_array() {
        let path = temp_path("binpulse_test_bins.json");
        fs::write(
            &path,
            r#"[{"bin_id": "a", "name": "A", "ward": "Ikeja", "bin_fill_percent": 42}]"#,
        )
        .unwrap();

        let bins = JsonFileBinSource::new(&path).fetch_bins().await.unwrap();
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].ward, "Ikeja");

        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let source = JsonFileBinSource::new(temp_path("binpulse_test_no_such_file.json"));
        let result = source.fetch_bins().await;
        assert!(matches!(result, Err(DataSourceError::Io { .. })));
    }

    #[tokio::test]
    async fn test_malformed_file_is_json_error() {
        let path = temp_path("binpulse_test_bad_bins.json");
        fs::write(&path, "not json").unwrap();

        let result = JsonFileBinSource::new(&path).fetch_bins().await;
        assert!(matches!(result, Err(DataSourceError::Json(_))));

        fs::remove_file(&path).unwrap();
    }
}
