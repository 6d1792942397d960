//! Append-only CSV file holding the insight history.

use crate::error::DataSourceError;
use crate::services::{InsightRecord, InsightStore};
use csv::WriterBuilder;
use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use tracing::debug;

pub struct CsvInsightStore {
    path: PathBuf,
}

impl CsvInsightStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    fn read_all(&self) -> Result<Vec<InsightRecord>, DataSourceError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path).map_err(|e| DataSourceError::io(self.display_path(), e))?;
        let mut rdr = csv::Reader::from_reader(file);

        let mut records = Vec::new();
        for result in rdr.deserialize() {
            let record: InsightRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Appends one row, creating the file with headers if needed.
    fn append_row(&self, record: &InsightRecord) -> Result<(), DataSourceError> {
        let file_exists = self.path.exists();
        debug!(path = %self.display_path(), file_exists, "Appending insight record");

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| DataSourceError::io(parent.display().to_string(), e))?;
        }

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| DataSourceError::io(self.display_path(), e))?;

        let mut writer = WriterBuilder::new()
            .has_headers(!file_exists)
            .from_writer(file);

        writer.serialize(record)?;
        writer
            .flush()
            .map_err(|e| DataSourceError::io(self.display_path(), e))?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl InsightStore for CsvInsightStore {
    async fn recent(&self, limit: usize) -> Result<Vec<InsightRecord>, DataSourceError> {
        let mut records = self.read_all()?;
        // Later rows win ties on equal timestamps.
        records.reverse();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit);
        Ok(records)
    }

    async fn append(&self, record: &InsightRecord) -> Result<(), DataSourceError> {
        self.append_row(record)
    }
}
