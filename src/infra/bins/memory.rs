use crate::bins::BinRecord;
use crate::error::DataSourceError;
use crate::services::BinSource;

/// A fixed, in-process fleet snapshot.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBinSource {
    bins: Vec<BinRecord>,
}

impl InMemoryBinSource {
    pub fn new(bins: Vec<BinRecord>) -> Self {
        Self { bins }
    }
}

#[async_trait::async_trait]
impl BinSource for InMemoryBinSource {
    async fn fetch_bins(&self) -> Result<Vec<BinRecord>, DataSourceError> {
        Ok(self.bins.clone())
    }
}
