use crate::bins::BinRecord;
use crate::error::DataSourceError;
use crate::fetch::{HttpClient, fetch_bytes};
use crate::services::BinSource;
use tracing::debug;

/// Fetches the fleet from the bins REST endpoint, which returns a JSON array
/// of bin documents.
pub struct HttpBinSource {
    client: Box<dyn HttpClient>,
    url: String,
}

impl HttpBinSource {
    pub fn new(client: Box<dyn HttpClient>, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait::async_trait]
impl BinSource for HttpBinSource {
    async fn fetch_bins(&self) -> Result<Vec<BinRecord>, DataSourceError> {
        let bytes = fetch_bytes(self.client.as_ref(), &self.url).await?;
        debug!(url = %self.url, bytes = bytes.len(), "Bin list received");
        Ok(serde_json::from_slice(&bytes)?)
    }
}
