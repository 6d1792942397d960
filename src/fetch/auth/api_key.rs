use crate::fetch::client::HttpClient;
use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue, InvalidHeaderValue, AUTHORIZATION};

/// An [`HttpClient`] wrapper that injects an API key as an HTTP header.
///
/// Used for the reasoning service key and the optional bins API token.
pub struct ApiKey<C> {
    pub inner: C,
    header_name: HeaderName,
    value: HeaderValue,
}

impl<C> ApiKey<C> {
    /// Sends `Authorization: Bearer <key>` with every request.
    ///
    /// # Errors
    ///
    /// Fails if the key contains characters that are not valid in a header.
    pub fn bearer(inner: C, key: &str) -> Result<Self, InvalidHeaderValue> {
        let mut value = HeaderValue::from_str(&format!("Bearer {key}"))?;
        value.set_sensitive(true);
        Ok(Self {
            inner,
            header_name: AUTHORIZATION,
            value,
        })
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for ApiKey<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.headers_mut()
            .insert(self.header_name.clone(), self.value.clone());
        self.inner.execute(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::BasicClient;

    #[test]
    fn test_bearer_rejects_control_characters() {
        assert!(ApiKey::bearer(BasicClient::new(), "abc\ndef").is_err());
        assert!(ApiKey::bearer(BasicClient::new(), "sk-or-v1-abc").is_ok());
    }
}
