use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use std::time::Duration;
use tracing::debug;

use crate::error::GenerationError;
use crate::fetch::auth::ApiKey;
use crate::fetch::{BasicClient, HttpClient};
use crate::services::reasoning::{ChatRequest, ChatResponse, ReasoningService};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Client for an OpenAI-compatible `/chat/completions` endpoint
/// (OpenRouter by default).
pub struct ChatCompletionsClient<C = ApiKey<BasicClient>> {
    http: C,
    endpoint: String,
}

impl ChatCompletionsClient {
    /// Creates a bearer-authenticated client. `timeout` bounds each HTTP request.
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = ApiKey::bearer(BasicClient::with_timeout(timeout)?, api_key)?;
        Ok(Self::with_client(http, base_url))
    }
}

impl<C: HttpClient> ChatCompletionsClient<C> {
    pub fn with_client(http: C, base_url: &str) -> Self {
        Self {
            http,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl<C: HttpClient> ReasoningService for ChatCompletionsClient<C> {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, GenerationError> {
        let url = self
            .endpoint
            .parse::<reqwest::Url>()
            .map_err(|e| GenerationError::Transport(format!("invalid endpoint '{}': {e}", self.endpoint)))?;
        let body = serde_json::to_vec(request)?;

        let mut req = reqwest::Request::new(reqwest::Method::POST, url);
        req.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        *req.body_mut() = Some(body.into());

        debug!(model = %request.model, messages = request.messages.len(), "Sending completion request");

        let response = self.http.execute(req).await.map_err(|e| {
            if e.is_timeout() {
                GenerationError::Transport(format!("request timed out: {e}"))
            } else {
                GenerationError::Transport(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status { status, body });
        }

        response
            .json::<ChatResponse>()
            .await
            .map_err(|e| GenerationError::Transport(format!("failed to decode completion: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_url() {
        let client = ChatCompletionsClient::with_client(BasicClient::new(), "https://openrouter.ai/api/v1/");
        assert_eq!(client.endpoint, "https://openrouter.ai/api/v1/chat/completions");
    }
}
