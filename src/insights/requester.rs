use crate::analyzers::AggregatedSummary;
use crate::error::GenerationError;
use crate::insights::extract::parse_insights;
use crate::insights::prompt::build_messages;
use crate::insights::types::{HistoricalInsight, InsightPayload};
use crate::services::{ChatRequest, ChatResponse, ReasoningService};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_MODEL: &str = "tngtech/deepseek-r1t-chimera:free";
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_MAX_TOKENS: u32 = 1500;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Generation parameters sent with every request.
#[derive(Debug, Clone)]
pub struct RequestSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for RequestSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Asks the reasoning service for insights and validates what comes back.
pub struct InsightRequester {
    service: Arc<dyn ReasoningService>,
    settings: RequestSettings,
}

impl InsightRequester {
    pub fn new(service: Arc<dyn ReasoningService>, settings: RequestSettings) -> Self {
        Self { service, settings }
    }

    /// Requests insights for `summary`, using `history` as trend context.
    ///
    /// # Errors
    ///
    /// Returns a [`GenerationError`] if the service fails or times out, or if
    /// its response has no usable `{insights, alerts}` object.
    #[tracing::instrument(skip_all, fields(model = %self.settings.model, history = history.len()))]
    pub async fn request_insights(
        &self,
        summary: &AggregatedSummary,
        history: &[HistoricalInsight],
    ) -> Result<InsightPayload, GenerationError> {
        let request = ChatRequest {
            model: self.settings.model.clone(),
            messages: build_messages(summary, history)?,
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        info!("Requesting AI insights");
        let response = tokio::time::timeout(self.settings.timeout, self.service.complete(&request))
            .await
            .map_err(|_| GenerationError::Timeout(self.settings.timeout))??;

        let text = response_text(&response)?;
        debug!(response = %text, "Raw AI response");

        let parsed = parse_insights(text).inspect_err(|e| {
            warn!(error = %e, response = %text, "AI response failed validation");
        })?;

        info!(
            insights = parsed.insights.len(),
            alerts = parsed.alerts.len(),
            "AI insights parsed"
        );

        Ok(InsightPayload {
            success: true,
            error: None,
            timestamp: Utc::now(),
            data_analyzed: summary.overall.total,
            insights: parsed.insights,
            alerts: parsed.alerts,
            raw_data: summary.clone(),
            previous_insights: history.len(),
        })
    }
}

/// Trimmed content of the first choice.
fn response_text(response: &ChatResponse) -> Result<&str, GenerationError> {
    let choice = response.choices.first().ok_or(GenerationError::NoChoices)?;
    let text = choice
        .message
        .as_ref()
        .and_then(|m| m.content.as_deref())
        .map(str::trim)
        .unwrap_or_default();

    if text.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::OverallStats;
    use std::sync::Mutex;

    /// Replays a canned result and records the request it was given.
    struct ScriptedService {
        reply: Mutex<Option<Result<ChatResponse, GenerationError>>>,
        seen: Mutex<Option<ChatRequest>>,
    }

    impl ScriptedService {
        fn new(reply: Result<ChatResponse, GenerationError>) -> Arc<Self> {
            Arc::new(Self {
                reply: Mutex::new(Some(reply)),
                seen: Mutex::new(None),
            })
        }
    }

    #[async_trait::async_trait]
    impl ReasoningService for ScriptedService {
        async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, GenerationError> {
            *self.seen.lock().unwrap() = Some(request.clone());
            self.reply.lock().unwrap().take().expect("called once")
        }
    }

    struct SlowService;

    #[async_trait::async_trait]
    impl ReasoningService for SlowService {
        async fn complete(&self, _request: &ChatRequest) -> Result<ChatResponse, GenerationError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(ChatResponse::default())
        }
    }

    fn summary(total: u64) -> AggregatedSummary {
        AggregatedSummary {
            overall: OverallStats {
                total,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn full_reply() -> String {
        let insights: Vec<String> = (1..=10).map(|i| format!("insight {i}")).collect();
        let alerts: Vec<String> = (1..=3).map(|i| format!("alert {i}")).collect();
        format!(
            "Sure! {} Hope this helps!",
            serde_json::json!({ "insights": insights, "alerts": alerts })
        )
    }

    fn requester(service: Arc<dyn ReasoningService>) -> InsightRequester {
        InsightRequester::new(service, RequestSettings::default())
    }

    #[tokio::test]
    async fn test_prose_wrapped_reply_succeeds() {
        let service = ScriptedService::new(Ok(ChatResponse::from_text(full_reply())));
        let history = vec![HistoricalInsight {
            timestamp: Utc::now(),
            insights: vec!["earlier".to_string()],
            alerts: Vec::new(),
            success: true,
        }];

        let payload = requester(service.clone())
            .request_insights(&summary(15), &history)
            .await
            .unwrap();

        assert!(payload.success);
        assert_eq!(payload.error, None);
        assert_eq!(payload.insights.len(), 10);
        assert_eq!(payload.alerts, vec!["alert 1", "alert 2", "alert 3"]);
        assert_eq!(payload.data_analyzed, 15);
        assert_eq!(payload.previous_insights, 1);
        assert_eq!(payload.raw_data, summary(15));

        let seen = service.seen.lock().unwrap().clone().unwrap();
        assert_eq!(seen.model, DEFAULT_MODEL);
        assert_eq!(seen.temperature, 0.2);
        assert_eq!(seen.max_tokens, 1500);
        assert_eq!(seen.messages.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_content_is_rejected() {
        let service = ScriptedService::new(Ok(ChatResponse::from_text("")));
        let err = requester(service)
            .request_insights(&summary(0), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_whitespace_content_is_rejected() {
        let service = ScriptedService::new(Ok(ChatResponse::from_text("  \n ")));
        let err = requester(service)
            .request_insights(&summary(0), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_no_choices_is_rejected() {
        let service = ScriptedService::new(Ok(ChatResponse::default()));
        let err = requester(service)
            .request_insights(&summary(0), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::NoChoices));
    }

    #[tokio::test]
    async fn test_missing_alerts_is_rejected() {
        let service = ScriptedService::new(Ok(ChatResponse::from_text(r#"{"insights": ["a"]}"#)));
        let err = requester(service)
            .request_insights(&summary(0), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::MissingAlerts));
    }

    #[tokio::test]
    async fn test_transport_error_passes_through() {
        let service = ScriptedService::new(Err(GenerationError::Status {
            status: 429,
            body: "rate limited".to_string(),
        }));
        let err = requester(service)
            .request_insights(&summary(0), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Status { status: 429, .. }));
    }

    #[tokio::test]
    async fn test_slow_service_times_out() {
        let settings = RequestSettings {
            timeout: Duration::from_millis(20),
            ..Default::default()
        };
        let err = InsightRequester::new(Arc::new(SlowService), settings)
            .request_insights(&summary(0), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Timeout(_)));
    }
}
