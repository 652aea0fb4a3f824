use crate::adapter::GenerationRequest;
use crate::config::Config;
use crate::converters::gemini::{GeminiErrorResponse, GeminiRequest, GeminiResponse};
use crate::converters::helpers::truncate_for_log;
use crate::error::GenerationError;
use crate::models::GenerationResult;
use crate::request_id::RequestId;
use reqwest::header::HeaderValue;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Client for the upstream `generateContent` call. Built once at startup and
/// shared read-only between requests.
pub struct LlmClient {
    http_client: Arc<reqwest::Client>,
    api_base: String,
    model: String,
    api_key: String,
}

impl fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmClient")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl LlmClient {
    pub fn new(http_client: Arc<reqwest::Client>, config: &Config) -> Self {
        Self {
            http_client,
            api_base: config.api_base.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    // The key travels as a query parameter and is never part of this url
    fn build_target_url(&self) -> String {
        let path = format!("models/{}:generateContent", self.model);
        if self.api_base.ends_with('/') {
            format!("{}{}", self.api_base, path)
        } else {
            format!("{}/{}", self.api_base, path)
        }
    }

    pub async fn generate(
        &self,
        request: GenerationRequest,
        request_id: &RequestId,
    ) -> Result<GenerationResult, GenerationError> {
        self.send(GeminiRequest::from(request), request_id).await
    }

    pub async fn send(
        &self,
        target_body: GeminiRequest,
        request_id: &RequestId,
    ) -> Result<GenerationResult, GenerationError> {
        let target_url = self.build_target_url();

        let mut target_request = self
            .http_client
            .post(&target_url)
            .query(&[("key", self.api_key.as_str())])
            .header("Content-Type", "application/json");

        // Propagate request id upstream
        if let Ok(val) = HeaderValue::from_str(&request_id.0) {
            target_request = target_request.header("x-request-id", val);
        }

        info!("Forwarding request to: {}", target_url);
        let response = target_request.json(&target_body).send().await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("upstream status {}, body: {}", status, truncate_for_log(&body, 2000));

        if !status.is_success() {
            let message = match serde_json::from_str::<GeminiErrorResponse>(&body) {
                Ok(envelope) => envelope.error.message,
                Err(_) => format!(
                    "upstream returned {}: {}",
                    status,
                    truncate_for_log(body.trim(), 500)
                ),
            };
            return Err(GenerationError::Upstream(message));
        }

        let parsed: GeminiResponse = serde_json::from_str(&body).map_err(|e| {
            GenerationError::Upstream(format!("malformed upstream response: {}", e))
        })?;
        parsed.into_result()
    }
}
