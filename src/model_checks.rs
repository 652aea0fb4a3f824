use crate::adapter::GenerationRequest;
use crate::converters::gemini::{GeminiGenerationConfig, GeminiRequest};
use crate::llm_client::LlmClient;
use crate::request_id::RequestId;
use tracing::info;

/// Sends a single one-token "ping" prompt so a bad key or model name fails at startup
/// instead of on the first real request.
pub async fn perform_model_check(llm_client: &LlmClient) -> anyhow::Result<()> {
    let mut request = GeminiRequest::from(GenerationRequest {
        prompt: Some("ping".to_string()),
        attachment: None,
    });
    request.generation_config = Some(GeminiGenerationConfig {
        max_output_tokens: Some(1),
    });
    let request_id = RequestId(format!("startup-check-{}", uuid::Uuid::new_v4()));

    match llm_client.send(request, &request_id).await {
        Ok(_) => {
            info!("Model check passed for {}", llm_client.model());
            Ok(())
        }
        Err(e) => anyhow::bail!("Model check failed for {}: {}", llm_client.model(), e),
    }
}
