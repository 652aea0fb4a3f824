use crate::error::GenerationError;
use crate::models::GenerationResult;
use serde::{Deserialize, Serialize};

use crate::converters::gemini::{GeminiCandidate, GeminiPromptFeedback, GeminiUsage};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiResponse {
    // Missing entirely when the prompt itself was blocked
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    #[serde(rename = "usageMetadata")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<GeminiUsage>,
    #[serde(rename = "modelVersion")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
    #[serde(rename = "promptFeedback")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<GeminiPromptFeedback>,
    #[serde(rename = "responseId")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_id: Option<String>,
}

impl GeminiResponse {
    /// Concatenated answer text of the first candidate, or `None` when it
    /// carries no text part at all.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let mut texts = content.parts.iter().filter_map(|p| p.answer_text()).peekable();
        texts.peek()?;
        Some(texts.collect())
    }

    pub fn into_result(self) -> Result<GenerationResult, GenerationError> {
        if let Some(text) = self.text() {
            return Ok(GenerationResult { text });
        }

        let Some(candidate) = self.candidates.first() else {
            let feedback = self.prompt_feedback.as_ref();
            let reason = feedback
                .and_then(|f| f.block_reason.as_ref())
                .map(|r| r.to_string())
                .unwrap_or_else(|| "no candidates returned".to_string());
            let detail = feedback.and_then(|f| f.block_reason_message.as_deref());
            return Err(GenerationError::Upstream(match detail {
                Some(detail) => format!("prompt blocked: {} ({})", reason, detail),
                None => format!("prompt blocked: {}", reason),
            }));
        };

        let reason = candidate
            .finish_reason
            .as_ref()
            .map(|r| r.to_string())
            .unwrap_or_else(|| "FINISH_REASON_UNSPECIFIED".to_string());
        Err(GenerationError::Upstream(format!(
            "response contained no text (finish reason: {})",
            reason
        )))
    }
}
