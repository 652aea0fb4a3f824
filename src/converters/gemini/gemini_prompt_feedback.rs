use crate::converters::gemini::GeminiBlockReason;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiPromptFeedback {
    #[serde(rename = "blockReason")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<GeminiBlockReason>,
    #[serde(rename = "blockReasonMessage")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_reason_message: Option<String>,
}
