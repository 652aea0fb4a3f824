use crate::converters::gemini::{GeminiContent, GeminiFinishReason};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiCandidate {
    // Absent when the candidate was stopped for safety
    #[serde(default)]
    pub content: Option<GeminiContent>,
    #[serde(rename = "finishReason")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<GeminiFinishReason>,
    pub index: Option<u32>,
}
