use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GeminiFinishReason {
    #[serde(rename = "FINISH_REASON_UNSPECIFIED")]
    FinishReasonUnspecified,
    #[serde(rename = "STOP")]
    Stop,
    #[serde(rename = "MAX_TOKENS")]
    MaxTokens,
    #[serde(rename = "SAFETY")]
    Safety,
    #[serde(rename = "RECITATION")]
    Recitation,
    #[serde(rename = "LANGUAGE")]
    Language,
    #[serde(rename = "OTHER")]
    Other,
    #[serde(rename = "BLOCKLIST")]
    Blocklist,
    #[serde(rename = "PROHIBITED_CONTENT")]
    ProhibitedContent,
    #[serde(rename = "SPII")]
    Spii,
    #[serde(rename = "MALFORMED_FUNCTION_CALL")]
    MalformedFunctionCall,
    #[serde(rename = "IMAGE_SAFETY")]
    ImageSafety,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for GeminiFinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GeminiFinishReason::FinishReasonUnspecified => "FINISH_REASON_UNSPECIFIED",
            GeminiFinishReason::Stop => "STOP",
            GeminiFinishReason::MaxTokens => "MAX_TOKENS",
            GeminiFinishReason::Safety => "SAFETY",
            GeminiFinishReason::Recitation => "RECITATION",
            GeminiFinishReason::Language => "LANGUAGE",
            GeminiFinishReason::Other => "OTHER",
            GeminiFinishReason::Blocklist => "BLOCKLIST",
            GeminiFinishReason::ProhibitedContent => "PROHIBITED_CONTENT",
            GeminiFinishReason::Spii => "SPII",
            GeminiFinishReason::MalformedFunctionCall => "MALFORMED_FUNCTION_CALL",
            GeminiFinishReason::ImageSafety => "IMAGE_SAFETY",
            GeminiFinishReason::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}
