use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GeminiBlockReason {
    BlockReasonUnspecified,
    Safety,
    Other,
    Blocklist,
    ProhibitedContent,
    ImageSafety,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for GeminiBlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GeminiBlockReason::BlockReasonUnspecified => "BLOCK_REASON_UNSPECIFIED",
            GeminiBlockReason::Safety => "SAFETY",
            GeminiBlockReason::Other => "OTHER",
            GeminiBlockReason::Blocklist => "BLOCKLIST",
            GeminiBlockReason::ProhibitedContent => "PROHIBITED_CONTENT",
            GeminiBlockReason::ImageSafety => "IMAGE_SAFETY",
            GeminiBlockReason::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}
