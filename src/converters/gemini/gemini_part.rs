use crate::converters::gemini::GeminiInlineData;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeminiPart {
    Text {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        thought: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[serde(rename = "thoughtSignature")]
        thought_signature: Option<String>,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
    // functionCall, executableCode, ... are never requested here
    Other(serde_json::Value),
}

impl GeminiPart {
    pub fn text(text: impl Into<String>) -> Self {
        GeminiPart::Text {
            text: text.into(),
            thought: None,
            thought_signature: None,
        }
    }

    pub fn inline(mime_type: impl Into<String>, data: String) -> Self {
        GeminiPart::InlineData {
            inline_data: GeminiInlineData {
                mime_type: mime_type.into(),
                data,
            },
        }
    }

    /// Answer text, skipping thought summaries.
    pub fn answer_text(&self) -> Option<&str> {
        match self {
            GeminiPart::Text { text, thought, .. } if *thought != Some(true) => Some(text.as_str()),
            _ => None,
        }
    }
}
