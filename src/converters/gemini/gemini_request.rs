use crate::adapter::GenerationRequest;
use crate::converters::gemini::{GeminiContent, GeminiGenerationConfig, GeminiPart};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GeminiGenerationConfig>,
}

impl From<GenerationRequest> for GeminiRequest {
    fn from(request: GenerationRequest) -> Self {
        let mut parts: Vec<GeminiPart> = Vec::with_capacity(2);

        // Text goes first so the instruction precedes the payload
        if let Some(prompt) = request.prompt {
            parts.push(GeminiPart::text(prompt));
        }
        if let Some(attachment) = request.attachment {
            let data = attachment.encode_inline();
            parts.push(GeminiPart::inline(attachment.mime_type, data));
        }

        GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts,
            }],
            generation_config: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{Attachment, AttachmentKind};
    use bytes::Bytes;
    use serde_json::json;

    #[test]
    fn test_text_only_request_shape() {
        let request = GenerationRequest {
            prompt: Some("Hello".to_string()),
            attachment: None,
        };
        let body = serde_json::to_value(GeminiRequest::from(request)).unwrap();
        assert_eq!(
            body,
            json!({"contents": [{"role": "user", "parts": [{"text": "Hello"}]}]})
        );
    }

    #[test]
    fn test_generation_config_is_serialized_when_set() {
        let request = GenerationRequest {
            prompt: Some("ping".to_string()),
            attachment: None,
        };
        let mut gemini_request = GeminiRequest::from(request);
        gemini_request.generation_config = Some(GeminiGenerationConfig {
            max_output_tokens: Some(1),
        });
        let body = serde_json::to_value(gemini_request).unwrap();
        assert_eq!(body["generationConfig"], json!({"maxOutputTokens": 1}));
    }

    #[test]
    fn test_attachment_request_shape() {
        let request = GenerationRequest {
            prompt: Some("Describe".to_string()),
            attachment: Some(Attachment {
                data: Bytes::from_static(b"abc"),
                mime_type: "image/jpeg".to_string(),
                kind: AttachmentKind::Image,
            }),
        };
        let body = serde_json::to_value(GeminiRequest::from(request)).unwrap();
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Describe");
        assert_eq!(body["contents"][0]["parts"][1]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(body["contents"][0]["parts"][1]["inlineData"]["data"], "YWJj");
    }

    #[test]
    fn test_attachment_without_prompt_has_single_part() {
        let request = GenerationRequest {
            prompt: None,
            attachment: Some(Attachment {
                data: Bytes::from_static(b"abc"),
                mime_type: "image/png".to_string(),
                kind: AttachmentKind::Image,
            }),
        };
        let body = serde_json::to_value(GeminiRequest::from(request)).unwrap();
        assert_eq!(body["contents"][0]["parts"].as_array().unwrap().len(), 1);
    }
}
