use serde::{Deserialize, Serialize};

/// Body of `POST /generate-text`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateTextRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub result: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

/// Text produced upstream, passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub text: String,
}

impl From<GenerationResult> for GenerationResponse {
    fn from(result: GenerationResult) -> Self {
        GenerationResponse { result: result.text }
    }
}
