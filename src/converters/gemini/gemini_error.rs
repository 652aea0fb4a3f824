use serde::{Deserialize, Serialize};

/// Error envelope returned by Google APIs on non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiErrorResponse {
    pub error: GeminiErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiErrorDetail {
    pub code: Option<u16>,
    pub message: String,
    pub status: Option<String>,
}
