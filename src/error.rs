use crate::models::ErrorResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Any failure while serving a generation endpoint.
///
/// Callers only ever see `{"message": ...}` with a 500 status; the variant is
/// kept for logging.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Upstream(String),
}

impl GenerationError {
    pub fn missing_field(field: &str) -> Self {
        GenerationError::Validation(format!("missing required field '{}'", field))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::Validation(_) => "validation",
            GenerationError::Upstream(_) => "upstream",
        }
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        // The url carries the api key as a query parameter
        GenerationError::Upstream(err.without_url().to_string())
    }
}

impl IntoResponse for GenerationError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            message: self.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
