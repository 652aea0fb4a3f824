use crate::adapter::{self, AttachmentKind, GenerationRequest};
use crate::error::GenerationError;
use crate::models::{GenerateTextRequest, GenerationResponse};
use crate::request_id::{RequestId, inject_request_id};
use crate::state::AppState;
use axum::{
    Extension, Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, State, multipart::MultipartRejection,
        rejection::JsonRejection,
    },
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;
    Router::new()
        .route("/generate-text", post(generate_text))
        .route("/generate-from-image", post(generate_from_image))
        .route("/generate-from-document", post(generate_from_document))
        .route("/generate-from-audio", post(generate_from_audio))
        .route("/health", get(|| async { "OK" }))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum::middleware::from_fn(inject_request_id))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[axum_macros::debug_handler]
pub async fn generate_text(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<GenerateTextRequest>, JsonRejection>,
) -> Result<Json<GenerationResponse>, GenerationError> {
    let request = payload
        .map_err(|e| GenerationError::Validation(e.body_text()))
        .and_then(|Json(body)| adapter::normalize_text(body.prompt));
    respond(&state, request, &request_id).await
}

#[axum_macros::debug_handler]
pub async fn generate_from_image(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<GenerationResponse>, GenerationError> {
    generate_from_upload(AttachmentKind::Image, state, request_id, multipart).await
}

#[axum_macros::debug_handler]
pub async fn generate_from_document(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<GenerationResponse>, GenerationError> {
    generate_from_upload(AttachmentKind::Document, state, request_id, multipart).await
}

#[axum_macros::debug_handler]
pub async fn generate_from_audio(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<GenerationResponse>, GenerationError> {
    generate_from_upload(AttachmentKind::Audio, state, request_id, multipart).await
}

async fn generate_from_upload(
    kind: AttachmentKind,
    state: AppState,
    request_id: RequestId,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<GenerationResponse>, GenerationError> {
    let request = match multipart {
        Ok(mut multipart) => match adapter::read_upload_form(kind, &mut multipart).await {
            Ok(form) => adapter::normalize_upload(kind, form, &state.config.default_prompts),
            Err(e) => Err(e),
        },
        Err(e) => Err(GenerationError::Validation(e.body_text())),
    };
    respond(&state, request, &request_id).await
}

async fn respond(
    state: &AppState,
    request: Result<GenerationRequest, GenerationError>,
    request_id: &RequestId,
) -> Result<Json<GenerationResponse>, GenerationError> {
    let outcome = match request {
        Ok(request) => state.llm_client.generate(request, request_id).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(result) => {
            info!("Generated {} chars", result.text.len());
            Ok(Json(result.into()))
        }
        Err(e) => {
            warn!("Generation failed ({}): {}", e.kind(), e);
            Err(e)
        }
    }
}
