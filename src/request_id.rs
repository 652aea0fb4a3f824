use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::{Instrument, info_span};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone, Debug)]
pub struct RequestId(pub String);

pub async fn inject_request_id(mut req: Request, next: Next) -> Response {
    // Use incoming x-request-id if provided, else generate a new one
    let id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    req.extensions_mut().insert(RequestId(id.clone()));

    let span = info_span!(
        "http_request",
        trace_id = %id,
        method = %req.method(),
        path = %req.uri().path()
    );

    let mut resp = next.run(req).instrument(span).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        resp.headers_mut().insert(REQUEST_ID_HEADER, val);
    }

    resp
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Extension, Router, body::Body, http, routing::get};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route(
                "/echo",
                get(|Extension(id): Extension<RequestId>| async move { id.0 }),
            )
            .layer(axum::middleware::from_fn(inject_request_id))
    }

    #[tokio::test]
    async fn test_incoming_id_is_kept() {
        let req = http::Request::builder()
            .uri("/echo")
            .header(REQUEST_ID_HEADER, "abc-123")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();

        assert_eq!(resp.headers()[REQUEST_ID_HEADER], "abc-123");
        let body_bytes = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body_bytes[..], b"abc-123");
    }

    #[tokio::test]
    async fn test_id_is_generated_when_missing() {
        let req = http::Request::builder().uri("/echo").body(Body::empty()).unwrap();
        let resp = app().oneshot(req).await.unwrap();

        let header = resp.headers()[REQUEST_ID_HEADER].to_str().unwrap().to_string();
        assert!(Uuid::parse_str(&header).is_ok());
        let body_bytes = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(String::from_utf8(body_bytes.to_vec()).unwrap(), header);
    }
}
