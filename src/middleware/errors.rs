use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::{ApiError, ErrorKind};
use crate::state::AppState;

const GENERIC_MESSAGE: &str = "Internal Server Error";

/// Fallback for unmatched routes
pub async fn not_found(request: Request) -> ApiError {
    ApiError::not_found(format!("Route {} {} not found", request.method(), request.uri().path()))
}

/// Hides `ApiError` server error detail in production. Client errors keep their message.
pub async fn redact_internal_errors(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    if !state.config.is_production() || !response.status().is_server_error() {
        return response;
    }

    // Only ApiError bodies are rewritten; handlers that shape their own 5xx keep it
    let Some(kind) = response.extensions().get::<ErrorKind>().copied() else {
        return response;
    };

    let status = response.status();
    let code = kind.code();

    let mut redacted = (
        status,
        Json(json!({
            "error": true,
            "message": GENERIC_MESSAGE,
            "code": code
        })),
    )
        .into_response();
    for (name, value) in response.headers() {
        if name != axum::http::header::CONTENT_TYPE && name != axum::http::header::CONTENT_LENGTH {
            redacted.headers_mut().append(name.clone(), value.clone());
        }
    }
    redacted
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request as HttpRequest, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Router,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::{AppConfig, MediaConfig};
    use crate::database::MemoryStorage;
    use crate::media::CloudinaryHost;

    fn router(config: AppConfig) -> Router {
        let state = AppState::new(
            config,
            Arc::new(MemoryStorage::new()),
            Arc::new(CloudinaryHost::new(MediaConfig::default())),
        );
        Router::new()
            .route("/boom", get(|| async { ApiError::internal_server_error("pool exhausted") }))
            .route(
                "/degraded",
                get(|| async {
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        Json(json!({ "data": { "status": "degraded" } })),
                    )
                }),
            )
            .layer(from_fn_with_state(state.clone(), redact_internal_errors))
            .with_state(state)
    }

    async fn call(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(HttpRequest::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn production_hides_api_error_detail() {
        let (status, body) = call(router(AppConfig::production()), "/boom").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], GENERIC_MESSAGE);
        assert_eq!(body["code"], "INTERNAL_SERVER_ERROR");
    }

    #[tokio::test]
    async fn development_keeps_api_error_detail() {
        let (_, body) = call(router(AppConfig::development()), "/boom").await;
        assert_eq!(body["message"], "pool exhausted");
    }

    #[tokio::test]
    async fn handler_shaped_5xx_is_left_alone() {
        let (status, body) = call(router(AppConfig::production()), "/degraded").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["data"]["status"], "degraded");
    }
}
