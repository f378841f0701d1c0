use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::Storage;
use crate::state::AppState;

/// GET / - Service description
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "data": {
            "name": "project2-api",
            "version": version,
            "endpoints": {
                "projects": "/api/v1/projects[/:id] (reads public, writes protected)",
                "upload": "/api/v1/projects/upload (protected)",
                "user": "/api/v1/user/loggedInUser, /api/v1/user/edit (protected)",
                "auth": "/api/v1/auth/signup, /api/v1/auth/login (public), /api/v1/auth/me (protected)",
                "health": "/health (public)",
            }
        }
    }))
}

/// GET /health - Liveness plus a store ping
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "error": true,
                    "message": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
