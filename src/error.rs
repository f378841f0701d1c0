// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

/// Category of a failed request; decides the HTTP status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    // 400 Bad Request
    ValidationFailed,

    // 401 Unauthorized
    Unauthorized,

    // 404 Not Found
    NotFound,

    // 409 Conflict
    Conflict,

    // 500 Internal Server Error
    CreateFailed,
    UpdateFailed,
    Unknown,
}

impl ErrorKind {
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::ValidationFailed => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::CreateFailed => 500,
            ErrorKind::UpdateFailed => 500,
            ErrorKind::Unknown => 500,
        }
    }

    /// Error code for client handling
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::ValidationFailed => "VALIDATION_FAILED",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::CreateFailed => "CREATE_FAILED",
            ErrorKind::UpdateFailed => "UPDATE_FAILED",
            ErrorKind::Unknown => "INTERNAL_SERVER_ERROR",
        }
    }

    fn from_status(status_code: u16) -> Self {
        match status_code {
            400 | 422 => ErrorKind::ValidationFailed,
            401 | 403 => ErrorKind::Unauthorized,
            404 => ErrorKind::NotFound,
            409 => ErrorKind::Conflict,
            _ => ErrorKind::Unknown,
        }
    }
}

/// HTTP API error: a message plus the status code it answers with
#[derive(Debug, Clone)]
pub struct ApiError {
    kind: ErrorKind,
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Builds an error from a message and an HTTP status code. The status is kept
    /// as given; the kind only picks the `code` field. Codes outside 400..=599 become 500.
    pub fn new(message: impl Into<String>, status_code: u16) -> Self {
        let status = StatusCode::from_u16(status_code)
            .ok()
            .filter(|s| s.is_client_error() || s.is_server_error())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self {
            kind: ErrorKind::from_status(status.as_u16()),
            status,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({
            "error": true,
            "message": self.message,
            "code": self.kind.code()
        })
    }
}

// Static constructor methods
impl ApiError {
    fn with_kind(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: StatusCode::from_u16(kind.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            message: message.into(),
        }
    }

    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::ValidationFailed, message)
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::ValidationFailed, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::Unauthorized, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::Conflict, message)
    }

    pub fn create_failed(message: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::CreateFailed, message)
    }

    pub fn update_failed(message: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::UpdateFailed, message)
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::Unknown, message)
    }
}

// Convert other error types to ApiError
impl From<crate::database::StoreError> for ApiError {
    fn from(err: crate::database::StoreError) -> Self {
        match err {
            crate::database::StoreError::Conflict(msg) => ApiError::conflict(msg),
            crate::database::StoreError::Sqlx(sqlx_err) => {
                // Log the real error but return generic message
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal_server_error("Database error occurred")
            }
            crate::database::StoreError::Internal(msg) => {
                tracing::error!("Store error: {}", msg);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
        }
    }
}

impl From<crate::media::MediaError> for ApiError {
    fn from(err: crate::media::MediaError) -> Self {
        tracing::error!("Media host error: {}", err);
        ApiError::internal_server_error(format!("Error uploading the image: {}", err))
    }
}

impl From<crate::auth::JwtError> for ApiError {
    fn from(err: crate::auth::JwtError) -> Self {
        match err {
            crate::auth::JwtError::InvalidToken(msg) => ApiError::unauthorized(msg),
            other => {
                tracing::error!("JWT error: {}", other);
                ApiError::internal_server_error(other.to_string())
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum. The kind travels in the response
// extensions so the redaction layer can recognise API errors.
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let mut response = (self.status, Json(self.to_json())).into_response();
        response.extensions_mut().insert(self.kind);
        response
    }
}
