use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::{validate_jwt, Claims, JwtError};
use crate::error::ApiError;
use crate::state::AppState;

use super::session;

/// Authenticated principal extracted from the JWT (the token "payload")
#[derive(Clone, Debug, Serialize)]
pub struct AuthUser {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub email: String,
    pub username: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.id,
            email: claims.email,
            username: claims.username,
        }
    }
}

/// JWT authentication middleware for protected routes. Rejects with 401 before the
/// handler runs; on success injects `AuthUser` and refreshes the session cookie.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)?;
    let claims = validate_jwt(&token, &state.config.security).map_err(|e| match e {
        JwtError::InvalidToken(msg) => ApiError::unauthorized(msg),
        other => {
            // No usable secret means no token can be verified
            tracing::error!("Cannot verify bearer token: {}", other);
            ApiError::unauthorized("Unable to verify token")
        }
    })?;

    let auth_user = AuthUser::from(claims);
    tracing::debug!("Authenticated request for user {}", auth_user.id);
    request.extensions_mut().insert(auth_user.clone());

    let cookie = session::touch(&state, &headers, auth_user.id).await;

    let mut response = next.run(request).await;
    if let Some(cookie) = cookie {
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    Ok(response)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.trim().to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(extract_jwt_from_headers(&headers_with("Bearer abc.def")).unwrap(), "abc.def");
    }

    #[test]
    fn rejects_missing_or_malformed_header() {
        assert!(extract_jwt_from_headers(&HeaderMap::new()).is_err());
        assert!(extract_jwt_from_headers(&headers_with("Basic dXNlcjpwYXNz")).is_err());
        assert!(extract_jwt_from_headers(&headers_with("Bearer   ")).is_err());
    }
}
