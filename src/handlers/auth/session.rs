use axum::{
    extract::{Extension, State},
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::auth::{generate_jwt, hash_password, verify_password, Claims};
use crate::database::models::{NewUser, User};
use crate::database::UserStore;
use crate::error::ApiError;
use crate::middleware::{session, ApiJson, ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;
use crate::validation;

const BAD_CREDENTIALS: &str = "Unable to authenticate user";

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /api/v1/auth/signup - Register a user
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SignupRequest>,
) -> ApiResult<User> {
    let email = validation::normalize_email(&validation::required("email", payload.email)?);
    let password = validation::required("password", payload.password)?;
    let username = validation::required("username", payload.username)?;
    validation::email(&email)?;
    validation::password(&password)?;

    if state.store.find_user_by_email(&email).await?.is_some() {
        return Err(ApiError::conflict(crate::database::store::EMAIL_TAKEN));
    }

    let password_hash = hash_password(password, state.config.security.password_hash_cost).await?;
    let user = state
        .store
        .create_user(NewUser {
            email,
            username,
            password_hash,
        })
        .await?
        .ok_or_else(|| ApiError::create_failed("User could not be created"))?;

    tracing::info!("Registered user {}", user.id);
    Ok(ApiResponse::created(user))
}

/// POST /api/v1/auth/login - Exchange credentials for a token and a session cookie
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Response, ApiError> {
    let email = validation::normalize_email(&validation::required("email", payload.email)?);
    let password = validation::required("password", payload.password)?;

    // Unknown email and wrong password answer the same way
    let user = state
        .store
        .find_user_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::unauthorized(BAD_CREDENTIALS))?;

    if !verify_password(password, user.password_hash.clone()).await? {
        return Err(ApiError::unauthorized(BAD_CREDENTIALS));
    }

    let claims = Claims::new(&user, state.config.security.jwt_expiry_hours);
    let token = generate_jwt(&claims, &state.config.security)?;

    let mut response = ApiResponse::success(json!({ "authToken": token })).into_response();
    if let Some(cookie) = session::touch(&state, &headers, user.id).await {
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    tracing::info!("User {} logged in", user.id);
    Ok(response)
}

/// GET /api/v1/auth/me - The verified token payload
pub async fn me(Extension(auth_user): Extension<AuthUser>) -> ApiResult<AuthUser> {
    Ok(ApiResponse::success(auth_user))
}
