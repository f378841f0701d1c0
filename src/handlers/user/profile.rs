use axum::extract::{Extension, State};
use serde::Deserialize;

use crate::database::models::{ProfileChanges, User};
use crate::database::UserStore;
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;
use crate::validation;

const NOT_FOUND: &str = "No user found";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditProfileRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub image_url: Option<String>,
}

impl EditProfileRequest {
    pub fn validate(self) -> Result<ProfileChanges, ApiError> {
        let (Some(email), Some(username)) = (
            self.email.filter(|v| !v.trim().is_empty()),
            self.username.filter(|v| !v.trim().is_empty()),
        ) else {
            return Err(ApiError::validation_failed("Please fill all the fields to register"));
        };
        let email = validation::normalize_email(&email);
        validation::email(&email)?;

        Ok(ProfileChanges {
            email,
            username,
            image_url: self.image_url.filter(|url| !url.trim().is_empty()),
        })
    }
}

/// GET /api/v1/user/loggedInUser - Profile of the caller
pub async fn logged_in_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<User> {
    let user = state
        .store
        .find_user(auth_user.id)
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;

    Ok(ApiResponse::success(user))
}

/// PUT /api/v1/user/edit - Update the caller's own profile.
/// The target is always the token's principal, never an id from the body.
pub async fn edit(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ApiJson(payload): ApiJson<EditProfileRequest>,
) -> ApiResult<User> {
    let changes = payload.validate()?;

    if state.store.find_user(auth_user.id).await?.is_none() {
        return Err(ApiError::not_found(NOT_FOUND));
    }

    let updated = state
        .store
        .update_user(auth_user.id, changes)
        .await?
        .ok_or_else(|| ApiError::update_failed("Profile could not be updated"))?;

    tracing::info!("User {} updated their profile", auth_user.id);
    Ok(ApiResponse::success(updated))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: Option<&str>, username: Option<&str>) -> EditProfileRequest {
        EditProfileRequest {
            email: email.map(str::to_string),
            username: username.map(str::to_string),
            image_url: None,
        }
    }

    #[test]
    fn missing_or_blank_fields_fail() {
        assert!(request(None, Some("ada")).validate().is_err());
        assert!(request(Some("ada@example.com"), None).validate().is_err());
        assert!(request(Some("ada@example.com"), Some("")).validate().is_err());
        assert!(request(Some(""), Some("ada")).validate().is_err());
    }

    #[test]
    fn email_shape_is_checked() {
        let err = request(Some("not-an-email"), Some("ada")).validate().unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.message(), "Email is not a valid format");
    }

    #[test]
    fn email_is_stored_lowercase() {
        let changes = request(Some(" Ada@Example.com"), Some("ada")).validate().unwrap();
        assert_eq!(changes.email, "ada@example.com");
    }

    #[test]
    fn valid_request_passes() {
        let changes = request(Some("ada@example.com"), Some("ada")).validate().unwrap();
        assert_eq!(changes.email, "ada@example.com");
        assert!(changes.image_url.is_none());
    }
}
