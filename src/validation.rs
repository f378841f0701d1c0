// Field checks shared by the request bodies. All failures are 400s.
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ApiError;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]{2,}$").expect("email pattern is valid")
});

/// Returns the value when present and not blank
pub fn required(field: &str, value: Option<String>) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::validation_failed(format!("Please provide a {}", field))),
    }
}

/// Addresses are stored and compared in lowercase without surrounding whitespace
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn email(value: &str) -> Result<(), ApiError> {
    if is_valid_email(value) {
        Ok(())
    } else {
        Err(ApiError::validation_failed("Email is not a valid format"))
    }
}

/// At least 6 characters with a digit, a lowercase and an uppercase letter
pub fn password(value: &str) -> Result<(), ApiError> {
    let strong = value.chars().count() >= 6
        && value.chars().any(|c| c.is_ascii_digit())
        && value.chars().any(|c| c.is_lowercase())
        && value.chars().any(|c| c.is_uppercase());
    if strong {
        Ok(())
    } else {
        Err(ApiError::validation_failed(
            "Password must have at least 6 characters and contain at least one number, one lowercase and one uppercase letter",
        ))
    }
}
