//! Store-backed session cookie.
//!
//! Sessions are only written once a request carries a verified principal, and
//! every authenticated request slides the expiry forward. The cookie holds the
//! opaque session id; everything else stays in the `sessions` table.

use std::time::Duration;

use axum::http::{header, HeaderMap};
use cookie::{time, Cookie, SameSite};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::database::models::Session;
use crate::database::Storage;
use crate::state::AppState;

/// Session id carried by the named cookie, if any
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| Cookie::split_parse(raw.to_string()))
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value for a session id
pub fn build_cookie(config: &AppConfig, session_id: &str) -> String {
    let same_site = if config.session.secure {
        SameSite::None
    } else {
        SameSite::Lax
    };

    Cookie::build((config.session.cookie_name.clone(), session_id.to_string()))
        .path("/")
        .http_only(true)
        .secure(config.session.secure)
        .same_site(same_site)
        .max_age(time::Duration::days(config.session.max_age_days))
        .build()
        .to_string()
}

/// Extends the caller's session or starts a new one. Returns the cookie to send,
/// or `None` when the store could not be written; the request carries on either way.
pub async fn touch(state: &AppState, headers: &HeaderMap, user_id: Uuid) -> Option<String> {
    let config = &state.config;
    let max_age = chrono::Duration::days(config.session.max_age_days);

    let existing = match read_cookie(headers, &config.session.cookie_name) {
        Some(id) => match state.store.load_session(&id).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!("Failed to load session: {}", e);
                None
            }
        },
        None => None,
    };

    let session = match existing {
        Some(mut session) if session.user_id == user_id => {
            session.touch(max_age);
            session
        }
        _ => Session::new(user_id, max_age),
    };

    match state.store.save_session(&session).await {
        Ok(()) => Some(build_cookie(config, &session.id)),
        Err(e) => {
            tracing::warn!("Failed to save session for user {}: {}", user_id, e);
            None
        }
    }
}

/// Periodically deletes expired sessions until the runtime shuts down
pub fn spawn_purge_task(store: std::sync::Arc<dyn Storage>, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            match store.purge_expired_sessions().await {
                Ok(0) => {}
                Ok(n) => tracing::info!("Purged {} expired sessions", n),
                Err(e) => tracing::warn!("Session purge failed: {}", e),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn reads_named_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("other=value; project2-cookie=abc123; foo=bar"),
        );
        assert_eq!(read_cookie(&headers, "project2-cookie"), Some("abc123".to_string()));
        assert_eq!(read_cookie(&headers, "missing"), None);
    }

    #[test]
    fn empty_cookie_value_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("project2-cookie="));
        assert_eq!(read_cookie(&headers, "project2-cookie"), None);
    }

    #[test]
    fn development_cookie_is_lax_and_not_secure() {
        let cookie = build_cookie(&AppConfig::development(), "abc");
        assert!(cookie.starts_with("project2-cookie=abc"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=2592000"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn production_cookie_is_cross_site() {
        let cookie = build_cookie(&AppConfig::production(), "abc");
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=None"));
    }
}
