//! Session middleware for diarylite-web
//!
//! Protected routes require a `diarylite_session` cookie naming a live
//! session. The resolved user is placed in the request extensions as
//! [`CurrentUser`].

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::db::sessions::{self, SESSION_MAX_AGE_DAYS};
use crate::error::ApiError;
use crate::AppState;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "diarylite_session";

/// The logged-in user making the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i64,
}

/// Require a valid session
///
/// Returns 401 Unauthorized when the cookie is missing or names an unknown
/// session.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = session_token(request.headers())
        .ok_or_else(|| ApiError::Unauthorized("Login required".to_string()))?;

    let user_id = sessions::find_user_for_token(&state.db, &token)
        .await?
        .ok_or_else(|| {
            debug!("Rejected request with unknown session token");
            ApiError::Unauthorized("Login required".to_string())
        })?;

    request.extensions_mut().insert(CurrentUser { id: user_id });
    Ok(next.run(request).await)
}

/// Extract the session token from the `Cookie` header(s)
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value starting a session
pub fn session_cookie(token: &str) -> HeaderValue {
    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        SESSION_MAX_AGE_DAYS * 24 * 60 * 60
    );
    // Tokens are hex, so the value is always a valid header
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| clear_session_cookie())
}

/// `Set-Cookie` value ending a session
pub fn clear_session_cookie() -> HeaderValue {
    HeaderValue::from_static("diarylite_session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_cookie(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_token_found_among_other_cookies() {
        let headers = headers_with_cookie("theme=dark; diarylite_session=abc123; lang=en");
        assert_eq!(session_token(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn test_missing_or_empty_token() {
        assert_eq!(session_token(&HeaderMap::new()), None);
        assert_eq!(session_token(&headers_with_cookie("theme=dark")), None);
        assert_eq!(session_token(&headers_with_cookie("diarylite_session=")), None);
    }

    #[test]
    fn test_similar_cookie_name_is_not_matched() {
        let headers = headers_with_cookie("old_diarylite_session=abc");
        assert_eq!(session_token(&headers), None);
    }

    #[test]
    fn test_cookie_values() {
        let cookie = session_cookie("deadbeef");
        assert_eq!(
            cookie.to_str().unwrap(),
            "diarylite_session=deadbeef; Path=/; HttpOnly; SameSite=Lax; Max-Age=2592000"
        );
        assert!(clear_session_cookie().to_str().unwrap().contains("Max-Age=0"));
    }
}
