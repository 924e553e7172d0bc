//! Axum extractor for authenticated requests and session cookie helpers.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;

use crate::app_state::AppState;
use crate::domain::UserId;
use crate::error::ApiError;

/// Name of the session cookie mirroring the bearer token.
pub const SESSION_COOKIE: &str = "jwt";

/// The caller identified by a verified bearer token.
///
/// The token is read from `Authorization: Bearer <token>` first, then
/// from the `jwt` cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// Verified account identifier.
    pub user_id: UserId,
    /// Email claim.
    pub email: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .or_else(|| cookie_token(&parts.headers))
            .ok_or(ApiError::Unauthorized)?;
        let claims = state.tokens.verify(token)?;
        Ok(Self {
            user_id: UserId::from_uuid(claims.sub),
            email: claims.email,
        })
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let token = headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?
        .trim();
    (!token.is_empty()).then_some(token)
}

fn cookie_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| pair.trim().strip_prefix("jwt="))
        .filter(|token| !token.is_empty())
}

/// `Set-Cookie` value carrying a freshly issued token.
#[must_use]
pub fn session_cookie(token: &str, max_age_secs: i64) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; Max-Age={max_age_secs}; HttpOnly; SameSite=Lax")
}

/// `Set-Cookie` value that clears the session cookie.
#[must_use]
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_header_is_parsed() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));
    }

    #[test]
    fn non_bearer_schemes_are_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn cookie_fallback_is_parsed() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; jwt=tok123; x=1"));
        assert_eq!(cookie_token(&headers), Some("tok123"));
    }

    #[test]
    fn cookies_round_trip_names() {
        assert!(session_cookie("t", 60).starts_with("jwt=t;"));
        assert!(clear_session_cookie().contains("Max-Age=0"));
    }
}
