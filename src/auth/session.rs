//! Session extraction and the session cookie.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;

use super::SessionClaims;
use crate::app_state::AppState;
use crate::error::SalesError;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "token";

/// A verified session, extracted from `Authorization: Bearer <token>` or
/// the `token` cookie (the header wins when both are present).
///
/// Rejects with [`SalesError::Unauthorized`] when no token is presented
/// and [`SalesError::InvalidToken`] when the token does not verify.
#[derive(Debug, Clone)]
pub struct Session(pub SessionClaims);

impl FromRequestParts<AppState> for Session {
    type Rejection = SalesError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers).ok_or(SalesError::Unauthorized)?;
        state.auth.verify_token(token).map(Session)
    }
}

/// Pulls the raw session token out of the request headers.
#[must_use]
pub fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if bearer.is_some() {
        return bearer;
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value)
}

/// `Set-Cookie` value that stores `token` for `max_age_secs`.
#[must_use]
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie =
        format!("{SESSION_COOKIE}={token}; HttpOnly; SameSite=Strict; Path=/; Max-Age={max_age_secs}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that deletes the session cookie.
#[must_use]
pub fn clear_session_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}
