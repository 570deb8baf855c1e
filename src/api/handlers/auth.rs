//! Session handlers: login, logout, current user.

use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::SET_COOKIE;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{ApiJson, LoginRequest};
use crate::app_state::AppState;
use crate::auth::Session;
use crate::auth::session::{clear_session_cookie, session_cookie};
use crate::domain::UserProfile;
use crate::error::{ErrorResponse, SalesError};
use crate::service::LoginOutcome;

/// `POST /auth/login` — Exchange credentials for a session.
///
/// # Errors
///
/// Returns [`SalesError`] on missing fields or bad credentials.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    summary = "Log in",
    description = "Checks the credentials and returns a signed session token. The token is also set as an HttpOnly `token` cookie.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginOutcome),
        (status = 400, description = "Missing username or password", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, SalesError> {
    let outcome = state.auth.login(&req.username, &req.password).await?;
    let cookie = session_cookie(&outcome.token, outcome.expires_in, state.cookie_secure);
    Ok(([(SET_COOKIE, cookie)], Json(outcome)))
}

/// `POST /auth/logout` — Clear the session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Auth",
    summary = "Log out",
    description = "Expires the session cookie. Tokens are stateless, so a copied bearer token stays valid until it expires.",
    responses(
        (status = 204, description = "Cookie cleared"),
    )
)]
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [(SET_COOKIE, clear_session_cookie(state.cookie_secure))],
    )
}

/// `GET /auth/me` — The signed-in account.
///
/// # Errors
///
/// Returns [`SalesError`] if the session is missing, invalid, or the
/// account was deactivated.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Auth",
    summary = "Current user",
    description = "Returns the profile of the signed-in account, read fresh from the store.",
    security(("bearer" = []), ("cookie" = [])),
    responses(
        (status = 200, description = "Current user", body = UserProfile),
        (status = 401, description = "Not signed in", body = ErrorResponse),
    )
)]
pub async fn me(
    State(state): State<AppState>,
    Session(session): Session,
) -> Result<impl IntoResponse, SalesError> {
    Ok(Json(state.auth.me(&session).await?))
}

/// Session routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}
