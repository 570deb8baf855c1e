//! Salesman roster handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{ApiJson, ApiPath, CreateSalesmanRequest, UpdateSalesmanRequest};
use crate::app_state::AppState;
use crate::auth::Session;
use crate::domain::{Role, UserId};
use crate::error::{ErrorResponse, SalesError};
use crate::service::{SalesmanPatch, SalesmanSummary};

/// `GET /salesmen` — The sales staff.
///
/// # Errors
///
/// Returns [`SalesError`] unless signed in as admin.
#[utoipa::path(
    get,
    path = "/api/v1/salesmen",
    tag = "Salesmen",
    summary = "List salesmen",
    description = "Every salesman account, newest first, with the name of its assigned exhibition. Admin only.",
    security(("bearer" = []), ("cookie" = [])),
    responses(
        (status = 200, description = "Salesmen", body = Vec<SalesmanSummary>),
        (status = 401, description = "Not an admin", body = ErrorResponse),
    )
)]
pub async fn list_salesmen(
    State(state): State<AppState>,
    Session(session): Session,
) -> Result<impl IntoResponse, SalesError> {
    Ok(Json(state.roster.list(&session).await?))
}

/// `POST /salesmen` — Create a salesman account.
///
/// # Errors
///
/// Returns [`SalesError`] on missing fields, duplicate username, or
/// non-admin caller.
#[utoipa::path(
    post,
    path = "/api/v1/salesmen",
    tag = "Salesmen",
    summary = "Create a salesman",
    description = "Creates an active, unassigned salesman account.",
    security(("bearer" = []), ("cookie" = [])),
    request_body = CreateSalesmanRequest,
    responses(
        (status = 201, description = "Salesman created", body = SalesmanSummary),
        (status = 400, description = "Missing username or password", body = ErrorResponse),
        (status = 401, description = "Not an admin", body = ErrorResponse),
        (status = 409, description = "Username taken", body = ErrorResponse),
    )
)]
pub async fn create_salesman(
    State(state): State<AppState>,
    Session(session): Session,
    ApiJson(req): ApiJson<CreateSalesmanRequest>,
) -> Result<impl IntoResponse, SalesError> {
    let created = state
        .roster
        .create_salesman(&session, &req.username, &req.password)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /salesmen/{id}` — One salesman.
///
/// # Errors
///
/// Returns [`SalesError`] if absent or the caller is not an admin.
#[utoipa::path(
    get,
    path = "/api/v1/salesmen/{id}",
    tag = "Salesmen",
    summary = "Get a salesman",
    description = "One salesman account. Use `/reports/salesmen/{id}` for sales figures.",
    security(("bearer" = []), ("cookie" = [])),
    params(
        ("id" = uuid::Uuid, Path, description = "User UUID"),
    ),
    responses(
        (status = 200, description = "Salesman", body = SalesmanSummary),
        (status = 401, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Salesman not found", body = ErrorResponse),
    )
)]
pub async fn get_salesman(
    State(state): State<AppState>,
    Session(session): Session,
    ApiPath(id): ApiPath<UserId>,
) -> Result<impl IntoResponse, SalesError> {
    Ok(Json(state.roster.get(&session, id).await?))
}

/// `PATCH /salesmen/{id}` — Activate, deactivate or (re)assign.
///
/// # Errors
///
/// Returns [`SalesError`] on unknown salesman or exhibition, or non-admin
/// caller.
#[utoipa::path(
    patch,
    path = "/api/v1/salesmen/{id}",
    tag = "Salesmen",
    summary = "Update a salesman",
    description = "Sets `is_active` and/or `assigned_exhibition_id`. An empty or null exhibition id unassigns.",
    security(("bearer" = []), ("cookie" = [])),
    params(
        ("id" = uuid::Uuid, Path, description = "User UUID"),
    ),
    request_body = UpdateSalesmanRequest,
    responses(
        (status = 200, description = "Updated salesman", body = SalesmanSummary),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Salesman or exhibition not found", body = ErrorResponse),
    )
)]
pub async fn update_salesman(
    State(state): State<AppState>,
    Session(session): Session,
    ApiPath(id): ApiPath<UserId>,
    ApiJson(req): ApiJson<UpdateSalesmanRequest>,
) -> Result<impl IntoResponse, SalesError> {
    session.require(Role::Admin)?;
    let updated = state
        .roster
        .update(&session, id, SalesmanPatch::try_from(req)?)
        .await?;
    Ok(Json(updated))
}

/// Roster routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/salesmen", get(list_salesmen).post(create_salesman))
        .route("/salesmen/{id}", get(get_salesman).patch(update_salesman))
}
