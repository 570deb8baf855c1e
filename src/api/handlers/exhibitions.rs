//! Exhibition handlers: CRUD and status control.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Json, Router};

use crate::api::dto::{
    ApiJson, ApiPath, CreateExhibitionRequest, SetStatusRequest, UpdateExhibitionRequest,
};
use crate::app_state::AppState;
use crate::auth::Session;
use crate::domain::{Exhibition, ExhibitionId, ExhibitionPatch, NewExhibition, Role};
use crate::error::{ErrorResponse, SalesError};
use crate::service::{ExhibitionDetail, ExhibitionSummary};

/// `GET /exhibitions` — Every exhibition with counts.
///
/// # Errors
///
/// Returns [`SalesError`] unless signed in as admin.
#[utoipa::path(
    get,
    path = "/api/v1/exhibitions",
    tag = "Exhibitions",
    summary = "List exhibitions",
    description = "All exhibitions, newest start date first, with order and salesman counts. Admin only.",
    security(("bearer" = []), ("cookie" = [])),
    responses(
        (status = 200, description = "Exhibitions", body = Vec<ExhibitionSummary>),
        (status = 401, description = "Not an admin", body = ErrorResponse),
    )
)]
pub async fn list_exhibitions(
    State(state): State<AppState>,
    Session(session): Session,
) -> Result<impl IntoResponse, SalesError> {
    Ok(Json(state.exhibitions.list(&session).await?))
}

/// `GET /exhibitions/live` — Exhibitions currently taking orders.
///
/// # Errors
///
/// Returns [`SalesError`] if not signed in.
#[utoipa::path(
    get,
    path = "/api/v1/exhibitions/live",
    tag = "Exhibitions",
    summary = "List live exhibitions",
    description = "Exhibitions with status LIVE, newest start date first. Available to every signed-in user.",
    security(("bearer" = []), ("cookie" = [])),
    responses(
        (status = 200, description = "Live exhibitions", body = Vec<Exhibition>),
        (status = 401, description = "Not signed in", body = ErrorResponse),
    )
)]
pub async fn list_live(
    State(state): State<AppState>,
    Session(session): Session,
) -> Result<impl IntoResponse, SalesError> {
    Ok(Json(state.exhibitions.list_live(&session).await?))
}

/// `POST /exhibitions` — Create an exhibition in PLANNING status.
///
/// # Errors
///
/// Returns [`SalesError`] on invalid input or non-admin caller.
#[utoipa::path(
    post,
    path = "/api/v1/exhibitions",
    tag = "Exhibitions",
    summary = "Create an exhibition",
    description = "Creates an exhibition. The status is always PLANNING regardless of input.",
    security(("bearer" = []), ("cookie" = [])),
    request_body = CreateExhibitionRequest,
    responses(
        (status = 201, description = "Exhibition created", body = Exhibition),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Not an admin", body = ErrorResponse),
    )
)]
pub async fn create_exhibition(
    State(state): State<AppState>,
    Session(session): Session,
    ApiJson(req): ApiJson<CreateExhibitionRequest>,
) -> Result<impl IntoResponse, SalesError> {
    session.require(Role::Admin)?;
    let exhibition = state
        .exhibitions
        .create(&session, NewExhibition::try_from(req)?)
        .await?;
    Ok((StatusCode::CREATED, Json(exhibition)))
}

/// `GET /exhibitions/{id}` — One exhibition with its salesmen.
///
/// # Errors
///
/// Returns [`SalesError`] if absent or the caller is not an admin.
#[utoipa::path(
    get,
    path = "/api/v1/exhibitions/{id}",
    tag = "Exhibitions",
    summary = "Get an exhibition",
    description = "Exhibition details with order count and assigned salesmen. Admin only.",
    security(("bearer" = []), ("cookie" = [])),
    params(
        ("id" = uuid::Uuid, Path, description = "Exhibition UUID"),
    ),
    responses(
        (status = 200, description = "Exhibition", body = ExhibitionDetail),
        (status = 401, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Exhibition not found", body = ErrorResponse),
    )
)]
pub async fn get_exhibition(
    State(state): State<AppState>,
    Session(session): Session,
    ApiPath(id): ApiPath<ExhibitionId>,
) -> Result<impl IntoResponse, SalesError> {
    Ok(Json(state.exhibitions.get(&session, id).await?))
}

/// `PATCH /exhibitions/{id}` — Partially update an exhibition.
///
/// # Errors
///
/// Returns [`SalesError`] on invalid input, unknown exhibition, or
/// non-admin caller.
#[utoipa::path(
    patch,
    path = "/api/v1/exhibitions/{id}",
    tag = "Exhibitions",
    summary = "Update an exhibition",
    description = "Partial update of any field, status included.",
    security(("bearer" = []), ("cookie" = [])),
    params(
        ("id" = uuid::Uuid, Path, description = "Exhibition UUID"),
    ),
    request_body = UpdateExhibitionRequest,
    responses(
        (status = 200, description = "Updated exhibition", body = Exhibition),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Exhibition not found", body = ErrorResponse),
    )
)]
pub async fn update_exhibition(
    State(state): State<AppState>,
    Session(session): Session,
    ApiPath(id): ApiPath<ExhibitionId>,
    ApiJson(req): ApiJson<UpdateExhibitionRequest>,
) -> Result<impl IntoResponse, SalesError> {
    session.require(Role::Admin)?;
    let exhibition = state
        .exhibitions
        .update(&session, id, ExhibitionPatch::try_from(req)?)
        .await?;
    Ok(Json(exhibition))
}

/// `PUT /exhibitions/{id}/status` — Move an exhibition to any status.
///
/// # Errors
///
/// Returns [`SalesError`] on unknown status, unknown exhibition, or
/// non-admin caller.
#[utoipa::path(
    put,
    path = "/api/v1/exhibitions/{id}/status",
    tag = "Exhibitions",
    summary = "Set exhibition status",
    description = "Sets PLANNING, LIVE or CLOSED (case-insensitive). Any transition is allowed; only LIVE exhibitions accept orders.",
    security(("bearer" = []), ("cookie" = [])),
    params(
        ("id" = uuid::Uuid, Path, description = "Exhibition UUID"),
    ),
    request_body = SetStatusRequest,
    responses(
        (status = 200, description = "Updated exhibition", body = Exhibition),
        (status = 400, description = "Invalid status", body = ErrorResponse),
        (status = 401, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Exhibition not found", body = ErrorResponse),
    )
)]
pub async fn set_status(
    State(state): State<AppState>,
    Session(session): Session,
    ApiPath(id): ApiPath<ExhibitionId>,
    ApiJson(req): ApiJson<SetStatusRequest>,
) -> Result<impl IntoResponse, SalesError> {
    Ok(Json(
        state
            .exhibitions
            .set_status(&session, id, &req.status)
            .await?,
    ))
}

/// Exhibition routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/exhibitions",
            get(list_exhibitions).post(create_exhibition),
        )
        .route("/exhibitions/live", get(list_live))
        .route(
            "/exhibitions/{id}",
            get(get_exhibition).patch(update_exhibition),
        )
        .route("/exhibitions/{id}/status", put(set_status))
}
