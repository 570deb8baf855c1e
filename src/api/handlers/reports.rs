//! Reporting handlers: dashboard, per-exhibition and per-salesman rollups.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::ApiPath;
use crate::app_state::AppState;
use crate::auth::Session;
use crate::domain::{ExhibitionId, ReportTable, UserId};
use crate::error::{ErrorResponse, SalesError};
use crate::service::{Dashboard, ExhibitionReport, SalesmanReport};

/// `GET /reports/dashboard` — System-wide totals and recent orders.
///
/// # Errors
///
/// Returns [`SalesError`] unless signed in as admin.
#[utoipa::path(
    get,
    path = "/api/v1/reports/dashboard",
    tag = "Reports",
    summary = "Admin dashboard",
    description = "Total orders, live exhibition count, total revenue and the five newest orders.",
    security(("bearer" = []), ("cookie" = [])),
    responses(
        (status = 200, description = "Dashboard", body = Dashboard),
        (status = 401, description = "Not an admin", body = ErrorResponse),
    )
)]
pub async fn dashboard(
    State(state): State<AppState>,
    Session(session): Session,
) -> Result<impl IntoResponse, SalesError> {
    Ok(Json(state.reports.system_dashboard(&session).await?))
}

/// `GET /reports/exhibitions/{id}` — Revenue rollup for one exhibition.
///
/// # Errors
///
/// Returns [`SalesError`] if the exhibition is absent or the caller is not
/// an admin.
#[utoipa::path(
    get,
    path = "/api/v1/reports/exhibitions/{id}",
    tag = "Reports",
    summary = "Exhibition report",
    description = "Order count, revenue, average order value, top products and every order of one exhibition.",
    security(("bearer" = []), ("cookie" = [])),
    params(
        ("id" = uuid::Uuid, Path, description = "Exhibition UUID"),
    ),
    responses(
        (status = 200, description = "Report", body = ExhibitionReport),
        (status = 401, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Exhibition not found", body = ErrorResponse),
    )
)]
pub async fn exhibition_report(
    State(state): State<AppState>,
    Session(session): Session,
    ApiPath(id): ApiPath<ExhibitionId>,
) -> Result<impl IntoResponse, SalesError> {
    Ok(Json(state.reports.exhibition_report(&session, id).await?))
}

/// `GET /reports/exhibitions/{id}/table` — Exportable order table.
///
/// # Errors
///
/// Same as [`exhibition_report`].
#[utoipa::path(
    get,
    path = "/api/v1/reports/exhibitions/{id}/table",
    tag = "Reports",
    summary = "Exhibition order table",
    description = "The exhibition's orders as titled columns and typed rows, ready for CSV or PDF rendering.",
    security(("bearer" = []), ("cookie" = [])),
    params(
        ("id" = uuid::Uuid, Path, description = "Exhibition UUID"),
    ),
    responses(
        (status = 200, description = "Table", body = ReportTable),
        (status = 401, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Exhibition not found", body = ErrorResponse),
    )
)]
pub async fn exhibition_table(
    State(state): State<AppState>,
    Session(session): Session,
    ApiPath(id): ApiPath<ExhibitionId>,
) -> Result<impl IntoResponse, SalesError> {
    Ok(Json(state.reports.exhibition_table(&session, id).await?))
}

/// `GET /reports/salesmen/{id}` — Sales of one salesman.
///
/// # Errors
///
/// Returns [`SalesError`] if the salesman is absent or the caller is not
/// an admin.
#[utoipa::path(
    get,
    path = "/api/v1/reports/salesmen/{id}",
    tag = "Reports",
    summary = "Salesman report",
    security(("bearer" = []), ("cookie" = [])),
    params(
        ("id" = uuid::Uuid, Path, description = "User UUID"),
    ),
    responses(
        (status = 200, description = "Report", body = SalesmanReport),
        (status = 401, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Salesman not found", body = ErrorResponse),
    )
)]
pub async fn salesman_report(
    State(state): State<AppState>,
    Session(session): Session,
    ApiPath(id): ApiPath<UserId>,
) -> Result<impl IntoResponse, SalesError> {
    Ok(Json(state.reports.salesman_report(&session, id).await?))
}

/// `GET /reports/salesmen/{id}/table` — Exportable order table.
///
/// # Errors
///
/// Same as [`salesman_report`].
#[utoipa::path(
    get,
    path = "/api/v1/reports/salesmen/{id}/table",
    tag = "Reports",
    summary = "Salesman order table",
    security(("bearer" = []), ("cookie" = [])),
    params(
        ("id" = uuid::Uuid, Path, description = "User UUID"),
    ),
    responses(
        (status = 200, description = "Table", body = ReportTable),
        (status = 401, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Salesman not found", body = ErrorResponse),
    )
)]
pub async fn salesman_table(
    State(state): State<AppState>,
    Session(session): Session,
    ApiPath(id): ApiPath<UserId>,
) -> Result<impl IntoResponse, SalesError> {
    Ok(Json(state.reports.salesman_table(&session, id).await?))
}

/// `GET /reports/me` — The signed-in salesman's own sales.
///
/// # Errors
///
/// Returns [`SalesError`] unless signed in as a salesman.
#[utoipa::path(
    get,
    path = "/api/v1/reports/me",
    tag = "Reports",
    summary = "My sales",
    security(("bearer" = []), ("cookie" = [])),
    responses(
        (status = 200, description = "Report", body = SalesmanReport),
        (status = 401, description = "Not a salesman", body = ErrorResponse),
    )
)]
pub async fn my_report(
    State(state): State<AppState>,
    Session(session): Session,
) -> Result<impl IntoResponse, SalesError> {
    Ok(Json(state.reports.my_report(&session).await?))
}

/// Report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/dashboard", get(dashboard))
        .route("/reports/me", get(my_report))
        .route("/reports/exhibitions/{id}", get(exhibition_report))
        .route("/reports/exhibitions/{id}/table", get(exhibition_table))
        .route("/reports/salesmen/{id}", get(salesman_report))
        .route("/reports/salesmen/{id}/table", get(salesman_table))
}
