//! Order handlers: placing and browsing sales.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{ApiJson, ApiPath, ApiQuery, CreateOrderRequest, OrderListQuery};
use crate::app_state::AppState;
use crate::auth::Session;
use crate::domain::{Order, OrderId, OrderView};
use crate::error::{ErrorResponse, SalesError};
use crate::service::OrderDraft;

/// `POST /orders` — Record a sale at a live exhibition.
///
/// The product's name, SKU and price are copied into the order, so later
/// catalog edits never change it.
///
/// # Errors
///
/// Returns [`SalesError`] when the order is rejected; see the responses.
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    tag = "Orders",
    summary = "Create an order",
    description = "Places an order as the signed-in salesman. The exhibition defaults to the salesman's assignment and must be LIVE.",
    security(("bearer" = []), ("cookie" = [])),
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = Order),
        (status = 400, description = "Missing or invalid fields", body = ErrorResponse),
        (status = 401, description = "Not an active salesman", body = ErrorResponse),
        (status = 404, description = "Exhibition or product not found", body = ErrorResponse),
        (status = 409, description = "Exhibition is not live", body = ErrorResponse),
    )
)]
pub async fn create_order(
    State(state): State<AppState>,
    Session(session): Session,
    ApiJson(req): ApiJson<CreateOrderRequest>,
) -> Result<impl IntoResponse, SalesError> {
    let order = state
        .orders
        .create(&session, OrderDraft::from(req))
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// `GET /orders` — Orders visible to the caller, newest first.
///
/// # Errors
///
/// Returns [`SalesError`] if not signed in or the query is malformed.
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    tag = "Orders",
    summary = "List orders",
    description = "Admins see every order and may filter by exhibition. Salesmen see only their own.",
    security(("bearer" = []), ("cookie" = [])),
    params(OrderListQuery),
    responses(
        (status = 200, description = "Orders", body = Vec<OrderView>),
        (status = 400, description = "Malformed query", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
    )
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Session(session): Session,
    ApiQuery(query): ApiQuery<OrderListQuery>,
) -> Result<impl IntoResponse, SalesError> {
    Ok(Json(
        state
            .orders
            .list_orders(&session, query.exhibition_id)
            .await?,
    ))
}

/// `GET /orders/{id}` — One order.
///
/// # Errors
///
/// Returns [`SalesError`] if the order is absent or belongs to another
/// salesman.
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    tag = "Orders",
    summary = "Get an order",
    security(("bearer" = []), ("cookie" = [])),
    params(
        ("id" = uuid::Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order", body = OrderView),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse),
    )
)]
pub async fn get_order(
    State(state): State<AppState>,
    Session(session): Session,
    ApiPath(id): ApiPath<OrderId>,
) -> Result<impl IntoResponse, SalesError> {
    Ok(Json(state.orders.get_order(&session, id).await?))
}

/// Order routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/{id}", get(get_order))
}
