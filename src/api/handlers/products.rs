//! Product catalog handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch};
use axum::{Json, Router};

use crate::api::dto::{ApiJson, ApiPath, CreateProductRequest, UpdateProductRequest};
use crate::app_state::AppState;
use crate::auth::Session;
use crate::domain::{Product, ProductId, ProductPatch, Role};
use crate::error::{ErrorResponse, SalesError};
use crate::service::NewProduct;

/// `GET /products` — Active products.
///
/// # Errors
///
/// Returns [`SalesError`] if not signed in.
#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "Products",
    summary = "List active products",
    description = "Active products ordered by name. Available to every signed-in user.",
    security(("bearer" = []), ("cookie" = [])),
    responses(
        (status = 200, description = "Active products", body = Vec<Product>),
        (status = 401, description = "Not signed in", body = ErrorResponse),
    )
)]
pub async fn list_active(
    State(state): State<AppState>,
    Session(session): Session,
) -> Result<impl IntoResponse, SalesError> {
    Ok(Json(state.catalog.list_active(&session).await?))
}

/// `GET /products/all` — Every product, including deactivated ones.
///
/// # Errors
///
/// Returns [`SalesError`] unless signed in as admin.
#[utoipa::path(
    get,
    path = "/api/v1/products/all",
    tag = "Products",
    summary = "List all products",
    description = "Active and inactive products ordered by name. Admin only.",
    security(("bearer" = []), ("cookie" = [])),
    responses(
        (status = 200, description = "All products", body = Vec<Product>),
        (status = 401, description = "Not an admin", body = ErrorResponse),
    )
)]
pub async fn list_all(
    State(state): State<AppState>,
    Session(session): Session,
) -> Result<impl IntoResponse, SalesError> {
    Ok(Json(state.catalog.list_all(&session).await?))
}

/// `POST /products` — Add a product.
///
/// # Errors
///
/// Returns [`SalesError`] on invalid input, duplicate SKU, or non-admin
/// caller.
#[utoipa::path(
    post,
    path = "/api/v1/products",
    tag = "Products",
    summary = "Create a product",
    description = "Adds an active product. `base_price` is a whole number of currency units, sent as a number or numeric string.",
    security(("bearer" = []), ("cookie" = [])),
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Not an admin", body = ErrorResponse),
        (status = 409, description = "SKU already in use", body = ErrorResponse),
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    Session(session): Session,
    ApiJson(req): ApiJson<CreateProductRequest>,
) -> Result<impl IntoResponse, SalesError> {
    // Gate on the role before the body is validated.
    session.require(Role::Admin)?;
    let product = state
        .catalog
        .create(&session, NewProduct::try_from(req)?)
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// `PATCH /products/{id}` — Edit, deactivate or restore a product.
///
/// # Errors
///
/// Returns [`SalesError`] on invalid input, unknown product, duplicate
/// SKU, or non-admin caller.
#[utoipa::path(
    patch,
    path = "/api/v1/products/{id}",
    tag = "Products",
    summary = "Update a product",
    description = "Partial update. Price changes never affect existing orders, which keep the price they were sold at.",
    security(("bearer" = []), ("cookie" = [])),
    params(
        ("id" = uuid::Uuid, Path, description = "Product UUID"),
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Updated product", body = Product),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 409, description = "SKU already in use", body = ErrorResponse),
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    Session(session): Session,
    ApiPath(id): ApiPath<ProductId>,
    ApiJson(req): ApiJson<UpdateProductRequest>,
) -> Result<impl IntoResponse, SalesError> {
    session.require(Role::Admin)?;
    let product = state
        .catalog
        .update(&session, id, ProductPatch::try_from(req)?)
        .await?;
    Ok(Json(product))
}

/// Product routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_active).post(create_product))
        .route("/products/all", get(list_all))
        .route("/products/{id}", patch(update_product))
}
