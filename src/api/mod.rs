//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Resource endpoints are mounted under `/api/v1`; `/health` sits at the
//! root. With the `swagger-ui` feature the OpenAPI document is served at
//! `/api-docs/openapi.json` and browsable at `/swagger-ui`.

pub mod dto;
pub mod handlers;

use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::app_state::AppState;
use crate::auth::SESSION_COOKIE;
use crate::error::{ErrorBody, ErrorKind, ErrorResponse};

/// OpenAPI description of every endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "expo-sales",
        description = "Order capture and revenue reporting for live retail exhibitions."
    ),
    paths(
        handlers::system::health_handler,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::me,
        handlers::products::list_active,
        handlers::products::list_all,
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::exhibitions::list_exhibitions,
        handlers::exhibitions::list_live,
        handlers::exhibitions::create_exhibition,
        handlers::exhibitions::get_exhibition,
        handlers::exhibitions::update_exhibition,
        handlers::exhibitions::set_status,
        handlers::salesmen::list_salesmen,
        handlers::salesmen::create_salesman,
        handlers::salesmen::get_salesman,
        handlers::salesmen::update_salesman,
        handlers::orders::create_order,
        handlers::orders::list_orders,
        handlers::orders::get_order,
        handlers::reports::dashboard,
        handlers::reports::exhibition_report,
        handlers::reports::exhibition_table,
        handlers::reports::salesman_report,
        handlers::reports::salesman_table,
        handlers::reports::my_report,
    ),
    components(schemas(ErrorResponse, ErrorBody, ErrorKind)),
    modifiers(&SessionSchemes),
    tags(
        (name = "System", description = "Liveness"),
        (name = "Auth", description = "Login and session"),
        (name = "Products", description = "Product catalog"),
        (name = "Exhibitions", description = "Exhibition lifecycle"),
        (name = "Salesmen", description = "Sales staff roster"),
        (name = "Orders", description = "Order capture"),
        (name = "Reports", description = "Revenue reporting"),
    )
)]
pub struct ApiDoc;

/// Registers the two ways a session token can be presented.
#[derive(Debug)]
struct SessionSchemes;

impl Modify for SessionSchemes {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("HMAC-SHA256 signed claims")
                    .build(),
            ),
        );
        components.add_security_scheme(
            "cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
        );
    }
}

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
}

/// Builds the served application: routes, middleware and state.
///
/// Requests running longer than `request_timeout` are answered with
/// `408 Request Timeout`.
pub fn build_app(state: AppState, request_timeout: Duration) -> Router {
    let router = build_router();

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .map_response(|res: axum::response::Response<_>| {
                    res.map(axum::body::Body::new)
                })
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    request_timeout,
                )),
        )
        .with_state(state)
}
