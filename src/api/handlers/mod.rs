//! REST endpoint handlers organized by resource.

pub mod auth;
pub mod exhibitions;
pub mod orders;
pub mod products;
pub mod reports;
pub mod salesmen;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::routes())
        .merge(products::routes())
        .merge(exhibitions::routes())
        .merge(salesmen::routes())
        .merge(orders::routes())
        .merge(reports::routes())
}
