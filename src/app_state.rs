//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::auth::{PasswordHasher, TokenSigner};
use crate::config::ServerConfig;
use crate::persistence::Store;
use crate::service::{
    AuthService, CatalogService, ExhibitionService, OrderService, ReportService, RosterService,
};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
///
/// Every service shares one store; cloning the state only bumps
/// reference counts.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Login and session verification.
    pub auth: Arc<AuthService>,
    /// Products.
    pub catalog: Arc<CatalogService>,
    /// Exhibitions.
    pub exhibitions: Arc<ExhibitionService>,
    /// Salesman accounts.
    pub roster: Arc<RosterService>,
    /// Orders.
    pub orders: Arc<OrderService>,
    /// Reports and dashboard.
    pub reports: Arc<ReportService>,
    /// Whether the session cookie is marked `Secure`.
    pub cookie_secure: bool,
}

impl AppState {
    /// Wires every service to `store`.
    #[must_use]
    pub fn new(
        store: &Arc<dyn Store>,
        signer: TokenSigner,
        hasher: PasswordHasher,
        cookie_secure: bool,
    ) -> Self {
        Self {
            auth: Arc::new(AuthService::new(Arc::clone(store), hasher, signer)),
            catalog: Arc::new(CatalogService::new(Arc::clone(store))),
            exhibitions: Arc::new(ExhibitionService::new(Arc::clone(store))),
            roster: Arc::new(RosterService::new(Arc::clone(store), hasher)),
            orders: Arc::new(OrderService::new(Arc::clone(store))),
            reports: Arc::new(ReportService::new(Arc::clone(store))),
            cookie_secure,
        }
    }

    /// Wires every service to `store` with the session and hashing
    /// settings from `config`.
    #[must_use]
    pub fn from_config(store: &Arc<dyn Store>, config: &ServerConfig) -> Self {
        Self::new(
            store,
            TokenSigner::new(config.session_secret.as_bytes(), config.session_ttl_secs),
            PasswordHasher::new(config.bcrypt_cost),
            config.cookie_secure,
        )
    }
}
