//! expo-sales server entry point.
//!
//! Loads configuration, opens the store, seeds the bootstrap admin and
//! serves the REST API until Ctrl-C.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use expo_sales::api;
use expo_sales::app_state::AppState;
use expo_sales::auth::PasswordHasher;
use expo_sales::config::{LogFormat, ServerConfig};
use expo_sales::persistence::{MemoryStore, PostgresStore, Store};
use expo_sales::service::ensure_admin;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;
    init_tracing(config.log_format);
    tracing::info!(addr = %config.listen_addr, "starting expo-sales");
    if config.uses_dev_secret() {
        tracing::warn!("SESSION_SECRET is unset; using the development secret");
    }

    let store = open_store(&config).await?;

    if let Some(password) = config.admin_password.as_deref() {
        let hasher = PasswordHasher::new(config.bcrypt_cost);
        ensure_admin(store.as_ref(), &hasher, &config.admin_username, password)
            .await
            .context("seeding the bootstrap admin")?;
    }

    let state = AppState::from_config(&store, &config);
    let app = api::build_app(state, Duration::from_secs(config.request_timeout_secs));

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn open_store(config: &ServerConfig) -> anyhow::Result<Arc<dyn Store>> {
    if !config.persistence_enabled {
        tracing::warn!("persistence disabled; data lives in memory only");
        return Ok(Arc::new(MemoryStore::new()));
    }
    let store = PostgresStore::connect(config)
        .await
        .context("connecting to PostgreSQL")?;
    store.migrate().await.context("running migrations")?;
    tracing::info!("connected to PostgreSQL");
    Ok(Arc::new(store))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
