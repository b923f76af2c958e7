//! HTTP server startup.
//!
//! [`serve`] opens the catalog store once, hands it to the API router and runs
//! until Ctrl-C, then closes the store.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api;
use crate::catalog::store::SqliteCatalog;
use crate::config::DosewiseConfig;

/// Open the configured database and serve the API on `server.host:server.port`.
pub async fn serve(config: DosewiseConfig) -> Result<()> {
    let db_path = config.resolved_db_path();
    let store = Arc::new(SqliteCatalog::open(&db_path)?);
    tracing::info!(db = %db_path.display(), "database ready");

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "catalog API listening at http://{bind_addr}");

    serve_with(listener, store.clone(), shutdown_signal()).await?;

    match Arc::try_unwrap(store) {
        Ok(store) => store.close()?,
        Err(_) => tracing::warn!("store still referenced at shutdown; leaving connection to drop"),
    }
    Ok(())
}

/// Serve the API for `store` on an already-bound listener until `shutdown` resolves.
pub async fn serve_with(
    listener: tokio::net::TcpListener,
    store: Arc<SqliteCatalog>,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let router = api::router(store);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .context("server error")?;
    tracing::info!("catalog API shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down catalog API");
}
