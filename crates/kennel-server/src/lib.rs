//! kennel-server: HTTP API over the photograph records of the kennel.
//!
//! This crate ties the other kennel crates into a running server:
//!
//! - [`photos`]: the photo service plus its form binding and file storage
//! - Axum routes for listing, details, create/edit/delete and image serving
//! - Request-id middleware, request tracing, and an OpenAPI document
//! - Graceful shutdown via signal handling

pub mod context;
pub mod error;
pub mod middleware;
pub mod photos;
pub mod router;
pub mod routes;

use std::net::SocketAddr;

use kennel_core::config::Config;

use crate::context::AppContext;

/// Start the kennel server.
///
/// Opens (or creates) the database, builds the [`AppContext`], and serves
/// the router until a shutdown signal arrives.
pub async fn start(config: Config) -> kennel_core::Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    let db_path = &config.server.db_path;
    let existed = db_path.exists();
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
            tracing::info!("Created database directory {}", parent.display());
        }
    }
    let db_str = db_path.to_string_lossy();
    let db = kennel_db::pool::init_pool(&db_str)?;
    if existed {
        tracing::info!("Database opened (existing) at {db_str}");
    } else {
        tracing::info!("Database created (new) at {db_str}");
    }

    std::fs::create_dir_all(&config.photos.storage_dir)?;
    tracing::info!(
        "Storing photographs under {}",
        config.photos.storage_dir.display()
    );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| kennel_core::Error::Internal(format!("Invalid server address: {e}")))?;

    let app = router::build_router(AppContext::new(config, db));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| kennel_core::Error::Internal(format!("Failed to bind to {addr}: {e}")))?;
    tracing::info!("Starting server on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received");
}
