//! mq-server: HTTP front end for the menu database.
//!
//! Ties the session layer, menu service, and handlebars views together
//! into an Axum application with graceful shutdown.

pub mod context;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod service;
pub mod views;

use std::net::SocketAddr;

use mq_core::config::Config;
use mq_db::seed::seed_fixtures;
use mq_db::SessionFactory;

use crate::context::AppContext;

/// Start the menuql server.
///
/// Opens (or creates) the database, optionally seeds fixture data, and
/// serves HTTP until a shutdown signal arrives.
pub async fn start(config: Config) -> mq_core::Result<()> {
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
    let db = mq_db::pool::init_pool(&db_str, config.database.pool_size.max(1))?;
    if existed {
        tracing::info!("Database opened (existing) at {db_str}");
    } else {
        tracing::info!("Database created (new) at {db_str}");
    }

    let sessions = SessionFactory::new(db);
    if config.database.seed_fixtures {
        seed_fixtures(&sessions.open_session()?)?;
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| mq_core::Error::Internal(format!("Invalid server address: {e}")))?;

    let ctx = AppContext::new(sessions, config)?;
    let app = router::build_router(ctx);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| mq_core::Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Starting server on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
