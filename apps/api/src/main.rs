//! # StockMaster API Server
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AppConfig::load()      defaults → stockmaster.toml → STOCKMASTER_*    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  init_tracing()         RUST_LOG overrides log_filter                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new()        SQLite pool + embedded migrations               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  axum::serve()          until Ctrl+C / SIGTERM, then pool closed        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use stockmaster_api::config::AppConfig;
use stockmaster_api::{init_tracing, router, AppState};
use stockmaster_db::{Database, DbConfig};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_tracing(&config.log_filter);

    info!("Starting StockMaster API server...");
    info!(
        environment = ?config.environment,
        status_policy = ?config.status_policy,
        database = %config.database_path,
        "Configuration loaded"
    );

    let db = Database::new(
        DbConfig::new(&config.database_path)
            .max_connections(config.max_connections)
            .status_policy(config.status_policy),
    )
    .await?;
    info!("Database ready");

    let addr = config.bind_address();
    let state = AppState::new(db.clone(), config);
    let app = router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
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
                warn!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received, starting graceful shutdown...");
}
