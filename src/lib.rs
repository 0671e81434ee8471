pub mod api;
pub mod booking; // Booking wizard, sessions, view projection
pub mod config;
pub mod content;
pub mod core_state; // Transport-agnostic state
pub mod dashboard; // Staff dashboard: scope, aggregates, registry
pub mod db;
pub mod models;
pub mod national_id;
pub mod receipt;
pub mod reference;
pub mod self_service; // "Minhas Consultas"
pub mod triage;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::core_state::{CoreError, CoreState};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("State initialisation failed: {0}")]
    Core(#[from] CoreError),
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Start the service and block until Ctrl-C.
pub async fn run() -> Result<(), StartupError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = AppConfig::from_env();
    let bind_addr = config.bind_addr;
    let core = Arc::new(CoreState::open(config)?);

    let server = api::start_api_server(core, bind_addr).await?;
    tracing::info!(addr = %server.addr(), "Listening");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Ctrl-C received, shutting down");
    server.stop().await;

    Ok(())
}
