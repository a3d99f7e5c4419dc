use axum::Router;
use common::utils::logging::init_logging_from_env;
use configs::AppConfig;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, ServerState};
use service::{catalog, runtime};

/// Build the router for a validated config.
pub fn build_app(cfg: &AppConfig) -> Router {
    let state = ServerState { catalog: catalog::from_config(&cfg.storage) };
    routes::build_router(state, routes::build_cors())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("received Ctrl+C, draining in-flight requests");
    }
}

/// Public entry: load config, build the app and run the HTTP server
pub async fn run() -> Result<(), StartupError> {
    dotenv().ok();
    init_logging_from_env();

    let cfg = AppConfig::load_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    runtime::ensure_env(None, &cfg.storage).await?;

    let app = build_app(&cfg);

    let (host, port) = (cfg.server.host.as_str(), cfg.server.port);
    let listener = TcpListener::bind((host, port)).await?;
    info!(addr = %listener.local_addr()?, "starting catalog server");
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}
