use std::sync::Arc;
use std::time::Duration;

use dispatch_views::api;
use dispatch_views::config::Config;
use dispatch_views::error::AppError;
use dispatch_views::state::{run_session_sweeper, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.clone()))
        .with_target(false)
        .compact()
        .init();

    let http_port = config.http_port;
    let shared_state = Arc::new(AppState::new(config));

    match shared_state.start_map() {
        Ok(phase) => tracing::info!(phase = phase.as_str(), "map view ready"),
        Err(err) => tracing::error!(error = %err, "map view failed to start"),
    }

    let sweep_every = (shared_state.config.session_idle_timeout / 4).max(Duration::from_secs(1));
    tokio::spawn(run_session_sweeper(shared_state.clone(), sweep_every));

    let app = api::rest::router(shared_state.clone());

    let bind_addr = format!("0.0.0.0:{http_port}");
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|err| AppError::Internal(format!("failed to bind {bind_addr}: {err}")))?;

    tracing::info!(http_port, "http server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::Internal(format!("server error: {err}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
