//! Web server for the marketplace vendor directory and admin dashboard
#![forbid(unsafe_code)]

use marketplace_core::{Config, Error, Result, init_logging};
use marketplace_web::{AppState, build_app};
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load config ({e}), using defaults");
        Config::default()
    });

    let _log_guard = init_logging(&config.logging)?;

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(e);
    }
    if config.backend.api_key.is_empty() {
        warn!("No backend API key configured, requests will be anonymous");
    }

    let state = AppState::from_config(&config)?;
    info!("Loading vendor directory and admin dashboard");
    state.mount().await;

    let app = build_app(state);

    let host: IpAddr = config.server.host.parse().map_err(|e| Error::Configuration {
        message: format!("Invalid server host '{}': {e}", config.server.host),
    })?;
    let addr = SocketAddr::new(host, config.server.port);

    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "Starting marketplace web server");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
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
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received terminate signal, shutting down"),
    }
}
