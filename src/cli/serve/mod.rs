//! Serve command - runs the HTTP API

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;

use crate::api::create_router_with_state;
use crate::config::{AppConfig, ServerConfig};
use crate::infrastructure::logging;
use crate::infrastructure::observability::init_metrics;

/// Run the API server until interrupted
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    let state = crate::create_app_state_with_config(&config).await?;
    let metrics = init_metrics(&config.metrics);
    let app = create_router_with_state(
        state,
        metrics.map(|handle| (handle, config.metrics.path.as_str())),
    );

    let addr = build_socket_addr(&config.server)?;
    info!("Starting Lending Wallet API on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn build_socket_addr(config: &ServerConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.host.parse::<std::net::IpAddr>()?,
        config.port,
    )))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }

    info!("Shutdown signal received");
}
