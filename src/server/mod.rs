pub mod api;
pub mod config;
pub mod error;

pub use api::app_router;
pub use config::Config;

/// Serve the HTTP API until interrupted
pub async fn run(config: Config) -> anyhow::Result<()> {
    let router = app_router(&config);
    log::info!("Listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Failed to listen for shutdown signal: {}", e);
    }
    log::info!("Shutting down");
}
