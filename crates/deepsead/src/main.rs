use std::sync::Arc;

use clap::Parser;
use deepsea_api::Client;
use deepsead::{build_registry, build_router, logging, Config};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    logging::init(&config.log_level, config.log_format)?;

    run(config).await
}

async fn run(config: Config) -> anyhow::Result<()> {
    info!(version = env!("CARGO_PKG_VERSION"), "deepsea exporter starting");

    let client = Client::with_base_url(config.token.clone(), &config.api_url)?;
    info!(api = %client.base_url(), "API client initialized");

    let registry = build_registry(&config, Arc::new(client)).await?;
    let router = build_router(registry, &config.metrics_path);

    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    info!(addr = %config.listen, path = %config.metrics_path, "serving metrics");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("deepsea exporter stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
