//! deepsead: the deepsea exporter daemon.
//!
//! Wires the volume collector and the shared error counter into a metrics
//! registry and serves it over HTTP for Prometheus to scrape.
//!
//! # Usage
//!
//! ```text
//! DIGITALOCEAN_TOKEN=... deepsead --listen 0.0.0.0:9212 --timeout 5s
//! ```

pub mod config;
pub mod logging;
pub mod server;

use std::sync::Arc;

use deepsea_api::StorageService;
use deepsea_collector::{collector_errors, VolumeCollector};
use deepsea_metrics::Registry;
use tracing::info;

pub use config::{Config, LogFormat};
pub use server::{build_router, AppState};

/// Build the registry holding the error counter and the volume collector.
pub async fn build_registry(
    config: &Config,
    storage: Arc<dyn StorageService>,
) -> anyhow::Result<Registry> {
    let registry = Registry::new();

    let errors = collector_errors()?;
    let volumes = VolumeCollector::new(storage, &errors, config.list_params(), config.timeout)?;

    registry.register(Box::new(errors))?;
    registry.register_async(Arc::new(volumes)).await?;

    info!(
        timeout_ms = config.timeout.as_millis() as u64,
        per_page = config.per_page,
        region = config.region.as_deref().unwrap_or("all"),
        "collectors registered"
    );
    Ok(registry)
}
