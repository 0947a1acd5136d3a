//! Volume collector: exposes the size of every block storage volume.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use deepsea_api::{ListVolumeParams, StorageService, Volume};
use deepsea_metrics::AsyncCollector;
use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{GaugeVec, IntCounter, IntCounterVec, Opts};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::mapper::{volume_sample, SIZE_LABELS};
use crate::walker::list_all_volumes;

/// Value of the `subsystem` label on the error counter.
pub const SUBSYSTEM: &str = "volume";

pub const SIZE_METRIC: &str = "digitalocean_volume_size_bytes";
const SIZE_HELP: &str = "Volume's size in bytes";

/// Collects the size of all volumes on each scrape.
///
/// Every scrape lists the volumes afresh under `timeout`. A failed listing
/// increments the error counter and yields no size series at all.
pub struct VolumeCollector {
    storage: Arc<dyn StorageService>,
    errors: IntCounter,
    params: ListVolumeParams,
    timeout: Duration,
    size: Desc,
}

impl VolumeCollector {
    /// Create a collector.
    ///
    /// The `volume` child of `errors` is created here, so it is exposed at
    /// zero before the first failure.
    pub fn new(
        storage: Arc<dyn StorageService>,
        errors: &IntCounterVec,
        params: ListVolumeParams,
        timeout: Duration,
    ) -> prometheus::Result<Self> {
        let errors = errors.get_metric_with_label_values(&[SUBSYSTEM])?;
        let size = Desc::new(
            SIZE_METRIC.to_string(),
            SIZE_HELP.to_string(),
            SIZE_LABELS.iter().map(|l| l.to_string()).collect(),
            HashMap::new(),
        )?;

        Ok(Self {
            storage,
            errors,
            params,
            timeout,
            size,
        })
    }

    /// A fresh gauge vector holding one series per volume.
    fn size_gauges(volumes: &[Volume]) -> prometheus::Result<GaugeVec> {
        let gauges = GaugeVec::new(Opts::new(SIZE_METRIC, SIZE_HELP), &SIZE_LABELS)?;
        for volume in volumes {
            let sample = volume_sample(volume);
            gauges
                .get_metric_with_label_values(&sample.label_values)?
                .set(sample.bytes);
        }
        Ok(gauges)
    }
}

#[async_trait]
impl AsyncCollector for VolumeCollector {
    fn desc(&self) -> Vec<&Desc> {
        vec![&self.size]
    }

    async fn collect(&self) -> Vec<MetricFamily> {
        let deadline = Instant::now() + self.timeout;

        let walk = match list_all_volumes(&*self.storage, &self.params, deadline).await {
            Ok(walk) => walk,
            Err(e) => {
                self.errors.inc();
                warn!(
                    error = %e.describe(),
                    timed_out = e.is_timeout(),
                    subsystem = SUBSYSTEM,
                    "can't list volumes"
                );
                return Vec::new();
            }
        };

        debug!(
            volumes = walk.volumes.len(),
            pages = walk.pages,
            reported_total = walk.reported_total,
            "listed volumes"
        );

        match Self::size_gauges(&walk.volumes) {
            Ok(gauges) => gauges.collect(),
            Err(e) => {
                warn!(error = %e, subsystem = SUBSYSTEM, "can't build volume size series");
                Vec::new()
            }
        }
    }
}
