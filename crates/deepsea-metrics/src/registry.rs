//! Registry combining synchronous `prometheus` collectors with async ones.

use std::sync::Arc;

use prometheus::core::{Collector, Desc};
use prometheus::proto::{Metric, MetricFamily};
use tokio::sync::RwLock;
use tracing::debug;

use crate::AsyncCollector;

/// Stands in for an async collector inside the `prometheus` registry, so
/// its metric names are checked against every other registration.
struct Reserved {
    descs: Vec<Desc>,
}

impl Collector for Reserved {
    fn desc(&self) -> Vec<&Desc> {
        self.descs.iter().collect()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        Vec::new()
    }
}

/// Metrics registry shared by every scrape.
///
/// Cloning is cheap; clones share the same collectors.
#[derive(Clone, Default)]
pub struct Registry {
    inner: prometheus::Registry,
    collectors: Arc<RwLock<Vec<Arc<dyn AsyncCollector>>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a synchronous collector such as a counter vector.
    pub fn register(&self, collector: Box<dyn Collector>) -> prometheus::Result<()> {
        self.inner.register(collector)
    }

    /// Register an async collector.
    ///
    /// Fails with [`prometheus::Error::AlreadyReg`] if one of its metric
    /// names is already taken.
    pub async fn register_async(
        &self,
        collector: Arc<dyn AsyncCollector>,
    ) -> prometheus::Result<()> {
        let descs: Vec<Desc> = collector.desc().into_iter().cloned().collect();
        let names: Vec<String> = descs.iter().map(|d| d.fq_name.clone()).collect();

        self.inner.register(Box::new(Reserved { descs }))?;
        self.collectors.write().await.push(collector);

        debug!(metrics = ?names, "async collector registered");
        Ok(())
    }

    /// Gather every registered collector, families ordered by name.
    ///
    /// Async collectors run one after another. Families without any metric
    /// are left out.
    pub async fn gather(&self) -> Vec<MetricFamily> {
        let collectors = self.collectors.read().await.clone();
        let mut families = self.inner.gather();

        for collector in collectors {
            for mut family in collector.collect().await {
                if family.get_metric().is_empty() {
                    continue;
                }
                family
                    .mut_metric()
                    .sort_by(|a, b| label_values(a).cmp(label_values(b)));
                families.push(family);
            }
        }

        families.sort_by(|a, b| a.get_name().cmp(b.get_name()));
        families
    }
}

fn label_values(metric: &Metric) -> impl Iterator<Item = &str> {
    metric.get_label().iter().map(|pair| pair.get_value())
}
