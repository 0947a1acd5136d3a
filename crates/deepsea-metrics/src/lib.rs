//! deepsea-metrics: async collectors on top of the `prometheus` registry.
//!
//! `prometheus` gathers synchronously. Collectors that have to await remote
//! calls on every scrape implement [`AsyncCollector`] instead; the
//! [`Registry`] runs them after the synchronous collectors and merges the
//! result into one exposition.
//!
//! # Architecture
//!
//! ```text
//! Registry
//!   ├── register(Box<dyn prometheus::core::Collector>) ← counters, once
//!   ├── register_async(Arc<dyn AsyncCollector>)        ← once at startup
//!   └── gather().await → Vec<MetricFamily>             ← per scrape
//!
//! encode_text() → text/plain body for the scrape endpoint
//! ```

pub mod exposition;
pub mod registry;

use async_trait::async_trait;
use prometheus::core::Desc;
use prometheus::proto::MetricFamily;

pub use exposition::{encode_text, CONTENT_TYPE};
pub use registry::Registry;

/// A collector whose `collect` awaits.
///
/// Mirrors [`prometheus::core::Collector`]. Implementations may be called
/// concurrently from several scrapes.
#[async_trait]
pub trait AsyncCollector: Send + Sync {
    /// Descriptors of every metric `collect` can return. Must not change
    /// over the collector's lifetime.
    fn desc(&self) -> Vec<&Desc>;

    /// Produce the current metric families.
    async fn collect(&self) -> Vec<MetricFamily>;
}
