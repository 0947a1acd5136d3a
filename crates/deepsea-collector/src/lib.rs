//! deepsea-collector: turns the volume listing into size metrics.
//!
//! # Architecture
//!
//! ```text
//! VolumeCollector (AsyncCollector)
//!   ├── desc()    → digitalocean_volume_size_bytes{id,name,region}
//!   └── collect() ← per scrape
//!         ├── list_all_volumes() → Walk | FetchError   (one deadline)
//!         ├── volume_sample() per volume → GaugeVec
//!         └── errors{subsystem="volume"} += 1 on failure
//! ```

pub mod mapper;
pub mod volume;
pub mod walker;

#[cfg(test)]
mod testing;

use prometheus::{IntCounterVec, Opts};

pub use mapper::{size_bytes, volume_sample, VolumeSample, BYTES_PER_GIGABYTE, SIZE_LABELS};
pub use volume::{VolumeCollector, SIZE_METRIC, SUBSYSTEM};
pub use walker::{list_all_volumes, FetchError, Walk, FIRST_PAGE};

pub const ERRORS_METRIC: &str = "digitalocean_errors_total";

/// The shared error counter, partitioned by collector subsystem.
///
/// Register it once with the registry and hand it to every collector.
pub fn collector_errors() -> prometheus::Result<IntCounterVec> {
    IntCounterVec::new(
        Opts::new(ERRORS_METRIC, "The total number of errors per collector"),
        &["subsystem"],
    )
}
