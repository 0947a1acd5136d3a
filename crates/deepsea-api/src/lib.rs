//! deepsea-api: client for the DigitalOcean block storage API.
//!
//! Exposes the [`StorageService`] seam the collector pages through, the
//! resource and pagination types it returns, and an HTTP implementation
//! backed by `reqwest`.

pub mod client;
pub mod error;
pub mod links;
pub mod types;

use async_trait::async_trait;

pub use client::{Client, DEFAULT_BASE_URL};
pub use error::{ApiError, ApiResult};
pub use links::{Links, Meta, Pages};
pub use types::{ListOptions, ListVolumeParams, Region, Volume, VolumePage};

/// Listing operations of the block storage API.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Fetch one page of volumes.
    ///
    /// The page to fetch is `params.list_options.page`; the returned links
    /// describe where that page sits in the full listing.
    async fn list_volumes(&self, params: &ListVolumeParams) -> ApiResult<VolumePage>;
}
