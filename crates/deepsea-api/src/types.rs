//! Storage API resource types and list parameters.

use serde::{Deserialize, Serialize};

use crate::links::{Links, Meta};

/// The region a resource lives in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub available: bool,
}

/// A block storage volume as returned by the API.
///
/// Missing fields fall back to their empty values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub region: Option<Region>,
    /// Size in gigabytes as the provider defines them (2^30 bytes).
    #[serde(default)]
    pub size_gigabytes: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub droplet_ids: Vec<u64>,
    #[serde(default)]
    pub filesystem_type: String,
    #[serde(default)]
    pub filesystem_label: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Volume {
    /// Region slug, or an empty string if the volume reports no region.
    pub fn region_slug(&self) -> &str {
        self.region.as_ref().map_or("", |r| r.slug.as_str())
    }
}

/// Page cursor and page size for list calls.
///
/// Zero values are left out of the request so the API applies its own
/// defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub page: u32,
    pub per_page: u32,
}

/// Parameters for listing volumes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListVolumeParams {
    /// Only volumes in this region.
    pub region: Option<String>,
    /// Only volumes with this name.
    pub name: Option<String>,
    pub list_options: ListOptions,
}

impl ListVolumeParams {
    /// Query string pairs for this request, in a stable order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if self.list_options.page > 0 {
            pairs.push(("page", self.list_options.page.to_string()));
        }
        if self.list_options.per_page > 0 {
            pairs.push(("per_page", self.list_options.per_page.to_string()));
        }
        if let Some(region) = self.region.as_deref().filter(|r| !r.is_empty()) {
            pairs.push(("region", region.to_string()));
        }
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            pairs.push(("name", name.to_string()));
        }
        pairs
    }
}

/// One page of a volume listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumePage {
    #[serde(default)]
    pub volumes: Vec<Volume>,
    #[serde(default)]
    pub links: Option<Links>,
    #[serde(default)]
    pub meta: Option<Meta>,
}
