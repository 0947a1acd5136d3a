//! Pagination walker: retrieves a complete volume listing page by page.
//!
//! The walk is a small state machine with one transition per page:
//!
//! ```text
//! Fetching(page) ──ok──▶ Accumulating(batch) ──last page──▶ Done
//!      │                        │
//!      │ api error              ├──more pages──▶ Fetching(current + 1)
//!      ▼                        │
//!    Failed ◀──bad links────────┘
//! ```
//!
//! The whole walk runs under one deadline. On any failure the records
//! accumulated so far are dropped with the walk; callers see all pages or
//! nothing. There are no retries within a walk.

use std::time::Duration;

use deepsea_api::{ApiError, ListVolumeParams, StorageService, Volume, VolumePage};
use thiserror::Error;
use tokio::time::Instant;
use tracing::trace;

/// First page number of a listing.
pub const FIRST_PAGE: u32 = 1;

/// Why a walk produced no listing.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request for page {page} failed: {source}")]
    Remote {
        page: u32,
        #[source]
        source: ApiError,
    },

    #[error("can't determine page after page {page}: {source}")]
    Pagination {
        page: u32,
        #[source]
        source: ApiError,
    },

    #[error("deadline exceeded after {elapsed:?} and {pages} page(s)")]
    DeadlineExceeded { pages: u32, elapsed: Duration },
}

impl FetchError {
    /// Description for logs. Unlike `Display`, includes the request id the
    /// API assigned to a failed request.
    pub fn describe(&self) -> String {
        match self {
            FetchError::Remote { page, source } => {
                format!("request for page {page} failed: {}", source.describe())
            }
            _ => self.to_string(),
        }
    }

    /// Whether the walk ran out of time, either on the cycle deadline or on
    /// a client-side request timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            FetchError::DeadlineExceeded { .. } => true,
            FetchError::Remote { source, .. } => source.is_timeout(),
            FetchError::Pagination { .. } => false,
        }
    }
}

/// A complete listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Walk {
    pub volumes: Vec<Volume>,
    /// Number of pages requested.
    pub pages: u32,
    /// Volume total the API reported on the last page, if it sent one.
    pub reported_total: Option<u64>,
}

enum WalkState {
    Fetching { page: u32 },
    Accumulating { page: u32, batch: VolumePage },
    Done,
    Failed(FetchError),
}

/// List every volume, failing if the walk has not finished by `deadline`.
///
/// Hitting the deadline drops the in-flight request.
pub async fn list_all_volumes<S>(
    service: &S,
    params: &ListVolumeParams,
    deadline: Instant,
) -> Result<Walk, FetchError>
where
    S: StorageService + ?Sized,
{
    let started = Instant::now();
    let mut pages = 0;
    let result = tokio::time::timeout_at(deadline, walk(service, params, &mut pages)).await;
    match result {
        Ok(result) => result,
        Err(_) => Err(FetchError::DeadlineExceeded {
            pages,
            elapsed: started.elapsed(),
        }),
    }
}

async fn walk<S>(
    service: &S,
    params: &ListVolumeParams,
    pages: &mut u32,
) -> Result<Walk, FetchError>
where
    S: StorageService + ?Sized,
{
    let mut params = params.clone();
    let mut volumes = Vec::new();
    let mut reported_total = None;
    let mut state = WalkState::Fetching { page: FIRST_PAGE };

    loop {
        state = match state {
            WalkState::Fetching { page } => {
                params.list_options.page = page;
                *pages += 1;
                trace!(page, "requesting volume page");
                match service.list_volumes(&params).await {
                    Ok(batch) => WalkState::Accumulating { page, batch },
                    Err(source) => WalkState::Failed(FetchError::Remote { page, source }),
                }
            }
            WalkState::Accumulating { page, batch } => {
                volumes.extend(batch.volumes);
                if let Some(meta) = batch.meta {
                    reported_total = Some(meta.total);
                }
                match batch.links {
                    None => WalkState::Done,
                    Some(links) if links.is_last_page() => WalkState::Done,
                    Some(links) => match links.current_page() {
                        Ok(current) => WalkState::Fetching {
                            page: current.saturating_add(1),
                        },
                        Err(source) => WalkState::Failed(FetchError::Pagination { page, source }),
                    },
                }
            }
            WalkState::Done => {
                return Ok(Walk {
                    volumes,
                    pages: *pages,
                    reported_total,
                });
            }
            WalkState::Failed(err) => return Err(err),
        };
    }
}
