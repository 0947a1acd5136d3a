//! Pagination metadata attached to list responses.
//!
//! The API links to neighbouring pages by URL. The current page is not
//! reported directly; it is derived from the `prev` link.

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

/// Links to related pages of a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    #[serde(default)]
    pub pages: Option<Pages>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pages {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
}

/// Listing totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub total: u64,
}

impl Links {
    /// True when there is no further page to request.
    pub fn is_last_page(&self) -> bool {
        match &self.pages {
            None => true,
            Some(pages) => non_empty(&pages.next).is_none(),
        }
    }

    /// The page number this response represents.
    ///
    /// Page 1 when there is no `prev` link, otherwise the `prev` link's page
    /// plus one. Fails if the `prev` link carries no usable page number.
    pub fn current_page(&self) -> ApiResult<u32> {
        let Some(prev) = self.pages.as_ref().and_then(|p| non_empty(&p.prev)) else {
            return Ok(1);
        };
        let prev_page = page_for_url(prev)?;
        prev_page
            .checked_add(1)
            .ok_or_else(|| ApiError::Pagination(format!("page number overflow in {prev:?}")))
    }
}

fn non_empty(link: &Option<String>) -> Option<&str> {
    link.as_deref().filter(|l| !l.is_empty())
}

fn page_for_url(raw: &str) -> ApiResult<u32> {
    let url = Url::parse(raw)
        .map_err(|e| ApiError::Pagination(format!("invalid page link {raw:?}: {e}")))?;

    let page = url
        .query_pairs()
        .find(|(key, _)| key == "page")
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| ApiError::Pagination(format!("no page parameter in {raw:?}")))?;

    page.parse::<u32>()
        .map_err(|e| ApiError::Pagination(format!("invalid page {page:?} in {raw:?}: {e}")))
}
