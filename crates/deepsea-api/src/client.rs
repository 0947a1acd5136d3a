//! HTTP client for the DigitalOcean v2 API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::types::{ListVolumeParams, VolumePage};
use crate::StorageService;

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.digitalocean.com";

const USER_AGENT: &str = concat!("deepsea/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Body of a non-2xx API response.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    id: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    request_id: Option<String>,
}

/// Authenticated API client.
///
/// Request deadlines are left to the caller; only connection setup is
/// bounded here.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
    token: String,
}

impl Client {
    /// Create a client for the production API.
    pub fn new(token: impl Into<String>) -> ApiResult<Self> {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom endpoint.
    pub fn with_base_url(token: impl Into<String>, base_url: &str) -> ApiResult<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ApiError::Config("API token is empty".to_string()));
        }

        let mut base_url = Url::parse(base_url)
            .map_err(|e| ApiError::Config(format!("invalid base url {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Config(format!("invalid base url {base_url}")));
        }
        // Keep any path prefix when joining resource paths.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn volumes_url(&self, params: &ListVolumeParams) -> ApiResult<Url> {
        let mut url = self
            .base_url
            .join("v2/volumes")
            .map_err(|e| ApiError::Config(format!("invalid volumes url: {e}")))?;
        let pairs = params.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }
}

#[async_trait]
impl StorageService for Client {
    async fn list_volumes(&self, params: &ListVolumeParams) -> ApiResult<VolumePage> {
        let url = self.volumes_url(params)?;
        debug!(%url, "listing volumes");

        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = resp.status();
        let body = resp.bytes().await?;
        if !status.is_success() {
            return Err(error_from_response(status, &body));
        }

        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

fn error_from_response(status: StatusCode, body: &[u8]) -> ApiError {
    let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();

    let message = if !parsed.message.is_empty() {
        parsed.message
    } else {
        let text = String::from_utf8_lossy(body).trim().to_string();
        if text.is_empty() {
            status.canonical_reason().unwrap_or("unknown error").to_string()
        } else {
            text
        }
    };

    ApiError::Response {
        status: status.as_u16(),
        id: parsed.id,
        message,
        request_id: parsed.request_id,
    }
}
