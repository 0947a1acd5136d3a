//! Error types for the storage API client.

use thiserror::Error;

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by the storage API client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{status} {id}: {message}")]
    Response {
        status: u16,
        id: String,
        message: String,
        request_id: Option<String>,
    },

    #[error("malformed response body: {0}")]
    Decode(String),

    #[error("malformed pagination links: {0}")]
    Pagination(String),

    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// HTTP status of an API error response, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Response { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the request never completed because it timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Transport(e) if e.is_timeout())
    }

    /// Human-readable description of the cause, including the request id
    /// the API assigned when there is one.
    pub fn describe(&self) -> String {
        match self {
            ApiError::Response {
                request_id: Some(request_id),
                ..
            } => format!("{self} (request id {request_id})"),
            _ => self.to_string(),
        }
    }
}
