//! Error types for the market-data core
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

// == Market Error Enum ==
/// Classified failure of a market-data fetch.
///
/// Only produced when no stale cache entry could rescue the call. The
/// `Display` output is the human-readable message shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketError {
    /// Upstream answered 429
    #[error("Rate limit exceeded. Please try again in a moment.")]
    RateLimited,

    /// Upstream answered 5xx
    #[error("Server error. Please try again later.")]
    ServerError { status: u16 },

    /// Upstream answered with another non-2xx status
    #[error("{message}")]
    ClientError { status: u16, message: String },

    /// Request exceeded the timeout budget
    #[error("Request timeout. Please check your connection.")]
    Timeout,

    /// No response was received
    #[error("Network error. Please check your internet connection.")]
    NetworkUnreachable,

    /// Anything else
    #[error("An unexpected error occurred.")]
    Unknown,
}

// == Transport Error ==
/// Low-level failure reported by the upstream transport.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// A response arrived with a non-success status code
    #[error("upstream returned status {status}")]
    Status { status: u16, detail: Option<String> },

    #[error("request timed out")]
    Timeout,

    /// The request never produced a response (DNS, connect, reset)
    #[error("no response received: {0}")]
    NoResponse(String),

    /// Body decoding or any other unexpected failure
    #[error("unexpected transport failure: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if let Some(status) = err.status() {
            TransportError::Status {
                status: status.as_u16(),
                detail: None,
            }
        } else if err.is_connect() || err.is_request() {
            TransportError::NoResponse(err.to_string())
        } else {
            TransportError::Other(err.to_string())
        }
    }
}

impl From<TransportError> for MarketError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Status { status: 429, .. } => MarketError::RateLimited,
            TransportError::Status { status, .. } if status >= 500 => {
                MarketError::ServerError { status }
            }
            TransportError::Status { status, detail } => MarketError::ClientError {
                status,
                message: detail
                    .filter(|d| !d.trim().is_empty())
                    .unwrap_or_else(|| format!("Request failed ({})", status)),
            },
            TransportError::Timeout => MarketError::Timeout,
            TransportError::NoResponse(_) => MarketError::NetworkUnreachable,
            TransportError::Other(_) => MarketError::Unknown,
        }
    }
}

/// Error body shapes the upstream API uses for non-2xx responses.
#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    error: Option<String>,
    status: Option<UpstreamErrorStatus>,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorStatus {
    error_message: Option<String>,
}

/// Extracts the upstream error detail from a response body, if it has one.
pub fn upstream_error_detail(body: &str) -> Option<String> {
    let parsed: UpstreamErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .error
        .or_else(|| parsed.status.and_then(|s| s.error_message))
}

// == Storage Error ==
/// Failure of the key-value persistence backend.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

// == Cache Error ==
/// Internal cache failure. Always recovered locally as a miss or no-op.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Stored payload could not be decoded
    #[error("Corrupt cache entry at {key}: {reason}")]
    Corrupt { key: String, reason: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

// == Api Error ==
/// Error type returned by the HTTP gateway handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Market(#[from] MarketError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Market(MarketError::RateLimited) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Market(MarketError::ServerError { .. }) => StatusCode::BAD_GATEWAY,
            ApiError::Market(MarketError::ClientError { .. }) => StatusCode::BAD_GATEWAY,
            ApiError::Market(MarketError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Market(MarketError::NetworkUnreachable) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Market(MarketError::Unknown) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for market-data operations.
pub type Result<T> = std::result::Result<T, MarketError>;
