use std::sync::Arc;
use thiserror::Error;

/// Result type alias for Grafana operations
pub type Result<T> = std::result::Result<T, GrafanaError>;

/// Errors that can occur when interacting with the Grafana API
///
/// `NotFound` and `Conflict` are stable sentinels: branch on them with
/// [`GrafanaError::is_not_found`] / [`GrafanaError::is_conflict`] (or `matches!`)
/// rather than by inspecting the message.
///
/// The type is `Clone` so a [`Response`](crate::Response) can hand out its
/// interpreted error any number of times.
#[derive(Debug, Clone, Error)]
pub enum GrafanaError {
    /// The base URL could not be parsed
    #[error("Invalid base URL: {0}")]
    Configuration(#[source] url::ParseError),

    /// The credential contains bytes that cannot appear in an HTTP header
    #[error("Credential is not a valid Authorization header value")]
    InvalidCredential,

    /// Failed to build HTTP client
    #[error("Failed to build HTTP client: {0}")]
    BuildHttpClient(#[source] Arc<reqwest::Error>),

    /// The request could not be assembled (bad method/URL/header combination)
    #[error("Failed to build request: {0}")]
    InvalidRequest(#[source] Arc<reqwest::Error>),

    /// The request never produced a complete response (DNS, connect, TLS, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Transport(#[source] Arc<reqwest_middleware::Error>),

    /// HTTP 404
    #[error("Not Found")]
    NotFound,

    /// HTTP 409
    #[error("Conflict")]
    Conflict,

    /// Any other status than 200, 404 or 409
    #[error("{status_line}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Status line text, e.g. `500 Internal Server Error`
        status_line: String,
    },

    /// A value could not be serialized into a JSON request body
    #[error("Failed to serialize request body: {0}")]
    Serialization(#[source] Arc<serde_json::Error>),

    /// A response body could not be decoded into the requested shape
    #[error("Failed to decode response body: {0}")]
    Decoding(#[source] Arc<serde_json::Error>),
}

impl GrafanaError {
    /// Check if this is the not-found sentinel (HTTP 404)
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Check if this is the conflict sentinel (HTTP 409)
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict)
    }

    /// HTTP status code carried by the error, if it came from a response
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::NotFound => Some(404),
            Self::Conflict => Some(409),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
