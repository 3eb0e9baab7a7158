//! Transit Gateway error types.
//!
//! Transport-agnostic error definitions shared by the HTTPS client and any
//! other `TransitGatewayApi` implementation.

use std::time::Duration;

use thiserror::Error;

/// Error type for Transit Gateway operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransitGatewayError {
    /// The addressed resource does not exist (HTTP 404).
    #[error("not found: {resource}")]
    NotFound { resource: String },

    /// The API answered with a non-success status.
    #[error("API error {status}: {message}")]
    Api {
        status: u16,
        /// First error code reported by the service, e.g. `bad_request`.
        code: Option<String>,
        message: String,
        /// Request trace id to quote in support cases.
        trace: Option<String>,
    },

    /// Network, TLS or connection failure before a response was received.
    #[error("transport error: {0}")]
    Transport(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Credentials could not be obtained or were rejected by the token endpoint.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The request was rejected locally before being sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Client configuration is invalid.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl TransitGatewayError {
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    #[must_use]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            code: None,
            message: message.into(),
            trace: None,
        }
    }

    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// HTTP status associated with the error, if the server answered.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether repeating the same request later can succeed: transport
    /// failures, timeouts, 429 and 5xx.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout(_) => true,
            Self::Api { status, .. } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }
}
