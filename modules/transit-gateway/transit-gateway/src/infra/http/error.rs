//! Transport-level errors and their mapping onto [`TransitGatewayError`].

use std::time::Duration;

use thiserror::Error;
use transit_gateway_sdk::TransitGatewayError;

/// Transport-level failures, converted to [`TransitGatewayError`] at the API
/// boundary.
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("failed to build request: {0}")]
    RequestBuild(#[from] http::Error),

    #[error("invalid header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("TLS error: {0}")]
    Tls(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("response body too large: limit {limit} bytes, got at least {actual} bytes")]
    BodyTooLarge { limit: usize, actual: usize },

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("form encoding failed: {0}")]
    FormEncode(#[from] serde_urlencoded::ser::Error),

    #[error("URL scheme '{scheme}' not allowed: plain HTTP is disabled")]
    InsecureScheme { scheme: String },
}

impl From<hyper::Error> for HttpError {
    fn from(err: hyper::Error) -> Self {
        Self::Transport(Box::new(err))
    }
}

impl From<hyper_util::client::legacy::Error> for HttpError {
    fn from(err: hyper_util::client::legacy::Error) -> Self {
        Self::Transport(Box::new(err))
    }
}

/// Render an error with its full source chain (`outer: inner: root`).
fn with_sources(err: &(dyn std::error::Error + 'static)) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !rendered.contains(&cause_text) {
            rendered.push_str(": ");
            rendered.push_str(&cause_text);
        }
        source = cause.source();
    }
    rendered
}

impl From<HttpError> for TransitGatewayError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Timeout(after) => Self::Timeout(after),
            HttpError::Transport(ref inner) => Self::Transport(with_sources(inner.as_ref())),
            HttpError::Tls(_) | HttpError::InsecureScheme { .. } => {
                Self::Configuration(with_sources(&err))
            }
            HttpError::BodyTooLarge { .. } => Self::Decode(err.to_string()),
            HttpError::RequestBuild(_)
            | HttpError::InvalidHeaderValue(_)
            | HttpError::Json(_)
            | HttpError::FormEncode(_) => Self::InvalidArgument(err.to_string()),
        }
    }
}
