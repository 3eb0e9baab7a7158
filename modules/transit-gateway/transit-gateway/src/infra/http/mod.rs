//! HTTPS transport shared by the REST client and the IAM token exchange.

pub(crate) mod error;
pub(crate) mod response;
mod tls;
pub(crate) mod transport;

use std::time::Duration;

use crate::config::{DEFAULT_USER_AGENT, TlsRoots, TransitGatewayConfig};

/// Connection-level settings for an HTTP transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    /// Time allowed until response headers arrive.
    pub request_timeout: Duration,
    /// Responses larger than this are rejected.
    pub max_body_size: usize,
    pub user_agent: String,
    /// Dial `http://` URLs. Only for mock servers.
    pub allow_insecure_http: bool,
    pub tls_roots: TlsRoots,
    /// How long idle pooled connections are kept; `None` keeps them forever.
    pub pool_idle_timeout: Option<Duration>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            max_body_size: 10 * 1024 * 1024,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            allow_insecure_http: false,
            tls_roots: TlsRoots::WebPki,
            pool_idle_timeout: Some(Duration::from_secs(90)),
        }
    }
}

impl From<&TransitGatewayConfig> for HttpSettings {
    fn from(config: &TransitGatewayConfig) -> Self {
        Self {
            request_timeout: config.request_timeout,
            max_body_size: config.max_body_size,
            user_agent: config.user_agent.clone(),
            allow_insecure_http: config.allow_insecure_http,
            tls_roots: config.tls_roots,
            ..Self::default()
        }
    }
}
