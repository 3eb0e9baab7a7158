//! Client configuration.
//!
//! Values are layered by [`TransitGatewayConfig::load`]: built-in defaults,
//! then an optional YAML file, then `TGW_`-prefixed environment variables
//! (`__` separates nested keys, e.g. `TGW_POLL__MAX_ATTEMPTS=10`).

use std::path::Path;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use serde::{Deserialize, Serialize};
use transit_gateway_sdk::{ResourceKind, TransitGatewayError};
use url::Url;

use crate::infra::auth::SecretString;

pub const DEFAULT_BASE_URL: &str = "https://transit.cloud.ibm.com/v1";
pub const DEFAULT_API_VERSION: &str = "2024-07-16";
pub const DEFAULT_IAM_TOKEN_URL: &str = "https://iam.cloud.ibm.com/identity/token";
pub const DEFAULT_USER_AGENT: &str = concat!("transit-gateway-rs/", env!("CARGO_PKG_VERSION"));

const ENV_PREFIX: &str = "TGW_";

/// Top-level client configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransitGatewayConfig {
    /// Service endpoint including the `/v1` path.
    pub base_url: String,
    /// Value of the mandatory `version` query parameter.
    pub api_version: String,
    /// Per-request timeout (time to response headers).
    #[serde(with = "crate::humantime_serde")]
    pub request_timeout: Duration,
    /// Maximum accepted response body size in bytes.
    pub max_body_size: usize,
    pub user_agent: String,
    /// Permit `http://` base URLs. Only meant for mock servers.
    pub allow_insecure_http: bool,
    pub tls_roots: TlsRoots,
    pub auth: AuthConfig,
    pub poll: PollConfig,
    pub logging: LoggingConfig,
}

impl Default for TransitGatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_version: DEFAULT_API_VERSION.to_owned(),
            request_timeout: Duration::from_secs(30),
            max_body_size: 10 * 1024 * 1024,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            allow_insecure_http: false,
            tls_roots: TlsRoots::default(),
            auth: AuthConfig::default(),
            poll: PollConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TransitGatewayConfig {
    /// Load configuration from defaults, an optional YAML file and the
    /// `TGW_` environment.
    ///
    /// # Errors
    /// Returns [`TransitGatewayError::Configuration`] if the file is missing,
    /// a value fails to parse, or the result does not pass [`Self::validate`].
    pub fn load(path: Option<&Path>) -> Result<Self, TransitGatewayError> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            if !path.is_file() {
                return Err(TransitGatewayError::Configuration(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            figment = figment.merge(Yaml::file(path));
        }

        let config: Self = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| TransitGatewayError::Configuration(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express.
    ///
    /// # Errors
    /// Returns [`TransitGatewayError::Configuration`] describing the first
    /// violated constraint.
    pub fn validate(&self) -> Result<(), TransitGatewayError> {
        let base_url = Url::parse(&self.base_url).map_err(|e| {
            TransitGatewayError::Configuration(format!("invalid base_url '{}': {e}", self.base_url))
        })?;
        match base_url.scheme() {
            "https" => {}
            "http" if self.allow_insecure_http => {}
            scheme => {
                return Err(TransitGatewayError::Configuration(format!(
                    "base_url scheme '{scheme}' not allowed; use https or set allow_insecure_http"
                )));
            }
        }
        if self.api_version.trim().is_empty() {
            return Err(TransitGatewayError::Configuration(
                "api_version must not be empty".to_owned(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(TransitGatewayError::Configuration(
                "request_timeout must be positive".to_owned(),
            ));
        }
        if let AuthConfig::Iam { token_url, .. } = &self.auth {
            Url::parse(token_url).map_err(|e| {
                TransitGatewayError::Configuration(format!("invalid auth.token_url: {e}"))
            })?;
        }
        self.poll.validate()
    }
}

/// Source of trusted root certificates for TLS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TlsRoots {
    /// Mozilla roots compiled into the binary.
    #[default]
    WebPki,
    /// The operating system certificate store.
    Native,
}

/// How requests are authorized.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthConfig {
    /// No `Authorization` header (mock servers).
    #[default]
    None,
    /// A static bearer token.
    Bearer { token: SecretString },
    /// Exchange an API key for short-lived IAM access tokens.
    Iam {
        api_key: SecretString,
        #[serde(default = "default_iam_token_url")]
        token_url: String,
        /// Refresh the cached token this long before it expires.
        #[serde(default = "default_refresh_margin", with = "crate::humantime_serde")]
        refresh_margin: Duration,
    },
}

fn default_iam_token_url() -> String {
    DEFAULT_IAM_TOKEN_URL.to_owned()
}

fn default_refresh_margin() -> Duration {
    Duration::from_secs(60)
}

/// What the poller does with errors returned by status probes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorHandling {
    /// Retry transport failures, timeouts, 429 and 5xx; fail on other 4xx.
    #[default]
    Classify,
    /// Treat every error as "not converged yet" and keep polling.
    RetryAll,
}

/// Attempt ceiling and per-kind delays for convergence polling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PollConfig {
    pub max_attempts: u32,
    #[serde(with = "crate::humantime_serde")]
    pub gateway_interval: Duration,
    #[serde(with = "crate::humantime_serde")]
    pub connection_interval: Duration,
    #[serde(with = "crate::humantime_serde")]
    pub route_report_interval: Duration,
    #[serde(with = "crate::humantime_serde")]
    pub deletion_interval: Duration,
    pub error_handling: ErrorHandling,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 25,
            gateway_interval: Duration::from_secs(5),
            connection_interval: Duration::from_secs(5),
            route_report_interval: Duration::from_secs(10),
            deletion_interval: Duration::from_secs(10),
            error_handling: ErrorHandling::Classify,
        }
    }
}

impl PollConfig {
    /// Delay between readiness probes for `kind`; `None` for kinds without a
    /// ready status.
    #[must_use]
    pub const fn ready_interval(&self, kind: ResourceKind) -> Option<Duration> {
        match kind {
            ResourceKind::Gateway => Some(self.gateway_interval),
            ResourceKind::Connection => Some(self.connection_interval),
            ResourceKind::RouteReport => Some(self.route_report_interval),
            ResourceKind::PrefixFilter => None,
        }
    }

    /// Upper bound on the time `await_ready` can spend on `kind`.
    #[must_use]
    pub fn ready_budget(&self, kind: ResourceKind) -> Option<Duration> {
        self.ready_interval(kind)
            .map(|interval| interval.saturating_mul(self.max_attempts))
    }

    /// Upper bound on the time `await_deleted` can spend.
    #[must_use]
    pub fn deletion_budget(&self) -> Duration {
        self.deletion_interval.saturating_mul(self.max_attempts)
    }

    /// # Errors
    /// Returns [`TransitGatewayError::Configuration`] when the attempt ceiling is zero.
    pub fn validate(&self) -> Result<(), TransitGatewayError> {
        if self.max_attempts == 0 {
            return Err(TransitGatewayError::Configuration(
                "poll.max_attempts must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Logging setup used by [`crate::telemetry::init_logging`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive; `RUST_LOG` takes precedence.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            json: false,
        }
    }
}
