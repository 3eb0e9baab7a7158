//! IAM API-key authentication.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use http::{HeaderValue, Method, Request};
use http_body_util::Full;
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use transit_gateway_sdk::TransitGatewayError;
use url::Url;
use zeroize::Zeroizing;

use super::{Authenticator, SecretString, bearer_header};
use crate::infra::http::HttpSettings;
use crate::infra::http::error::HttpError;
use crate::infra::http::transport::HttpTransport;

const APIKEY_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";

/// Token lifetime assumed when the endpoint omits `expires_in`.
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

/// Upper bound on a server-reported lifetime.
const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(86_400);

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

struct CachedToken {
    header: HeaderValue,
    refresh_at: Instant,
}

/// Exchanges an IAM API key for access tokens and caches them until they
/// come within the refresh margin of expiry.
pub struct IamAuthenticator {
    transport: HttpTransport,
    token_url: Url,
    api_key: SecretString,
    user_agent: HeaderValue,
    refresh_margin: Duration,
    cached: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for IamAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IamAuthenticator")
            .field("token_url", &self.token_url.as_str())
            .field("api_key", &self.api_key)
            .field("refresh_margin", &self.refresh_margin)
            .finish_non_exhaustive()
    }
}

impl IamAuthenticator {
    /// # Errors
    /// Returns [`TransitGatewayError::Configuration`] for an empty API key, an
    /// unparsable token URL or a transport that cannot be built.
    pub fn new(
        api_key: SecretString,
        token_url: &str,
        settings: &HttpSettings,
    ) -> Result<Self, TransitGatewayError> {
        if api_key.is_empty() {
            return Err(TransitGatewayError::Configuration(
                "IAM api_key must not be empty".to_owned(),
            ));
        }
        let token_url = Url::parse(token_url).map_err(|e| {
            TransitGatewayError::Configuration(format!("invalid IAM token URL '{token_url}': {e}"))
        })?;
        let user_agent = HeaderValue::from_str(&settings.user_agent)
            .map_err(|e| TransitGatewayError::Configuration(format!("invalid user agent: {e}")))?;

        Ok(Self {
            transport: HttpTransport::new(settings)?,
            token_url,
            api_key,
            user_agent,
            refresh_margin: Duration::from_secs(60),
            cached: Mutex::new(None),
        })
    }

    #[must_use]
    pub fn refresh_margin(mut self, margin: Duration) -> Self {
        self.refresh_margin = margin;
        self
    }

    async fn request_token(&self) -> Result<CachedToken, TransitGatewayError> {
        let fields = [
            ("grant_type", APIKEY_GRANT_TYPE),
            ("apikey", self.api_key.expose()),
        ];
        let form =
            Zeroizing::new(serde_urlencoded::to_string(&fields[..]).map_err(HttpError::from)?);

        let request = Request::builder()
            .method(Method::POST)
            .uri(self.token_url.as_str())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, self.user_agent.clone())
            .body(Full::new(Bytes::from(form.as_bytes().to_vec())))
            .map_err(HttpError::from)?;

        let response = self.transport.send(request).await?;
        if !response.status.is_success() {
            let status = response.status.as_u16();
            // The token endpoint is not the API: only 5xx and 429 are worth retrying.
            if status == 429 || response.status.is_server_error() {
                return Err(TransitGatewayError::api(
                    status,
                    format!("IAM token endpoint unavailable ({status})"),
                ));
            }
            return Err(TransitGatewayError::Authentication(format!(
                "IAM token endpoint rejected the API key with status {status}"
            )));
        }

        let token: TokenResponse = serde_json::from_slice(&response.body).map_err(|e| {
            TransitGatewayError::Authentication(format!("malformed IAM token response: {e}"))
        })?;
        let token_type = token.token_type.as_deref().unwrap_or("Bearer");
        if !token_type.eq_ignore_ascii_case("bearer") {
            return Err(TransitGatewayError::Authentication(format!(
                "unsupported IAM token type '{token_type}'"
            )));
        }

        let access_token = Zeroizing::new(token.access_token);
        let lifetime = token
            .expires_in
            .map_or(DEFAULT_TOKEN_LIFETIME, Duration::from_secs)
            .min(MAX_TOKEN_LIFETIME);
        let header = bearer_header(&access_token)
            .map_err(|e| TransitGatewayError::Authentication(e.to_string()))?;

        tracing::debug!(lifetime_secs = lifetime.as_secs(), "obtained IAM access token");
        Ok(CachedToken {
            header,
            refresh_at: Instant::now() + lifetime.saturating_sub(self.refresh_margin),
        })
    }
}

#[async_trait]
impl Authenticator for IamAuthenticator {
    async fn authorization(&self) -> Result<Option<HeaderValue>, TransitGatewayError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref()
            && Instant::now() < token.refresh_at
        {
            return Ok(Some(token.header.clone()));
        }

        let token = self.request_token().await?;
        let header = token.header.clone();
        *cached = Some(token);
        Ok(Some(header))
    }
}
