//! Request authorization.

mod iam;
mod secret;

use async_trait::async_trait;
use http::HeaderValue;
use transit_gateway_sdk::TransitGatewayError;
use zeroize::Zeroizing;

pub use iam::IamAuthenticator;
pub use secret::SecretString;

/// Produces the `Authorization` header for each API request.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Header value to send, or `None` to send the request unauthenticated.
    ///
    /// # Errors
    /// Returns [`TransitGatewayError::Authentication`] when credentials cannot
    /// be obtained; transport failures while fetching them keep their own
    /// variants so callers can retry.
    async fn authorization(&self) -> Result<Option<HeaderValue>, TransitGatewayError>;
}

/// Sends no `Authorization` header.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

#[async_trait]
impl Authenticator for NoAuth {
    async fn authorization(&self) -> Result<Option<HeaderValue>, TransitGatewayError> {
        Ok(None)
    }
}

/// Sends a fixed bearer token.
#[derive(Clone)]
pub struct BearerTokenAuthenticator {
    header: HeaderValue,
}

impl std::fmt::Debug for BearerTokenAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerTokenAuthenticator")
            .field("header", &"[REDACTED]")
            .finish()
    }
}

impl BearerTokenAuthenticator {
    /// # Errors
    /// Returns [`TransitGatewayError::Configuration`] if the token is empty or
    /// contains characters not allowed in a header.
    pub fn new(token: &SecretString) -> Result<Self, TransitGatewayError> {
        Ok(Self {
            header: bearer_header(token.expose())?,
        })
    }
}

#[async_trait]
impl Authenticator for BearerTokenAuthenticator {
    async fn authorization(&self) -> Result<Option<HeaderValue>, TransitGatewayError> {
        Ok(Some(self.header.clone()))
    }
}

/// Build a sensitive `Bearer <token>` header value.
pub(crate) fn bearer_header(token: &str) -> Result<HeaderValue, TransitGatewayError> {
    if token.is_empty() {
        return Err(TransitGatewayError::Configuration(
            "bearer token must not be empty".to_owned(),
        ));
    }
    let raw = Zeroizing::new(format!("Bearer {token}"));
    let mut header = HeaderValue::from_str(&raw).map_err(|_| {
        TransitGatewayError::Configuration("bearer token contains invalid characters".to_owned())
    })?;
    header.set_sensitive(true);
    Ok(header)
}
