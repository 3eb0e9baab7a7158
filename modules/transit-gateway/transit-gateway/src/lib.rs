//! Transit Gateway client.
//!
//! Provides an HTTPS implementation of [`TransitGatewayApi`], a
//! [`ResourceConvergencePoller`] that waits for asynchronous provisioning and
//! teardown to finish, and [`cleanup_gateways`] for sweeping leftover test
//! environments.
//!
//! ```ignore
//! use std::sync::Arc;
//! use transit_gateway::{ResourceConvergencePoller, TransitGatewayClient, TransitGatewayConfig};
//! use transit_gateway_sdk::{NewGateway, ResourceRef};
//!
//! let config = TransitGatewayConfig::load(None)?;
//! let client = Arc::new(TransitGatewayClient::from_config(&config)?);
//! let gateway = client.create_gateway(NewGateway::new("gw-1", "us-south")).await?;
//!
//! let poller = ResourceConvergencePoller::new(client.clone(), config.poll.clone());
//! poller.await_ready(&ResourceRef::gateway(&gateway.id)).await?;
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod config;
pub mod domain;
mod humantime_serde;
pub mod infra;
pub mod telemetry;

pub use config::{
    AuthConfig, ErrorHandling, LoggingConfig, PollConfig, TlsRoots, TransitGatewayConfig,
};
pub use domain::cleanup::{CleanupFailure, CleanupReport, cleanup_gateways};
pub use domain::pagination::collect_pages;
pub use domain::poller::ResourceConvergencePoller;
pub use infra::auth::{
    Authenticator, BearerTokenAuthenticator, IamAuthenticator, NoAuth, SecretString,
};
pub use infra::http::HttpSettings;
pub use infra::rest::{TransitGatewayClient, TransitGatewayClientBuilder};

pub use transit_gateway_sdk::{
    PollOutcome, ResourceKind, ResourceRef, TransitGatewayApi, TransitGatewayError,
};
