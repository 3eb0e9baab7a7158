//! Transit Gateway SDK
//!
//! This crate provides the public contract for talking to the Transit Gateway
//! REST API:
//! - `TransitGatewayApi` trait implemented by the HTTPS client (and by test fakes)
//! - Resource models: gateways, connections, route reports, prefix filters, locations
//! - `ResourceRef` / `ResourceKind` addressing used by the convergence poller
//! - `TransitGatewayError` for error handling
//!
//! ## Usage
//!
//! ```ignore
//! use transit_gateway_sdk::{NewGateway, TransitGatewayApi};
//!
//! let gateway = api
//!     .create_gateway(NewGateway::new("sdk-test-gw", "us-south"))
//!     .await?;
//! let fetched = api.get_gateway(&gateway.id).await?;
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod api;
pub mod error;
pub mod models;
pub mod resource;

pub use api::TransitGatewayApi;
pub use error::TransitGatewayError;
pub use models::{
    Connection, ConnectionAction, ConnectionPatch, ConnectionStatus, Gateway, GatewayPatch,
    GatewayStatus, ListQuery, LocalConnectionLocation, Location, LocationDetail, NetworkType,
    NewConnection, NewGateway, NewPrefixFilter, Page, PrefixFilter, PrefixFilterAction,
    PrefixFilterPatch, ResourceGroupIdentity, ResourceGroupRef, RouteReport,
    RouteReportConnection, RouteReportOverlap, RouteReportRoute, RouteReportStatus, Zone,
};
pub use resource::{PollOutcome, ResourceKind, ResourceRef};
