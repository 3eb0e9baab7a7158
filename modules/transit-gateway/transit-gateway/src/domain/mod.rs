//! Workflows built on top of [`transit_gateway_sdk::TransitGatewayApi`].

pub mod cleanup;
pub mod pagination;
pub mod poller;
