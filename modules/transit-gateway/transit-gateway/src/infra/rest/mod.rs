//! REST implementation of [`transit_gateway_sdk::TransitGatewayApi`].

mod client;
mod dto;

pub use client::{TransitGatewayClient, TransitGatewayClientBuilder};
