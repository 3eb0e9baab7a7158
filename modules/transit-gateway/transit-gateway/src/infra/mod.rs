//! Infrastructure adapters: HTTP transport, authentication and the REST
//! implementation of [`transit_gateway_sdk::TransitGatewayApi`].

pub mod auth;
pub mod http;
pub mod rest;
