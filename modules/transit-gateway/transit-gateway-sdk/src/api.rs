//! Transit Gateway API trait.

use async_trait::async_trait;

use crate::error::TransitGatewayError;
use crate::models::{
    Connection, ConnectionAction, ConnectionPatch, Gateway, GatewayPatch, ListQuery, Location,
    LocationDetail, NewConnection, NewGateway, NewPrefixFilter, Page, PrefixFilter,
    PrefixFilterPatch, RouteReport,
};

/// Operations of the Transit Gateway v1 REST API.
///
/// Implemented by the HTTPS client in the `transit-gateway` crate and by
/// in-memory fakes in tests. Deletes only start server-side teardown; use the
/// convergence poller to wait for the resource to disappear.
#[async_trait]
pub trait TransitGatewayApi: Send + Sync {
    // === Locations ===

    async fn list_locations(&self) -> Result<Vec<Location>, TransitGatewayError>;

    async fn get_location(&self, name: &str) -> Result<LocationDetail, TransitGatewayError>;

    // === Gateways ===

    async fn list_gateways(&self, query: ListQuery) -> Result<Page<Gateway>, TransitGatewayError>;

    async fn create_gateway(&self, new_gateway: NewGateway) -> Result<Gateway, TransitGatewayError>;

    async fn get_gateway(&self, gateway_id: &str) -> Result<Gateway, TransitGatewayError>;

    async fn update_gateway(
        &self,
        gateway_id: &str,
        patch: GatewayPatch,
    ) -> Result<Gateway, TransitGatewayError>;

    async fn delete_gateway(&self, gateway_id: &str) -> Result<(), TransitGatewayError>;

    // === Connections ===

    /// Connections across all gateways of the account.
    async fn list_connections(
        &self,
        query: ListQuery,
    ) -> Result<Page<Connection>, TransitGatewayError>;

    async fn list_gateway_connections(
        &self,
        gateway_id: &str,
        query: ListQuery,
    ) -> Result<Page<Connection>, TransitGatewayError>;

    async fn create_connection(
        &self,
        gateway_id: &str,
        new_connection: NewConnection,
    ) -> Result<Connection, TransitGatewayError>;

    async fn get_connection(
        &self,
        gateway_id: &str,
        connection_id: &str,
    ) -> Result<Connection, TransitGatewayError>;

    async fn update_connection(
        &self,
        gateway_id: &str,
        connection_id: &str,
        patch: ConnectionPatch,
    ) -> Result<Connection, TransitGatewayError>;

    async fn delete_connection(
        &self,
        gateway_id: &str,
        connection_id: &str,
    ) -> Result<(), TransitGatewayError>;

    /// Approve or reject a cross-account connection request.
    async fn connection_action(
        &self,
        gateway_id: &str,
        connection_id: &str,
        action: ConnectionAction,
    ) -> Result<(), TransitGatewayError>;

    // === Route reports ===

    async fn list_route_reports(
        &self,
        gateway_id: &str,
    ) -> Result<Vec<RouteReport>, TransitGatewayError>;

    /// Request a new report; it starts in `pending` and turns `complete`
    /// asynchronously.
    async fn create_route_report(
        &self,
        gateway_id: &str,
    ) -> Result<RouteReport, TransitGatewayError>;

    async fn get_route_report(
        &self,
        gateway_id: &str,
        report_id: &str,
    ) -> Result<RouteReport, TransitGatewayError>;

    async fn delete_route_report(
        &self,
        gateway_id: &str,
        report_id: &str,
    ) -> Result<(), TransitGatewayError>;

    // === Prefix filters ===

    async fn list_prefix_filters(
        &self,
        gateway_id: &str,
        connection_id: &str,
    ) -> Result<Vec<PrefixFilter>, TransitGatewayError>;

    async fn create_prefix_filter(
        &self,
        gateway_id: &str,
        connection_id: &str,
        new_filter: NewPrefixFilter,
    ) -> Result<PrefixFilter, TransitGatewayError>;

    /// Replace the whole ordered filter list of a connection.
    async fn replace_prefix_filters(
        &self,
        gateway_id: &str,
        connection_id: &str,
        filters: Vec<NewPrefixFilter>,
    ) -> Result<Vec<PrefixFilter>, TransitGatewayError>;

    async fn get_prefix_filter(
        &self,
        gateway_id: &str,
        connection_id: &str,
        filter_id: &str,
    ) -> Result<PrefixFilter, TransitGatewayError>;

    async fn update_prefix_filter(
        &self,
        gateway_id: &str,
        connection_id: &str,
        filter_id: &str,
        patch: PrefixFilterPatch,
    ) -> Result<PrefixFilter, TransitGatewayError>;

    async fn delete_prefix_filter(
        &self,
        gateway_id: &str,
        connection_id: &str,
        filter_id: &str,
    ) -> Result<(), TransitGatewayError>;
}
