#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(dead_code)]

//! Scriptable in-memory `TransitGatewayApi` for poller and cleanup tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use transit_gateway::{PollConfig, ResourceConvergencePoller, ResourceRef, TransitGatewayApi};
use transit_gateway_sdk::{
    Connection, ConnectionAction, ConnectionPatch, ConnectionStatus, Gateway, GatewayPatch,
    GatewayStatus, ListQuery, Location, LocationDetail, NetworkType, NewConnection, NewGateway,
    NewPrefixFilter, Page, PrefixFilter, PrefixFilterAction, PrefixFilterPatch, RouteReport,
    RouteReportStatus, TransitGatewayError,
};

/// Answer to one read of a resource.
#[derive(Debug, Clone)]
pub enum Step {
    Status(&'static str),
    Missing,
    Fail(TransitGatewayError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Get(ResourceRef),
    Delete(ResourceRef),
    ListGateways { start: Option<String> },
    ListConnections {
        gateway_id: String,
        start: Option<String>,
    },
}

#[derive(Default)]
struct State {
    scripts: HashMap<ResourceRef, VecDeque<Step>>,
    gateways: Vec<Gateway>,
    connections: HashMap<String, Vec<Connection>>,
    delete_failures: HashMap<ResourceRef, TransitGatewayError>,
    list_failure: Option<TransitGatewayError>,
    page_size: usize,
    calls: Vec<Call>,
}

/// Reads follow a per-resource script; the last step repeats forever.
/// Unscripted reads fall back to seeded gateways and connections.
pub struct FakeTransitGateway {
    state: Mutex<State>,
}

impl Default for FakeTransitGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeTransitGateway {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                page_size: 50,
                ..State::default()
            }),
        }
    }

    pub fn script(&self, resource: &ResourceRef, steps: impl IntoIterator<Item = Step>) {
        self.state
            .lock()
            .scripts
            .insert(resource.clone(), steps.into_iter().collect());
    }

    pub fn seed_gateway(&self, gateway: Gateway) {
        self.state.lock().gateways.push(gateway);
    }

    pub fn seed_connection(&self, gateway_id: &str, connection: Connection) {
        self.state
            .lock()
            .connections
            .entry(gateway_id.to_owned())
            .or_default()
            .push(connection);
    }

    pub fn page_size(&self, size: usize) {
        self.state.lock().page_size = size;
    }

    pub fn fail_delete(&self, resource: &ResourceRef, err: TransitGatewayError) {
        self.state
            .lock()
            .delete_failures
            .insert(resource.clone(), err);
    }

    pub fn fail_listing(&self, err: TransitGatewayError) {
        self.state.lock().list_failure = Some(err);
    }

    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    #[must_use]
    pub fn get_count(&self, resource: &ResourceRef) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Get(r) if r == resource))
            .count()
    }

    #[must_use]
    pub fn deletes(&self) -> Vec<ResourceRef> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Delete(resource) => Some(resource),
                _ => None,
            })
            .collect()
    }

    /// Record a read and return the next scripted step, if any.
    fn read(&self, resource: ResourceRef) -> Option<Step> {
        let mut state = self.state.lock();
        state.calls.push(Call::Get(resource.clone()));
        let script = state.scripts.get_mut(&resource)?;
        if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().cloned()
        }
    }

    fn delete(&self, resource: ResourceRef) -> Result<(), TransitGatewayError> {
        let mut state = self.state.lock();
        state.calls.push(Call::Delete(resource.clone()));
        if let Some(err) = state.delete_failures.get(&resource) {
            return Err(err.clone());
        }
        state
            .scripts
            .entry(resource)
            .or_insert_with(|| VecDeque::from([Step::Missing]));
        Ok(())
    }

    fn paginate<T: Clone>(
        items: &[T],
        query: &ListQuery,
        page_size: usize,
    ) -> Result<Page<T>, TransitGatewayError> {
        let start = match &query.start {
            Some(cursor) => cursor
                .parse::<usize>()
                .map_err(|_| TransitGatewayError::api(400, "bad cursor"))?,
            None => 0,
        };
        let end = (start + page_size).min(items.len());
        Ok(Page {
            items: items.get(start..end).unwrap_or_default().to_vec(),
            next_start: (end < items.len()).then(|| end.to_string()),
        })
    }
}

fn unsupported<T>(operation: &str) -> Result<T, TransitGatewayError> {
    Err(TransitGatewayError::api(
        501,
        format!("{operation} is not supported by the fake"),
    ))
}

#[async_trait]
impl TransitGatewayApi for FakeTransitGateway {
    async fn list_locations(&self) -> Result<Vec<Location>, TransitGatewayError> {
        unsupported("list_locations")
    }

    async fn get_location(&self, _name: &str) -> Result<LocationDetail, TransitGatewayError> {
        unsupported("get_location")
    }

    async fn list_gateways(&self, query: ListQuery) -> Result<Page<Gateway>, TransitGatewayError> {
        let mut state = self.state.lock();
        state.calls.push(Call::ListGateways {
            start: query.start.clone(),
        });
        if let Some(err) = &state.list_failure {
            return Err(err.clone());
        }
        Self::paginate(&state.gateways, &query, state.page_size)
    }

    async fn create_gateway(
        &self,
        _new_gateway: NewGateway,
    ) -> Result<Gateway, TransitGatewayError> {
        unsupported("create_gateway")
    }

    async fn get_gateway(&self, gateway_id: &str) -> Result<Gateway, TransitGatewayError> {
        let resource = ResourceRef::gateway(gateway_id);
        let seeded = self
            .state
            .lock()
            .gateways
            .iter()
            .find(|g| g.id == gateway_id)
            .cloned();
        match self.read(resource.clone()) {
            Some(Step::Status(status)) => Ok(Gateway {
                status: status.into(),
                ..seeded.unwrap_or_else(|| gateway(gateway_id, gateway_id, "pending"))
            }),
            Some(Step::Missing) => Err(TransitGatewayError::not_found(resource.to_string())),
            Some(Step::Fail(err)) => Err(err),
            None => seeded.ok_or_else(|| TransitGatewayError::not_found(resource.to_string())),
        }
    }

    async fn update_gateway(
        &self,
        _gateway_id: &str,
        _patch: GatewayPatch,
    ) -> Result<Gateway, TransitGatewayError> {
        unsupported("update_gateway")
    }

    async fn delete_gateway(&self, gateway_id: &str) -> Result<(), TransitGatewayError> {
        self.delete(ResourceRef::gateway(gateway_id))
    }

    async fn list_connections(
        &self,
        _query: ListQuery,
    ) -> Result<Page<Connection>, TransitGatewayError> {
        unsupported("list_connections")
    }

    async fn list_gateway_connections(
        &self,
        gateway_id: &str,
        query: ListQuery,
    ) -> Result<Page<Connection>, TransitGatewayError> {
        let mut state = self.state.lock();
        state.calls.push(Call::ListConnections {
            gateway_id: gateway_id.to_owned(),
            start: query.start.clone(),
        });
        let connections = state.connections.get(gateway_id).cloned().unwrap_or_default();
        Self::paginate(&connections, &query, state.page_size)
    }

    async fn create_connection(
        &self,
        _gateway_id: &str,
        _new_connection: NewConnection,
    ) -> Result<Connection, TransitGatewayError> {
        unsupported("create_connection")
    }

    async fn get_connection(
        &self,
        gateway_id: &str,
        connection_id: &str,
    ) -> Result<Connection, TransitGatewayError> {
        let resource = ResourceRef::connection(gateway_id, connection_id);
        let seeded = self
            .state
            .lock()
            .connections
            .get(gateway_id)
            .and_then(|list| list.iter().find(|c| c.id == connection_id).cloned());
        match self.read(resource.clone()) {
            Some(Step::Status(status)) => Ok(Connection {
                status: status.into(),
                ..seeded.unwrap_or_else(|| {
                    connection(connection_id, connection_id, NetworkType::Classic, "pending")
                })
            }),
            Some(Step::Missing) => Err(TransitGatewayError::not_found(resource.to_string())),
            Some(Step::Fail(err)) => Err(err),
            None => seeded.ok_or_else(|| TransitGatewayError::not_found(resource.to_string())),
        }
    }

    async fn update_connection(
        &self,
        _gateway_id: &str,
        _connection_id: &str,
        _patch: ConnectionPatch,
    ) -> Result<Connection, TransitGatewayError> {
        unsupported("update_connection")
    }

    async fn delete_connection(
        &self,
        gateway_id: &str,
        connection_id: &str,
    ) -> Result<(), TransitGatewayError> {
        self.delete(ResourceRef::connection(gateway_id, connection_id))
    }

    async fn connection_action(
        &self,
        _gateway_id: &str,
        _connection_id: &str,
        _action: ConnectionAction,
    ) -> Result<(), TransitGatewayError> {
        unsupported("connection_action")
    }

    async fn list_route_reports(
        &self,
        _gateway_id: &str,
    ) -> Result<Vec<RouteReport>, TransitGatewayError> {
        unsupported("list_route_reports")
    }

    async fn create_route_report(
        &self,
        _gateway_id: &str,
    ) -> Result<RouteReport, TransitGatewayError> {
        unsupported("create_route_report")
    }

    async fn get_route_report(
        &self,
        gateway_id: &str,
        report_id: &str,
    ) -> Result<RouteReport, TransitGatewayError> {
        let resource = ResourceRef::route_report(gateway_id, report_id);
        match self.read(resource.clone()) {
            Some(Step::Status(status)) => Ok(route_report(report_id, status.into())),
            Some(Step::Fail(err)) => Err(err),
            Some(Step::Missing) | None => {
                Err(TransitGatewayError::not_found(resource.to_string()))
            }
        }
    }

    async fn delete_route_report(
        &self,
        gateway_id: &str,
        report_id: &str,
    ) -> Result<(), TransitGatewayError> {
        self.delete(ResourceRef::route_report(gateway_id, report_id))
    }

    async fn list_prefix_filters(
        &self,
        _gateway_id: &str,
        _connection_id: &str,
    ) -> Result<Vec<PrefixFilter>, TransitGatewayError> {
        unsupported("list_prefix_filters")
    }

    async fn create_prefix_filter(
        &self,
        _gateway_id: &str,
        _connection_id: &str,
        _new_filter: NewPrefixFilter,
    ) -> Result<PrefixFilter, TransitGatewayError> {
        unsupported("create_prefix_filter")
    }

    async fn replace_prefix_filters(
        &self,
        _gateway_id: &str,
        _connection_id: &str,
        _filters: Vec<NewPrefixFilter>,
    ) -> Result<Vec<PrefixFilter>, TransitGatewayError> {
        unsupported("replace_prefix_filters")
    }

    async fn get_prefix_filter(
        &self,
        gateway_id: &str,
        connection_id: &str,
        filter_id: &str,
    ) -> Result<PrefixFilter, TransitGatewayError> {
        let resource = ResourceRef::prefix_filter(gateway_id, connection_id, filter_id);
        match self.read(resource.clone()) {
            Some(Step::Status(_)) => Ok(PrefixFilter {
                id: filter_id.to_owned(),
                action: PrefixFilterAction::Permit,
                prefix: "10.0.0.0/16".to_owned(),
                ge: None,
                le: None,
                before: None,
                created_at: None,
                updated_at: None,
            }),
            Some(Step::Fail(err)) => Err(err),
            Some(Step::Missing) | None => {
                Err(TransitGatewayError::not_found(resource.to_string()))
            }
        }
    }

    async fn update_prefix_filter(
        &self,
        _gateway_id: &str,
        _connection_id: &str,
        _filter_id: &str,
        _patch: PrefixFilterPatch,
    ) -> Result<PrefixFilter, TransitGatewayError> {
        unsupported("update_prefix_filter")
    }

    async fn delete_prefix_filter(
        &self,
        gateway_id: &str,
        connection_id: &str,
        filter_id: &str,
    ) -> Result<(), TransitGatewayError> {
        self.delete(ResourceRef::prefix_filter(gateway_id, connection_id, filter_id))
    }
}

// =============================================================================
// Fixtures
// =============================================================================

#[must_use]
pub fn gateway(id: &str, name: &str, status: &str) -> Gateway {
    Gateway {
        id: id.to_owned(),
        crn: None,
        name: name.to_owned(),
        location: "us-south".to_owned(),
        global: false,
        status: GatewayStatus::from(status),
        resource_group: None,
        connection_count: None,
        created_at: None,
        updated_at: None,
    }
}

#[must_use]
pub fn connection(id: &str, name: &str, network_type: NetworkType, status: &str) -> Connection {
    Connection {
        id: id.to_owned(),
        name: name.to_owned(),
        network_type,
        status: ConnectionStatus::from(status),
        network_id: None,
        network_account_id: None,
        base_connection_id: None,
        prefix_filters_default: None,
        zone: None,
        local_bgp_asn: None,
        remote_bgp_asn: None,
        local_gateway_ip: None,
        remote_gateway_ip: None,
        local_tunnel_ip: None,
        remote_tunnel_ip: None,
        mtu: None,
        request_status: None,
        created_at: None,
        updated_at: None,
    }
}

fn route_report(id: &str, status: RouteReportStatus) -> RouteReport {
    RouteReport {
        id: id.to_owned(),
        status,
        connections: Vec::new(),
        overlapping_routes: Vec::new(),
        created_at: None,
        updated_at: None,
    }
}

#[must_use]
pub fn poller(fake: &Arc<FakeTransitGateway>, config: PollConfig) -> ResourceConvergencePoller {
    ResourceConvergencePoller::new(fake.clone(), config)
}
