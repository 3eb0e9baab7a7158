//! Wire envelopes that exist only on the HTTP boundary.

use serde::{Deserialize, Serialize};
use transit_gateway_sdk::{
    Connection, ConnectionAction, Gateway, Location, NewPrefixFilter, Page, PrefixFilter,
    RouteReport,
};
use url::Url;

/// `next` link of a paginated collection.
#[derive(Debug, Deserialize)]
pub struct PaginationLink {
    #[serde(default)]
    href: Option<String>,
    #[serde(default)]
    start: Option<String>,
}

impl PaginationLink {
    /// The cursor for the next page, read from `start` or else from the
    /// `start` query parameter of `href`.
    fn cursor(self) -> Option<String> {
        if let Some(start) = self.start.filter(|s| !s.is_empty()) {
            return Some(start);
        }
        let href = Url::parse(&self.href?).ok()?;
        href.query_pairs()
            .find(|(key, _)| key == "start")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct GatewayCollection {
    transit_gateways: Vec<Gateway>,
    #[serde(default)]
    next: Option<PaginationLink>,
}

impl From<GatewayCollection> for Page<Gateway> {
    fn from(collection: GatewayCollection) -> Self {
        Self {
            items: collection.transit_gateways,
            next_start: collection.next.and_then(PaginationLink::cursor),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ConnectionCollection {
    connections: Vec<Connection>,
    #[serde(default)]
    next: Option<PaginationLink>,
}

impl From<ConnectionCollection> for Page<Connection> {
    fn from(collection: ConnectionCollection) -> Self {
        Self {
            items: collection.connections,
            next_start: collection.next.and_then(PaginationLink::cursor),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LocationCollection {
    pub locations: Vec<Location>,
}

#[derive(Debug, Deserialize)]
pub struct RouteReportCollection {
    pub route_reports: Vec<RouteReport>,
}

#[derive(Debug, Deserialize)]
pub struct PrefixFilterCollection {
    pub prefix_filters: Vec<PrefixFilter>,
}

#[derive(Debug, Serialize)]
pub struct ConnectionActionRequest {
    pub action: ConnectionAction,
}

#[derive(Debug, Serialize)]
pub struct PrefixFilterReplaceRequest {
    pub prefix_filters: Vec<NewPrefixFilter>,
}
