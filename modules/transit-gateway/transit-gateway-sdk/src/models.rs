//! Transit Gateway resource models.
//!
//! These structures mirror the v1 wire format (`snake_case` JSON). Enumerated
//! fields whose legal values are defined by the provider keep an `Other`
//! variant so that a new server-side value never breaks decoding.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Declares a string-backed enum with a catch-all `Other(String)` variant.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// Value not known to this SDK version.
            Other(String),
        }

        impl $name {
            /// Wire representation of the value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $wire, )+
                    Self::Other(value) => value,
                }
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                match value.as_str() {
                    $( $wire => Self::$variant, )+
                    _ => Self::Other(value),
                }
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::from(value.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Other(value) => value,
                    known => known.as_str().to_owned(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum! {
    /// Lifecycle status of a transit gateway.
    pub enum GatewayStatus {
        Available => "available",
        Pending => "pending",
        Failed => "failed",
        Deleting => "deleting",
        Suspending => "suspending",
        Suspended => "suspended",
    }
}

wire_enum! {
    /// Lifecycle status of a transit gateway connection.
    pub enum ConnectionStatus {
        Attached => "attached",
        Pending => "pending",
        Failed => "failed",
        Deleting => "deleting",
        Detaching => "detaching",
        Detached => "detached",
        Suspending => "suspending",
        Suspended => "suspended",
    }
}

wire_enum! {
    /// Status of an asynchronously generated route report.
    pub enum RouteReportStatus {
        Complete => "complete",
        Pending => "pending",
    }
}

wire_enum! {
    /// Kind of network attached by a connection.
    pub enum NetworkType {
        Classic => "classic",
        Vpc => "vpc",
        Directlink => "directlink",
        GreTunnel => "gre_tunnel",
        UnboundGreTunnel => "unbound_gre_tunnel",
        RedundantGre => "redundant_gre",
        PowerVirtualServer => "power_virtual_server",
    }
}

wire_enum! {
    /// Whether a prefix filter permits or denies matching routes.
    pub enum PrefixFilterAction {
        Permit => "permit",
        Deny => "deny",
    }
}

impl NetworkType {
    /// GRE-family connections ride on a base connection and must be removed
    /// before it.
    #[must_use]
    pub fn is_gre_family(&self) -> bool {
        matches!(
            self,
            Self::GreTunnel | Self::UnboundGreTunnel | Self::RedundantGre
        )
    }
}

/// Action on a cross-account connection request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionAction {
    /// Accept the pending connection request.
    Approve,
    /// Reject the pending connection request.
    Reject,
}

/// Reference to the resource group that owns a gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceGroupRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// Availability zone reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub name: String,
}

impl Zone {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A transit gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gateway {
    pub id: String,
    #[serde(default)]
    pub crn: Option<String>,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub global: bool,
    pub status: GatewayStatus,
    #[serde(default)]
    pub resource_group: Option<ResourceGroupRef>,
    #[serde(default)]
    pub connection_count: Option<u32>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Data for creating a new transit gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewGateway {
    pub name: String,
    pub location: String,
    pub global: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<ResourceGroupIdentity>,
}

/// Resource group given by id on create requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceGroupIdentity {
    pub id: String,
}

impl NewGateway {
    /// A local (non-global) gateway in the default resource group.
    #[must_use]
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            global: false,
            resource_group: None,
        }
    }

    #[must_use]
    pub fn global(mut self, global: bool) -> Self {
        self.global = global;
        self
    }

    #[must_use]
    pub fn resource_group(mut self, id: impl Into<String>) -> Self {
        self.resource_group = Some(ResourceGroupIdentity { id: id.into() });
        self
    }
}

/// Partial update for a gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GatewayPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global: Option<bool>,
}

/// A network attachment on a transit gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: String,
    pub name: String,
    pub network_type: NetworkType,
    pub status: ConnectionStatus,
    #[serde(default)]
    pub network_id: Option<String>,
    #[serde(default)]
    pub network_account_id: Option<String>,
    #[serde(default)]
    pub base_connection_id: Option<String>,
    #[serde(default)]
    pub prefix_filters_default: Option<PrefixFilterAction>,
    #[serde(default)]
    pub zone: Option<Zone>,
    #[serde(default)]
    pub local_bgp_asn: Option<u32>,
    #[serde(default)]
    pub remote_bgp_asn: Option<u32>,
    #[serde(default)]
    pub local_gateway_ip: Option<String>,
    #[serde(default)]
    pub remote_gateway_ip: Option<String>,
    #[serde(default)]
    pub local_tunnel_ip: Option<String>,
    #[serde(default)]
    pub remote_tunnel_ip: Option<String>,
    #[serde(default)]
    pub mtu: Option<u32>,
    /// Only set on cross-account requests (`pending`, `approved`, `rejected`, ...).
    #[serde(default)]
    pub request_status: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Data for creating a connection.
///
/// Use the constructor matching the network type; GRE tunnels additionally
/// need the tunnel endpoints set with [`NewConnection::tunnel`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewConnection {
    pub network_type: NetworkType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_connection_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<Zone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_tunnel_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_tunnel_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_gateway_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_bgp_asn: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix_filters_default: Option<PrefixFilterAction>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub prefix_filters: Vec<NewPrefixFilter>,
}

impl NewConnection {
    fn empty(network_type: NetworkType) -> Self {
        Self {
            network_type,
            name: None,
            network_id: None,
            network_account_id: None,
            base_connection_id: None,
            zone: None,
            local_tunnel_ip: None,
            remote_tunnel_ip: None,
            remote_gateway_ip: None,
            remote_bgp_asn: None,
            prefix_filters_default: None,
            prefix_filters: Vec::new(),
        }
    }

    /// Connection to the account's classic infrastructure.
    #[must_use]
    pub fn classic(name: impl Into<String>) -> Self {
        Self::empty(NetworkType::Classic).name(name)
    }

    /// Connection to a network identified by CRN (VPC, Direct Link, Power Virtual Server).
    #[must_use]
    pub fn network(
        network_type: NetworkType,
        name: impl Into<String>,
        crn: impl Into<String>,
    ) -> Self {
        let mut conn = Self::empty(network_type).name(name);
        conn.network_id = Some(crn.into());
        conn
    }

    /// GRE tunnel riding on an existing base connection.
    #[must_use]
    pub fn gre_tunnel(
        name: impl Into<String>,
        base_connection_id: impl Into<String>,
        zone: impl Into<String>,
    ) -> Self {
        let mut conn = Self::empty(NetworkType::GreTunnel).name(name);
        conn.base_connection_id = Some(base_connection_id.into());
        conn.zone = Some(Zone::new(zone));
        conn
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the tunnel endpoints of a GRE connection.
    #[must_use]
    pub fn tunnel(
        mut self,
        local_tunnel_ip: impl Into<String>,
        remote_tunnel_ip: impl Into<String>,
        remote_gateway_ip: impl Into<String>,
    ) -> Self {
        self.local_tunnel_ip = Some(local_tunnel_ip.into());
        self.remote_tunnel_ip = Some(remote_tunnel_ip.into());
        self.remote_gateway_ip = Some(remote_gateway_ip.into());
        self
    }

    #[must_use]
    pub fn remote_bgp_asn(mut self, asn: u32) -> Self {
        self.remote_bgp_asn = Some(asn);
        self
    }

    /// Network owned by a different account; the connection stays in
    /// `pending` until that account approves it.
    #[must_use]
    pub fn network_account(mut self, account_id: impl Into<String>) -> Self {
        self.network_account_id = Some(account_id.into());
        self
    }

    #[must_use]
    pub fn prefix_filters_default(mut self, action: PrefixFilterAction) -> Self {
        self.prefix_filters_default = Some(action);
        self
    }

    #[must_use]
    pub fn prefix_filter(mut self, filter: NewPrefixFilter) -> Self {
        self.prefix_filters.push(filter);
        self
    }
}

/// Partial update for a connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConnectionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix_filters_default: Option<PrefixFilterAction>,
}

/// A permit/deny rule scoped to one connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixFilter {
    pub id: String,
    pub action: PrefixFilterAction,
    pub prefix: String,
    #[serde(default)]
    pub ge: Option<u8>,
    #[serde(default)]
    pub le: Option<u8>,
    /// Id of the filter this one is ordered before; `None` means last.
    #[serde(default)]
    pub before: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Data for creating a prefix filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPrefixFilter {
    pub action: PrefixFilterAction,
    pub prefix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ge: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub le: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
}

impl NewPrefixFilter {
    #[must_use]
    pub fn new(action: PrefixFilterAction, prefix: impl Into<String>) -> Self {
        Self {
            action,
            prefix: prefix.into(),
            ge: None,
            le: None,
            before: None,
        }
    }

    /// Restrict matches to prefix lengths within `ge..=le`.
    #[must_use]
    pub fn length_range(mut self, ge: u8, le: u8) -> Self {
        self.ge = Some(ge);
        self.le = Some(le);
        self
    }

    #[must_use]
    pub fn before(mut self, filter_id: impl Into<String>) -> Self {
        self.before = Some(filter_id.into());
        self
    }
}

/// Partial update for a prefix filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrefixFilterPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<PrefixFilterAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ge: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub le: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
}

/// Snapshot of the routes a gateway learned from its connections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteReport {
    pub id: String,
    pub status: RouteReportStatus,
    #[serde(default)]
    pub connections: Vec<RouteReportConnection>,
    #[serde(default)]
    pub overlapping_routes: Vec<RouteReportOverlap>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteReportConnection {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub network_type: Option<NetworkType>,
    #[serde(default)]
    pub routes: Vec<RouteReportRoute>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteReportRoute {
    pub prefix: String,
    #[serde(default)]
    pub connection_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteReportOverlap {
    #[serde(default)]
    pub routes: Vec<RouteReportRoute>,
}

/// A location where transit gateways can be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    #[serde(rename = "type")]
    pub location_type: String,
    pub billing_location: String,
}

/// A location with the connection locations and zones it serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationDetail {
    pub name: String,
    #[serde(rename = "type")]
    pub location_type: String,
    pub billing_location: String,
    #[serde(default)]
    pub local_connection_locations: Vec<LocalConnectionLocation>,
    #[serde(default)]
    pub zones: Vec<Zone>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalConnectionLocation {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(rename = "type")]
    pub location_type: String,
}

/// Cursor-based list parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Page size; the server default applies when unset.
    pub limit: Option<u32>,
    /// Cursor returned as `next_start` by the previous page.
    pub start: Option<String>,
    /// Only for the account-wide connection listing: filter by network id.
    pub network_id: Option<String>,
}

impl ListQuery {
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn with_start(mut self, start: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self
    }

    #[must_use]
    pub fn with_network_id(mut self, network_id: impl Into<String>) -> Self {
        self.network_id = Some(network_id.into());
        self
    }
}

/// One page of a list result.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Cursor for the next page, `None` on the last page.
    pub next_start: Option<String>,
}

impl<T> Page<T> {
    #[must_use]
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_start: None,
        }
    }

    /// Query that fetches the page after this one, if any.
    #[must_use]
    pub fn next_query(&self, base: &ListQuery) -> Option<ListQuery> {
        self.next_start.as_ref().map(|start| ListQuery {
            start: Some(start.clone()),
            ..base.clone()
        })
    }
}
