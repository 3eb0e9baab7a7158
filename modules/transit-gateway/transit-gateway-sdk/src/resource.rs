//! Resource addressing and convergence outcomes.

use std::fmt;

/// The four kinds of addressable Transit Gateway resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Gateway,
    Connection,
    RouteReport,
    PrefixFilter,
}

impl ResourceKind {
    /// Status value that marks the resource as ready for use.
    ///
    /// Prefix filters have no status and can only be probed for existence.
    #[must_use]
    pub const fn ready_status(self) -> Option<&'static str> {
        match self {
            Self::Gateway => Some("available"),
            Self::Connection => Some("attached"),
            Self::RouteReport => Some("complete"),
            Self::PrefixFilter => None,
        }
    }

    /// Status value that marks a failed provisioning.
    ///
    /// Route reports and prefix filters never report one.
    #[must_use]
    pub const fn failed_status(self) -> Option<&'static str> {
        match self {
            Self::Gateway | Self::Connection => Some("failed"),
            Self::RouteReport | Self::PrefixFilter => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gateway => "gateway",
            Self::Connection => "connection",
            Self::RouteReport => "route-report",
            Self::PrefixFilter => "prefix-filter",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full address of a resource, including the parent ids the API needs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceRef {
    Gateway {
        gateway_id: String,
    },
    Connection {
        gateway_id: String,
        connection_id: String,
    },
    RouteReport {
        gateway_id: String,
        report_id: String,
    },
    PrefixFilter {
        gateway_id: String,
        connection_id: String,
        filter_id: String,
    },
}

impl ResourceRef {
    #[must_use]
    pub fn gateway(gateway_id: impl Into<String>) -> Self {
        Self::Gateway {
            gateway_id: gateway_id.into(),
        }
    }

    #[must_use]
    pub fn connection(gateway_id: impl Into<String>, connection_id: impl Into<String>) -> Self {
        Self::Connection {
            gateway_id: gateway_id.into(),
            connection_id: connection_id.into(),
        }
    }

    #[must_use]
    pub fn route_report(gateway_id: impl Into<String>, report_id: impl Into<String>) -> Self {
        Self::RouteReport {
            gateway_id: gateway_id.into(),
            report_id: report_id.into(),
        }
    }

    #[must_use]
    pub fn prefix_filter(
        gateway_id: impl Into<String>,
        connection_id: impl Into<String>,
        filter_id: impl Into<String>,
    ) -> Self {
        Self::PrefixFilter {
            gateway_id: gateway_id.into(),
            connection_id: connection_id.into(),
            filter_id: filter_id.into(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        match self {
            Self::Gateway { .. } => ResourceKind::Gateway,
            Self::Connection { .. } => ResourceKind::Connection,
            Self::RouteReport { .. } => ResourceKind::RouteReport,
            Self::PrefixFilter { .. } => ResourceKind::PrefixFilter,
        }
    }

    /// Identifier of the addressed resource itself (not its parents).
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Gateway { gateway_id } => gateway_id,
            Self::Connection { connection_id, .. } => connection_id,
            Self::RouteReport { report_id, .. } => report_id,
            Self::PrefixFilter { filter_id, .. } => filter_id,
        }
    }

    /// Gateway the resource belongs to (the gateway itself for gateways).
    #[must_use]
    pub fn gateway_id(&self) -> &str {
        match self {
            Self::Gateway { gateway_id }
            | Self::Connection { gateway_id, .. }
            | Self::RouteReport { gateway_id, .. }
            | Self::PrefixFilter { gateway_id, .. } => gateway_id,
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gateway { gateway_id } => write!(f, "gateway {gateway_id}"),
            Self::Connection {
                gateway_id,
                connection_id,
            } => write!(f, "connection {gateway_id}/{connection_id}"),
            Self::RouteReport {
                gateway_id,
                report_id,
            } => write!(f, "route-report {gateway_id}/{report_id}"),
            Self::PrefixFilter {
                gateway_id,
                connection_id,
                filter_id,
            } => write!(f, "prefix-filter {gateway_id}/{connection_id}/{filter_id}"),
        }
    }
}

/// Result of waiting for a resource to converge. Computed per call, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The resource reported its kind's ready status.
    Ready,
    /// The resource no longer exists (HTTP 404).
    NotFound,
    /// The attempt budget ran out before the expected state was observed.
    TimedOut { attempts: u32 },
    /// The provider reported an explicit failure status.
    Failed { status: String },
}

impl PollOutcome {
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    #[must_use]
    pub const fn is_timed_out(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }
}
