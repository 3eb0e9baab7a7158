//! Teardown of leftover test environments.
//!
//! Gateways can only be deleted once they have no connections, and GRE
//! tunnels must be gone before the connection they ride on can be removed.
//! [`cleanup_gateways`] therefore deletes per gateway in three waves: GRE
//! family connections, then the remaining connections, then the gateway,
//! waiting for each wave to disappear before starting the next.

use transit_gateway_sdk::{
    Connection, ConnectionStatus, Gateway, GatewayStatus, PollOutcome, ResourceRef,
    TransitGatewayApi, TransitGatewayError,
};

use super::pagination::collect_pages;
use super::poller::ResourceConvergencePoller;

/// A resource the sweep could not remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupFailure {
    pub resource: ResourceRef,
    pub message: String,
}

/// What a sweep did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Gateways deleted by this sweep and confirmed gone.
    pub gateways_deleted: Vec<ResourceRef>,
    /// Connections deleted by this sweep and confirmed gone.
    pub connections_deleted: Vec<ResourceRef>,
    /// Resources already in `deleting`; no delete call was issued for them.
    pub skipped: Vec<ResourceRef>,
    pub failures: Vec<CleanupFailure>,
}

impl CleanupReport {
    /// `true` when nothing failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn fail(&mut self, resource: ResourceRef, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(%resource, %message, "cleanup failed for resource");
        self.failures.push(CleanupFailure { resource, message });
    }
}

/// Delete every gateway whose name starts with `name_prefix`, together with
/// its connections.
///
/// Failures on individual resources are logged, recorded in the report and
/// do not stop the sweep. A gateway whose connections could not all be
/// removed is left in place.
///
/// # Errors
/// Listing gateways or a gateway's connections fails the whole sweep.
pub async fn cleanup_gateways(
    api: &dyn TransitGatewayApi,
    poller: &ResourceConvergencePoller,
    name_prefix: &str,
) -> Result<CleanupReport, TransitGatewayError> {
    let gateways: Vec<Gateway> = collect_pages(|query| api.list_gateways(query))
        .await?
        .into_iter()
        .filter(|gateway| gateway.name.starts_with(name_prefix))
        .collect();
    tracing::info!(
        name_prefix,
        matched = gateways.len(),
        "cleaning up transit gateways"
    );

    let mut report = CleanupReport::default();
    for gateway in gateways {
        cleanup_gateway(api, poller, &gateway, &mut report).await?;
    }

    tracing::info!(
        gateways_deleted = report.gateways_deleted.len(),
        connections_deleted = report.connections_deleted.len(),
        skipped = report.skipped.len(),
        failures = report.failures.len(),
        "cleanup finished"
    );
    Ok(report)
}

async fn cleanup_gateway(
    api: &dyn TransitGatewayApi,
    poller: &ResourceConvergencePoller,
    gateway: &Gateway,
    report: &mut CleanupReport,
) -> Result<(), TransitGatewayError> {
    let gateway_ref = ResourceRef::gateway(&gateway.id);
    let connections =
        collect_pages(|query| api.list_gateway_connections(&gateway.id, query)).await?;

    let (gre_family, others): (Vec<Connection>, Vec<Connection>) = connections
        .into_iter()
        .partition(|connection| connection.network_type.is_gre_family());

    let failures_before = report.failures.len();
    delete_connections(api, poller, &gateway.id, &gre_family, report).await;
    // A base connection must outlive every tunnel that still rides on it.
    if report.failures.len() == failures_before {
        delete_connections(api, poller, &gateway.id, &others, report).await;
    } else if !others.is_empty() {
        tracing::warn!(
            resource = %gateway_ref,
            remaining = others.len(),
            "GRE connections left behind, not touching the remaining connections"
        );
    }

    let connection_failures = report.failures.len() - failures_before;
    if connection_failures > 0 {
        report.fail(
            gateway_ref,
            format!("left in place: {connection_failures} connection(s) could not be removed"),
        );
        return Ok(());
    }

    if gateway.status == GatewayStatus::Deleting {
        tracing::debug!(resource = %gateway_ref, "gateway already deleting");
        report.skipped.push(gateway_ref.clone());
    } else if let Err(err) = api.delete_gateway(&gateway.id).await {
        if !err.is_not_found() {
            report.fail(gateway_ref, format!("delete failed: {err}"));
            return Ok(());
        }
    }

    let already_deleting = gateway.status == GatewayStatus::Deleting;
    match poller.await_deleted(&gateway_ref).await {
        Ok(PollOutcome::NotFound) if !already_deleting => report.gateways_deleted.push(gateway_ref),
        Ok(PollOutcome::NotFound) => {}
        Ok(outcome) => report.fail(gateway_ref, describe_outcome(&outcome)),
        Err(err) => report.fail(gateway_ref, format!("waiting for deletion failed: {err}")),
    }
    Ok(())
}

/// Issue deletes for one wave of connections, then wait for all of them.
async fn delete_connections(
    api: &dyn TransitGatewayApi,
    poller: &ResourceConvergencePoller,
    gateway_id: &str,
    connections: &[Connection],
    report: &mut CleanupReport,
) {
    let mut pending = Vec::with_capacity(connections.len());

    for connection in connections {
        let resource = ResourceRef::connection(gateway_id, &connection.id);
        if connection.status == ConnectionStatus::Deleting {
            tracing::debug!(%resource, "connection already deleting");
            report.skipped.push(resource.clone());
            pending.push((resource, false));
            continue;
        }
        match api.delete_connection(gateway_id, &connection.id).await {
            Ok(()) => pending.push((resource, true)),
            Err(err) if err.is_not_found() => report.connections_deleted.push(resource),
            Err(err) => report.fail(resource, format!("delete failed: {err}")),
        }
    }

    for (resource, deleted_here) in pending {
        match poller.await_deleted(&resource).await {
            Ok(PollOutcome::NotFound) if deleted_here => report.connections_deleted.push(resource),
            Ok(PollOutcome::NotFound) => {}
            Ok(outcome) => report.fail(resource, describe_outcome(&outcome)),
            Err(err) => report.fail(resource, format!("waiting for deletion failed: {err}")),
        }
    }
}

fn describe_outcome(outcome: &PollOutcome) -> String {
    match outcome {
        PollOutcome::TimedOut { attempts } => {
            format!("still present after {attempts} attempts")
        }
        PollOutcome::Failed { status } => format!("reported status '{status}'"),
        PollOutcome::Ready => "reported ready while waiting for deletion".to_owned(),
        PollOutcome::NotFound => "already gone".to_owned(),
    }
}
