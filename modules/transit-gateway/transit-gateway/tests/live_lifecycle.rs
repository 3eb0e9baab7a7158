#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end lifecycle against the real service.
//!
//! Ignored by default. Run with credentials in the `TGW_` environment, e.g.
//!
//! ```text
//! TGW_AUTH__TYPE=iam TGW_AUTH__API_KEY=... \
//!     cargo test -p cf-transit-gateway --test live_lifecycle -- --ignored
//! ```
//!
//! `TRANSIT_GATEWAY_TEST_LOCATION` selects the region (default `us-south`)
//! and `TRANSIT_GATEWAY_TEST_CONFIG` an optional YAML config file.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, ensure};
use transit_gateway::telemetry::init_logging;
use transit_gateway::{
    PollOutcome, ResourceConvergencePoller, ResourceRef, TransitGatewayApi, TransitGatewayClient,
    TransitGatewayConfig, cleanup_gateways,
};
use transit_gateway_sdk::{
    Connection, Gateway, GatewayPatch, ListQuery, NetworkType, NewConnection, NewGateway,
    NewPrefixFilter, PrefixFilterAction, PrefixFilterPatch,
};

const NAME_PREFIX: &str = "tgw-rs-test-";

/// Shared state of one live run; replaces passing ids between steps.
struct LiveFixture {
    api: Arc<TransitGatewayClient>,
    poller: ResourceConvergencePoller,
    location: String,
    run_id: u64,
}

impl LiveFixture {
    fn from_env() -> anyhow::Result<Self> {
        let path = std::env::var_os("TRANSIT_GATEWAY_TEST_CONFIG").map(PathBuf::from);
        let config = TransitGatewayConfig::load(path.as_deref())?;
        init_logging(&config.logging)?;

        let api = Arc::new(TransitGatewayClient::from_config(&config)?);
        let poller = ResourceConvergencePoller::new(api.clone(), config.poll.clone());
        let location = std::env::var("TRANSIT_GATEWAY_TEST_LOCATION")
            .unwrap_or_else(|_| "us-south".to_owned());
        let run_id = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

        Ok(Self {
            api,
            poller,
            location,
            run_id,
        })
    }

    fn name(&self, suffix: &str) -> String {
        format!("{NAME_PREFIX}{}-{suffix}", self.run_id)
    }

    /// Remove anything a previous run left behind.
    async fn sweep(&self) -> anyhow::Result<()> {
        let report = cleanup_gateways(self.api.as_ref(), &self.poller, NAME_PREFIX).await?;
        ensure!(report.is_clean(), "cleanup left resources behind: {:?}", report.failures);
        Ok(())
    }

    async fn expect_ready(&self, resource: &ResourceRef) -> anyhow::Result<()> {
        let outcome = self.poller.await_ready(resource).await?;
        ensure!(outcome == PollOutcome::Ready, "{resource} did not become ready: {outcome:?}");
        Ok(())
    }

    async fn expect_deleted(&self, resource: &ResourceRef) -> anyhow::Result<()> {
        let outcome = self.poller.await_deleted(resource).await?;
        ensure!(outcome == PollOutcome::NotFound, "{resource} was not deleted: {outcome:?}");
        Ok(())
    }

    async fn create_gateway(&self) -> anyhow::Result<Gateway> {
        let gateway = self
            .api
            .create_gateway(NewGateway::new(self.name("gw"), &self.location))
            .await?;
        self.expect_ready(&ResourceRef::gateway(&gateway.id)).await?;
        Ok(gateway)
    }

    async fn create_classic_connection(&self, gateway: &Gateway) -> anyhow::Result<Connection> {
        let connection = self
            .api
            .create_connection(
                &gateway.id,
                NewConnection::classic(self.name("classic"))
                    .prefix_filters_default(PrefixFilterAction::Permit),
            )
            .await?;
        self.expect_ready(&ResourceRef::connection(&gateway.id, &connection.id))
            .await?;
        Ok(connection)
    }
}

#[tokio::test]
#[ignore = "requires TGW credentials and a live account"]
async fn gateway_lifecycle() -> anyhow::Result<()> {
    let fx = LiveFixture::from_env()?;
    fx.sweep().await?;

    // Locations
    let locations = fx.api.list_locations().await?;
    ensure!(!locations.is_empty(), "no locations returned");
    let detail = fx.api.get_location(&fx.location).await?;
    ensure!(detail.name == fx.location);

    // Gateway
    let gateway = fx.create_gateway().await?;
    let renamed = fx
        .api
        .update_gateway(
            &gateway.id,
            GatewayPatch {
                name: Some(fx.name("gw-renamed")),
                ..GatewayPatch::default()
            },
        )
        .await?;
    ensure!(renamed.name.ends_with("gw-renamed"));

    // Connections
    let classic = fx.create_classic_connection(&gateway).await?;
    let listed = fx
        .api
        .list_gateway_connections(&gateway.id, ListQuery::default())
        .await?;
    ensure!(listed.items.iter().any(|c| c.id == classic.id));

    let zone = detail
        .zones
        .first()
        .map(|zone| zone.name.clone())
        .context("location has no zones for a GRE tunnel")?;
    let gre = fx
        .api
        .create_connection(
            &gateway.id,
            NewConnection::gre_tunnel(fx.name("gre"), &classic.id, zone)
                .tunnel("192.168.100.1", "192.168.100.2", "10.242.63.12")
                .remote_bgp_asn(65010),
        )
        .await?;
    ensure!(gre.network_type == NetworkType::GreTunnel);
    fx.expect_ready(&ResourceRef::connection(&gateway.id, &gre.id))
        .await?;

    // Prefix filters
    let filter = fx
        .api
        .create_prefix_filter(
            &gateway.id,
            &classic.id,
            NewPrefixFilter::new(PrefixFilterAction::Deny, "10.10.0.0/16").length_range(16, 24),
        )
        .await?;
    let updated = fx
        .api
        .update_prefix_filter(
            &gateway.id,
            &classic.id,
            &filter.id,
            PrefixFilterPatch {
                action: Some(PrefixFilterAction::Permit),
                ..PrefixFilterPatch::default()
            },
        )
        .await?;
    ensure!(updated.action == PrefixFilterAction::Permit);
    let filters = fx.api.list_prefix_filters(&gateway.id, &classic.id).await?;
    ensure!(filters.iter().any(|f| f.id == filter.id));

    fx.api
        .delete_prefix_filter(&gateway.id, &classic.id, &filter.id)
        .await?;
    fx.expect_deleted(&ResourceRef::prefix_filter(&gateway.id, &classic.id, &filter.id))
        .await?;

    // Route reports
    let report = fx.api.create_route_report(&gateway.id).await?;
    let report_ref = ResourceRef::route_report(&gateway.id, &report.id);
    fx.expect_ready(&report_ref).await?;
    let report = fx.api.get_route_report(&gateway.id, &report.id).await?;
    ensure!(report.connections.iter().any(|c| c.id == classic.id));
    fx.api.delete_route_report(&gateway.id, &report.id).await?;
    fx.expect_deleted(&report_ref).await?;

    // Teardown through the same cascade the pre-test sweep uses.
    let report = cleanup_gateways(fx.api.as_ref(), &fx.poller, NAME_PREFIX).await?;
    ensure!(report.is_clean(), "teardown failed: {:?}", report.failures);
    ensure!(
        report
            .gateways_deleted
            .contains(&ResourceRef::gateway(&gateway.id))
    );
    ensure!(report.connections_deleted.len() >= 2);
    Ok(())
}
