//! Convergence polling for asynchronously provisioned resources.
//!
//! Creating or deleting a gateway, connection or route report only starts the
//! work on the provider side. [`ResourceConvergencePoller`] re-reads the
//! resource at a fixed interval until it reaches its ready status or
//! disappears, bounded by an attempt ceiling rather than a wall-clock
//! deadline.

use std::sync::Arc;
use std::time::Duration;

use transit_gateway_sdk::{PollOutcome, ResourceRef, TransitGatewayApi, TransitGatewayError};

use crate::config::{ErrorHandling, PollConfig};

/// Waits for resources to become ready or to be gone.
///
/// Each wait is a sequential loop: one status request, then a sleep. Dropping
/// the returned future cancels the wait.
#[derive(Clone)]
pub struct ResourceConvergencePoller {
    api: Arc<dyn TransitGatewayApi>,
    config: PollConfig,
}

impl std::fmt::Debug for ResourceConvergencePoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceConvergencePoller")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ResourceConvergencePoller {
    #[must_use]
    pub fn new(api: Arc<dyn TransitGatewayApi>, config: PollConfig) -> Self {
        Self { api, config }
    }

    /// Poll until `resource` reports its kind's ready status (`available`,
    /// `attached` or `complete`).
    ///
    /// Returns [`PollOutcome::Ready`] as soon as the status is observed,
    /// [`PollOutcome::Failed`] if a gateway or connection reports `failed`,
    /// [`PollOutcome::NotFound`] if the resource disappears, and
    /// [`PollOutcome::TimedOut`] once `max_attempts` probes were spent.
    ///
    /// # Errors
    /// - [`TransitGatewayError::InvalidArgument`] for prefix filters, which
    ///   have no status; no request is sent.
    /// - Any non-retryable probe error under [`ErrorHandling::Classify`].
    pub async fn await_ready(
        &self,
        resource: &ResourceRef,
    ) -> Result<PollOutcome, TransitGatewayError> {
        let kind = resource.kind();
        let (Some(ready), Some(interval)) = (kind.ready_status(), self.config.ready_interval(kind))
        else {
            return Err(TransitGatewayError::invalid_argument(format!(
                "{kind} resources have no ready status; use await_deleted to wait for removal"
            )));
        };

        let failed = kind.failed_status();
        let max_attempts = self.config.max_attempts;
        for attempt in 1..=max_attempts {
            match self.probe(resource).await {
                Ok(Some(status)) if status == ready => {
                    tracing::info!(%resource, attempt, "resource is ready");
                    return Ok(PollOutcome::Ready);
                }
                Ok(Some(status)) if failed == Some(status.as_str()) => {
                    tracing::warn!(%resource, attempt, "resource reported failed status");
                    return Ok(PollOutcome::Failed { status });
                }
                Ok(status) => {
                    tracing::debug!(
                        %resource,
                        attempt,
                        max_attempts,
                        status = status.as_deref().unwrap_or("-"),
                        "resource not ready yet"
                    );
                }
                Err(err) if err.is_not_found() && self.classifies_errors() => {
                    tracing::warn!(%resource, attempt, "resource disappeared while waiting for it");
                    return Ok(PollOutcome::NotFound);
                }
                Err(err) => self.tolerate(resource, attempt, err)?,
            }
            pause(interval).await;
        }

        tracing::warn!(%resource, attempts = max_attempts, "resource did not become ready");
        Ok(PollOutcome::TimedOut {
            attempts: max_attempts,
        })
    }

    /// Poll until reading `resource` returns 404.
    ///
    /// The caller must already have issued the delete. Works for every
    /// resource kind, prefix filters included.
    ///
    /// # Errors
    /// Any non-retryable probe error other than 404 under
    /// [`ErrorHandling::Classify`].
    pub async fn await_deleted(
        &self,
        resource: &ResourceRef,
    ) -> Result<PollOutcome, TransitGatewayError> {
        let interval = self.config.deletion_interval;
        let max_attempts = self.config.max_attempts;

        for attempt in 1..=max_attempts {
            match self.probe(resource).await {
                Err(err) if err.is_not_found() => {
                    tracing::info!(%resource, attempt, "resource is gone");
                    return Ok(PollOutcome::NotFound);
                }
                Ok(status) => {
                    tracing::debug!(
                        %resource,
                        attempt,
                        max_attempts,
                        status = status.as_deref().unwrap_or("-"),
                        "resource still present"
                    );
                }
                Err(err) => self.tolerate(resource, attempt, err)?,
            }
            pause(interval).await;
        }

        tracing::warn!(%resource, attempts = max_attempts, "resource was not deleted in time");
        Ok(PollOutcome::TimedOut {
            attempts: max_attempts,
        })
    }

    /// Read the resource once; `Ok(None)` for kinds without a status.
    async fn probe(&self, resource: &ResourceRef) -> Result<Option<String>, TransitGatewayError> {
        let status = match resource {
            ResourceRef::Gateway { gateway_id } => {
                Some(self.api.get_gateway(gateway_id).await?.status.to_string())
            }
            ResourceRef::Connection {
                gateway_id,
                connection_id,
            } => Some(
                self.api
                    .get_connection(gateway_id, connection_id)
                    .await?
                    .status
                    .to_string(),
            ),
            ResourceRef::RouteReport {
                gateway_id,
                report_id,
            } => Some(
                self.api
                    .get_route_report(gateway_id, report_id)
                    .await?
                    .status
                    .to_string(),
            ),
            ResourceRef::PrefixFilter {
                gateway_id,
                connection_id,
                filter_id,
            } => {
                self.api
                    .get_prefix_filter(gateway_id, connection_id, filter_id)
                    .await?;
                None
            }
        };
        Ok(status)
    }

    fn classifies_errors(&self) -> bool {
        self.config.error_handling == ErrorHandling::Classify
    }

    /// Decide whether a probe error ends the wait.
    fn tolerate(
        &self,
        resource: &ResourceRef,
        attempt: u32,
        err: TransitGatewayError,
    ) -> Result<(), TransitGatewayError> {
        match self.config.error_handling {
            ErrorHandling::RetryAll => {
                tracing::debug!(%resource, attempt, error = %err, "probe failed, retrying");
                Ok(())
            }
            ErrorHandling::Classify if err.is_retryable() => {
                tracing::debug!(
                    %resource,
                    attempt,
                    error = %err,
                    "transient probe failure, retrying"
                );
                Ok(())
            }
            ErrorHandling::Classify => {
                tracing::warn!(%resource, attempt, error = %err, "probe failed permanently");
                Err(err)
            }
        }
    }
}

async fn pause(interval: Duration) {
    if !interval.is_zero() {
        tokio::time::sleep(interval).await;
    }
}
