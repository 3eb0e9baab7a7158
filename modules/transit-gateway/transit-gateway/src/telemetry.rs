//! Logging initialization.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use transit_gateway_sdk::TransitGatewayError;

use crate::config::LoggingConfig;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` overrides `config.level` when set. Calling this again after a
/// subscriber is installed (by this function or by the host application) is
/// a no-op.
///
/// # Errors
/// Returns [`TransitGatewayError::Configuration`] if `config.level` is not a
/// valid filter directive.
pub fn init_logging(config: &LoggingConfig) -> Result<(), TransitGatewayError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            TransitGatewayError::Configuration(format!(
                "invalid logging.level '{}': {e}",
                config.level
            ))
        })?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
    };

    if installed.is_err() {
        tracing::debug!("global tracing subscriber already installed, keeping it");
    }
    Ok(())
}
