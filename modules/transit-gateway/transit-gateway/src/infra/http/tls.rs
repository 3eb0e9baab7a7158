//! TLS connector construction.

use std::sync::{Arc, OnceLock};

use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::HttpConnector;
use rustls_pki_types::CertificateDer;

use super::error::HttpError;
use crate::config::TlsRoots;

/// Native roots are read from the OS store once per process.
static NATIVE_ROOTS: OnceLock<Vec<CertificateDer<'static>>> = OnceLock::new();

fn native_root_certs() -> &'static [CertificateDer<'static>] {
    NATIVE_ROOTS.get_or_init(|| {
        let result = rustls_native_certs::load_native_certs();
        for err in &result.errors {
            tracing::warn!(error = %err, "error loading native root certificate");
        }
        if result.certs.is_empty() {
            tracing::warn!("no native root CA certificates found");
        } else {
            tracing::debug!(count = result.certs.len(), "loaded native root certificates");
        }
        result.certs
    })
}

/// Use the process-wide provider if the application installed one,
/// otherwise aws-lc-rs (without installing it globally).
fn crypto_provider() -> Arc<rustls::crypto::CryptoProvider> {
    rustls::crypto::CryptoProvider::get_default()
        .cloned()
        .unwrap_or_else(|| Arc::new(rustls::crypto::aws_lc_rs::default_provider()))
}

fn native_client_config() -> Result<rustls::ClientConfig, HttpError> {
    let certs = native_root_certs();
    let mut roots = rustls::RootCertStore::empty();
    let (added, ignored) = roots.add_parsable_certificates(certs.iter().cloned());
    if ignored > 0 {
        tracing::warn!(added, ignored, "some native root certificates could not be parsed");
    }
    if added == 0 {
        return Err(HttpError::Tls(
            "no usable native root CA certificates in the OS store".into(),
        ));
    }

    rustls::ClientConfig::builder_with_provider(crypto_provider())
        .with_safe_default_protocol_versions()
        .map_err(|e| HttpError::Tls(Box::new(e)))
        .map(|builder| {
            builder
                .with_root_certificates(roots)
                .with_no_client_auth()
        })
}

/// Build the HTTPS connector for `roots`; plain `http://` is only dialed
/// when `allow_http` is set.
pub fn https_connector(
    roots: TlsRoots,
    allow_http: bool,
) -> Result<HttpsConnector<HttpConnector>, HttpError> {
    let builder = match roots {
        TlsRoots::WebPki => HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(crypto_provider())
            .map_err(|e| HttpError::Tls(Box::new(e)))?,
        TlsRoots::Native => HttpsConnectorBuilder::new().with_tls_config(native_client_config()?),
    };

    let connector = if allow_http {
        builder.https_or_http().enable_all_versions().build()
    } else {
        builder.https_only().enable_all_versions().build()
    };
    Ok(connector)
}
