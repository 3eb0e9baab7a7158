//! Pooled HTTPS transport with a per-request timeout and body cap.

use std::time::Duration;

use bytes::Bytes;
use http::{Request, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper_util::client::legacy::Client;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use tower::timeout::TimeoutLayer;
use tower::util::BoxCloneSyncService;
use tower::{ServiceBuilder, ServiceExt};

use super::HttpSettings;
use super::error::HttpError;
use super::tls;

type InnerService = BoxCloneSyncService<Request<Full<Bytes>>, http::Response<Incoming>, HttpError>;

/// A fully read response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

/// Pooled HTTPS client with a per-request timeout and a response size cap.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct HttpTransport {
    service: InnerService,
    max_body_size: usize,
    allow_insecure_http: bool,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("max_body_size", &self.max_body_size)
            .field("allow_insecure_http", &self.allow_insecure_http)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    pub fn new(settings: &HttpSettings) -> Result<Self, HttpError> {
        if settings.allow_insecure_http {
            tracing::warn!("plain HTTP enabled; use only for testing with mock servers");
        }

        let connector = tls::https_connector(settings.tls_roots, settings.allow_insecure_http)?;
        let mut builder = Client::builder(TokioExecutor::new());
        builder.pool_timer(TokioTimer::new());
        if let Some(idle) = settings.pool_idle_timeout {
            builder.pool_idle_timeout(idle);
        }
        let client = builder.build::<_, Full<Bytes>>(connector);

        let timeout = settings.request_timeout;
        let service = ServiceBuilder::new()
            .layer(TimeoutLayer::new(timeout))
            .service(client)
            .map_err(move |e: tower::BoxError| map_tower_error(e, timeout));

        Ok(Self {
            service: BoxCloneSyncService::new(service),
            max_body_size: settings.max_body_size,
            allow_insecure_http: settings.allow_insecure_http,
        })
    }

    /// Send `request` and read the whole body, whatever the status code.
    pub async fn send(&self, request: Request<Full<Bytes>>) -> Result<RawResponse, HttpError> {
        if request.uri().scheme_str() == Some("http") && !self.allow_insecure_http {
            return Err(HttpError::InsecureScheme {
                scheme: "http".to_owned(),
            });
        }

        let response = self.service.clone().oneshot(request).await?;
        let status = response.status();
        let body = read_limited(response.into_body(), self.max_body_size).await?;
        Ok(RawResponse { status, body })
    }
}

fn map_tower_error(err: tower::BoxError, timeout: Duration) -> HttpError {
    if err.is::<tower::timeout::error::Elapsed>() {
        return HttpError::Timeout(timeout);
    }
    HttpError::Transport(err)
}

async fn read_limited(body: Incoming, limit: usize) -> Result<Bytes, HttpError> {
    let mut collected = Vec::new();
    let mut body = std::pin::pin!(body);

    while let Some(frame) = body.frame().await {
        let frame = frame?;
        if let Some(chunk) = frame.data_ref() {
            if collected.len() + chunk.len() > limit {
                return Err(HttpError::BodyTooLarge {
                    limit,
                    actual: collected.len() + chunk.len(),
                });
            }
            collected.extend_from_slice(chunk);
        }
    }

    Ok(Bytes::from(collected))
}
