//! `TransitGatewayApi` over the v1 REST endpoints.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use http::{HeaderValue, Method, Request};
use http_body_util::Full;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::Instrument;
use transit_gateway_sdk::{
    Connection, ConnectionAction, ConnectionPatch, Gateway, GatewayPatch, ListQuery, Location,
    LocationDetail, NewConnection, NewGateway, NewPrefixFilter, Page, PrefixFilter,
    PrefixFilterPatch, ResourceRef, RouteReport, TransitGatewayApi, TransitGatewayError,
};
use url::Url;

use super::dto::{
    ConnectionActionRequest, ConnectionCollection, GatewayCollection, LocationCollection,
    PrefixFilterCollection, PrefixFilterReplaceRequest, RouteReportCollection,
};
use crate::config::{
    AuthConfig, DEFAULT_API_VERSION, DEFAULT_BASE_URL, TlsRoots, TransitGatewayConfig,
};
use crate::infra::auth::{Authenticator, BearerTokenAuthenticator, IamAuthenticator, NoAuth};
use crate::infra::http::error::HttpError;
use crate::infra::http::response::{decode, into_success};
use crate::infra::http::transport::HttpTransport;
use crate::infra::http::HttpSettings;

const GATEWAYS: &str = "transit_gateways";
const CONNECTIONS: &str = "connections";
const ROUTE_REPORTS: &str = "route_reports";
const PREFIX_FILTERS: &str = "prefix_filters";

type Query = Vec<(&'static str, String)>;

/// HTTPS client for the Transit Gateway v1 API.
///
/// Every request carries the `version` query parameter, a `User-Agent` and
/// the header produced by the configured [`Authenticator`]. Clones share the
/// connection pool and the token cache.
#[derive(Clone)]
pub struct TransitGatewayClient {
    transport: HttpTransport,
    base_url: Url,
    api_version: String,
    user_agent: HeaderValue,
    auth: Arc<dyn Authenticator>,
}

impl std::fmt::Debug for TransitGatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitGatewayClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

impl TransitGatewayClient {
    #[must_use]
    pub fn builder() -> TransitGatewayClientBuilder {
        TransitGatewayClientBuilder::new()
    }

    /// Build a client, including its authenticator, from loaded configuration.
    ///
    /// # Errors
    /// Returns [`TransitGatewayError::Configuration`] if the configuration is
    /// invalid or the TLS stack cannot be initialized.
    pub fn from_config(config: &TransitGatewayConfig) -> Result<Self, TransitGatewayError> {
        config.validate()?;
        let settings = HttpSettings::from(config);

        let auth: Arc<dyn Authenticator> = match &config.auth {
            AuthConfig::None => Arc::new(NoAuth),
            AuthConfig::Bearer { token } => Arc::new(BearerTokenAuthenticator::new(token)?),
            AuthConfig::Iam {
                api_key,
                token_url,
                refresh_margin,
            } => Arc::new(
                IamAuthenticator::new(api_key.clone(), token_url, &settings)?
                    .refresh_margin(*refresh_margin),
            ),
        };

        TransitGatewayClientBuilder {
            base_url: config.base_url.clone(),
            api_version: config.api_version.clone(),
            settings,
            auth,
        }
        .build()
    }

    /// Base URL with `segments` appended and the `version` parameter set.
    fn endpoint(
        &self,
        segments: &[&str],
        query: &[(&'static str, String)],
    ) -> Result<Url, TransitGatewayError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                TransitGatewayError::Configuration(format!(
                    "base URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("version", &self.api_version);
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
        resource: &str,
    ) -> Result<Bytes, TransitGatewayError> {
        let span = tracing::debug_span!(
            "transit_gateway.request",
            method = %method,
            path = url.path()
        );

        async move {
            let mut builder = Request::builder()
                .method(method)
                .uri(url.as_str())
                .header(ACCEPT, "application/json")
                .header(USER_AGENT, self.user_agent.clone());
            if let Some(authorization) = self.auth.authorization().await? {
                builder = builder.header(AUTHORIZATION, authorization);
            }
            let body = match body {
                Some(json) => {
                    builder = builder.header(CONTENT_TYPE, "application/json");
                    Full::new(Bytes::from(json))
                }
                None => Full::new(Bytes::new()),
            };
            let request = builder.body(body).map_err(HttpError::from)?;

            let response = self.transport.send(request).await?;
            tracing::debug!(status = response.status.as_u16(), "response received");
            into_success(response, resource)
        }
        .instrument(span)
        .await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&'static str, String)],
        resource: &str,
    ) -> Result<T, TransitGatewayError> {
        let url = self.endpoint(segments, query)?;
        let body = self.execute(Method::GET, url, None, resource).await?;
        decode(&body)
    }

    async fn send_json<B, T>(
        &self,
        method: Method,
        segments: &[&str],
        payload: &B,
        resource: &str,
    ) -> Result<T, TransitGatewayError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments, &[])?;
        let json = serde_json::to_vec(payload).map_err(HttpError::from)?;
        let body = self.execute(method, url, Some(json), resource).await?;
        decode(&body)
    }

    /// Request whose successful response carries no body (deletes, actions).
    async fn send_no_content(
        &self,
        method: Method,
        segments: &[&str],
        payload: Option<Vec<u8>>,
        resource: &str,
    ) -> Result<(), TransitGatewayError> {
        let url = self.endpoint(segments, &[])?;
        self.execute(method, url, payload, resource).await.map(drop)
    }
}

fn list_params(query: &ListQuery) -> Query {
    let mut params = Query::new();
    if let Some(limit) = query.limit {
        params.push(("limit", limit.to_string()));
    }
    if let Some(start) = &query.start {
        params.push(("start", start.clone()));
    }
    if let Some(network_id) = &query.network_id {
        params.push(("network_id", network_id.clone()));
    }
    params
}

#[async_trait]
impl TransitGatewayApi for TransitGatewayClient {
    async fn list_locations(&self) -> Result<Vec<Location>, TransitGatewayError> {
        let collection: LocationCollection = self.get(&["locations"], &[], "locations").await?;
        Ok(collection.locations)
    }

    async fn get_location(&self, name: &str) -> Result<LocationDetail, TransitGatewayError> {
        self.get(&["locations", name], &[], &format!("location {name}"))
            .await
    }

    async fn list_gateways(&self, query: ListQuery) -> Result<Page<Gateway>, TransitGatewayError> {
        let collection: GatewayCollection = self
            .get(&[GATEWAYS], &list_params(&query), "transit gateways")
            .await?;
        Ok(collection.into())
    }

    async fn create_gateway(
        &self,
        new_gateway: NewGateway,
    ) -> Result<Gateway, TransitGatewayError> {
        self.send_json(Method::POST, &[GATEWAYS], &new_gateway, "transit gateways")
            .await
    }

    async fn get_gateway(&self, gateway_id: &str) -> Result<Gateway, TransitGatewayError> {
        let resource = ResourceRef::gateway(gateway_id).to_string();
        self.get(&[GATEWAYS, gateway_id], &[], &resource).await
    }

    async fn update_gateway(
        &self,
        gateway_id: &str,
        patch: GatewayPatch,
    ) -> Result<Gateway, TransitGatewayError> {
        let resource = ResourceRef::gateway(gateway_id).to_string();
        self.send_json(Method::PATCH, &[GATEWAYS, gateway_id], &patch, &resource)
            .await
    }

    async fn delete_gateway(&self, gateway_id: &str) -> Result<(), TransitGatewayError> {
        let resource = ResourceRef::gateway(gateway_id).to_string();
        self.send_no_content(Method::DELETE, &[GATEWAYS, gateway_id], None, &resource)
            .await
    }

    async fn list_connections(
        &self,
        query: ListQuery,
    ) -> Result<Page<Connection>, TransitGatewayError> {
        let collection: ConnectionCollection = self
            .get(&[CONNECTIONS], &list_params(&query), "connections")
            .await?;
        Ok(collection.into())
    }

    async fn list_gateway_connections(
        &self,
        gateway_id: &str,
        query: ListQuery,
    ) -> Result<Page<Connection>, TransitGatewayError> {
        let resource = ResourceRef::gateway(gateway_id).to_string();
        let collection: ConnectionCollection = self
            .get(
                &[GATEWAYS, gateway_id, CONNECTIONS],
                &list_params(&query),
                &resource,
            )
            .await?;
        Ok(collection.into())
    }

    async fn create_connection(
        &self,
        gateway_id: &str,
        new_connection: NewConnection,
    ) -> Result<Connection, TransitGatewayError> {
        let resource = ResourceRef::gateway(gateway_id).to_string();
        self.send_json(
            Method::POST,
            &[GATEWAYS, gateway_id, CONNECTIONS],
            &new_connection,
            &resource,
        )
        .await
    }

    async fn get_connection(
        &self,
        gateway_id: &str,
        connection_id: &str,
    ) -> Result<Connection, TransitGatewayError> {
        let resource = ResourceRef::connection(gateway_id, connection_id).to_string();
        self.get(&[GATEWAYS, gateway_id, CONNECTIONS, connection_id], &[], &resource)
            .await
    }

    async fn update_connection(
        &self,
        gateway_id: &str,
        connection_id: &str,
        patch: ConnectionPatch,
    ) -> Result<Connection, TransitGatewayError> {
        let resource = ResourceRef::connection(gateway_id, connection_id).to_string();
        self.send_json(
            Method::PATCH,
            &[GATEWAYS, gateway_id, CONNECTIONS, connection_id],
            &patch,
            &resource,
        )
        .await
    }

    async fn delete_connection(
        &self,
        gateway_id: &str,
        connection_id: &str,
    ) -> Result<(), TransitGatewayError> {
        let resource = ResourceRef::connection(gateway_id, connection_id).to_string();
        self.send_no_content(
            Method::DELETE,
            &[GATEWAYS, gateway_id, CONNECTIONS, connection_id],
            None,
            &resource,
        )
        .await
    }

    async fn connection_action(
        &self,
        gateway_id: &str,
        connection_id: &str,
        action: ConnectionAction,
    ) -> Result<(), TransitGatewayError> {
        let resource = ResourceRef::connection(gateway_id, connection_id).to_string();
        let payload =
            serde_json::to_vec(&ConnectionActionRequest { action }).map_err(HttpError::from)?;
        self.send_no_content(
            Method::POST,
            &[GATEWAYS, gateway_id, CONNECTIONS, connection_id, "actions"],
            Some(payload),
            &resource,
        )
        .await
    }

    async fn list_route_reports(
        &self,
        gateway_id: &str,
    ) -> Result<Vec<RouteReport>, TransitGatewayError> {
        let resource = ResourceRef::gateway(gateway_id).to_string();
        let collection: RouteReportCollection = self
            .get(&[GATEWAYS, gateway_id, ROUTE_REPORTS], &[], &resource)
            .await?;
        Ok(collection.route_reports)
    }

    async fn create_route_report(
        &self,
        gateway_id: &str,
    ) -> Result<RouteReport, TransitGatewayError> {
        let resource = ResourceRef::gateway(gateway_id).to_string();
        let url = self.endpoint(&[GATEWAYS, gateway_id, ROUTE_REPORTS], &[])?;
        let body = self.execute(Method::POST, url, None, &resource).await?;
        decode(&body)
    }

    async fn get_route_report(
        &self,
        gateway_id: &str,
        report_id: &str,
    ) -> Result<RouteReport, TransitGatewayError> {
        let resource = ResourceRef::route_report(gateway_id, report_id).to_string();
        self.get(&[GATEWAYS, gateway_id, ROUTE_REPORTS, report_id], &[], &resource)
            .await
    }

    async fn delete_route_report(
        &self,
        gateway_id: &str,
        report_id: &str,
    ) -> Result<(), TransitGatewayError> {
        let resource = ResourceRef::route_report(gateway_id, report_id).to_string();
        self.send_no_content(
            Method::DELETE,
            &[GATEWAYS, gateway_id, ROUTE_REPORTS, report_id],
            None,
            &resource,
        )
        .await
    }

    async fn list_prefix_filters(
        &self,
        gateway_id: &str,
        connection_id: &str,
    ) -> Result<Vec<PrefixFilter>, TransitGatewayError> {
        let resource = ResourceRef::connection(gateway_id, connection_id).to_string();
        let collection: PrefixFilterCollection = self
            .get(
                &[GATEWAYS, gateway_id, CONNECTIONS, connection_id, PREFIX_FILTERS],
                &[],
                &resource,
            )
            .await?;
        Ok(collection.prefix_filters)
    }

    async fn create_prefix_filter(
        &self,
        gateway_id: &str,
        connection_id: &str,
        new_filter: NewPrefixFilter,
    ) -> Result<PrefixFilter, TransitGatewayError> {
        let resource = ResourceRef::connection(gateway_id, connection_id).to_string();
        self.send_json(
            Method::POST,
            &[GATEWAYS, gateway_id, CONNECTIONS, connection_id, PREFIX_FILTERS],
            &new_filter,
            &resource,
        )
        .await
    }

    async fn replace_prefix_filters(
        &self,
        gateway_id: &str,
        connection_id: &str,
        filters: Vec<NewPrefixFilter>,
    ) -> Result<Vec<PrefixFilter>, TransitGatewayError> {
        let resource = ResourceRef::connection(gateway_id, connection_id).to_string();
        let collection: PrefixFilterCollection = self
            .send_json(
                Method::PUT,
                &[GATEWAYS, gateway_id, CONNECTIONS, connection_id, PREFIX_FILTERS],
                &PrefixFilterReplaceRequest {
                    prefix_filters: filters,
                },
                &resource,
            )
            .await?;
        Ok(collection.prefix_filters)
    }

    async fn get_prefix_filter(
        &self,
        gateway_id: &str,
        connection_id: &str,
        filter_id: &str,
    ) -> Result<PrefixFilter, TransitGatewayError> {
        let resource = ResourceRef::prefix_filter(gateway_id, connection_id, filter_id).to_string();
        self.get(
            &[GATEWAYS, gateway_id, CONNECTIONS, connection_id, PREFIX_FILTERS, filter_id],
            &[],
            &resource,
        )
        .await
    }

    async fn update_prefix_filter(
        &self,
        gateway_id: &str,
        connection_id: &str,
        filter_id: &str,
        patch: PrefixFilterPatch,
    ) -> Result<PrefixFilter, TransitGatewayError> {
        let resource = ResourceRef::prefix_filter(gateway_id, connection_id, filter_id).to_string();
        self.send_json(
            Method::PATCH,
            &[GATEWAYS, gateway_id, CONNECTIONS, connection_id, PREFIX_FILTERS, filter_id],
            &patch,
            &resource,
        )
        .await
    }

    async fn delete_prefix_filter(
        &self,
        gateway_id: &str,
        connection_id: &str,
        filter_id: &str,
    ) -> Result<(), TransitGatewayError> {
        let resource = ResourceRef::prefix_filter(gateway_id, connection_id, filter_id).to_string();
        self.send_no_content(
            Method::DELETE,
            &[GATEWAYS, gateway_id, CONNECTIONS, connection_id, PREFIX_FILTERS, filter_id],
            None,
            &resource,
        )
        .await
    }
}

/// Builder for [`TransitGatewayClient`].
pub struct TransitGatewayClientBuilder {
    base_url: String,
    api_version: String,
    settings: HttpSettings,
    auth: Arc<dyn Authenticator>,
}

impl std::fmt::Debug for TransitGatewayClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitGatewayClientBuilder")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Default for TransitGatewayClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitGatewayClientBuilder {
    /// Production endpoint, default API version, no authentication.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_version: DEFAULT_API_VERSION.to_owned(),
            settings: HttpSettings::default(),
            auth: Arc::new(NoAuth),
        }
    }

    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.settings.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn max_body_size(mut self, bytes: usize) -> Self {
        self.settings.max_body_size = bytes;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.settings.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn tls_roots(mut self, roots: TlsRoots) -> Self {
        self.settings.tls_roots = roots;
        self
    }

    /// Allow `http://` base URLs. Only for mock servers.
    #[must_use]
    pub fn allow_insecure_http(mut self) -> Self {
        self.settings.allow_insecure_http = true;
        self
    }

    #[must_use]
    pub fn authenticator(mut self, auth: impl Authenticator + 'static) -> Self {
        self.auth = Arc::new(auth);
        self
    }

    /// Share one authenticator (and its token cache) between clients.
    #[must_use]
    pub fn shared_authenticator(mut self, auth: Arc<dyn Authenticator>) -> Self {
        self.auth = auth;
        self
    }

    /// # Errors
    /// Returns [`TransitGatewayError::Configuration`] for an unparsable or
    /// disallowed base URL, an empty API version, an invalid user agent or a
    /// TLS stack that cannot be initialized.
    pub fn build(self) -> Result<TransitGatewayClient, TransitGatewayError> {
        let base_url = Url::parse(&self.base_url).map_err(|e| {
            TransitGatewayError::Configuration(format!("invalid base URL '{}': {e}", self.base_url))
        })?;
        match base_url.scheme() {
            "https" => {}
            "http" if self.settings.allow_insecure_http => {}
            scheme => {
                return Err(TransitGatewayError::Configuration(format!(
                    "base URL scheme '{scheme}' not allowed"
                )));
            }
        }
        if self.api_version.trim().is_empty() {
            return Err(TransitGatewayError::Configuration(
                "API version must not be empty".to_owned(),
            ));
        }
        let user_agent = HeaderValue::from_str(&self.settings.user_agent)
            .map_err(|e| TransitGatewayError::Configuration(format!("invalid user agent: {e}")))?;

        Ok(TransitGatewayClient {
            transport: HttpTransport::new(&self.settings)?,
            base_url,
            api_version: self.api_version,
            user_agent,
            auth: self.auth,
        })
    }
}
