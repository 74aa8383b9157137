//! Asynchronous UpCloud compute client implementation.

use crate::models::{
    Account, AccountEnvelope, Plan, PlansEnvelope, Server, ServerDetails, ServerEnvelope,
    ServerSize, ServerSizesEnvelope, ServersEnvelope, StartServerEnvelope, StartServerRequest,
    StopServerEnvelope, StopServerRequest, Storage, StorageFilter, StoragesEnvelope, Zone,
    ZonesEnvelope,
};
use crate::Result;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};
use upcloud_core::client::ClientConfig;
use upcloud_core::request::RequestBuilder;
use upcloud_core::response::{decode_json, expect_empty};
use upcloud_core::transport::{HttpResponse, ReqwestTransport, Transport};
use upcloud_core::uuid::ServerUuid;
use upcloud_core::{Credentials, UpcloudClientConfig};
use url::Url;
use validator::Validate;

/// User agent sent by the live transport.
pub const USER_AGENT: &str = concat!("upcloud-compute/", env!("CARGO_PKG_VERSION"));

/// Builder for [`UpcloudClient`].
pub struct UpcloudClientBuilder {
    config: UpcloudClientConfig,
    http_config: ClientConfig,
    credentials: Credentials,
    transport: Option<Arc<dyn Transport>>,
}

impl UpcloudClientBuilder {
    /// Create a builder for the given account login.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            config: UpcloudClientConfig::default(),
            http_config: ClientConfig::new(),
            credentials: Credentials::new(username, password),
            transport: None,
        }
    }

    /// Replace the whole client configuration.
    #[must_use]
    pub fn with_config(mut self, config: UpcloudClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the API host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Override the API version segment.
    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.config.api_version = version.into();
        self
    }

    /// Override the per-request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.config.request_timeout_secs = seconds;
        self
    }

    /// Override the connection and pooling settings.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Use a custom transport instead of the live HTTP client.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`upcloud_core::Error::ConfigError`] if the configuration is
    /// invalid or the live transport cannot be constructed.
    pub fn build(self) -> Result<UpcloudClient> {
        self.config.check()?;
        let host = self.config.parse_host()?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(
                &self.config,
                &self.http_config,
                USER_AGENT,
            )?),
        };

        Ok(UpcloudClient {
            requests: RequestBuilder::new(host, self.config.api_version, self.credentials),
            transport,
        })
    }
}

/// Asynchronous UpCloud compute client.
///
/// Cloning is cheap and clones share the transport. Every operation performs
/// exactly one HTTP round trip and keeps no state between calls.
#[derive(Clone)]
pub struct UpcloudClient {
    requests: RequestBuilder,
    transport: Arc<dyn Transport>,
}

impl UpcloudClient {
    /// Construct a client for the public API with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        UpcloudClientBuilder::new(username, password).build()
    }

    /// Start a builder for the given account login.
    #[must_use]
    pub fn builder(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> UpcloudClientBuilder {
        UpcloudClientBuilder::new(username, password)
    }

    /// Return the API host.
    #[must_use]
    pub fn host(&self) -> &Url {
        self.requests.host()
    }

    /// Return the API version segment.
    #[must_use]
    pub fn api_version(&self) -> &str {
        self.requests.api_version()
    }

    /// Fetch the account of the authenticated user.
    pub async fn get_account(&self) -> Result<Account> {
        let envelope: AccountEnvelope = self.get_json("account", &[]).await?;
        Ok(envelope.into_inner())
    }

    /// List available zones.
    pub async fn get_zones(&self) -> Result<Vec<Zone>> {
        let envelope: ZonesEnvelope = self.get_json("zone", &[]).await?;
        Ok(envelope.into_inner().into_vec())
    }

    /// List preconfigured plans.
    pub async fn get_plans(&self) -> Result<Vec<Plan>> {
        let envelope: PlansEnvelope = self.get_json("plan", &[]).await?;
        Ok(envelope.into_inner().into_vec())
    }

    /// List allowed CPU/memory combinations.
    pub async fn get_server_sizes(&self) -> Result<Vec<ServerSize>> {
        let envelope: ServerSizesEnvelope = self.get_json("server_size", &[]).await?;
        Ok(envelope.into_inner().into_vec())
    }

    /// List servers owned by the account.
    pub async fn get_servers(&self) -> Result<Vec<Server>> {
        let envelope: ServersEnvelope = self.get_json("server", &[]).await?;
        Ok(envelope.into_inner().into_vec())
    }

    /// Fetch full details of one server.
    pub async fn get_server_details(&self, uuid: ServerUuid) -> Result<ServerDetails> {
        let path = format!("server/{uuid}");
        let envelope: ServerEnvelope = self.get_json(&path, &[]).await?;
        Ok(envelope.into_inner())
    }

    /// List storages, optionally restricted by `filter`.
    pub async fn get_storages(&self, filter: Option<StorageFilter>) -> Result<Vec<Storage>> {
        let path = match filter {
            Some(filter) => format!("storage/{filter}"),
            None => "storage".to_string(),
        };
        let envelope: StoragesEnvelope = self.get_json(&path, &[]).await?;
        Ok(envelope.into_inner().into_vec())
    }

    /// Create a server; the provider assigns its UUID and state.
    pub async fn create_server(&self, server: &ServerDetails) -> Result<ServerDetails> {
        let body = ServerEnvelope::new(server.clone());
        let envelope: ServerEnvelope = self
            .send_json(Method::POST, "server", &[], Some(&body))
            .await?;
        Ok(envelope.into_inner())
    }

    /// Ask the provider to start a server.
    ///
    /// The returned state reflects what the provider reported; callers should
    /// not assume the server is running unless it says so.
    pub async fn start_server(
        &self,
        uuid: ServerUuid,
        options: &StartServerRequest,
    ) -> Result<ServerDetails> {
        let path = format!("server/{uuid}/start");
        let body = StartServerEnvelope::new(options.clone());
        let envelope: ServerEnvelope = self
            .send_json(Method::POST, &path, &[], Some(&body))
            .await?;
        Ok(envelope.into_inner())
    }

    /// Ask the provider to stop a server.
    ///
    /// The options are validated before anything is sent.
    pub async fn stop_server(
        &self,
        uuid: ServerUuid,
        options: &StopServerRequest,
    ) -> Result<ServerDetails> {
        options.validate()?;

        let path = format!("server/{uuid}/stop");
        let body = StopServerEnvelope::new(options.clone());
        let envelope: ServerEnvelope = self
            .send_json(Method::POST, &path, &[], Some(&body))
            .await?;
        Ok(envelope.into_inner())
    }

    /// Delete a server, and its storages too when `delete_storages` is set.
    pub async fn delete_server(&self, uuid: ServerUuid, delete_storages: bool) -> Result<()> {
        let path = format!("server/{uuid}");
        // Without the flag the provider keeps the attached storages.
        let mut params = Vec::new();
        if delete_storages {
            params.push(("storages", String::from("1")));
        }

        let response = self
            .execute::<()>(Method::DELETE, &path, &params, None)
            .await?;
        expect_empty(&path, response)
    }

    async fn get_json<T>(&self, path: &str, params: &[(&'static str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.send_json::<(), T>(Method::GET, path, params, None)
            .await
    }

    async fn send_json<B, R>(
        &self,
        method: Method,
        path: &str,
        params: &[(&'static str, String)],
        body: Option<&B>,
    ) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.execute(method, path, params, body).await?;
        decode_json(path, response)
    }

    async fn execute<B>(
        &self,
        method: Method,
        path: &str,
        params: &[(&'static str, String)],
        body: Option<&B>,
    ) -> Result<HttpResponse>
    where
        B: Serialize + ?Sized,
    {
        let request = self.requests.build(method, path, params, body)?;
        debug!(
            method = %request.method,
            path = %request.path_and_query(),
            has_body = request.body.is_some(),
            "Sending UpCloud request"
        );

        let response = self.transport.execute(request).await?;
        trace!(path = %path, status = %response.status, "Received UpCloud response");
        Ok(response)
    }
}

impl fmt::Debug for UpcloudClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpcloudClient")
            .field("requests", &self.requests)
            .finish_non_exhaustive()
    }
}
