//! Transport adapters.
//!
//! A [`Transport`] performs exactly one HTTP round trip. It never interprets
//! status codes; that is left to [`crate::response`]. The client holds the
//! transport as `Arc<dyn Transport>`, so the live [`ReqwestTransport`] can be
//! swapped for a [`FixtureTransport`] that replays recorded exchanges.

use crate::client::ClientConfig;
use crate::config::UpcloudClientConfig;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, Method, StatusCode};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::{debug, warn};
use url::Url;

/// A fully qualified request ready to be executed.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL including any query string
    pub url: Url,
    /// Request headers
    pub headers: HeaderMap,
    /// Serialized body, if any
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// The URL path followed by `?query` when a query string is present.
    #[must_use]
    pub fn path_and_query(&self) -> String {
        match self.url.query() {
            Some(query) => format!("{}?{query}", self.url.path()),
            None => self.url.path().to_string(),
        }
    }
}

/// A raw response whose body has already been read to completion.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body bytes
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Build a response with no headers.
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Build a JSON response from a string body.
    #[must_use]
    pub fn json(status: StatusCode, body: impl Into<String>) -> Self {
        let mut response = Self::new(status, body.into().into_bytes());
        response
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        response
    }
}

/// Executes one HTTP request and returns one response or a transport error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform the round trip.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] when no HTTP response was received.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Live transport backed by a pooled [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    /// Build a transport from the client and HTTP configuration.
    ///
    /// The request timeout comes from `config`; `http_config` only covers
    /// connecting and pooling.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] when the CA certificate cannot be
    /// loaded or the HTTP client cannot be built.
    pub fn new(
        config: &UpcloudClientConfig,
        http_config: &ClientConfig,
        user_agent: &str,
    ) -> Result<Self> {
        let mut builder = ClientBuilder::new()
            .user_agent(user_agent)
            .timeout(config.timeout())
            .connect_timeout(http_config.connect_timeout)
            .pool_idle_timeout(http_config.pool_idle_timeout)
            .pool_max_idle_per_host(http_config.pool_max_idle_per_host)
            .gzip(http_config.enable_compression);

        if !config.tls_verify {
            warn!("TLS verification disabled for UpCloud client");
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(ca_cert) = &config.tls_ca_cert {
            debug!("loading CA certificate from {}", ca_cert.display());
            let bytes = std::fs::read(ca_cert).map_err(|err| {
                Error::ConfigError(format!(
                    "Failed to read CA certificate {}: {err}",
                    ca_cert.display()
                ))
            })?;
            let cert = reqwest::Certificate::from_pem(&bytes)
                .map_err(|err| Error::ConfigError(format!("Invalid CA certificate: {err}")))?;
            builder = builder.add_root_certificate(cert);
        }

        let http = builder
            .build()
            .map_err(|err| Error::ConfigError(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self { http })
    }

    /// Wrap an already configured [`reqwest::Client`].
    #[must_use]
    pub const fn from_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let mut builder = self.http.request(method, url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        // Reading to completion hands the connection back to the pool.
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Deterministic transport that replays registered responses.
///
/// Routes are keyed by method and `path[?query]` of the request URL, e.g.
/// `(GET, "/1.3/server")`. Every executed request is recorded so tests can
/// assert on exactly what was sent. Requests to unregistered routes receive a
/// 404 with a provider-shaped `ROUTE_NOT_FOUND` error body.
#[derive(Debug, Default)]
pub struct FixtureTransport {
    routes: RwLock<HashMap<(Method, String), Result<HttpResponse>>>,
    requests: RwLock<Vec<HttpRequest>>,
}

impl FixtureTransport {
    /// Create a transport with no routes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a response for `method` and `path`.
    #[must_use]
    pub fn with_response(
        self,
        method: Method,
        path: impl Into<String>,
        response: HttpResponse,
    ) -> Self {
        self.insert(method, path.into(), Ok(response));
        self
    }

    /// Register a JSON body returned with `status`.
    #[must_use]
    pub fn with_json(
        self,
        method: Method,
        path: impl Into<String>,
        status: StatusCode,
        body: impl Into<String>,
    ) -> Self {
        self.with_response(method, path, HttpResponse::json(status, body))
    }

    /// Register a transport-level failure for `method` and `path`.
    #[must_use]
    pub fn with_failure(self, method: Method, path: impl Into<String>, error: Error) -> Self {
        self.insert(method, path.into(), Err(error));
        self
    }

    /// Requests executed so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // Poisoning is ignored: a panicked caller must not drop registered routes.
    fn insert(&self, method: Method, path: String, outcome: Result<HttpResponse>) {
        self.routes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((method, path), outcome);
    }

    fn lookup(&self, method: &Method, path: &str) -> Option<Result<HttpResponse>> {
        self.routes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(method.clone(), path.to_string()))
            .cloned()
    }
}

#[async_trait]
impl Transport for FixtureTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let path = request.path_and_query();
        let method = request.method.clone();

        self.requests
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        self.lookup(&method, &path).unwrap_or_else(|| {
            let body = serde_json::json!({
                "error": {
                    "error_code": "ROUTE_NOT_FOUND",
                    "error_message": format!("No fixture registered for {method} {path}"),
                }
            });
            Ok(HttpResponse::json(StatusCode::NOT_FOUND, body.to_string()))
        })
    }
}
