//! Request construction.
//!
//! Turns a logical endpoint such as `server/{uuid}/stop` into an
//! authenticated [`HttpRequest`] against `{host}/{api_version}/{endpoint}`.
//! No network I/O happens here.

use crate::config::Credentials;
use crate::transport::HttpRequest;
use crate::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use url::Url;

const JSON: &str = "application/json";

/// Builds authenticated requests against a versioned API root.
#[derive(Clone)]
pub struct RequestBuilder {
    host: Url,
    api_version: String,
    credentials: Arc<Credentials>,
}

impl RequestBuilder {
    /// Create a builder for `host` and `api_version`.
    #[must_use]
    pub fn new(host: Url, api_version: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            host,
            api_version: api_version.into(),
            credentials: Arc::new(credentials),
        }
    }

    /// API host.
    #[must_use]
    pub fn host(&self) -> &Url {
        &self.host
    }

    /// API version segment.
    #[must_use]
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Join host, API version and endpoint into one URL.
    ///
    /// Empty segments are dropped so stray slashes never produce `//`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] if the host cannot carry a path.
    pub fn endpoint_url(&self, endpoint: &str, query: &[(&'static str, String)]) -> Result<Url> {
        let mut url = self.host.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                Error::InvalidRequest(format!("Host `{}` cannot be a base URL", self.host))
            })?;
            segments.pop_if_empty();
            segments.extend(
                self.api_version
                    .split('/')
                    .chain(endpoint.split('/'))
                    .filter(|segment| !segment.is_empty()),
            );
        }

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }

        Ok(url)
    }

    /// Build a request for `endpoint`, serializing `body` as JSON when given.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] if the URL cannot be built or the
    /// body cannot be serialized.
    pub fn build<B>(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&'static str, String)],
        body: Option<&B>,
    ) -> Result<HttpRequest>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint_url(endpoint, query)?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, self.authorization()?);
        headers.insert(ACCEPT, HeaderValue::from_static(JSON));

        let body = match body {
            Some(payload) => {
                let bytes = serde_json::to_vec(payload).map_err(|err| {
                    Error::InvalidRequest(format!(
                        "Failed to serialize request body for `{endpoint}`: {err}"
                    ))
                })?;
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
                Some(bytes)
            }
            None => None,
        };

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
        })
    }

    fn authorization(&self) -> Result<HeaderValue> {
        let token = STANDARD.encode(format!(
            "{}:{}",
            self.credentials.username(),
            self.credentials.password()
        ));
        let mut value = HeaderValue::from_str(&format!("Basic {token}"))
            .map_err(|err| Error::InvalidRequest(format!("Invalid credentials: {err}")))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("host", &self.host.as_str())
            .field("api_version", &self.api_version)
            .field("username", &self.credentials.username())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn builder(host: &str) -> RequestBuilder {
        RequestBuilder::new(
            Url::parse(host).unwrap(),
            "1.3",
            Credentials::new("alice", "s3cret"),
        )
    }

    #[test]
    fn test_endpoint_url_joins_version() {
        let url = builder("https://api.upcloud.com").endpoint_url("account", &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.upcloud.com/1.3/account");
    }

    #[test]
    fn test_endpoint_url_no_double_slashes() {
        let b = builder("https://api.upcloud.com/");
        let url = b.endpoint_url("/server//abc/stop/", &[]).unwrap();
        assert_eq!(url.path(), "/1.3/server/abc/stop");
    }

    #[test]
    fn test_endpoint_url_keeps_host_path_prefix() {
        let url = builder("http://localhost:8080/proxy/")
            .endpoint_url("storage/private", &[])
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/proxy/1.3/storage/private");
    }

    #[test]
    fn test_endpoint_url_query() {
        let b = builder("https://api.upcloud.com");
        let url = b
            .endpoint_url("server/abc", &[("storages", "1".to_string())])
            .unwrap();
        assert_eq!(url.as_str(), "https://api.upcloud.com/1.3/server/abc?storages=1");

        let url = b.endpoint_url("server/abc", &[]).unwrap();
        assert!(url.query().is_none());
    }

    #[test]
    fn test_build_sets_basic_auth() {
        let req = builder("https://api.upcloud.com")
            .build::<()>(Method::GET, "account", &[], None)
            .unwrap();

        let auth = req.headers.get(AUTHORIZATION).unwrap();
        // base64("alice:s3cret")
        assert_eq!(auth.to_str().unwrap(), "Basic YWxpY2U6czNjcmV0");
        assert!(auth.is_sensitive());
        assert!(req.headers.get(CONTENT_TYPE).is_none());
        assert!(req.body.is_none());
        assert!(!format!("{req:?}").contains("YWxpY2U6czNjcmV0"));
    }

    #[test]
    fn test_build_with_body() {
        let body = json!({"stop_server": {"stop_type": "soft"}});
        let req = builder("https://api.upcloud.com")
            .build(Method::POST, "server/abc/stop", &[], Some(&body))
            .unwrap();

        assert_eq!(req.method, Method::POST);
        assert_eq!(req.headers.get(CONTENT_TYPE).unwrap(), JSON);
        let sent: serde_json::Value = serde_json::from_slice(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(sent, body);
    }

    #[test]
    fn test_debug_hides_password() {
        let rendered = format!("{:?}", builder("https://api.upcloud.com"));
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("s3cret"));
    }
}
