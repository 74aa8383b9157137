//! Configuration structures for UpCloud clients.
//!
//! [`UpcloudClientConfig`] describes where the API lives and how long a call
//! may take; [`Credentials`] carries the account login used for HTTP Basic
//! authentication on every request.

use crate::client::{DEFAULT_API_VERSION, DEFAULT_HOST};
use crate::Error;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Configuration for an UpCloud client instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct UpcloudClientConfig {
    /// API base URL
    #[validate(url)]
    #[serde(default = "default_host")]
    pub host: String,

    /// API version path segment, e.g. `1.3`
    #[validate(length(min = 1))]
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Whether to verify TLS certificates
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// Optional path to custom CA certificate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_ca_cert: Option<std::path::PathBuf>,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

const fn default_request_timeout_secs() -> u64 {
    30
}

const fn default_tls_verify() -> bool {
    true
}

impl UpcloudClientConfig {
    /// Create a configuration targeting `host`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or validation fails.
    pub fn new(host: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            host: host.into(),
            ..Self::default()
        };

        config.check()?;
        Ok(config)
    }

    /// Set the API version.
    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Set custom CA certificate path.
    #[must_use]
    pub fn with_ca_cert(mut self, path: std::path::PathBuf) -> Self {
        self.tls_ca_cert = Some(path);
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the configuration, mapping failures to [`Error::ConfigError`].
    ///
    /// # Errors
    ///
    /// Returns an error if any field is out of range.
    pub fn check(&self) -> Result<(), Error> {
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))
    }

    /// Parse the host URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed or cannot carry a path.
    pub fn parse_host(&self) -> Result<Url, Error> {
        let url = Url::parse(&self.host)
            .map_err(|e| Error::ConfigError(format!("Invalid host URL: {e}")))?;
        if url.cannot_be_a_base() {
            return Err(Error::ConfigError(format!(
                "Host URL `{}` cannot be used as a base",
                self.host
            )));
        }
        Ok(url)
    }
}

impl Default for UpcloudClientConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            api_version: default_api_version(),
            request_timeout_secs: default_request_timeout_secs(),
            tls_verify: default_tls_verify(),
            tls_ca_cert: None,
        }
    }
}

/// Account login used for HTTP Basic authentication.
///
/// The password is held as a [`SecretString`]; it is redacted from `Debug`
/// output and this type deliberately does not implement `Serialize`.
#[derive(Debug)]
pub struct Credentials {
    username: String,
    password: SecretString,
}

impl Credentials {
    /// Create credentials from a username and password.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Account username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Account password.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new() {
        let config = UpcloudClientConfig::new("https://api.example.com").unwrap();
        assert_eq!(config.host, "https://api.example.com");
        assert_eq!(config.api_version, "1.3");
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.tls_verify);
    }

    #[test]
    fn test_config_invalid_url() {
        let err = UpcloudClientConfig::new("not-a-url").unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_config_default() {
        let config = UpcloudClientConfig::default();
        assert_eq!(config.host, "https://api.upcloud.com");
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = UpcloudClientConfig::new("https://api.example.com")
            .unwrap()
            .with_api_version("1.2")
            .with_timeout(60)
            .with_tls_verify(false);

        assert_eq!(config.api_version, "1.2");
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert!(!config.tls_verify);
    }

    #[test]
    fn test_config_validation_timeout_range() {
        let mut config = UpcloudClientConfig::default();
        config.request_timeout_secs = 0;
        assert!(config.check().is_err());

        config.request_timeout_secs = 301;
        assert!(config.check().is_err());

        config.request_timeout_secs = 300;
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_config_validation_empty_version() {
        let config = UpcloudClientConfig::default().with_api_version("");
        assert!(config.check().is_err());
    }

    #[test]
    fn test_config_deserialize_defaults() {
        let config: UpcloudClientConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, UpcloudClientConfig::default());
    }

    #[test]
    fn test_parse_host() {
        let config = UpcloudClientConfig::new("https://api.example.com:8443").unwrap();
        let url = config.parse_host().unwrap();
        assert_eq!(url.host_str(), Some("api.example.com"));
        assert_eq!(url.port(), Some(8443));
    }

    #[test]
    fn test_credentials_redacted_in_debug() {
        let creds = Credentials::new("alice", "hunter2");
        assert_eq!(creds.username(), "alice");
        assert_eq!(creds.password(), "hunter2");
        assert!(!format!("{creds:?}").contains("hunter2"));
    }
}
