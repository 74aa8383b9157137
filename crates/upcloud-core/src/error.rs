//! Error types for UpCloud operations.
//!
//! Every failure an operation can produce is one of a small set of kinds:
//! the transport never delivered a response, the provider answered with a
//! structured error, or a body did not have the expected shape. Request-side
//! problems (bad configuration, invalid payloads) are caught before any
//! network I/O happens.

use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Main error type for UpCloud operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// No HTTP response was received (DNS, TCP, TLS, timeout).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The provider rejected the request with a structured error body.
    #[error("{0}")]
    Api(ApiError),

    /// A response body did not match the expected JSON shape.
    #[error("Failed to decode response (HTTP {status}): {message}")]
    Decode {
        /// HTTP status code of the undecodable response
        status: u16,
        /// Decoder diagnostics
        message: String,
    },

    /// The request could not be assembled.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A request payload failed validation.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Invalid UUID format
    #[error("Invalid UUID: {0}")]
    InvalidUuid(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Network-level failure before any HTTP response.
    Transport,
    /// Provider returned status >= 400 with a well-formed error body.
    Api,
    /// Body did not match the expected shape.
    Decode,
    /// Request rejected locally before it was sent.
    Request,
    /// Client could not be configured.
    Config,
}

/// Specialized result type for UpCloud operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error payload returned by the provider for failed requests.
///
/// Decoded from `{"error": {"error_code": ..., "error_message": ...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiError {
    /// Provider error code, e.g. `SERVER_NOT_FOUND`
    #[serde(rename = "error_code")]
    pub code: String,
    /// Human-readable message
    #[serde(rename = "error_message")]
    pub message: String,
}

impl ApiError {
    /// Create a new API error.
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.message, self.code)
    }
}

impl std::error::Error for ApiError {}

/// Wire wrapper around [`ApiError`].
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    /// The wrapped error
    pub error: ApiError,
}

impl Error {
    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) => ErrorKind::Transport,
            Self::Api(_) => ErrorKind::Api,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::InvalidRequest(_) | Self::ValidationError(_) | Self::InvalidUuid(_) => {
                ErrorKind::Request
            }
            Self::ConfigError(_) => ErrorKind::Config,
        }
    }

    /// Returns the error code for this error.
    ///
    /// For [`Error::Api`] this is the provider's own code.
    #[must_use]
    pub fn error_code(&self) -> &str {
        match self {
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Api(err) => &err.code,
            Self::Decode { .. } => "DECODE_ERROR",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidUuid(_) => "INVALID_UUID",
            Self::ConfigError(_) => "CONFIG_ERROR",
        }
    }

    /// Returns the provider error, if this is an API failure.
    #[must_use]
    pub const fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the HTTP status attached to a decode failure.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Decode { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Self::Api(err)
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<uuid::Error> for Error {
    fn from(err: uuid::Error) -> Self {
        Self::InvalidUuid(err.to_string())
    }
}
