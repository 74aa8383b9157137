//! # upcloud-core
//!
//! Request pipeline shared by the UpCloud API clients.
//!
//! ## Modules
//!
//! - [`error`] - Error kinds and the provider error envelope
//! - [`config`] - Client configuration and credentials
//! - [`client`] - HTTP defaults and tuning
//! - [`transport`] - Swappable transport adapters (live and fixture-backed)
//! - [`request`] - Authenticated request construction
//! - [`response`] - Status handling and body decoding
//! - [`uuid`] - Strongly-typed resource identifiers

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod request;
pub mod response;
pub mod transport;
pub mod uuid;

// Re-export commonly used types
pub use config::{Credentials, UpcloudClientConfig};
pub use error::{ApiError, Error, ErrorKind, Result};
pub use transport::{FixtureTransport, HttpRequest, HttpResponse, ReqwestTransport, Transport};
