//! Response decoding.
//!
//! Status codes below 400 are decoded into the caller's envelope type. At
//! 400 and above the body must be a provider error envelope; it becomes
//! [`Error::Api`], or [`Error::Decode`] when even the error body is
//! unreadable. Transport failures never reach this module.

use crate::error::ErrorEnvelope;
use crate::transport::HttpResponse;
use crate::{Error, Result};
use serde::de::DeserializeOwned;

/// Decode a successful response body as `T`.
///
/// # Errors
///
/// Returns [`Error::Api`] for a well-formed provider error and
/// [`Error::Decode`] when the body does not match the expected shape.
pub fn decode_json<T>(endpoint: &str, response: HttpResponse) -> Result<T>
where
    T: DeserializeOwned,
{
    let response = check_status(endpoint, response)?;
    serde_json::from_slice::<T>(&response.body).map_err(|err| Error::Decode {
        status: response.status.as_u16(),
        message: format!("Failed to parse response for `{endpoint}`: {err}"),
    })
}

/// Accept a successful response without inspecting its body.
///
/// Used by operations that have no result payload.
///
/// # Errors
///
/// Fails like [`decode_json`] when the status is 400 or above.
pub fn expect_empty(endpoint: &str, response: HttpResponse) -> Result<()> {
    check_status(endpoint, response).map(|_| ())
}

fn check_status(endpoint: &str, response: HttpResponse) -> Result<HttpResponse> {
    if response.status.as_u16() < 400 {
        return Ok(response);
    }

    let status = response.status.as_u16();
    match serde_json::from_slice::<ErrorEnvelope>(&response.body) {
        Ok(envelope) => Err(Error::Api(envelope.error)),
        Err(err) => Err(Error::Decode {
            status,
            message: format!(
                "Failed to parse error response for `{endpoint}`: {err}; body: {}",
                String::from_utf8_lossy(&response.body)
            ),
        }),
    }
}
