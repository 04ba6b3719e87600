//! HTTP client for the checkout service.
//!
//! Gated behind the `client` cargo feature so downstream crates that only
//! need the shared types do not pull in `reqwest`.

mod checkout;

pub use checkout::CheckoutClient;

use reqwest::StatusCode;

use crate::objects::ErrorEnvelope;

/// Errors produced by the SDK HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure (DNS, TLS, connection reset, …).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server rejected the request with a structured error envelope.
    #[error("api error: status {status}, {} (request {})", .envelope.error, .envelope.request_id)]
    Api {
        status: StatusCode,
        envelope: ErrorEnvelope,
    },

    /// The server returned a non-2xx status without an error envelope.
    #[error("unexpected status {status}, body: {body}")]
    Status { status: StatusCode, body: String },

    /// Response body could not be deserialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The base URL could not be joined with the endpoint path.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}
