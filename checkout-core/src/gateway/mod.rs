//! The payment processor seam.
//!
//! [`PaymentProcessor`] is the only outbound dependency of the pipeline.
//! [`StripeProcessor`] talks to a Stripe-compatible HTTP API; tests plug in
//! scripted implementations.

mod stripe;

pub use stripe::{StripeConfig, StripeProcessor};

use crate::cart::AuthorizationMetadata;
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Marker the processor puts in rate-limit errors.
pub const RATE_LIMIT_MARKER: &str = "rate_limit";

/// Parameters of a "create authorization" call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    /// Minor units.
    pub amount: i64,
    pub currency: String,
    /// Let the processor choose the payment methods offered to the customer.
    pub automatic_payment_methods: bool,
    pub metadata: AuthorizationMetadata,
}

/// What the processor returns for a created authorization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProcessorIntent {
    pub id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
}

/// Processor-side classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorErrorKind {
    RateLimit,
    InvalidRequest,
    Card,
    Authentication,
    Api,
    /// The request never got a response (connect, TLS, timeout).
    Transport,
    /// A response arrived but could not be understood.
    InvalidResponse,
    Other,
}

impl ProcessorErrorKind {
    /// Map the processor's `error.type` field.
    pub fn from_type(kind: &str) -> Self {
        match kind {
            "rate_limit_error" => Self::RateLimit,
            "invalid_request_error" => Self::InvalidRequest,
            "card_error" => Self::Card,
            "authentication_error" => Self::Authentication,
            "api_error" => Self::Api,
            _ => Self::Other,
        }
    }
}

/// A failed call to the processor. Displays as the processor's message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProcessorError {
    pub kind: ProcessorErrorKind,
    pub message: String,
    pub code: Option<String>,
    pub http_status: Option<u16>,
}

impl ProcessorError {
    pub fn new(kind: ProcessorErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            http_status: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    /// Whether the processor signalled a transient rate limit, the only
    /// failure worth retrying.
    pub fn is_rate_limited(&self) -> bool {
        self.kind == ProcessorErrorKind::RateLimit
            || self.http_status == Some(429)
            || self.code.as_deref() == Some(RATE_LIMIT_MARKER)
            || self.message.contains(RATE_LIMIT_MARKER)
    }
}

/// A remote service that issues payment authorizations.
///
/// Implementations are shared across concurrent requests and must not
/// mutate per-request state.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn create_authorization(
        &self,
        request: &AuthorizationRequest,
    ) -> Result<ProcessorIntent, ProcessorError>;
}
