//! Stripe-compatible payment processor over HTTP.

use super::{
    AuthorizationRequest, PaymentProcessor, ProcessorError, ProcessorErrorKind, ProcessorIntent,
};
use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Connection settings for [`StripeProcessor`].
#[derive(Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    pub api_base: Url,
    /// Sent as the `Stripe-Version` header.
    pub api_version: String,
    pub timeout: Duration,
}

impl StripeConfig {
    pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";
    pub const DEFAULT_API_VERSION: &str = "2023-10-16";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
}

impl fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StripeConfig")
            .field("secret_key", &"<redacted>")
            .field("api_base", &self.api_base.as_str())
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Creates payment intents through `POST /v1/payment_intents`.
///
/// Built once at startup; the inner `reqwest::Client` pools connections and
/// is shared by every request.
#[derive(Debug, Clone)]
pub struct StripeProcessor {
    config: StripeConfig,
    http_client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

impl StripeProcessor {
    pub fn new(config: StripeConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            config,
            http_client,
        }
    }

    fn endpoint(&self) -> Result<Url, ProcessorError> {
        self.config.api_base.join("/v1/payment_intents").map_err(|e| {
            ProcessorError::new(
                ProcessorErrorKind::Other,
                format!("invalid processor url: {e}"),
            )
        })
    }
}

fn transport_error(err: reqwest::Error) -> ProcessorError {
    ProcessorError::new(ProcessorErrorKind::Transport, err.to_string())
}

/// Turn a non-2xx response body into a [`ProcessorError`].
fn parse_error_body(status: u16, body: &[u8]) -> ProcessorError {
    let error = match serde_json::from_slice::<StripeErrorBody>(body) {
        Ok(StripeErrorBody { error }) => {
            let kind = error
                .kind
                .as_deref()
                .map(ProcessorErrorKind::from_type)
                .unwrap_or(ProcessorErrorKind::Other);
            let message = error
                .message
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| format!("payment processor returned status {status}"));
            let mut parsed = ProcessorError::new(kind, message);
            parsed.code = error.code;
            parsed
        }
        Err(_) => ProcessorError::new(
            ProcessorErrorKind::InvalidResponse,
            format!("payment processor returned status {status}"),
        ),
    };
    let error = error.with_http_status(status);
    if status == 429 {
        ProcessorError {
            kind: ProcessorErrorKind::RateLimit,
            ..error
        }
    } else {
        error
    }
}

#[async_trait]
impl PaymentProcessor for StripeProcessor {
    async fn create_authorization(
        &self,
        request: &AuthorizationRequest,
    ) -> Result<ProcessorIntent, ProcessorError> {
        let url = self.endpoint()?;
        let amount = request.amount.to_string();
        let request_id = request.metadata.request_id.to_string();
        let automatic = if request.automatic_payment_methods {
            "true"
        } else {
            "false"
        };
        let form = [
            ("amount", amount.as_str()),
            ("currency", request.currency.as_str()),
            ("automatic_payment_methods[enabled]", automatic),
            ("metadata[requestId]", request_id.as_str()),
            ("metadata[orderItems]", request.metadata.order_items.as_str()),
        ];

        let response = self
            .http_client
            .post(url)
            .bearer_auth(&self.config.secret_key)
            .header("Stripe-Version", &self.config.api_version)
            .form(&form)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;
        debug!(status = %status, "Payment processor responded");

        if !status.is_success() {
            return Err(parse_error_body(status.as_u16(), &body));
        }

        serde_json::from_slice(&body).map_err(|e| {
            ProcessorError::new(
                ProcessorErrorKind::InvalidResponse,
                format!("invalid payment processor response: {e}"),
            )
            .with_http_status(status.as_u16())
        })
    }
}
