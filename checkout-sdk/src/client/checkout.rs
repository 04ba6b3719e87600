//! Checkout API client (storefront → checkout service).

use reqwest::Client;
use url::Url;

use super::ClientError;
use crate::objects::{CreatePaymentIntentRequest, ErrorEnvelope, PaymentIntentResponse};

/// Typed HTTP client for the payment-authorization endpoint.
#[derive(Debug, Clone)]
pub struct CheckoutClient {
    http: Client,
    base_url: Url,
}

impl CheckoutClient {
    /// Create a new `CheckoutClient` rooted at `base_url`
    /// (e.g. `https://shop.example.com`).
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure timeouts or a proxy).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `POST /api/create-payment-intent` – validate the cart and obtain a
    /// client secret for completing payment.
    pub async fn create_payment_intent(
        &self,
        request: &CreatePaymentIntentRequest,
    ) -> Result<PaymentIntentResponse, ClientError> {
        let url = self.base_url.join("/api/create-payment-intent")?;

        let resp = self.http.post(url).json(request).send().await?;

        parse_response(resp).await
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ClientError> {
    let status = resp.status();
    let bytes = resp.bytes().await?;
    if !status.is_success() {
        return Err(match serde_json::from_slice::<ErrorEnvelope>(&bytes) {
            Ok(envelope) => ClientError::Api { status, envelope },
            Err(_) => ClientError::Status {
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            },
        });
    }
    serde_json::from_slice(&bytes).map_err(ClientError::Json)
}
