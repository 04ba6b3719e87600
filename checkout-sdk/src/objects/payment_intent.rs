//! Request and response bodies of `POST /api/create-payment-intent`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::cart::CartLineItem;

/// Request body for creating a payment authorization.
///
/// `amount` is the total the client believes it owes, in decimal currency
/// units. The server recomputes it from `items` and rejects a mismatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePaymentIntentRequest {
    pub items: Vec<CartLineItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Successful response: the client secret used to complete payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub client_secret: String,
    /// Charged amount in minor currency units (cents).
    pub amount: i64,
    pub request_id: Uuid,
}

/// Error response body. `request_id` is present on every failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub error: String,
    pub request_id: Uuid,
}
