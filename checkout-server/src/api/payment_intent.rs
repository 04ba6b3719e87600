use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use checkout_core::processors::{
    CheckoutError, CheckoutFailure, CheckoutProcessor, CheckoutRequest, CheckoutStage,
};
use checkout_sdk::objects::PaymentIntentResponse;
use kanau::processor::Processor;
use tracing::Instrument;
use uuid::Uuid;

use crate::state::AppState;

/// `POST /api/create-payment-intent`: validate the cart, reconcile its
/// total, and obtain a client secret from the payment processor.
///
/// The correlation id is minted before anything else so that every
/// response, including a body that failed to read, carries it.
pub(super) async fn create_payment_intent(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<PaymentIntentResponse>, PaymentIntentApiError> {
    let request_id = Uuid::new_v4();
    let origin = headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let span = tracing::info_span!("create_payment_intent", %request_id, origin);

    let body = body.map_err(|rejection| {
        let _guard = span.enter();
        tracing::warn!(error = %rejection, "Failed to read request body");
        PaymentIntentApiError(CheckoutFailure::new(
            request_id,
            CheckoutStage::Start,
            CheckoutError::InvalidBody,
        ))
    })?;

    let checkout = CheckoutProcessor::new(state.processor.clone(), state.policy.snapshot());
    checkout
        .process(CheckoutRequest { request_id, body })
        .instrument(span)
        .await
        .map(Json)
        .map_err(PaymentIntentApiError)
}

/// A checkout failure rendered as an error envelope.
#[derive(Debug)]
pub(super) struct PaymentIntentApiError(CheckoutFailure);

impl IntoResponse for PaymentIntentApiError {
    fn into_response(self) -> Response {
        let status = if self.0.category().is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(self.0.envelope())).into_response()
    }
}
