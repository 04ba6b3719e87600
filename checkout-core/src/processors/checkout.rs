//! CheckoutProcessor: the request orchestrator.
//!
//! Runs one checkout request through
//! `Start → Validating → Normalizing → Acquiring → Success`. The first
//! failing stage ends the request; the failure records the stage it
//! happened in and an [`ErrorCategory`] that decides the response status.

use crate::cart::{
    AmountError, AuthorizationMetadata, ValidationError, normalize_amount, validate_cart,
};
use crate::config::CheckoutPolicy;
use crate::gateway::PaymentProcessor;
use crate::processors::acquirer::{AcquireAuthorization, AcquisitionError, AuthorizationAcquirer};
use bytes::Bytes;
use checkout_sdk::objects::{CartLineItemInput, ErrorEnvelope, PaymentIntentResponse};
use kanau::processor::Processor;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Where a checkout request is in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStage {
    Start,
    Validating,
    Normalizing,
    Acquiring,
    Success,
}

impl fmt::Display for CheckoutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CheckoutStage::Start => "start",
            CheckoutStage::Validating => "validating",
            CheckoutStage::Normalizing => "normalizing",
            CheckoutStage::Acquiring => "acquiring",
            CheckoutStage::Success => "success",
        })
    }
}

/// Coarse failure class carried alongside every [`CheckoutError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The request itself is wrong; retrying it unchanged will fail again.
    ClientInput,
    /// The service is missing processor credentials.
    Configuration,
    /// The processor refused or failed to issue an authorization.
    Acquisition,
    Unknown,
}

impl ErrorCategory {
    pub fn is_client_error(self) -> bool {
        self == ErrorCategory::ClientInput
    }
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Deliberately vague: never names the missing setting.
    #[error("Payment processor configuration missing")]
    MissingProcessorConfig,
    #[error("Invalid request body")]
    InvalidBody,
    #[error("Missing required fields")]
    MalformedRequest,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Amount(#[from] AmountError),
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),
    #[error("Payment initialization failed")]
    Projection(#[source] serde_json::Error),
}

impl CheckoutError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CheckoutError::MissingProcessorConfig => ErrorCategory::Configuration,
            CheckoutError::InvalidBody
            | CheckoutError::MalformedRequest
            | CheckoutError::Validation(_)
            | CheckoutError::Amount(_) => ErrorCategory::ClientInput,
            CheckoutError::Acquisition(_) => ErrorCategory::Acquisition,
            CheckoutError::Projection(_) => ErrorCategory::Unknown,
        }
    }
}

/// A failed checkout request.
#[derive(Debug)]
pub struct CheckoutFailure {
    pub request_id: Uuid,
    pub stage: CheckoutStage,
    pub error: CheckoutError,
}

impl CheckoutFailure {
    pub fn new(request_id: Uuid, stage: CheckoutStage, error: CheckoutError) -> Self {
        Self {
            request_id,
            stage,
            error,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        self.error.category()
    }

    /// The body returned to the client.
    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            error: self.error.to_string(),
            request_id: self.request_id,
        }
    }

    /// Log with the same detail the client receives, nothing more.
    fn log(&self) {
        let category = self.category();
        if category.is_client_error() {
            warn!(
                request_id = %self.request_id,
                stage = %self.stage,
                category = ?category,
                error = %self.error,
                "Payment initialization rejected"
            );
        } else {
            error!(
                request_id = %self.request_id,
                stage = %self.stage,
                category = ?category,
                error = %self.error,
                "Payment initialization error"
            );
        }
    }
}

/// Tags a stage error with the request and stage it belongs to.
trait AtStage<T> {
    fn at_stage(self, request_id: Uuid, stage: CheckoutStage) -> Result<T, CheckoutFailure>;
}

impl<T, E: Into<CheckoutError>> AtStage<T> for Result<T, E> {
    fn at_stage(self, request_id: Uuid, stage: CheckoutStage) -> Result<T, CheckoutFailure> {
        self.map_err(|error| CheckoutFailure::new(request_id, stage, error.into()))
    }
}

/// Input of [`CheckoutProcessor`]: the raw request body and the correlation
/// id minted for it before anything else happened.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub request_id: Uuid,
    pub body: Bytes,
}

/// Runs checkout requests.
///
/// Built per request from the shared processor handle and a policy
/// snapshot. `processor` is `None` when credentials were not configured;
/// every request then fails with [`CheckoutError::MissingProcessorConfig`].
pub struct CheckoutProcessor {
    acquirer: Option<AuthorizationAcquirer>,
    policy: Arc<CheckoutPolicy>,
}

impl CheckoutProcessor {
    pub fn new(processor: Option<Arc<dyn PaymentProcessor>>, policy: Arc<CheckoutPolicy>) -> Self {
        let acquirer = processor.map(|processor| {
            AuthorizationAcquirer::new(processor, policy.currency.clone(), policy.retry)
        });
        Self { acquirer, policy }
    }

    async fn run(&self, request: CheckoutRequest) -> Result<PaymentIntentResponse, CheckoutFailure> {
        let CheckoutRequest { request_id, body } = request;

        let acquirer = self.acquirer.as_ref().ok_or_else(|| {
            CheckoutFailure::new(
                request_id,
                CheckoutStage::Start,
                CheckoutError::MissingProcessorConfig,
            )
        })?;
        let submission = parse_submission(&body).at_stage(request_id, CheckoutStage::Start)?;

        debug!(items = submission.items.len(), "Validating cart");
        let cart = validate_cart(
            &submission.items,
            submission.claimed_total,
            self.policy.tolerance,
        )
        .at_stage(request_id, CheckoutStage::Validating)?;

        let amount = normalize_amount(submission.claimed_total, self.policy.min_amount)
            .at_stage(request_id, CheckoutStage::Normalizing)?;

        let metadata = AuthorizationMetadata::new(request_id, &cart.items).map_err(|e| {
            CheckoutFailure::new(
                request_id,
                CheckoutStage::Acquiring,
                CheckoutError::Projection(e),
            )
        })?;
        let authorization = acquirer
            .process(AcquireAuthorization { amount, metadata })
            .await
            .at_stage(request_id, CheckoutStage::Acquiring)?;

        Ok(PaymentIntentResponse {
            client_secret: authorization.client_secret,
            amount: authorization.amount,
            request_id,
        })
    }
}

impl Processor<CheckoutRequest> for CheckoutProcessor {
    type Output = PaymentIntentResponse;
    type Error = CheckoutFailure;
    #[tracing::instrument(skip_all, name = "Checkout", fields(request_id = %request.request_id))]
    async fn process(
        &self,
        request: CheckoutRequest,
    ) -> Result<PaymentIntentResponse, CheckoutFailure> {
        let result = self.run(request).await;
        match &result {
            Ok(response) => info!(
                amount = response.amount,
                stage = %CheckoutStage::Success,
                "Payment authorization created"
            ),
            Err(failure) => failure.log(),
        }
        result
    }
}

/// The parts of the body the pipeline needs.
struct CheckoutSubmission {
    items: Vec<CartLineItemInput>,
    claimed_total: Decimal,
}

fn parse_submission(body: &[u8]) -> Result<CheckoutSubmission, CheckoutError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| CheckoutError::InvalidBody)?;
    let Value::Object(mut fields) = value else {
        return Err(CheckoutError::MalformedRequest);
    };

    let items = fields.remove("items").unwrap_or(Value::Null);
    if is_falsy(&items) {
        return Err(CheckoutError::MalformedRequest);
    }
    let claimed_total = match fields.get("amount") {
        Some(Value::Number(n)) => {
            number_to_decimal(n).ok_or(CheckoutError::Amount(AmountError::OutOfRange))?
        }
        _ => return Err(CheckoutError::MalformedRequest),
    };

    // A non-array `items` is treated as an empty cart.
    let items = match items {
        Value::Array(items) => items.into_iter().map(CartLineItemInput::from_json).collect(),
        _ => Vec::new(),
    };

    Ok(CheckoutSubmission {
        items,
        claimed_total,
    })
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn number_to_decimal(n: &serde_json::Number) -> Option<Decimal> {
    if let Some(i) = n.as_i64() {
        return Some(Decimal::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Some(Decimal::from(u));
    }
    n.as_f64().and_then(Decimal::from_f64)
}
