//! AuthorizationAcquirer processor.
//!
//! Obtains a client secret from the payment processor. A rate-limited call
//! is retried after a fixed delay until `max_attempts` calls have been made;
//! any other failure is returned at once.

use crate::cart::AuthorizationMetadata;
use crate::config::RetryPolicy;
use crate::gateway::{AuthorizationRequest, PaymentProcessor, ProcessorError};
use kanau::processor::Processor;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AcquisitionError {
    /// The processor rejected the call, or kept rate limiting until the
    /// attempts ran out. Displays the processor's message.
    #[error(transparent)]
    Processor(#[from] ProcessorError),
    /// The processor answered without a usable client secret.
    #[error("Payment intent creation failed")]
    AuthorizationFailed,
}

/// Input of [`AuthorizationAcquirer`].
#[derive(Debug, Clone)]
pub struct AcquireAuthorization {
    /// Minor units.
    pub amount: i64,
    pub metadata: AuthorizationMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationResult {
    pub client_secret: String,
    pub amount: i64,
    pub request_id: Uuid,
}

/// Holds the process-wide processor handle plus the per-request policy.
#[derive(Clone)]
pub struct AuthorizationAcquirer {
    processor: Arc<dyn PaymentProcessor>,
    currency: String,
    retry: RetryPolicy,
}

impl AuthorizationAcquirer {
    pub fn new(processor: Arc<dyn PaymentProcessor>, currency: String, retry: RetryPolicy) -> Self {
        Self {
            processor,
            currency,
            retry,
        }
    }
}

impl Processor<AcquireAuthorization> for AuthorizationAcquirer {
    type Output = AuthorizationResult;
    type Error = AcquisitionError;
    #[tracing::instrument(
        skip_all,
        err,
        name = "AcquireAuthorization",
        fields(request_id = %input.metadata.request_id, amount = input.amount)
    )]
    async fn process(
        &self,
        input: AcquireAuthorization,
    ) -> Result<AuthorizationResult, AcquisitionError> {
        let request_id = input.metadata.request_id;
        let request = AuthorizationRequest {
            amount: input.amount,
            currency: self.currency.clone(),
            automatic_payment_methods: true,
            metadata: input.metadata,
        };
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 0;

        let intent = loop {
            attempt += 1;
            match self.processor.create_authorization(&request).await {
                Ok(intent) => break intent,
                Err(e) if e.is_rate_limited() && attempt < max_attempts => {
                    warn!(
                        attempt,
                        max_attempts,
                        delay_ms = self.retry.delay.as_millis() as u64,
                        error = %e,
                        "Payment processor rate limited, retrying"
                    );
                    tokio::time::sleep(self.retry.delay).await;
                }
                Err(e) => return Err(e.into()),
            }
        };

        let client_secret = intent
            .client_secret
            .filter(|secret| !secret.is_empty())
            .ok_or(AcquisitionError::AuthorizationFailed)?;
        debug!(intent_id = %intent.id, attempt, "Authorization acquired");

        Ok(AuthorizationResult {
            client_secret,
            amount: request.amount,
            request_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::ProcessorIntent;
    use crate::processors::testing::{ScriptedProcessor, declined, intent, rate_limited};
    use std::time::Duration;
    use tokio::time::Instant;

    const DELAY: Duration = Duration::from_millis(1000);

    fn acquirer(processor: Arc<ScriptedProcessor>, max_attempts: u32) -> AuthorizationAcquirer {
        AuthorizationAcquirer::new(
            processor,
            "usd".to_string(),
            RetryPolicy {
                max_attempts,
                delay: DELAY,
            },
        )
    }

    fn input() -> AcquireAuthorization {
        AcquireAuthorization {
            amount: 2000,
            metadata: AuthorizationMetadata {
                request_id: Uuid::new_v4(),
                order_items: "[]".to_string(),
            },
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_first_try() {
        let processor = Arc::new(ScriptedProcessor::new(vec![intent("secret_1")]));
        let input = input();
        let request_id = input.metadata.request_id;

        let result = acquirer(processor.clone(), 3).process(input).await.unwrap();
        assert_eq!(result.client_secret, "secret_1");
        assert_eq!(result.amount, 2000);
        assert_eq!(result.request_id, request_id);
        assert_eq!(processor.calls(), 1);

        let sent = processor.last_request().unwrap();
        assert_eq!(sent.currency, "usd");
        assert!(sent.automatic_payment_methods);
        assert_eq!(sent.metadata.request_id, request_id);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_rate_limits() {
        let processor = Arc::new(ScriptedProcessor::new(vec![
            rate_limited(),
            rate_limited(),
            intent("secret_3"),
        ]));
        let started = Instant::now();

        let result = acquirer(processor.clone(), 3).process(input()).await.unwrap();
        assert_eq!(result.client_secret, "secret_3");
        assert_eq!(processor.calls(), 3);
        let waited = started.elapsed();
        assert!(waited >= DELAY * 2 && waited < DELAY * 3, "waited {waited:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_exhausts_attempts() {
        let processor = Arc::new(ScriptedProcessor::new(vec![rate_limited()]));
        let started = Instant::now();

        let err = acquirer(processor.clone(), 3).process(input()).await.unwrap_err();
        assert!(matches!(err, AcquisitionError::Processor(ref e) if e.is_rate_limited()));
        assert_eq!(err.to_string(), "Request rate_limit exceeded");
        assert_eq!(processor.calls(), 3);
        // No wait after the final attempt.
        let waited = started.elapsed();
        assert!(waited >= DELAY * 2 && waited < DELAY * 3, "waited {waited:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_attempt_bound_follows_policy() {
        for max_attempts in [1, 2, 5] {
            let processor = Arc::new(ScriptedProcessor::new(vec![rate_limited()]));
            let _ = acquirer(processor.clone(), max_attempts).process(input()).await;
            assert_eq!(processor.calls(), max_attempts);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_attempts_still_calls_once() {
        let processor = Arc::new(ScriptedProcessor::new(vec![intent("secret")]));
        assert!(acquirer(processor.clone(), 0).process(input()).await.is_ok());
        assert_eq!(processor.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_transient_error_is_not_retried() {
        let processor = Arc::new(ScriptedProcessor::new(vec![declined(), intent("never")]));
        let started = Instant::now();

        let err = acquirer(processor.clone(), 3).process(input()).await.unwrap_err();
        assert_eq!(err.to_string(), "Your card was declined.");
        assert_eq!(processor.calls(), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_client_secret() {
        let no_secret = Ok(ProcessorIntent {
            id: "pi_1".to_string(),
            client_secret: None,
        });
        let processor = Arc::new(ScriptedProcessor::new(vec![no_secret]));
        let err = acquirer(processor.clone(), 3).process(input()).await.unwrap_err();
        assert_eq!(err, AcquisitionError::AuthorizationFailed);
        assert_eq!(processor.calls(), 1);

        let empty_secret = intent("");
        let processor = Arc::new(ScriptedProcessor::new(vec![empty_secret]));
        let err = acquirer(processor, 3).process(input()).await.unwrap_err();
        assert_eq!(err, AcquisitionError::AuthorizationFailed);
    }
}
