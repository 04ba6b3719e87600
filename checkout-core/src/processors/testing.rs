//! Scripted payment processor for tests.

use crate::gateway::{
    AuthorizationRequest, PaymentProcessor, ProcessorError, ProcessorErrorKind, ProcessorIntent,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

/// Replays a fixed list of responses; the last one repeats forever.
pub(crate) struct ScriptedProcessor {
    script: Mutex<VecDeque<Result<ProcessorIntent, ProcessorError>>>,
    calls: AtomicU32,
    last_request: Mutex<Option<AuthorizationRequest>>,
}

impl ScriptedProcessor {
    pub(crate) fn new(script: Vec<Result<ProcessorIntent, ProcessorError>>) -> Self {
        assert!(!script.is_empty(), "script needs at least one response");
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub(crate) fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_request(&self) -> Option<AuthorizationRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentProcessor for ScriptedProcessor {
    async fn create_authorization(
        &self,
        request: &AuthorizationRequest,
    ) -> Result<ProcessorIntent, ProcessorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script.front().cloned().unwrap()
        }
    }
}

pub(crate) fn intent(secret: &str) -> Result<ProcessorIntent, ProcessorError> {
    Ok(ProcessorIntent {
        id: "pi_test".to_string(),
        client_secret: Some(secret.to_string()),
    })
}

pub(crate) fn rate_limited() -> Result<ProcessorIntent, ProcessorError> {
    Err(
        ProcessorError::new(ProcessorErrorKind::InvalidRequest, "Request rate_limit exceeded")
            .with_code("rate_limit")
            .with_http_status(429),
    )
}

pub(crate) fn declined() -> Result<ProcessorIntent, ProcessorError> {
    Err(
        ProcessorError::new(ProcessorErrorKind::Card, "Your card was declined.")
            .with_code("card_declined")
            .with_http_status(402),
    )
}
