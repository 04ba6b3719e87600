//! Stages of the checkout pipeline that run as `kanau` processors.
//!
//! - `AuthorizationAcquirer`: calls the payment processor with bounded
//!   fixed-delay retry on rate limits
//! - `CheckoutProcessor`: runs one checkout request end to end and
//!   classifies any failure

pub mod acquirer;
pub mod checkout;

#[cfg(test)]
pub(crate) mod testing;

pub use acquirer::{AcquireAuthorization, AcquisitionError, AuthorizationAcquirer, AuthorizationResult};
pub use checkout::{
    CheckoutError, CheckoutFailure, CheckoutProcessor, CheckoutRequest, CheckoutStage,
    ErrorCategory,
};
