pub mod cart;
pub mod payment_intent;

pub use cart::{CartLineItem, CartLineItemInput};
pub use payment_intent::{CreatePaymentIntentRequest, ErrorEnvelope, PaymentIntentResponse};
