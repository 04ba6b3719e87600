//! SDK for the cart checkout service.
//!
//! `objects` holds the JSON shapes exchanged with the checkout frontend.
//! With the `client` feature enabled, `client` provides a typed HTTP client
//! for the payment-authorization endpoint.

#[cfg(feature = "client")]
pub mod client;
pub mod objects;
