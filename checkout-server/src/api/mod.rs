//! Checkout API handlers.
//!
//! # Endpoints
//!
//! - `POST /api/create-payment-intent` – validate a cart and obtain a
//!   payment authorization

use axum::{Router, routing::post};

use crate::state::AppState;

mod payment_intent;

/// Build the checkout API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/create-payment-intent",
            post(payment_intent::create_payment_intent),
        )
        .route(
            "/create-payment-intent/",
            post(payment_intent::create_payment_intent),
        )
}
