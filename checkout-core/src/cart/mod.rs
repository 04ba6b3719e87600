//! Pure cart stages: validation, amount normalization and metadata projection.
//!
//! Nothing in here performs I/O. Each stage returns a typed error that the
//! checkout processor classifies.

pub mod amount;
pub mod metadata;
pub mod validator;

pub use amount::{AmountError, normalize_amount};
pub use metadata::{AuthorizationMetadata, OrderItemMetadata, project_order_items};
pub use validator::{ValidatedCart, ValidationError, validate_cart};
