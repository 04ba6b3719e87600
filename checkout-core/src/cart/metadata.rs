//! Projection of the cart onto the metadata attached to an authorization.

use checkout_sdk::objects::CartLineItem;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// The per-item fields recorded with the processor. Nothing else from the
/// cart leaves the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemMetadata<'a> {
    pub template_id: &'a str,
    pub tier: &'a str,
    pub quantity: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
}

impl<'a> From<&'a CartLineItem> for OrderItemMetadata<'a> {
    fn from(item: &'a CartLineItem) -> Self {
        Self {
            template_id: &item.template_id,
            tier: &item.tier,
            quantity: item.quantity,
            unit_price: item.unit_price,
        }
    }
}

/// Serialize `items` as a compact JSON array, preserving order.
pub fn project_order_items(items: &[CartLineItem]) -> Result<String, serde_json::Error> {
    let projected: Vec<OrderItemMetadata<'_>> = items.iter().map(OrderItemMetadata::from).collect();
    serde_json::to_string(&projected)
}

/// Metadata sent with every authorization request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationMetadata {
    pub request_id: Uuid,
    /// Output of [`project_order_items`].
    pub order_items: String,
}

impl AuthorizationMetadata {
    pub fn new(request_id: Uuid, items: &[CartLineItem]) -> Result<Self, serde_json::Error> {
        Ok(Self {
            request_id,
            order_items: project_order_items(items)?,
        })
    }
}
