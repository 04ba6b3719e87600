//! Cart validation and price reconciliation.

use checkout_sdk::objects::{CartLineItem, CartLineItemInput};
use rust_decimal::Decimal;
use thiserror::Error;

/// Reasons a submitted cart is rejected. The display text is returned to the
/// client verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Cart is empty")]
    EmptyCart,
    #[error("Invalid cart item structure")]
    MalformedItem,
    #[error("Invalid quantity")]
    InvalidQuantity,
    #[error("Invalid price")]
    InvalidPrice,
    #[error("Cart total mismatch")]
    TotalMismatch,
}

/// A cart whose items are well-formed and whose claimed total agrees with
/// the recomputed one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCart {
    pub items: Vec<CartLineItem>,
    /// Sum of `unit_price * quantity` over all items.
    pub computed_total: Decimal,
}

/// Validate `items` and reconcile them against `claimed_total`.
///
/// Items are checked in order and the first violation wins. Fields that are
/// absent, empty, or zero count as missing, so a zero quantity is a
/// malformed item while a negative one is an invalid quantity.
pub fn validate_cart(
    items: &[CartLineItemInput],
    claimed_total: Decimal,
    tolerance: Decimal,
) -> Result<ValidatedCart, ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::EmptyCart);
    }

    let mut validated = Vec::with_capacity(items.len());
    let mut computed_total = Decimal::ZERO;

    for input in items {
        let item = structured(input).ok_or(ValidationError::MalformedItem)?;
        if item.quantity < 1 {
            return Err(ValidationError::InvalidQuantity);
        }
        if item.unit_price <= Decimal::ZERO {
            return Err(ValidationError::InvalidPrice);
        }
        // A total that does not fit in a Decimal can never match the claim.
        computed_total = item
            .unit_price
            .checked_mul(Decimal::from(item.quantity))
            .and_then(|line| computed_total.checked_add(line))
            .ok_or(ValidationError::TotalMismatch)?;
        validated.push(item);
    }

    let within_tolerance = computed_total
        .checked_sub(claimed_total)
        .is_some_and(|diff| diff.abs() <= tolerance);
    if !within_tolerance {
        return Err(ValidationError::TotalMismatch);
    }

    Ok(ValidatedCart {
        items: validated,
        computed_total,
    })
}

fn structured(input: &CartLineItemInput) -> Option<CartLineItem> {
    let template_id = input.template_id.as_deref().filter(|s| !s.is_empty())?;
    let tier = input.tier.as_deref().filter(|s| !s.is_empty())?;
    let quantity = input.quantity.filter(|q| *q != 0)?;
    let unit_price = input.unit_price.filter(|p| !p.is_zero())?;
    Some(CartLineItem {
        template_id: template_id.to_owned(),
        tier: tier.to_owned(),
        quantity,
        unit_price,
    })
}
