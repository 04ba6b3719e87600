//! Cart line items as submitted by the checkout frontend.

use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

/// A structurally valid line of the shopping cart.
///
/// Prices are decimal currency units (e.g. dollars), not minor units.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub template_id: String,
    pub tier: String,
    pub quantity: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
}

/// A cart line as it arrives on the wire, before validation.
///
/// Every field is optional so that a missing or mistyped field can be
/// reported as a malformed item instead of failing the whole request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItemInput {
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default, deserialize_with = "optional_whole_number")]
    pub quantity: Option<i64>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub unit_price: Option<Decimal>,
}

impl CartLineItemInput {
    /// Decode one element of the `items` array.
    ///
    /// Each field is decoded on its own: a field with the wrong type becomes
    /// `None` without affecting the others. A non-object decodes to an empty
    /// input, which the validator rejects as a malformed item.
    pub fn from_json(value: Value) -> Self {
        let Value::Object(mut fields) = value else {
            return Self::default();
        };
        Self {
            template_id: take(&mut fields, "templateId", |v| serde_json::from_value(v).ok()),
            tier: take(&mut fields, "tier", |v| serde_json::from_value(v).ok()),
            quantity: take(&mut fields, "quantity", |v| {
                serde_json::from_value::<Number>(v).ok().and_then(|n| to_whole(&n))
            }),
            unit_price: take(&mut fields, "unitPrice", |v| {
                rust_decimal::serde::float::deserialize(v).ok()
            }),
        }
    }
}

fn take<T>(
    fields: &mut Map<String, Value>,
    key: &str,
    decode: impl FnOnce(Value) -> Option<T>,
) -> Option<T> {
    fields.remove(key).and_then(decode)
}

/// JSON has a single number type, so `2.0` is as good a quantity as `2`.
fn to_whole(number: &Number) -> Option<i64> {
    if let Some(n) = number.as_i64() {
        return Some(n);
    }
    number
        .as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
        .map(|f| f as i64)
}

fn optional_whole_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Number>::deserialize(deserializer)?
        .map(|n| to_whole(&n).ok_or_else(|| D::Error::custom("expected a whole number")))
        .transpose()
}

impl From<CartLineItem> for CartLineItemInput {
    fn from(item: CartLineItem) -> Self {
        Self {
            template_id: Some(item.template_id),
            tier: Some(item.tier),
            quantity: Some(item.quantity),
            unit_price: Some(item.unit_price),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_line_item_uses_camel_case_and_numeric_price() {
        let item = CartLineItem {
            template_id: "a".to_string(),
            tier: "std".to_string(),
            quantity: 2,
            unit_price: Decimal::new(1050, 2),
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            json!({"templateId": "a", "tier": "std", "quantity": 2, "unitPrice": 10.5})
        );
    }

    #[test]
    fn test_input_tolerates_missing_fields() {
        let input = CartLineItemInput::from_json(json!({"templateId": "a", "quantity": 1}));
        assert_eq!(input.template_id.as_deref(), Some("a"));
        assert_eq!(input.quantity, Some(1));
        assert!(input.tier.is_none());
        assert!(input.unit_price.is_none());
    }

    #[test]
    fn test_input_with_wrong_types_drops_only_those_fields() {
        let input = CartLineItemInput::from_json(
            json!({"templateId": 7, "tier": "std", "quantity": "two", "unitPrice": 1.5}),
        );
        assert_eq!(
            input,
            CartLineItemInput {
                template_id: None,
                tier: Some("std".to_string()),
                quantity: None,
                unit_price: Some(Decimal::new(15, 1)),
            }
        );

        let input = CartLineItemInput::from_json(json!("not an object"));
        assert_eq!(input, CartLineItemInput::default());
    }

    #[test]
    fn test_whole_float_quantity_is_accepted() {
        let input = CartLineItemInput::from_json(
            json!({"templateId": "a", "tier": "std", "quantity": 2.0, "unitPrice": 10.0}),
        );
        assert_eq!(input.quantity, Some(2));
        assert_eq!(input.template_id.as_deref(), Some("a"));
        assert_eq!(input.unit_price, Some(Decimal::new(10, 0)));

        let input = CartLineItemInput::from_json(
            json!({"templateId": "a", "tier": "std", "quantity": 1.5, "unitPrice": 10.0}),
        );
        assert_eq!(input.quantity, None);
        assert_eq!(input.tier.as_deref(), Some("std"));
    }

    #[test]
    fn test_deserialize_accepts_whole_float_quantity() {
        let input: CartLineItemInput =
            serde_json::from_value(json!({"templateId": "a", "quantity": 3.0})).unwrap();
        assert_eq!(input.quantity, Some(3));

        let result: Result<CartLineItemInput, _> =
            serde_json::from_value(json!({"templateId": "a", "quantity": 3.5}));
        assert!(result.is_err());
    }

    #[test]
    fn test_input_parses_decimal_price() {
        let input = CartLineItemInput::from_json(
            json!({"templateId": "a", "tier": "pro", "quantity": 3, "unitPrice": 0.3}),
        );
        assert_eq!(input.unit_price, Some(Decimal::new(3, 1)));
    }
}
