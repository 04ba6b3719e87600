//! Conversion of decimal totals to integer minor units.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AmountError {
    /// `minimum` is in major units, e.g. `0.50`.
    #[error("Minimum order amount is ${minimum}")]
    BelowMinimum { minimum: Decimal },
    /// The total does not fit in 64-bit minor units.
    #[error("Invalid amount")]
    OutOfRange,
}

/// Convert `total` to minor units (cents), rounding half away from zero, and
/// enforce `min_amount` (also in minor units).
pub fn normalize_amount(total: Decimal, min_amount: i64) -> Result<i64, AmountError> {
    let minor = total
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or(AmountError::OutOfRange)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(AmountError::OutOfRange)?;

    if minor < min_amount {
        return Err(AmountError::BelowMinimum {
            minimum: Decimal::new(min_amount, 2),
        });
    }
    Ok(minor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MIN_AMOUNT;

    fn normalize(major: &str) -> Result<i64, AmountError> {
        normalize_amount(major.parse().unwrap(), DEFAULT_MIN_AMOUNT)
    }

    #[test]
    fn test_whole_amount() {
        assert_eq!(normalize("20.00"), Ok(2000));
        assert_eq!(normalize("20"), Ok(2000));
    }

    #[test]
    fn test_rounds_to_nearest() {
        assert_eq!(normalize("10.004"), Ok(1000));
        assert_eq!(normalize("10.005"), Ok(1001));
        assert_eq!(normalize("10.009"), Ok(1001));
    }

    #[test]
    fn test_minimum_boundary() {
        assert_eq!(normalize("0.50"), Ok(50));
        assert_eq!(normalize("0.495"), Ok(50));
        assert!(normalize("0.494").is_err());
    }

    #[test]
    fn test_below_minimum_message() {
        let err = normalize("0.30").unwrap_err();
        assert_eq!(err.to_string(), "Minimum order amount is $0.50");
    }

    #[test]
    fn test_custom_minimum() {
        let err = normalize_amount(Decimal::new(99, 2), 100).unwrap_err();
        assert_eq!(err.to_string(), "Minimum order amount is $1.00");
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(normalize_amount(Decimal::MAX, 50), Err(AmountError::OutOfRange));
    }
}
