use rust_decimal::Decimal;

use crate::errors::ServiceError;

/// A point-in-time view of one purchasable line: the effective unit price
/// (base price plus the variant delta, when a variant is selected) and the
/// stock pool that sale draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventorySnapshot {
    pub unit_price: Decimal,
    pub available_stock: i32,
}

/// Checks a requested quantity against available stock.
///
/// Every path that changes a cart quantity goes through this check, so the
/// rejection rule and its error payload stay identical everywhere.
pub fn validate_stock(requested: i32, available: i32) -> Result<(), ServiceError> {
    if requested > available {
        return Err(ServiceError::InsufficientStock {
            requested,
            available,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_quantity_within_stock() {
        assert!(validate_stock(3, 10).is_ok());
    }

    #[test]
    fn accepts_quantity_equal_to_stock() {
        assert!(validate_stock(10, 10).is_ok());
    }

    #[test]
    fn rejects_quantity_above_stock() {
        let err = validate_stock(11, 10).unwrap_err();

        match err {
            ServiceError::InsufficientStock {
                requested,
                available,
            } => {
                assert_eq!(requested, 11);
                assert_eq!(available, 10);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_any_quantity_when_stock_is_zero() {
        assert!(validate_stock(1, 0).is_err());
    }
}
