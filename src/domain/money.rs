//! Money conventions for the marketplace.
//!
//! All amounts are `rust_decimal::Decimal` — never floating point — so
//! bid comparisons are exact and reproducible. Listing prices are stored
//! at scale 3, bid amounts at scale 2, matching the persisted schema.
//! Rescaling happens only at construction time and is value-preserving
//! for pre-validated input; rule evaluation compares raw Decimal values
//! with no rounding.

use rust_decimal::Decimal;

/// Decimal places for listing `starting_bid` / `current_price`.
pub const PRICE_SCALE: u32 = 3;

/// Decimal places for bid amounts.
pub const BID_SCALE: u32 = 2;

/// Normalize an amount to the listing price scale.
#[must_use]
pub fn to_price(amount: Decimal) -> Decimal {
    let mut price = amount;
    price.rescale(PRICE_SCALE);
    price
}

/// Normalize an amount to the bid scale.
#[must_use]
pub fn to_bid(amount: Decimal) -> Decimal {
    let mut bid = amount;
    bid.rescale(BID_SCALE);
    bid
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_price_scale_pads_zeros() {
        assert_eq!(to_price(dec!(100)).to_string(), "100.000");
        assert_eq!(to_price(dec!(99.5)).to_string(), "99.500");
    }

    #[test]
    fn test_bid_scale_pads_zeros() {
        assert_eq!(to_bid(dec!(150)).to_string(), "150.00");
    }

    #[test]
    fn test_rescaling_preserves_value() {
        assert_eq!(to_price(dec!(100.00)), dec!(100));
        assert_eq!(to_bid(dec!(150.0)), dec!(150));
    }

    #[test]
    fn test_cross_scale_comparison_is_exact() {
        // 100.000 (price) and 100.00 (bid) compare equal
        assert_eq!(to_price(dec!(100)), to_bid(dec!(100)));
        assert!(to_bid(dec!(100.01)) > to_price(dec!(100)));
    }
}
