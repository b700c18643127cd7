//! Auction ledger rules — bid acceptance, winner selection, price derivation.
//!
//! This is the decision core of the marketplace. Everything here is pure
//! computation over values supplied by the caller: no I/O, no clock, no
//! suspension points. The usecases layer is responsible for running these
//! decisions inside the store's atomic section (see `BiddingService`).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::listing::{Bid, Listing};

/// Why a bid was refused. A single evaluation may fail more than one
/// condition; every failing condition is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum BidRejection {
    /// The listing is no longer active.
    #[error("auction is closed")]
    AuctionClosed,
    /// Amount is below the listing's starting bid.
    #[error("bid is below the starting bid")]
    BelowStartingBid,
    /// Amount does not strictly exceed the current price.
    #[error("bid is not higher than the current price")]
    NotHigherThanCurrent,
}

/// Outcome of evaluating a bid against a listing's current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BidDecision {
    Accepted,
    Rejected(Vec<BidRejection>),
}

impl BidDecision {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Decide whether `amount` is an acceptable bid on `listing`.
///
/// A bid on an inactive listing is rejected with `AuctionClosed` alone,
/// regardless of the amount. On an active listing the amount must satisfy
/// both `amount >= starting_bid` and `amount > current_price` (strict);
/// the comparisons use raw Decimal ordering with no rounding.
#[must_use]
pub fn evaluate_bid(listing: &Listing, amount: Decimal) -> BidDecision {
    if !listing.is_active {
        return BidDecision::Rejected(vec![BidRejection::AuctionClosed]);
    }

    let mut reasons = Vec::new();
    if amount < listing.starting_bid {
        reasons.push(BidRejection::BelowStartingBid);
    }
    if amount <= listing.current_price {
        reasons.push(BidRejection::NotHigherThanCurrent);
    }

    if reasons.is_empty() {
        BidDecision::Accepted
    } else {
        BidDecision::Rejected(reasons)
    }
}

/// Select the winning bid from a listing's bid history.
///
/// `bids` must be in placement order (the order the store recorded them).
/// The winner is the bid with the maximum amount; ties on amount are
/// resolved in favor of the earliest-placed bid, never arbitrarily, so
/// the result is deterministic and reproducible.
#[must_use]
pub fn winning_bid(bids: &[Bid]) -> Option<&Bid> {
    bids.iter().fold(None, |best, bid| match best {
        Some(current) if bid.amount > current.amount => Some(bid),
        None => Some(bid),
        keep => keep,
    })
}

/// Recompute a listing's current price from its full bid history.
///
/// Equals `starting_bid` when no bids exist, else the maximum bid amount
/// (floored at the starting bid). The incrementally maintained
/// `Listing::current_price` field must always agree with this value.
#[must_use]
pub fn current_price(listing: &Listing, bids: &[Bid]) -> Decimal {
    bids.iter()
        .map(|bid| bid.amount)
        .max()
        .map_or(listing.starting_bid, |highest| {
            highest.max(listing.starting_bid)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn listing_at(starting: Decimal, current: Decimal) -> Listing {
        let mut listing = Listing::new(
            "Test item".to_string(),
            "A test item".to_string(),
            starting,
            "seller".to_string(),
            "misc".to_string(),
        );
        listing.current_price = crate::domain::money::to_price(current);
        listing
    }

    fn bid_at(listing_id: Uuid, bidder: &str, amount: Decimal, offset_secs: i64) -> Bid {
        Bid {
            id: Uuid::new_v4(),
            listing_id,
            bidder: bidder.to_string(),
            amount: crate::domain::money::to_bid(amount),
            placed_at: Utc::now() + Duration::seconds(offset_secs),
        }
    }

    #[test]
    fn test_bid_equal_to_untouched_price_rejected_as_not_higher() {
        // starting 100.000, current 100.000, no bids: a 100.000 bid meets
        // the starting-bid floor but fails the strict price comparison.
        let listing = listing_at(dec!(100), dec!(100));
        let decision = evaluate_bid(&listing, dec!(100.000));
        assert_eq!(
            decision,
            BidDecision::Rejected(vec![BidRejection::NotHigherThanCurrent])
        );
    }

    #[test]
    fn test_higher_bid_accepted_then_lower_rejected() {
        let mut listing = listing_at(dec!(100), dec!(100));
        assert!(evaluate_bid(&listing, dec!(150.00)).is_accepted());

        listing.current_price = dec!(150.000);
        assert_eq!(
            evaluate_bid(&listing, dec!(120.00)),
            BidDecision::Rejected(vec![BidRejection::NotHigherThanCurrent])
        );
    }

    #[test]
    fn test_bid_below_starting_reports_both_reasons() {
        // Below starting and below current: both conditions fail and
        // both must be distinguishable.
        let listing = listing_at(dec!(100), dec!(130));
        assert_eq!(
            evaluate_bid(&listing, dec!(90.00)),
            BidDecision::Rejected(vec![
                BidRejection::BelowStartingBid,
                BidRejection::NotHigherThanCurrent,
            ])
        );
    }

    #[test]
    fn test_inactive_listing_rejects_any_amount() {
        let mut listing = listing_at(dec!(100), dec!(100));
        listing.is_active = false;
        assert_eq!(
            evaluate_bid(&listing, dec!(1000.00)),
            BidDecision::Rejected(vec![BidRejection::AuctionClosed])
        );
    }

    #[test]
    fn test_bid_equal_to_current_always_rejected() {
        let listing = listing_at(dec!(100), dec!(150));
        assert_eq!(
            evaluate_bid(&listing, dec!(150.00)),
            BidDecision::Rejected(vec![BidRejection::NotHigherThanCurrent])
        );
    }

    #[test]
    fn test_winner_is_highest_amount() {
        let listing_id = Uuid::new_v4();
        let bids = vec![
            bid_at(listing_id, "bob", dec!(110), 0),
            bid_at(listing_id, "carol", dec!(180), 1),
            bid_at(listing_id, "dave", dec!(150), 2),
        ];
        let winner = winning_bid(&bids).unwrap();
        assert_eq!(winner.bidder, "carol");
        assert_eq!(winner.amount, dec!(180.00));
    }

    #[test]
    fn test_equal_amounts_tie_broken_by_earliest() {
        // Two bids of 200.00 at t1 < t2: the first recorded wins.
        let listing_id = Uuid::new_v4();
        let bids = vec![
            bid_at(listing_id, "first", dec!(200), 0),
            bid_at(listing_id, "second", dec!(200), 5),
        ];
        let winner = winning_bid(&bids).unwrap();
        assert_eq!(winner.bidder, "first");
    }

    #[test]
    fn test_no_bids_no_winner() {
        assert!(winning_bid(&[]).is_none());
    }

    #[test]
    fn test_current_price_without_bids_is_starting_bid() {
        let listing = listing_at(dec!(100), dec!(100));
        assert_eq!(current_price(&listing, &[]), dec!(100.000));
    }

    #[test]
    fn test_current_price_is_max_bid_amount() {
        let listing = listing_at(dec!(100), dec!(100));
        let bids = vec![
            bid_at(listing.id, "bob", dec!(120), 0),
            bid_at(listing.id, "carol", dec!(175.50), 1),
            bid_at(listing.id, "bob", dec!(140), 2),
        ];
        assert_eq!(current_price(&listing, &bids), dec!(175.50));
    }
}
