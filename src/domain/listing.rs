//! Core marketplace value types.
//!
//! Plain data types with no persistence logic — listings and bids are
//! fetched from and written back through the `ListingStore` port, so the
//! rules in `crate::domain::rules` stay unit-testable without a store.
//!
//! Bids are append-only children of a listing and are never mutated or
//! deleted. A listing's `is_active` flag transitions true→false exactly
//! once (auction close) and never reverses.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::money;

/// Listing identifier.
pub type ListingId = Uuid;

/// Authenticated user identity, supplied explicitly by the caller.
/// The presentation layer resolves sessions; the core never reads
/// ambient request state.
pub type UserId = String;

/// An item up for auction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    pub description: String,
    /// Minimum acceptable bid, scale 3.
    pub starting_bid: Decimal,
    /// Highest accepted bid so far, or `starting_bid` if none. Scale 3.
    ///
    /// Cached view of the bid history; must always equal
    /// `rules::current_price` recomputed from the full history.
    pub current_price: Decimal,
    pub creator: UserId,
    pub category: String,
    pub created_at: DateTime<Utc>,
    /// True while the auction is open for bids.
    pub is_active: bool,
}

impl Listing {
    /// Create a new open listing with `current_price` initialized to the
    /// starting bid.
    pub fn new(
        title: String,
        description: String,
        starting_bid: Decimal,
        creator: UserId,
        category: String,
    ) -> Self {
        let starting_bid = money::to_price(starting_bid);
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            starting_bid,
            current_price: starting_bid,
            creator,
            category,
            created_at: Utc::now(),
            is_active: true,
        }
    }
}

/// An immutable record of an offered amount by a user on a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    pub id: Uuid,
    pub listing_id: ListingId,
    pub bidder: UserId,
    /// Offered amount, scale 2.
    pub amount: Decimal,
    pub placed_at: DateTime<Utc>,
}

impl Bid {
    /// Create a bid stamped with the current time.
    pub fn new(listing_id: ListingId, bidder: UserId, amount: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            listing_id,
            bidder,
            amount: money::to_bid(amount),
            placed_at: Utc::now(),
        }
    }
}

/// A user comment on a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub listing_id: ListingId,
    pub commenter: UserId,
    pub text: String,
    pub posted_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(listing_id: ListingId, commenter: UserId, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            listing_id,
            commenter,
            text,
            posted_at: Utc::now(),
        }
    }
}

/// A watchlist membership: `user` tracks `listing_id`.
///
/// Set semantics keyed on `(listing_id, user)` — watching twice is a
/// no-op, and removal only affects the requesting user's entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub listing_id: ListingId,
    pub user: UserId,
}
