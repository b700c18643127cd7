//! Repository Port - Marketplace Persistence Interface
//!
//! Defines the trait the usecases layer requires from storage. Adapters
//! implement it with concrete backends (file-based JSON/JSONL, in-memory).
//! The store is the source of truth and the concurrency boundary: bid
//! commits go through a compare-and-swap primitive so concurrent bids on
//! the same listing are linearized.

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::listing::{Bid, Comment, Listing, ListingId, UserId};

/// Persistence failures, kept distinct from business outcomes.
///
/// The core never interprets these — retries for transient faults are
/// the adapter's concern, not the rule engine's.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown listing: {0}")]
    ListingNotFound(ListingId),
    #[error("storage I/O failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt stored record: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Trait for marketplace persistence providers.
///
/// Bids are append-only and `list_bids` returns them in placement order,
/// which the winner tie-break relies on. `commit_bid` is the atomic
/// section for the place-bid read-modify-write cycle.
#[async_trait]
pub trait ListingStore: Send + Sync + 'static {
    /// Fetch a listing by id.
    async fn get_listing(&self, id: ListingId) -> Result<Listing, StoreError>;

    /// Insert or overwrite a listing snapshot.
    async fn save_listing(&self, listing: &Listing) -> Result<(), StoreError>;

    /// Atomically append `bid` and set the listing's `current_price` to
    /// the bid amount, iff the stored price still equals `expected_price`
    /// and the listing is still active.
    ///
    /// Returns `Ok(false)` when the guard fails (price moved or listing
    /// closed since the caller's read); the caller re-reads and retries.
    async fn commit_bid(&self, bid: &Bid, expected_price: Decimal) -> Result<bool, StoreError>;

    /// Atomically deactivate a listing.
    ///
    /// Serialized against `commit_bid` on the same listing: the
    /// deactivation re-reads the stored listing inside the commit lock,
    /// so a close can neither overwrite a concurrently committed price
    /// nor be undone by a commit holding a pre-close read.
    ///
    /// Returns whether the listing was still active; `false` means it
    /// was already closed and nothing changed.
    async fn close_listing(&self, id: ListingId) -> Result<bool, StoreError>;

    /// All bids for a listing, ordered by placement.
    async fn list_bids(&self, listing_id: ListingId) -> Result<Vec<Bid>, StoreError>;

    /// All currently active listings.
    async fn list_active(&self) -> Result<Vec<Listing>, StoreError>;

    /// Distinct category names across all stored listings.
    async fn categories(&self) -> Result<Vec<String>, StoreError>;

    /// All listings (active or closed) in a category.
    async fn listings_in_category(&self, category: &str) -> Result<Vec<Listing>, StoreError>;

    /// Append a comment to a listing.
    async fn add_comment(&self, comment: &Comment) -> Result<(), StoreError>;

    /// All comments for a listing, ordered by posting.
    async fn list_comments(&self, listing_id: ListingId) -> Result<Vec<Comment>, StoreError>;

    /// Add the listing to the user's watchlist (idempotent).
    async fn watch(&self, listing_id: ListingId, user: &UserId) -> Result<(), StoreError>;

    /// Remove the listing from the user's watchlist (idempotent).
    async fn unwatch(&self, listing_id: ListingId, user: &UserId) -> Result<(), StoreError>;

    /// Whether the user currently watches the listing.
    async fn is_watching(&self, listing_id: ListingId, user: &UserId) -> Result<bool, StoreError>;

    /// Listings on the user's watchlist.
    async fn watched_listings(&self, user: &UserId) -> Result<Vec<Listing>, StoreError>;

    /// Check if the backing storage is usable (disk space, permissions).
    async fn is_healthy(&self) -> bool;
}
