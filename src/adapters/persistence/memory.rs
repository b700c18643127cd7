//! In-Memory Store - Ephemeral ListingStore Implementation
//!
//! Backs the whole port with a single mutex-guarded map, which makes
//! `commit_bid` trivially atomic. Used by unit tests and ephemeral runs;
//! production deployments use the file-backed store.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::listing::{Bid, Comment, Listing, ListingId, UserId, WatchlistEntry};
use crate::domain::money;
use crate::ports::repository::{ListingStore, StoreError};

#[derive(Default)]
struct Inner {
    listings: HashMap<ListingId, Listing>,
    bids: HashMap<ListingId, Vec<Bid>>,
    comments: HashMap<ListingId, Vec<Comment>>,
    watchers: HashSet<WatchlistEntry>,
}

/// Mutex-guarded in-memory marketplace store.
#[derive(Default)]
pub struct InMemoryStore(Mutex<Inner>);

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.0.lock().expect("lock")
    }
}

#[async_trait]
impl ListingStore for InMemoryStore {
    async fn get_listing(&self, id: ListingId) -> Result<Listing, StoreError> {
        self.inner()
            .listings
            .get(&id)
            .cloned()
            .ok_or(StoreError::ListingNotFound(id))
    }

    async fn save_listing(&self, listing: &Listing) -> Result<(), StoreError> {
        self.inner().listings.insert(listing.id, listing.clone());
        Ok(())
    }

    async fn commit_bid(&self, bid: &Bid, expected_price: Decimal) -> Result<bool, StoreError> {
        let mut inner = self.inner();
        let listing = inner
            .listings
            .get_mut(&bid.listing_id)
            .ok_or(StoreError::ListingNotFound(bid.listing_id))?;

        // Guard: the listing must still be open and the price unmoved
        // since the caller's read.
        if !listing.is_active || listing.current_price != expected_price {
            return Ok(false);
        }

        listing.current_price = money::to_price(bid.amount);
        inner.bids.entry(bid.listing_id).or_default().push(bid.clone());
        Ok(true)
    }

    async fn close_listing(&self, id: ListingId) -> Result<bool, StoreError> {
        let mut inner = self.inner();
        let listing = inner
            .listings
            .get_mut(&id)
            .ok_or(StoreError::ListingNotFound(id))?;
        let was_active = listing.is_active;
        listing.is_active = false;
        Ok(was_active)
    }

    async fn list_bids(&self, listing_id: ListingId) -> Result<Vec<Bid>, StoreError> {
        Ok(self.inner().bids.get(&listing_id).cloned().unwrap_or_default())
    }

    async fn list_active(&self) -> Result<Vec<Listing>, StoreError> {
        let mut active: Vec<Listing> = self
            .inner()
            .listings
            .values()
            .filter(|l| l.is_active)
            .cloned()
            .collect();
        active.sort_by_key(|l| l.created_at);
        Ok(active)
    }

    async fn categories(&self) -> Result<Vec<String>, StoreError> {
        let mut categories: Vec<String> = self
            .inner()
            .listings
            .values()
            .map(|l| l.category.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        categories.sort();
        Ok(categories)
    }

    async fn listings_in_category(&self, category: &str) -> Result<Vec<Listing>, StoreError> {
        let mut listings: Vec<Listing> = self
            .inner()
            .listings
            .values()
            .filter(|l| l.category == category)
            .cloned()
            .collect();
        listings.sort_by_key(|l| l.created_at);
        Ok(listings)
    }

    async fn add_comment(&self, comment: &Comment) -> Result<(), StoreError> {
        let mut inner = self.inner();
        if !inner.listings.contains_key(&comment.listing_id) {
            return Err(StoreError::ListingNotFound(comment.listing_id));
        }
        inner
            .comments
            .entry(comment.listing_id)
            .or_default()
            .push(comment.clone());
        Ok(())
    }

    async fn list_comments(&self, listing_id: ListingId) -> Result<Vec<Comment>, StoreError> {
        Ok(self
            .inner()
            .comments
            .get(&listing_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn watch(&self, listing_id: ListingId, user: &UserId) -> Result<(), StoreError> {
        self.inner().watchers.insert(WatchlistEntry {
            listing_id,
            user: user.clone(),
        });
        Ok(())
    }

    async fn unwatch(&self, listing_id: ListingId, user: &UserId) -> Result<(), StoreError> {
        self.inner().watchers.remove(&WatchlistEntry {
            listing_id,
            user: user.clone(),
        });
        Ok(())
    }

    async fn is_watching(&self, listing_id: ListingId, user: &UserId) -> Result<bool, StoreError> {
        Ok(self.inner().watchers.contains(&WatchlistEntry {
            listing_id,
            user: user.clone(),
        }))
    }

    async fn watched_listings(&self, user: &UserId) -> Result<Vec<Listing>, StoreError> {
        let inner = self.inner();
        let mut listings: Vec<Listing> = inner
            .watchers
            .iter()
            .filter(|entry| &entry.user == user)
            .filter_map(|entry| inner.listings.get(&entry.listing_id).cloned())
            .collect();
        listings.sort_by_key(|l| l.created_at);
        Ok(listings)
    }

    async fn is_healthy(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_listing() -> Listing {
        Listing::new(
            "Radio".to_string(),
            "Tube radio, restored".to_string(),
            dec!(40),
            "alice".to_string(),
            "electronics".to_string(),
        )
    }

    #[tokio::test]
    async fn test_get_missing_listing_is_not_found() {
        let store = InMemoryStore::new();
        let id = uuid::Uuid::new_v4();
        let err = store.get_listing(id).await.unwrap_err();
        assert!(matches!(err, StoreError::ListingNotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn test_commit_bid_applies_price_and_records_bid() {
        let store = InMemoryStore::new();
        let listing = sample_listing();
        store.save_listing(&listing).await.unwrap();

        let bid = Bid::new(listing.id, "bob".to_string(), dec!(55));
        let applied = store.commit_bid(&bid, listing.current_price).await.unwrap();
        assert!(applied);

        let stored = store.get_listing(listing.id).await.unwrap();
        assert_eq!(stored.current_price, dec!(55.000));
        assert_eq!(store.list_bids(listing.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_commit_bid_rejects_stale_expected_price() {
        let store = InMemoryStore::new();
        let listing = sample_listing();
        store.save_listing(&listing).await.unwrap();

        let first = Bid::new(listing.id, "bob".to_string(), dec!(55));
        assert!(store.commit_bid(&first, dec!(40.000)).await.unwrap());

        // Second committer read the price before the first commit landed.
        let second = Bid::new(listing.id, "carol".to_string(), dec!(60));
        assert!(!store.commit_bid(&second, dec!(40.000)).await.unwrap());
        assert_eq!(store.list_bids(listing.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_commit_bid_rejects_closed_listing() {
        let store = InMemoryStore::new();
        let mut listing = sample_listing();
        listing.is_active = false;
        store.save_listing(&listing).await.unwrap();

        let bid = Bid::new(listing.id, "bob".to_string(), dec!(55));
        assert!(!store.commit_bid(&bid, listing.current_price).await.unwrap());
    }

    #[tokio::test]
    async fn test_close_listing_keeps_committed_price() {
        let store = InMemoryStore::new();
        let listing = sample_listing();
        store.save_listing(&listing).await.unwrap();

        let bid = Bid::new(listing.id, "bob".to_string(), dec!(55));
        assert!(store.commit_bid(&bid, dec!(40.000)).await.unwrap());

        assert!(store.close_listing(listing.id).await.unwrap());
        let stored = store.get_listing(listing.id).await.unwrap();
        assert!(!stored.is_active);
        assert_eq!(stored.current_price, dec!(55.000));

        // Re-closing reports no transition.
        assert!(!store.close_listing(listing.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_watch_is_idempotent_and_scoped_to_user() {
        let store = InMemoryStore::new();
        let listing = sample_listing();
        store.save_listing(&listing).await.unwrap();

        let bob = "bob".to_string();
        let carol = "carol".to_string();
        store.watch(listing.id, &bob).await.unwrap();
        store.watch(listing.id, &bob).await.unwrap();
        store.watch(listing.id, &carol).await.unwrap();

        store.unwatch(listing.id, &bob).await.unwrap();
        assert!(!store.is_watching(listing.id, &bob).await.unwrap());
        assert!(store.is_watching(listing.id, &carol).await.unwrap());
    }

    #[tokio::test]
    async fn test_categories_are_distinct_and_sorted() {
        let store = InMemoryStore::new();
        for category in ["tools", "art", "tools"] {
            let mut listing = sample_listing();
            listing.id = uuid::Uuid::new_v4();
            listing.category = category.to_string();
            store.save_listing(&listing).await.unwrap();
        }
        assert_eq!(store.categories().await.unwrap(), vec!["art", "tools"]);
    }
}
