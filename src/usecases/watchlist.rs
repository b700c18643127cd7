//! Watchlist Use Case - Tracking Listings of Interest
//!
//! Watch/unwatch is idempotent and scoped to `(listing, user)`: watching
//! twice changes nothing, and removing a listing from one user's
//! watchlist never touches another user's.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::domain::listing::{Listing, ListingId, UserId};
use crate::ports::repository::{ListingStore, StoreError};

/// Watchlist operations on behalf of an authenticated user.
pub struct WatchlistService<S: ListingStore> {
    store: Arc<S>,
}

impl<S: ListingStore> WatchlistService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Add a listing to the user's watchlist.
    #[instrument(skip(self, user), fields(listing_id = %listing_id, user = %user))]
    pub async fn watch(&self, listing_id: ListingId, user: &UserId) -> Result<(), StoreError> {
        // Referential integrity: the listing must exist.
        self.store.get_listing(listing_id).await?;
        self.store.watch(listing_id, user).await?;
        info!("Listing added to watchlist");
        Ok(())
    }

    /// Remove a listing from the user's watchlist.
    #[instrument(skip(self, user), fields(listing_id = %listing_id, user = %user))]
    pub async fn unwatch(&self, listing_id: ListingId, user: &UserId) -> Result<(), StoreError> {
        self.store.unwatch(listing_id, user).await
    }

    /// All listings on the user's watchlist.
    pub async fn watched_listings(&self, user: &UserId) -> Result<Vec<Listing>, StoreError> {
        self.store.watched_listings(user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::persistence::InMemoryStore;
    use crate::domain::listing::Listing;
    use rust_decimal_macros::dec;

    async fn seeded() -> (Arc<InMemoryStore>, Listing) {
        let store = Arc::new(InMemoryStore::new());
        let listing = Listing::new(
            "Bicycle".to_string(),
            "Steel frame tourer".to_string(),
            dec!(60),
            "alice".to_string(),
            "sport".to_string(),
        );
        store.save_listing(&listing).await.unwrap();
        (store, listing)
    }

    #[tokio::test]
    async fn test_watch_then_unwatch_round_trip() {
        let (store, listing) = seeded().await;
        let service = WatchlistService::new(store);
        let bob = "bob".to_string();

        service.watch(listing.id, &bob).await.unwrap();
        assert_eq!(service.watched_listings(&bob).await.unwrap().len(), 1);

        service.unwatch(listing.id, &bob).await.unwrap();
        assert!(service.watched_listings(&bob).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_watching_missing_listing_fails() {
        let store = Arc::new(InMemoryStore::new());
        let service = WatchlistService::new(store);
        let err = service
            .watch(uuid::Uuid::new_v4(), &"bob".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ListingNotFound(_)));
    }

    #[tokio::test]
    async fn test_unwatch_only_affects_requesting_user() {
        let (store, listing) = seeded().await;
        let service = WatchlistService::new(store);
        let bob = "bob".to_string();
        let carol = "carol".to_string();

        service.watch(listing.id, &bob).await.unwrap();
        service.watch(listing.id, &carol).await.unwrap();
        service.unwatch(listing.id, &bob).await.unwrap();

        assert!(service.watched_listings(&bob).await.unwrap().is_empty());
        assert_eq!(service.watched_listings(&carol).await.unwrap().len(), 1);
    }
}
