//! Store Implementation — Concrete Adapter for the ListingStore Port
//!
//! Wraps `ListingFiles` (atomic JSON snapshots), `BidJournal` and
//! `EngagementJournal` (append-only JSONL) into a single struct that
//! implements the `ListingStore` trait from `crate::ports::repository`.
//!
//! This is the hexagonal architecture glue: the domain/usecases layer
//! only knows about the `ListingStore` trait, never about files or JSON.
//!
//! `commit_bid` is linearized per listing with an async lock, so the
//! read-compare-append-rewrite cycle is atomic from the caller's
//! perspective while bids on different listings proceed in parallel.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::Mutex as StdMutex;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::instrument;

use super::bids::BidJournal;
use super::engagement::EngagementJournal;
use super::listings::ListingFiles;
use crate::domain::listing::{Bid, Comment, Listing, ListingId, UserId};
use crate::domain::money;
use crate::ports::repository::{ListingStore, StoreError};

/// File-backed marketplace store.
pub struct FileStore {
    /// Atomic JSON listing snapshots.
    listings: ListingFiles,
    /// Append-only bid journals.
    bids: BidJournal,
    /// Comment files and watchlist event log.
    engagement: EngagementJournal,
    /// Per-listing write locks for bid commits.
    locks: StdMutex<HashMap<ListingId, Arc<Mutex<()>>>>,
}

impl FileStore {
    /// Create a new store from existing component instances.
    pub fn new(listings: ListingFiles, bids: BidJournal, engagement: EngagementJournal) -> Self {
        Self {
            listings,
            bids,
            engagement,
            locks: StdMutex::new(HashMap::new()),
        }
    }

    /// Create a new store rooted at a data directory.
    ///
    /// Initializes the snapshot and journal directories, creating them
    /// as needed.
    pub async fn from_data_dir(data_dir: &str) -> Result<Self, StoreError> {
        let listings = ListingFiles::new(data_dir).await?;
        let bids = BidJournal::new(data_dir).await?;
        let engagement = EngagementJournal::new(data_dir).await?;
        Ok(Self::new(listings, bids, engagement))
    }

    fn listing_lock(&self, id: ListingId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().expect("lock");
        Arc::clone(locks.entry(id).or_default())
    }
}

#[async_trait]
impl ListingStore for FileStore {
    async fn get_listing(&self, id: ListingId) -> Result<Listing, StoreError> {
        self.listings
            .load(id)
            .await?
            .ok_or(StoreError::ListingNotFound(id))
    }

    async fn save_listing(&self, listing: &Listing) -> Result<(), StoreError> {
        self.listings.save(listing).await
    }

    #[instrument(skip(self, bid), fields(listing_id = %bid.listing_id, amount = %bid.amount))]
    async fn commit_bid(&self, bid: &Bid, expected_price: Decimal) -> Result<bool, StoreError> {
        let lock = self.listing_lock(bid.listing_id);
        let _guard = lock.lock().await;

        let mut listing = self
            .listings
            .load(bid.listing_id)
            .await?
            .ok_or(StoreError::ListingNotFound(bid.listing_id))?;

        if !listing.is_active || listing.current_price != expected_price {
            return Ok(false);
        }

        // Journal first: on a crash between the two writes the snapshot
        // lags the journal and the cached price is rebuilt from history
        // at the next commit attempt's re-read.
        self.bids.append(bid).await?;
        listing.current_price = money::to_price(bid.amount);
        self.listings.save(&listing).await?;

        Ok(true)
    }

    #[instrument(skip(self), fields(listing_id = %id))]
    async fn close_listing(&self, id: ListingId) -> Result<bool, StoreError> {
        // Same lock as commit_bid: the flip and the price CAS can never
        // interleave on one listing.
        let lock = self.listing_lock(id);
        let _guard = lock.lock().await;

        let mut listing = self
            .listings
            .load(id)
            .await?
            .ok_or(StoreError::ListingNotFound(id))?;

        if !listing.is_active {
            return Ok(false);
        }

        listing.is_active = false;
        self.listings.save(&listing).await?;
        Ok(true)
    }

    async fn list_bids(&self, listing_id: ListingId) -> Result<Vec<Bid>, StoreError> {
        self.bids.load(listing_id).await
    }

    async fn list_active(&self) -> Result<Vec<Listing>, StoreError> {
        Ok(self
            .listings
            .load_all()
            .await?
            .into_iter()
            .filter(|l| l.is_active)
            .collect())
    }

    async fn categories(&self) -> Result<Vec<String>, StoreError> {
        let mut categories: Vec<String> = self
            .listings
            .load_all()
            .await?
            .into_iter()
            .map(|l| l.category)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        categories.sort();
        Ok(categories)
    }

    async fn listings_in_category(&self, category: &str) -> Result<Vec<Listing>, StoreError> {
        Ok(self
            .listings
            .load_all()
            .await?
            .into_iter()
            .filter(|l| l.category == category)
            .collect())
    }

    async fn add_comment(&self, comment: &Comment) -> Result<(), StoreError> {
        // Referential integrity: the listing must exist.
        self.get_listing(comment.listing_id).await?;
        self.engagement.append_comment(comment).await
    }

    async fn list_comments(&self, listing_id: ListingId) -> Result<Vec<Comment>, StoreError> {
        self.engagement.load_comments(listing_id).await
    }

    async fn watch(&self, listing_id: ListingId, user: &UserId) -> Result<(), StoreError> {
        self.get_listing(listing_id).await?;
        self.engagement.record_watch(listing_id, user, true).await
    }

    async fn unwatch(&self, listing_id: ListingId, user: &UserId) -> Result<(), StoreError> {
        self.engagement.record_watch(listing_id, user, false).await
    }

    async fn is_watching(&self, listing_id: ListingId, user: &UserId) -> Result<bool, StoreError> {
        let watchers = self.engagement.load_watchlist().await?;
        Ok(watchers.contains(&crate::domain::listing::WatchlistEntry {
            listing_id,
            user: user.clone(),
        }))
    }

    async fn watched_listings(&self, user: &UserId) -> Result<Vec<Listing>, StoreError> {
        let watchers = self.engagement.load_watchlist().await?;
        let mut listings = Vec::new();
        for entry in watchers {
            if &entry.user != user {
                continue;
            }
            if let Some(listing) = self.listings.load(entry.listing_id).await? {
                listings.push(listing);
            }
        }
        listings.sort_by_key(|l| l.created_at);
        Ok(listings)
    }

    async fn is_healthy(&self) -> bool {
        self.listings.is_healthy().await
    }
}
