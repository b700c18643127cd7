//! Catalog Use Case - Listing Creation, Browsing, and Comments
//!
//! The CRUD surface around the ledger: creating listings, browsing the
//! active index and categories, assembling the listing detail page data,
//! and appending comments. Input validation happens here, at the core
//! boundary, on an explicit draft type — the presentation layer's form
//! handling never leaks in.

use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, instrument};

use crate::adapters::metrics::MetricsRegistry;
use crate::domain::listing::{Bid, Comment, Listing, ListingId, UserId};
use crate::ports::repository::{ListingStore, StoreError};

/// Pre-validated input for a new listing.
#[derive(Debug, Clone)]
pub struct ListingDraft {
    pub title: String,
    pub description: String,
    pub starting_bid: Decimal,
    pub category: String,
}

/// Why a listing draft or comment was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("category must not be empty")]
    EmptyCategory,
    #[error("starting bid must be positive")]
    NonPositiveStartingBid,
    #[error("comment text must not be empty")]
    EmptyComment,
}

/// Catalog failures: invalid input or storage trouble.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Everything the listing detail page needs in one fetch.
#[derive(Debug, Clone)]
pub struct ListingDetail {
    pub listing: Listing,
    pub bids: Vec<Bid>,
    pub comments: Vec<Comment>,
    /// Whether the viewing user watches this listing; false for
    /// anonymous viewers.
    pub watching: bool,
}

/// Listing catalog operations.
pub struct CatalogService<S: ListingStore> {
    store: Arc<S>,
    metrics: Option<Arc<MetricsRegistry>>,
}

impl<S: ListingStore> CatalogService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            metrics: None,
        }
    }

    /// Attach a metrics registry for catalog counters.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Create and persist a new listing.
    ///
    /// The listing opens immediately with `current_price` equal to the
    /// starting bid.
    #[instrument(skip(self, draft, creator), fields(creator = %creator, title = %draft.title))]
    pub async fn create_listing(
        &self,
        draft: ListingDraft,
        creator: &UserId,
    ) -> Result<Listing, CatalogError> {
        validate_draft(&draft)?;

        let listing = Listing::new(
            draft.title,
            draft.description,
            draft.starting_bid,
            creator.clone(),
            draft.category,
        );
        self.store.save_listing(&listing).await?;

        info!(
            listing_id = %listing.id,
            starting_bid = %listing.starting_bid,
            category = %listing.category,
            "Listing created"
        );
        if let Some(metrics) = &self.metrics {
            metrics
                .listings_created
                .with_label_values(&[listing.category.as_str()])
                .inc();
            metrics.active_listings.inc();
        }

        Ok(listing)
    }

    /// All currently active listings (the index page).
    pub async fn active_listings(&self) -> Result<Vec<Listing>, StoreError> {
        self.store.list_active().await
    }

    /// Distinct category names across stored listings.
    pub async fn categories(&self) -> Result<Vec<String>, StoreError> {
        self.store.categories().await
    }

    /// All listings in a category, active or closed.
    pub async fn listings_in_category(&self, category: &str) -> Result<Vec<Listing>, StoreError> {
        self.store.listings_in_category(category).await
    }

    /// Assemble the detail view for a listing.
    pub async fn listing_detail(
        &self,
        listing_id: ListingId,
        viewer: Option<&UserId>,
    ) -> Result<ListingDetail, StoreError> {
        let listing = self.store.get_listing(listing_id).await?;
        let bids = self.store.list_bids(listing_id).await?;
        let comments = self.store.list_comments(listing_id).await?;
        let watching = match viewer {
            Some(user) => self.store.is_watching(listing_id, user).await?,
            None => false,
        };

        Ok(ListingDetail {
            listing,
            bids,
            comments,
            watching,
        })
    }

    /// Append a comment to a listing.
    #[instrument(skip(self, commenter, text), fields(listing_id = %listing_id, commenter = %commenter))]
    pub async fn add_comment(
        &self,
        listing_id: ListingId,
        commenter: &UserId,
        text: String,
    ) -> Result<Comment, CatalogError> {
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyComment.into());
        }

        let comment = Comment::new(listing_id, commenter.clone(), text);
        self.store.add_comment(&comment).await?;
        Ok(comment)
    }
}

fn validate_draft(draft: &ListingDraft) -> Result<(), ValidationError> {
    if draft.title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if draft.category.trim().is_empty() {
        return Err(ValidationError::EmptyCategory);
    }
    if draft.starting_bid <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveStartingBid);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::persistence::InMemoryStore;
    use rust_decimal_macros::dec;

    fn draft(title: &str, category: &str, starting_bid: Decimal) -> ListingDraft {
        ListingDraft {
            title: title.to_string(),
            description: "desc".to_string(),
            starting_bid,
            category: category.to_string(),
        }
    }

    #[tokio::test]
    async fn test_created_listing_opens_at_starting_price() {
        let service = CatalogService::new(Arc::new(InMemoryStore::new()));
        let listing = service
            .create_listing(draft("Clock", "antiques", dec!(75)), &"alice".to_string())
            .await
            .unwrap();

        assert!(listing.is_active);
        assert_eq!(listing.current_price, dec!(75.000));
        assert_eq!(service.active_listings().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_title_refused() {
        let service = CatalogService::new(Arc::new(InMemoryStore::new()));
        let err = service
            .create_listing(draft("  ", "antiques", dec!(75)), &"alice".to_string())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Invalid(ValidationError::EmptyTitle)
        ));
    }

    #[tokio::test]
    async fn test_zero_starting_bid_refused() {
        let service = CatalogService::new(Arc::new(InMemoryStore::new()));
        let err = service
            .create_listing(draft("Clock", "antiques", dec!(0)), &"alice".to_string())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Invalid(ValidationError::NonPositiveStartingBid)
        ));
    }

    #[tokio::test]
    async fn test_detail_includes_comments_and_watch_flag() {
        let store = Arc::new(InMemoryStore::new());
        let service = CatalogService::new(Arc::clone(&store));
        let alice = "alice".to_string();
        let bob = "bob".to_string();

        let listing = service
            .create_listing(draft("Clock", "antiques", dec!(75)), &alice)
            .await
            .unwrap();
        service
            .add_comment(listing.id, &bob, "Does it chime?".to_string())
            .await
            .unwrap();
        store.watch(listing.id, &bob).await.unwrap();

        let detail = service.listing_detail(listing.id, Some(&bob)).await.unwrap();
        assert_eq!(detail.comments.len(), 1);
        assert!(detail.watching);
        assert!(detail.bids.is_empty());

        let anonymous = service.listing_detail(listing.id, None).await.unwrap();
        assert!(!anonymous.watching);
    }

    #[tokio::test]
    async fn test_comment_on_missing_listing_fails() {
        let service = CatalogService::new(Arc::new(InMemoryStore::new()));
        let err = service
            .add_comment(uuid::Uuid::new_v4(), &"bob".to_string(), "hi".to_string())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Store(StoreError::ListingNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_category_browsing() {
        let service = CatalogService::new(Arc::new(InMemoryStore::new()));
        let alice = "alice".to_string();
        service
            .create_listing(draft("Clock", "antiques", dec!(75)), &alice)
            .await
            .unwrap();
        service
            .create_listing(draft("Lamp", "lighting", dec!(20)), &alice)
            .await
            .unwrap();

        assert_eq!(
            service.categories().await.unwrap(),
            vec!["antiques", "lighting"]
        );
        assert_eq!(
            service.listings_in_category("lighting").await.unwrap().len(),
            1
        );
    }
}
