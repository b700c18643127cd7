//! Bidding Use Case - Bid Placement Against Live Listings
//!
//! Orchestrates the domain acceptance rules with the store's atomic
//! commit. The read-evaluate-commit cycle runs as an optimistic-retry
//! loop keyed on the listing's current price: a commit only lands if the
//! price is unchanged since the read, so two concurrent bids can never
//! both be accepted against a stale price.

use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::adapters::metrics::MetricsRegistry;
use crate::adapters::metrics::prometheus::rejection_label;
use crate::domain::listing::{Bid, ListingId, UserId};
use crate::domain::money;
use crate::domain::rules::{self, BidDecision, BidRejection};
use crate::ports::repository::{ListingStore, StoreError};

/// Bounded retries for the price compare-and-swap.
const MAX_BID_ATTEMPTS: u32 = 16;

/// Business outcome of a bid attempt. Rejections are values, not errors.
#[derive(Debug, Clone, PartialEq)]
pub enum BidOutcome {
    /// The bid was recorded and the listing price raised to its amount.
    Accepted { bid: Bid, new_price: Decimal },
    /// The bid was refused; every failing condition is listed.
    Rejected(Vec<BidRejection>),
}

/// Failures outside the business-rule taxonomy.
#[derive(Debug, Error)]
pub enum BidError {
    /// The commit guard kept failing: the price moved on every attempt.
    #[error("gave up bidding on contended listing {0}")]
    Contention(ListingId),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Places bids on behalf of authenticated users.
///
/// The caller supplies the bidder identity explicitly; this service
/// assumes the presentation layer has already authenticated it and
/// validated the amount as a well-formed decimal.
pub struct BiddingService<S: ListingStore> {
    store: Arc<S>,
    metrics: Option<Arc<MetricsRegistry>>,
}

impl<S: ListingStore> BiddingService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            metrics: None,
        }
    }

    /// Attach a metrics registry for bid counters.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Place a bid of `amount` on a listing.
    ///
    /// Self-bidding by the listing's creator is not restricted; the
    /// acceptance rule is purely `amount >= starting_bid` and
    /// `amount > current_price` on an active listing.
    #[instrument(skip(self, bidder), fields(listing_id = %listing_id, bidder = %bidder, amount = %amount))]
    pub async fn place_bid(
        &self,
        listing_id: ListingId,
        bidder: &UserId,
        amount: Decimal,
    ) -> Result<BidOutcome, BidError> {
        for attempt in 1..=MAX_BID_ATTEMPTS {
            let listing = self.store.get_listing(listing_id).await?;

            match rules::evaluate_bid(&listing, amount) {
                BidDecision::Rejected(reasons) => {
                    warn!(?reasons, "Bid rejected");
                    if let Some(metrics) = &self.metrics {
                        for reason in &reasons {
                            metrics
                                .bids_rejected
                                .with_label_values(&[rejection_label(reason)])
                                .inc();
                        }
                    }
                    return Ok(BidOutcome::Rejected(reasons));
                }
                BidDecision::Accepted => {
                    let bid = Bid::new(listing.id, bidder.clone(), amount);
                    if self.store.commit_bid(&bid, listing.current_price).await? {
                        let new_price = money::to_price(bid.amount);
                        info!(bid_id = %bid.id, new_price = %new_price, "Bid accepted");
                        if let Some(metrics) = &self.metrics {
                            metrics
                                .bids_accepted
                                .with_label_values(&[listing.category.as_str()])
                                .inc();
                        }
                        return Ok(BidOutcome::Accepted { bid, new_price });
                    }

                    // Price moved (or the auction closed) between our read
                    // and the commit; re-read and re-evaluate.
                    debug!(attempt, "Bid commit lost the price guard, retrying");
                    if let Some(metrics) = &self.metrics {
                        metrics.bid_commit_conflicts.inc();
                    }
                }
            }
        }

        warn!("Bid abandoned after maximum contended attempts");
        Err(BidError::Contention(listing_id))
    }

    /// Recompute the listing's current price from its full bid history.
    ///
    /// Derived view used to audit the cached `current_price` field; the
    /// two must always agree after every accepted bid.
    pub async fn current_price(&self, listing_id: ListingId) -> Result<Decimal, StoreError> {
        let listing = self.store.get_listing(listing_id).await?;
        let bids = self.store.list_bids(listing_id).await?;
        Ok(rules::current_price(&listing, &bids))
    }
}
