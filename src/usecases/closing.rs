//! Closing Use Case - Auction Close and Winner Determination
//!
//! Only the listing's creator may close its auction. Closing flips
//! `is_active` to false and computes the outcome from the recorded bid
//! history: highest amount wins, ties resolved by earliest placement.
//! Re-closing an already-closed listing re-runs the winner computation
//! harmlessly since no state changes.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

use crate::adapters::metrics::MetricsRegistry;
use crate::domain::listing::{ListingId, UserId};
use crate::domain::rules;
use crate::ports::repository::{ListingStore, StoreError};

/// Business outcome of a close attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum CloseOutcome {
    /// The requester is not the listing's creator; nothing changed.
    NotAuthorized,
    /// Auction closed with a winning bid.
    ClosedWithWinner { bidder: UserId, amount: Decimal },
    /// Auction closed without any bids.
    ClosedNoBids,
}

/// Closes auctions on behalf of listing creators.
pub struct ClosingService<S: ListingStore> {
    store: Arc<S>,
    metrics: Option<Arc<MetricsRegistry>>,
}

impl<S: ListingStore> ClosingService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            metrics: None,
        }
    }

    /// Attach a metrics registry for close counters.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Close a listing's auction and determine its winner.
    #[instrument(skip(self, requester), fields(listing_id = %listing_id, requester = %requester))]
    pub async fn close_auction(
        &self,
        listing_id: ListingId,
        requester: &UserId,
    ) -> Result<CloseOutcome, StoreError> {
        let listing = self.store.get_listing(listing_id).await?;

        if &listing.creator != requester {
            warn!(creator = %listing.creator, "Close refused: requester is not the creator");
            self.count_outcome("not_authorized");
            return Ok(CloseOutcome::NotAuthorized);
        }

        // The deactivation happens atomically at the store so it cannot
        // interleave with a concurrent bid commit; writing our own read
        // back here could roll the cached price back or reopen a listing
        // a racing commit had already seen closed.
        let was_active = self.store.close_listing(listing_id).await?;

        if let (Some(metrics), true) = (&self.metrics, was_active) {
            metrics.active_listings.dec();
        }

        let bids = self.store.list_bids(listing_id).await?;
        let outcome = match rules::winning_bid(&bids) {
            Some(winner) => {
                info!(
                    winner = %winner.bidder,
                    amount = %winner.amount,
                    bid_count = bids.len(),
                    "Auction closed with winner"
                );
                self.count_outcome("winner");
                CloseOutcome::ClosedWithWinner {
                    bidder: winner.bidder.clone(),
                    amount: winner.amount,
                }
            }
            None => {
                info!("Auction closed with no bids");
                self.count_outcome("no_bids");
                CloseOutcome::ClosedNoBids
            }
        };

        Ok(outcome)
    }

    fn count_outcome(&self, outcome: &str) {
        if let Some(metrics) = &self.metrics {
            metrics.auctions_closed.with_label_values(&[outcome]).inc();
        }
    }
}
