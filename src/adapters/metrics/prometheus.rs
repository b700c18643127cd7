//! Prometheus Metrics Registry - Marketplace Observability
//!
//! Registers and exposes Prometheus metrics for Grafana dashboards.
//! Covers bid throughput, rejection reasons, commit contention, and
//! auction close outcomes.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use tokio::sync::broadcast;
use tracing::{info, instrument};

use crate::domain::rules::BidRejection;

/// Label value for a bid rejection reason.
pub fn rejection_label(reason: &BidRejection) -> &'static str {
    match reason {
        BidRejection::AuctionClosed => "auction_closed",
        BidRejection::BelowStartingBid => "below_starting_bid",
        BidRejection::NotHigherThanCurrent => "not_higher_than_current",
    }
}

/// Centralized Prometheus metrics for the auction ledger.
///
/// All metrics follow the naming convention `auction_ledger_*` and carry
/// labels suitable for per-category / per-reason filtering.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// Accepted bids counter, by listing category.
    pub bids_accepted: IntCounterVec,
    /// Rejected bids counter, by rejection reason.
    pub bids_rejected: IntCounterVec,
    /// Compare-and-swap conflicts during bid commits (retries).
    pub bid_commit_conflicts: IntCounter,
    /// Auctions closed counter, by outcome.
    pub auctions_closed: IntCounterVec,
    /// Number of currently active listings.
    pub active_listings: IntGauge,
    /// Listings created counter.
    pub listings_created: IntCounterVec,
}

impl MetricsRegistry {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let bids_accepted = IntCounterVec::new(
            Opts::new("auction_ledger_bids_accepted_total", "Total bids accepted"),
            &["category"],
        )?;

        let bids_rejected = IntCounterVec::new(
            Opts::new("auction_ledger_bids_rejected_total", "Total bids rejected"),
            &["reason"],
        )?;

        let bid_commit_conflicts = IntCounter::new(
            "auction_ledger_bid_commit_conflicts_total",
            "Bid commits that lost the price compare-and-swap and retried",
        )?;

        let auctions_closed = IntCounterVec::new(
            Opts::new(
                "auction_ledger_auctions_closed_total",
                "Total auction close attempts",
            ),
            &["outcome"],
        )?;

        let active_listings = IntGauge::new(
            "auction_ledger_active_listings",
            "Number of currently active listings",
        )?;

        let listings_created = IntCounterVec::new(
            Opts::new(
                "auction_ledger_listings_created_total",
                "Total listings created",
            ),
            &["category"],
        )?;

        // Register all metrics
        registry.register(Box::new(bids_accepted.clone()))?;
        registry.register(Box::new(bids_rejected.clone()))?;
        registry.register(Box::new(bid_commit_conflicts.clone()))?;
        registry.register(Box::new(auctions_closed.clone()))?;
        registry.register(Box::new(active_listings.clone()))?;
        registry.register(Box::new(listings_created.clone()))?;

        Ok(Self {
            registry,
            bids_accepted,
            bids_rejected,
            bid_commit_conflicts,
            auctions_closed,
            active_listings,
            listings_created,
        })
    }

    /// Serve Prometheus metrics on the configured bind address.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn serve(
        self: Arc<Self>,
        bind_address: String,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> anyhow::Result<()> {
        let metrics_self = Arc::clone(&self);

        let app = Router::new().route(
            "/metrics",
            get(move || {
                let registry = metrics_self.registry.clone();
                async move {
                    let encoder = TextEncoder::new();
                    let metric_families = registry.gather();
                    let mut buffer = Vec::new();
                    if encoder.encode(&metric_families, &mut buffer).is_err() {
                        return String::new();
                    }
                    String::from_utf8(buffer).unwrap_or_default()
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind(&bind_address).await?;
        info!(address = %bind_address, "Prometheus metrics server started");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_creates_and_counts() {
        let metrics = MetricsRegistry::new().unwrap();
        metrics.bids_accepted.with_label_values(&["art"]).inc();
        metrics
            .bids_rejected
            .with_label_values(&[rejection_label(&BidRejection::NotHigherThanCurrent)])
            .inc();
        metrics.active_listings.set(3);

        assert_eq!(metrics.bids_accepted.with_label_values(&["art"]).get(), 1);
        assert_eq!(metrics.active_listings.get(), 3);
    }

    #[test]
    fn test_rejection_labels_are_distinct() {
        let labels = [
            rejection_label(&BidRejection::AuctionClosed),
            rejection_label(&BidRejection::BelowStartingBid),
            rejection_label(&BidRejection::NotHigherThanCurrent),
        ];
        let unique: std::collections::HashSet<_> = labels.iter().collect();
        assert_eq!(unique.len(), labels.len());
    }
}
