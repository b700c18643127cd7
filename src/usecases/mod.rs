//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain rules with port interfaces to implement the
//! marketplace's core workflows. Each use case is a self-contained
//! business operation; together they form the AuctionLedger surface the
//! presentation layer calls into.
//!
//! Use cases:
//! - `BiddingService`: bid placement with optimistic price CAS
//! - `ClosingService`: auction close and winner determination
//! - `CatalogService`: listing creation, browsing, comments
//! - `WatchlistService`: per-user listing tracking

pub mod bidding;
pub mod catalog;
pub mod closing;
pub mod watchlist;

pub use bidding::{BidError, BidOutcome, BiddingService};
pub use catalog::{CatalogError, CatalogService, ListingDetail, ListingDraft};
pub use closing::{CloseOutcome, ClosingService};
pub use watchlist::WatchlistService;
