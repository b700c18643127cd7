//! Persistence Adapters - File-backed and In-memory Stores
//!
//! Implements the ListingStore port with append-only JSONL journals for
//! bids/comments/watchlist events and atomic JSON snapshots for listing
//! state. No database dependency — lightweight and crash-recoverable.
//! An in-memory variant backs unit tests.

pub mod bids;
pub mod engagement;
pub mod listings;
pub mod memory;
pub mod store_impl;

pub use bids::BidJournal;
pub use engagement::EngagementJournal;
pub use listings::ListingFiles;
pub use memory::InMemoryStore;
pub use store_impl::FileStore;
