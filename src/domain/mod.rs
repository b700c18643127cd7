//! Domain layer - Core marketplace types and auction rules.
//!
//! Pure business logic for the auction ledger. No I/O and no external
//! services here (hexagonal architecture inner ring); everything is
//! testable in isolation without a store.

pub mod listing;
pub mod money;
pub mod rules;

// Re-export core types for convenience
pub use listing::{Bid, Comment, Listing, ListingId, UserId, WatchlistEntry};
pub use rules::{BidDecision, BidRejection};
