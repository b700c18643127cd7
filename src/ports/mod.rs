//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the domain/usecases layer
//! requires from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `ListingStore`: listing/bid/comment/watchlist persistence

pub mod repository;

pub use repository::{ListingStore, StoreError};
