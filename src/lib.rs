//! Auction Ledger — Library Root
//!
//! Bid-acceptance and auction-closing rule engine for an online auction
//! marketplace, with file-backed persistence and observability adapters.
//! Re-exports all modules for integration tests and benchmarks.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod usecases;
