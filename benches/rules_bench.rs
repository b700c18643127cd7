//! Rule Engine Benchmarks — Hot-Path Performance Validation
//!
//! Benchmarks the pure domain functions that run on every bid and on
//! auction close. The rules are evaluated inside the per-listing commit
//! section, so they must stay cheap even for deep bid histories.
//!
//! Run with: cargo bench --bench rules_bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal::Decimal;

use auction_ledger::domain::listing::{Bid, Listing};
use auction_ledger::domain::rules;

fn sample_listing() -> Listing {
    Listing::new(
        "Vintage camera".to_string(),
        "Working Leica M3".to_string(),
        Decimal::from(100),
        "alice".to_string(),
        "photography".to_string(),
    )
}

fn bid_history(listing: &Listing, len: i64) -> Vec<Bid> {
    (0..len)
        .map(|i| {
            Bid::new(
                listing.id,
                format!("bidder-{i}"),
                Decimal::from(100 + i),
            )
        })
        .collect()
}

/// Benchmark single-bid evaluation against an open listing.
fn bench_evaluate_bid(c: &mut Criterion) {
    let listing = sample_listing();
    let amount = Decimal::from(150);

    c.bench_function("evaluate_bid_open_listing", |b| {
        b.iter(|| {
            let _decision = rules::evaluate_bid(black_box(&listing), black_box(amount));
        });
    });
}

/// Benchmark winner determination over a deep bid history.
fn bench_winning_bid(c: &mut Criterion) {
    let listing = sample_listing();
    let bids = bid_history(&listing, 1_000);

    c.bench_function("winning_bid_1000_bids", |b| {
        b.iter(|| {
            let _winner = rules::winning_bid(black_box(&bids));
        });
    });
}

/// Benchmark the derived price over a deep bid history.
fn bench_current_price(c: &mut Criterion) {
    let listing = sample_listing();
    let bids = bid_history(&listing, 1_000);

    c.bench_function("current_price_1000_bids", |b| {
        b.iter(|| {
            let _price = rules::current_price(black_box(&listing), black_box(&bids));
        });
    });
}

criterion_group!(
    benches,
    bench_evaluate_bid,
    bench_winning_bid,
    bench_current_price
);
criterion_main!(benches);
