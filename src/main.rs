//! Auction Ledger — Service Entry Point
//!
//! Initializes configuration, logging, the file-backed store, and the
//! observability endpoints. Runs until SIGINT.
//!
//! Wiring sequence:
//! 1. Load config.toml + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Open the file-backed store and recover active listings
//! 4. Register Prometheus metrics, seed the active-listings gauge
//! 5. Spawn health server (/live + /ready) and metrics server (/metrics)
//! 6. Wait for SIGINT → graceful shutdown (drain → stop servers → exit)
//!
//! The presentation layer (web views, session auth) is an external
//! collaborator: it constructs the same services against this store and
//! surfaces their outcome enums to users.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info};

use auction_ledger::adapters::metrics::{HealthServer, HealthState, MetricsRegistry};
use auction_ledger::adapters::persistence::FileStore;
use auction_ledger::config;
use auction_ledger::ports::repository::ListingStore;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration from config.toml ──────────────
    let config = config::loader::load_config("config.toml")
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(&config.service.log_level)
            }),
        )
        .json()
        .init();

    info!(
        name = %config.service.name,
        version = env!("CARGO_PKG_VERSION"),
        data_dir = %config.persistence.data_dir,
        "Starting auction ledger"
    );

    // ── 3. Open the store and recover state ─────────────────
    let store = Arc::new(
        FileStore::from_data_dir(&config.persistence.data_dir)
            .await
            .context("Failed to open marketplace store")?,
    );
    let active = store
        .list_active()
        .await
        .context("Failed to scan active listings")?;
    info!(active_listings = active.len(), "Store opened");

    // ── 4. Metrics registry, seeded from recovered state ────
    let metrics = Arc::new(MetricsRegistry::new().context("Failed to register metrics")?);
    metrics.active_listings.set(active.len() as i64);

    // ── 5. Shutdown channel + observability servers ─────────
    let (shutdown_tx, _shutdown_rx) = broadcast::channel::<()>(1);
    let health_state = Arc::new(HealthState::new());
    health_state
        .store_healthy
        .store(store.is_healthy().await, Ordering::Relaxed);

    let mut server_handles = Vec::new();

    let health_server = HealthServer::new(Arc::clone(&health_state), config.metrics.health_port);
    let health_shutdown = shutdown_tx.subscribe();
    server_handles.push(tokio::spawn(async move {
        if let Err(e) = health_server.run(health_shutdown).await {
            error!(error = %e, "Health server failed");
        }
    }));

    if config.metrics.enabled {
        let metrics_server = Arc::clone(&metrics);
        let bind_address = config.metrics.bind_address.clone();
        let metrics_shutdown = shutdown_tx.subscribe();
        server_handles.push(tokio::spawn(async move {
            if let Err(e) = metrics_server.serve(bind_address, metrics_shutdown).await {
                error!(error = %e, "Metrics server failed");
            }
        }));
    }

    info!("All tasks spawned — ledger is running");

    // ── 6. Wait for SIGINT ──────────────────────────────────
    signal::ctrl_c().await.context("Failed to listen for SIGINT")?;
    info!("SIGINT received, initiating graceful shutdown");

    // Drain: readiness probe flips to 503, then stop the servers.
    health_state.accepting_work.store(false, Ordering::Relaxed);
    let _ = shutdown_tx.send(());

    for handle in server_handles {
        let _ = tokio::time::timeout(std::time::Duration::from_secs(5), handle).await;
    }

    info!("Shutdown complete");
    Ok(())
}
