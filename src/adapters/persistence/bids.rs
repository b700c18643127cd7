//! Bid Journal - Append-only JSONL Bid Records
//!
//! Persists bids to per-listing JSONL files (`bids/{listing_id}.jsonl`).
//! Each line is a self-contained JSON record. File order is placement
//! order, which is exactly the ordering the winner tie-break needs, so
//! records are never re-sorted on load.

use std::path::{Path, PathBuf};

use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{instrument, warn};

use crate::domain::listing::{Bid, ListingId};
use crate::ports::repository::StoreError;

/// Append-only JSONL bid journal, one file per listing.
pub struct BidJournal {
    /// Directory holding `{listing_id}.jsonl` files.
    dir: PathBuf,
}

impl BidJournal {
    /// Create a bid journal under the given data directory.
    pub async fn new(data_dir: &str) -> Result<Self, StoreError> {
        let dir = Path::new(data_dir).join("bids");
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    fn journal_path(&self, listing_id: ListingId) -> PathBuf {
        self.dir.join(format!("{listing_id}.jsonl"))
    }

    /// Append a bid record to the listing's journal.
    #[instrument(skip(self, bid), fields(bid_id = %bid.id, listing_id = %bid.listing_id))]
    pub async fn append(&self, bid: &Bid) -> Result<(), StoreError> {
        let mut json = serde_json::to_string(bid)?;
        json.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.journal_path(bid.listing_id))
            .await?;

        file.write_all(json.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }

    /// Load all bids for a listing in placement order.
    ///
    /// Malformed lines are skipped with a warning; an absent journal
    /// means no bids yet.
    pub async fn load(&self, listing_id: ListingId) -> Result<Vec<Bid>, StoreError> {
        let path = self.journal_path(listing_id);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path).await?;
        let mut bids = Vec::new();

        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Bid>(line) {
                Ok(bid) => bids.push(bid),
                Err(e) => {
                    warn!(
                        file = %path.display(),
                        error = %e,
                        "Skipping malformed bid record"
                    );
                }
            }
        }

        Ok(bids)
    }
}
