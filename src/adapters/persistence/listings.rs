//! Listing Files - Atomic JSON Listing Snapshots
//!
//! Saves each listing to `listings/{id}.json` using atomic writes
//! (write to tmp file, then rename). This guarantees a snapshot is
//! always either the old or new version, never a partial write — the
//! property the bid commit guard depends on.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{instrument, warn};

use crate::domain::listing::{Listing, ListingId};
use crate::ports::repository::StoreError;

/// Atomic per-listing JSON snapshot store.
pub struct ListingFiles {
    /// Directory holding `{id}.json` snapshots.
    dir: PathBuf,
}

impl ListingFiles {
    /// Create a listing snapshot store under the given data directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub async fn new(data_dir: &str) -> Result<Self, StoreError> {
        let dir = Path::new(data_dir).join("listings");
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    fn snapshot_path(&self, id: ListingId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    /// Save a listing snapshot atomically (tmp → rename).
    #[instrument(skip(self, listing), fields(listing_id = %listing.id))]
    pub async fn save(&self, listing: &Listing) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(listing)?;
        let tmp_path = self.dir.join(format!("{}.json.tmp", listing.id));

        fs::write(&tmp_path, &json).await?;
        fs::rename(&tmp_path, self.snapshot_path(listing.id)).await?;

        Ok(())
    }

    /// Load a listing snapshot; `None` if no snapshot exists.
    pub async fn load(&self, id: ListingId) -> Result<Option<Listing>, StoreError> {
        let path = self.snapshot_path(id);
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path).await?;
        let listing: Listing = serde_json::from_str(&json)?;
        Ok(Some(listing))
    }

    /// Load every stored listing snapshot.
    ///
    /// Malformed snapshots are skipped with a warning rather than
    /// failing the whole scan.
    #[instrument(skip(self))]
    pub async fn load_all(&self) -> Result<Vec<Listing>, StoreError> {
        let mut listings = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let json = fs::read_to_string(&path).await?;
            match serde_json::from_str::<Listing>(&json) {
                Ok(listing) => listings.push(listing),
                Err(e) => {
                    warn!(
                        file = %path.display(),
                        error = %e,
                        "Skipping malformed listing snapshot"
                    );
                }
            }
        }

        listings.sort_by_key(|l| l.created_at);
        Ok(listings)
    }

    /// Check if the listings directory is writable.
    pub async fn is_healthy(&self) -> bool {
        let test_path = self.dir.join(".health_check");
        let result = fs::write(&test_path, b"ok").await;
        let _ = fs::remove_file(&test_path).await;
        result.is_ok()
    }
}
