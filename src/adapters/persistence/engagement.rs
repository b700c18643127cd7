//! Engagement Journal - Comments and Watchlist Events
//!
//! Comments go to per-listing JSONL files (`comments/{listing_id}.jsonl`),
//! append-only like the bid journal. The watchlist is a single append-only
//! event log (`watchlist.jsonl`) of watch/unwatch records that is replayed
//! into a set on read — removal never rewrites history.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{instrument, warn};

use crate::domain::listing::{Comment, ListingId, UserId, WatchlistEntry};
use crate::ports::repository::StoreError;

/// A single watchlist change event.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WatchEvent {
    listing_id: ListingId,
    user: UserId,
    /// True for watch, false for unwatch.
    watching: bool,
    at: DateTime<Utc>,
}

/// Append-only journals for comments and watchlist membership.
pub struct EngagementJournal {
    /// Directory holding `{listing_id}.jsonl` comment files.
    comments_dir: PathBuf,
    /// Single watch/unwatch event log.
    watchlist_path: PathBuf,
}

impl EngagementJournal {
    /// Create the journals under the given data directory.
    pub async fn new(data_dir: &str) -> Result<Self, StoreError> {
        let comments_dir = Path::new(data_dir).join("comments");
        fs::create_dir_all(&comments_dir).await?;

        Ok(Self {
            comments_dir,
            watchlist_path: Path::new(data_dir).join("watchlist.jsonl"),
        })
    }

    async fn append_line(path: &Path, mut json: String) -> Result<(), StoreError> {
        json.push('\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        file.write_all(json.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Append a comment to the listing's comment file.
    #[instrument(skip(self, comment), fields(listing_id = %comment.listing_id))]
    pub async fn append_comment(&self, comment: &Comment) -> Result<(), StoreError> {
        let path = self.comments_dir.join(format!("{}.jsonl", comment.listing_id));
        Self::append_line(&path, serde_json::to_string(comment)?).await
    }

    /// Load all comments for a listing in posting order.
    pub async fn load_comments(&self, listing_id: ListingId) -> Result<Vec<Comment>, StoreError> {
        let path = self.comments_dir.join(format!("{listing_id}.jsonl"));
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path).await?;
        let mut comments = Vec::new();
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Comment>(line) {
                Ok(comment) => comments.push(comment),
                Err(e) => {
                    warn!(
                        file = %path.display(),
                        error = %e,
                        "Skipping malformed comment record"
                    );
                }
            }
        }
        Ok(comments)
    }

    /// Record a watch or unwatch event.
    #[instrument(skip(self), fields(listing_id = %listing_id, user = %user))]
    pub async fn record_watch(
        &self,
        listing_id: ListingId,
        user: &UserId,
        watching: bool,
    ) -> Result<(), StoreError> {
        let event = WatchEvent {
            listing_id,
            user: user.clone(),
            watching,
            at: Utc::now(),
        };
        Self::append_line(&self.watchlist_path, serde_json::to_string(&event)?).await
    }

    /// Replay the watch event log into the current membership set.
    pub async fn load_watchlist(&self) -> Result<HashSet<WatchlistEntry>, StoreError> {
        if !self.watchlist_path.exists() {
            return Ok(HashSet::new());
        }

        let content = fs::read_to_string(&self.watchlist_path).await?;
        let mut watchers = HashSet::new();

        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let event: WatchEvent = match serde_json::from_str(line) {
                Ok(event) => event,
                Err(e) => {
                    warn!(error = %e, "Skipping malformed watchlist event");
                    continue;
                }
            };
            let entry = WatchlistEntry {
                listing_id: event.listing_id,
                user: event.user,
            };
            if event.watching {
                watchers.insert(entry);
            } else {
                watchers.remove(&entry);
            }
        }

        Ok(watchers)
    }
}
