///! Artist cache - time-windowed snapshot of the joined artist collection
///!
///! Readers share one `Arc<Vec<MergedArtist>>`; a refresh builds a whole new
///! collection and swaps it in under the write lock, so a reader sees either
///! the old or the new snapshot, never a mix. Refreshes are serialized by a
///! separate mutex: concurrent callers arriving after expiry wait for the
///! in-flight refresh instead of starting their own.
use chrono::{DateTime, Utc};
use groupie_common::MergedArtist;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::api_client::ArtistSource;
use super::error::FetchError;
use super::joiner::fetch_and_join;

pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 300;

/// How long a snapshot stays fresh and what to do when a refresh fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub ttl: Duration,
    /// Return the stale snapshot (and only log the error) when a refresh
    /// fails. Off by default: a failed refresh is reported to the caller
    /// even when older data exists.
    pub serve_stale_on_error: bool,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECONDS),
            serve_stale_on_error: false,
        }
    }
}

struct Snapshot {
    artists: Arc<Vec<MergedArtist>>,
    refreshed_at: Instant,
    fetched_at: DateTime<Utc>,
}

/// Summary of the current snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotInfo {
    pub artist_count: usize,
    pub fetched_at: DateTime<Utc>,
    pub age: Duration,
    pub is_fresh: bool,
}

/// Cache in front of the record joiner. Built once at startup and shared.
pub struct ArtistCache {
    source: Arc<dyn ArtistSource>,
    policy: CachePolicy,
    snapshot: RwLock<Option<Snapshot>>,
    refresh_lock: Mutex<()>,
}

impl ArtistCache {
    pub fn new(source: Arc<dyn ArtistSource>, policy: CachePolicy) -> Self {
        Self {
            source,
            policy,
            snapshot: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Return the joined collection, refreshing it first when the cache is
    /// empty or older than the TTL.
    ///
    /// Two calls inside the TTL return the same `Arc`. A failed refresh
    /// returns the error and leaves any previous snapshot in place for the
    /// next attempt, unless `serve_stale_on_error` is set.
    pub async fn get_data(&self) -> Result<Arc<Vec<MergedArtist>>, FetchError> {
        if let Some(artists) = self.fresh_snapshot().await {
            return Ok(artists);
        }

        let _refresh = self.refresh_lock.lock().await;

        // Another caller may have refreshed while we waited for the lock
        if let Some(artists) = self.fresh_snapshot().await {
            debug!("Artist cache refreshed by a concurrent caller");
            return Ok(artists);
        }

        info!("Refreshing artist cache");

        match fetch_and_join(self.source.as_ref()).await {
            Ok(merged) => {
                let artists = Arc::new(merged);
                *self.snapshot.write().await = Some(Snapshot {
                    artists: artists.clone(),
                    refreshed_at: Instant::now(),
                    fetched_at: Utc::now(),
                });
                info!("Artist cache refreshed: {} artists", artists.len());
                Ok(artists)
            }
            Err(e) => {
                if self.policy.serve_stale_on_error {
                    if let Some(stale) = self.snapshot.read().await.as_ref() {
                        warn!(
                            "Artist cache refresh failed, serving snapshot from {}: {}",
                            stale.fetched_at, e
                        );
                        return Ok(stale.artists.clone());
                    }
                }
                error!("Artist cache refresh failed: {}", e);
                Err(e)
            }
        }
    }

    /// Drop the snapshot; the next `get_data` refetches
    pub async fn invalidate(&self) {
        *self.snapshot.write().await = None;
        info!("Artist cache invalidated");
    }

    pub async fn snapshot_info(&self) -> Option<SnapshotInfo> {
        let snapshot = self.snapshot.read().await;
        snapshot.as_ref().map(|s| {
            let age = s.refreshed_at.elapsed();
            SnapshotInfo {
                artist_count: s.artists.len(),
                fetched_at: s.fetched_at,
                age,
                is_fresh: age <= self.policy.ttl,
            }
        })
    }

    async fn fresh_snapshot(&self) -> Option<Arc<Vec<MergedArtist>>> {
        let snapshot = self.snapshot.read().await;
        snapshot
            .as_ref()
            .filter(|s| s.refreshed_at.elapsed() <= self.policy.ttl)
            .map(|s| s.artists.clone())
    }
}
