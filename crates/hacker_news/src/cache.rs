//! Time-bounded cache in front of the story assembler.
//!
//! Readers share one snapshot until it expires. The first reader to see an expired
//! snapshot rebuilds it while holding the refresh lock; everyone else who arrives in the
//! meantime waits on that lock and then reads the result instead of fetching again.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use common::{StoryError, StoryResult};
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{info, warn};

use crate::assembler::StoryProvider;
use crate::models::DisplayStory;

/// Immutable view of the stories handed to readers.
pub type Snapshot = Arc<[DisplayStory]>;

#[derive(Debug, Clone)]
struct CacheEntry {
    stories: Snapshot,
    expires_at: Instant,
}

pub struct StoryCache<P> {
    provider: P,
    num_stories: usize,
    ttl: Duration,
    entry: RwLock<Option<CacheEntry>>,
    refresh_lock: Mutex<()>,
    /// Number of finished rebuild attempts, successful or not.
    attempts: AtomicU64,
}

impl<P: StoryProvider> StoryCache<P> {
    pub fn new(provider: P, num_stories: usize, ttl: Duration) -> Self {
        Self {
            provider,
            num_stories,
            ttl,
            entry: RwLock::new(None),
            refresh_lock: Mutex::new(()),
            attempts: AtomicU64::new(0),
        }
    }

    /// Current stories, rebuilding them first if the snapshot has expired.
    ///
    /// If the rebuild fails the previous snapshot is served even though it is expired;
    /// the error only surfaces when there has never been a snapshot.
    pub async fn stories(&self) -> StoryResult<Snapshot> {
        if let Some(stories) = self.fresh().await {
            return Ok(stories);
        }

        let seen = self.attempts.load(Ordering::Acquire);
        let _guard = self.refresh_lock.lock().await;

        if let Some(stories) = self.fresh().await {
            return Ok(stories);
        }
        if self.attempts.load(Ordering::Acquire) != seen {
            // Someone else tried while we waited and it did not produce a fresh snapshot.
            return self.latest().await.ok_or_else(|| {
                StoryError::Unavailable("refresh failed and no previous snapshot exists".to_string())
            });
        }

        self.rebuild().await
    }

    /// Rebuilds the snapshot regardless of its age. Used by the background warmer.
    pub async fn refresh(&self) -> StoryResult<Snapshot> {
        let _guard = self.refresh_lock.lock().await;
        self.rebuild().await
    }

    /// Caller must hold `refresh_lock`.
    async fn rebuild(&self) -> StoryResult<Snapshot> {
        let started = Instant::now();
        let result = self.provider.top_stories(self.num_stories).await;
        self.attempts.fetch_add(1, Ordering::AcqRel);

        match result {
            Ok(stories) => {
                let stories: Snapshot = stories.into();
                *self.entry.write().await = Some(CacheEntry {
                    stories: stories.clone(),
                    expires_at: Instant::now() + self.ttl,
                });
                info!("Refreshed {} top stories in {:?}", stories.len(), started.elapsed());
                Ok(stories)
            }
            Err(e) => match self.latest().await {
                Some(stale) => {
                    warn!("Refresh failed, serving previous snapshot: {}", e);
                    Ok(stale)
                }
                None => Err(e),
            },
        }
    }

    async fn fresh(&self) -> Option<Snapshot> {
        let entry = self.entry.read().await;
        entry
            .as_ref()
            .filter(|entry| Instant::now() < entry.expires_at)
            .map(|entry| entry.stories.clone())
    }

    async fn latest(&self) -> Option<Snapshot> {
        self.entry.read().await.as_ref().map(|entry| entry.stories.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HNItem, ItemKind};
    use async_trait::async_trait;
    use std::sync::atomic::AtomicBool;

    /// Counts calls; optionally slow, optionally failing.
    struct CountingProvider {
        calls: AtomicU64,
        delay: Duration,
        failing: AtomicBool,
    }

    impl CountingProvider {
        fn new(delay: Duration) -> Self {
            Self {
                calls: AtomicU64::new(0),
                delay,
                failing: AtomicBool::new(false),
            }
        }

        fn calls(&self) -> u64 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl StoryProvider for CountingProvider {
        async fn top_stories(&self, wanted: usize) -> StoryResult<Vec<DisplayStory>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            tokio::time::sleep(self.delay).await;
            if self.failing.load(Ordering::SeqCst) {
                return Err(StoryError::Unavailable("upstream down".to_string()));
            }
            Ok((0..wanted as u64)
                .map(|i| DisplayStory {
                    item: HNItem {
                        id: call * 100 + i,
                        by: "someone".to_string(),
                        descendants: 0,
                        kids: Vec::new(),
                        score: 1,
                        time: 0,
                        title: format!("generation {call}"),
                        kind: ItemKind::Story,
                        text: None,
                        url: Some("https://example.com".to_string()),
                    },
                    host: "example.com".to_string(),
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn reads_within_window_share_one_snapshot() {
        let cache = StoryCache::new(CountingProvider::new(Duration::ZERO), 3, Duration::from_secs(60));

        let first = cache.stories().await.unwrap();
        let second = cache.stories().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 3);
        assert_eq!(cache.provider.calls(), 1);
    }

    #[tokio::test]
    async fn concurrent_cold_readers_trigger_one_rebuild() {
        let cache = Arc::new(StoryCache::new(
            CountingProvider::new(Duration::from_millis(50)),
            2,
            Duration::from_secs(60),
        ));

        let readers = (0..16).map(|_| {
            let cache = cache.clone();
            tokio::spawn(async move { cache.stories().await })
        });
        let snapshots: Vec<Snapshot> = futures::future::join_all(readers)
            .await
            .into_iter()
            .map(|joined| joined.unwrap().unwrap())
            .collect();

        assert_eq!(cache.provider.calls(), 1);
        assert!(snapshots.iter().all(|s| Arc::ptr_eq(s, &snapshots[0])));
    }

    #[tokio::test]
    async fn expired_snapshot_is_rebuilt_once() {
        let cache = Arc::new(StoryCache::new(
            CountingProvider::new(Duration::from_millis(20)),
            1,
            Duration::from_millis(50),
        ));
        let before = cache.stories().await.unwrap();

        tokio::time::sleep(Duration::from_millis(80)).await;

        let readers = (0..8).map(|_| {
            let cache = cache.clone();
            tokio::spawn(async move { cache.stories().await })
        });
        for joined in futures::future::join_all(readers).await {
            let after = joined.unwrap().unwrap();
            assert!(!Arc::ptr_eq(&before, &after));
            assert_eq!(after[0].item.title, "generation 2");
        }
        assert_eq!(cache.provider.calls(), 2);
    }

    #[tokio::test]
    async fn failed_rebuild_serves_previous_snapshot() {
        let cache = StoryCache::new(
            CountingProvider::new(Duration::ZERO),
            1,
            Duration::from_millis(10),
        );
        let before = cache.stories().await.unwrap();

        cache.provider.failing.store(true, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(30)).await;

        let after = cache.stories().await.unwrap();
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(cache.provider.calls(), 2);
    }

    #[tokio::test]
    async fn failed_first_fill_reaches_only_the_refreshing_caller() {
        let provider = CountingProvider::new(Duration::from_millis(50));
        provider.failing.store(true, Ordering::SeqCst);
        let cache = Arc::new(StoryCache::new(provider, 1, Duration::from_secs(60)));

        let readers = (0..4).map(|_| {
            let cache = cache.clone();
            tokio::spawn(async move { cache.stories().await })
        });
        let results: Vec<StoryResult<Snapshot>> = futures::future::join_all(readers)
            .await
            .into_iter()
            .map(|joined| joined.unwrap())
            .collect();

        // Every reader returned; none of the waiters started a second attempt.
        assert_eq!(cache.provider.calls(), 1);
        assert!(results.iter().all(|r| r.is_err()));
        assert_eq!(
            results
                .iter()
                .filter(|r| matches!(r, Err(StoryError::Unavailable(msg)) if msg == "upstream down"))
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn forced_refresh_replaces_fresh_snapshot() {
        let cache = StoryCache::new(CountingProvider::new(Duration::ZERO), 1, Duration::from_secs(60));
        let before = cache.stories().await.unwrap();

        let refreshed = cache.refresh().await.unwrap();
        let after = cache.stories().await.unwrap();

        assert!(!Arc::ptr_eq(&before, &refreshed));
        assert!(Arc::ptr_eq(&refreshed, &after));
        assert_eq!(cache.provider.calls(), 2);
    }
}
