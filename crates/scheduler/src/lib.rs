use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use hacker_news::{StoryCache, StoryProvider};
use time::OffsetDateTime;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{debug, info, warn};

/// Keeps a [`StoryCache`] warm by rebuilding it on a fixed interval, so readers rarely
/// pay for the network round trip themselves.
pub struct RefreshScheduler {
    scheduler: JobScheduler,
}

impl RefreshScheduler {
    pub async fn new() -> Result<Self> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self { scheduler })
    }

    pub async fn add_cache_warmer<P>(&mut self, cache: Arc<StoryCache<P>>, every: Duration) -> Result<()>
    where
        P: StoryProvider + 'static,
    {
        info!("Warming top stories cache every {:?}", every);

        let job = Job::new_repeated_async(every, move |_uuid, _l| {
            let cache = cache.clone();
            Box::pin(async move {
                debug!("Cache warmer tick at {}", OffsetDateTime::now_utc());
                match cache.refresh().await {
                    Ok(stories) => debug!("Cache warmer refreshed {} stories", stories.len()),
                    Err(e) => warn!("Cache warmer failed: {}", e),
                }
            })
        })?;

        self.scheduler.add(job).await?;
        Ok(())
    }

    pub async fn start(&self) -> Result<()> {
        info!("Starting scheduler...");
        self.scheduler.start().await?;
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<()> {
        info!("Shutting down scheduler...");
        self.scheduler.shutdown().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use common::StoryResult;
    use hacker_news::DisplayStory;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Ticks(Arc<AtomicUsize>);

    #[async_trait]
    impl StoryProvider for Ticks {
        async fn top_stories(&self, _wanted: usize) -> StoryResult<Vec<DisplayStory>> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn warmer_rebuilds_repeatedly() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let cache = Arc::new(StoryCache::new(Ticks(ticks.clone()), 0, Duration::from_secs(60)));

        let mut scheduler = RefreshScheduler::new().await.unwrap();
        scheduler
            .add_cache_warmer(cache, Duration::from_secs(1))
            .await
            .unwrap();
        scheduler.start().await.unwrap();

        tokio::time::sleep(Duration::from_millis(3_500)).await;
        scheduler.shutdown().await.unwrap();

        assert!(ticks.load(Ordering::SeqCst) >= 2);
    }
}
