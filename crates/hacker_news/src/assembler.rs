use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::{ItemId, ItemSource, OverFetch, StoryError, StoryResult};
use tracing::{debug, warn};

use crate::fetch::FanOut;
use crate::filter;
use crate::models::{DisplayStory, HNItem};

/// Anything that can produce the current top `wanted` stories.
#[async_trait]
pub trait StoryProvider: Send + Sync {
    async fn top_stories(&self, wanted: usize) -> StoryResult<Vec<DisplayStory>>;
}

/// Walks the ranked id list in over-sized batches until enough link stories survive the
/// filter.
pub struct Assembler<S> {
    fan_out: FanOut<S>,
    over_fetch: OverFetch,
}

impl<S> Assembler<S>
where
    S: ItemSource<Item = HNItem> + 'static,
{
    pub fn new(source: Arc<S>, fetch_timeout: Duration, over_fetch: OverFetch) -> Self {
        Self {
            fan_out: FanOut::new(source, fetch_timeout),
            over_fetch,
        }
    }

    /// Exactly `wanted` stories from `ids`, in ranking order.
    pub async fn assemble(&self, ids: &[ItemId], wanted: usize) -> StoryResult<Vec<DisplayStory>> {
        let mut stories = Vec::with_capacity(wanted);
        let mut cursor = 0;

        while stories.len() < wanted {
            let remaining = ids.len() - cursor;
            if remaining == 0 {
                return Err(StoryError::InsufficientResults {
                    wanted,
                    found: stories.len(),
                });
            }

            let batch = self.over_fetch.batch_size(wanted - stories.len()).min(remaining);
            let batch_ids = &ids[cursor..cursor + batch];
            debug!(
                "Fetching {} ids at {} ({} of {} stories so far)",
                batch,
                cursor,
                stories.len(),
                wanted
            );

            for fetched in self.fan_out.fetch_all(batch_ids).await {
                match fetched.outcome {
                    Ok(item) => stories.extend(filter::normalize(item)),
                    Err(e) => warn!("Dropping item {}: {}", fetched.id, e),
                }
            }
            cursor += batch;
        }

        stories.truncate(wanted);
        Ok(stories)
    }
}

#[async_trait]
impl<S> StoryProvider for Assembler<S>
where
    S: ItemSource<Item = HNItem> + 'static,
{
    async fn top_stories(&self, wanted: usize) -> StoryResult<Vec<DisplayStory>> {
        let ids = self.fan_out.source().top_story_ids().await?;
        debug!("Fetched {} top story ids", ids.len());
        self.assemble(&ids, wanted).await
    }
}
