//! Concurrent retrieval of a batch of items.
//!
//! Every identifier gets its own task. Each task reports exactly one outcome tagged with
//! its position in the batch, so the collected results can be put back into input order
//! no matter which task finishes first.

use std::sync::Arc;
use std::time::Duration;

use common::{ItemId, ItemSource, StoryError, StoryResult};
use tokio::task::JoinSet;
use tracing::warn;

/// Outcome for one identifier of a batch.
#[derive(Debug)]
pub struct Fetched<T> {
    pub index: usize,
    pub id: ItemId,
    pub outcome: StoryResult<T>,
}

pub struct FanOut<S> {
    source: Arc<S>,
    timeout: Duration,
}

impl<S> FanOut<S>
where
    S: ItemSource + 'static,
{
    pub fn new(source: Arc<S>, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetches every id concurrently and returns one entry per id, in input order.
    pub async fn fetch_all(&self, ids: &[ItemId]) -> Vec<Fetched<S::Item>> {
        let mut tasks = JoinSet::new();

        for (index, &id) in ids.iter().enumerate() {
            let source = Arc::clone(&self.source);
            let timeout = self.timeout;
            tasks.spawn(async move {
                let outcome = match tokio::time::timeout(timeout, source.item(id)).await {
                    Ok(result) => result,
                    Err(_) => Err(StoryError::Timeout { id, after: timeout }),
                };
                (index, outcome)
            });
        }

        let mut slots: Vec<Option<StoryResult<S::Item>>> = ids.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => slots[index] = Some(outcome),
                Err(e) => warn!("{} fetch task did not complete: {}", self.source.name(), e),
            }
        }

        // A task that panicked never filled its slot.
        slots
            .into_iter()
            .zip(ids)
            .enumerate()
            .map(|(index, (slot, &id))| Fetched {
                index,
                id,
                outcome: slot.unwrap_or_else(|| {
                    Err(StoryError::Unavailable(format!(
                        "fetch task for item {} aborted",
                        id
                    )))
                }),
            })
            .collect()
    }
}
