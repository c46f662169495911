use async_trait::async_trait;

use crate::error::StoryResult;

/// Identifier of an item in the upstream item tree.
pub type ItemId = u64;

/// Read access to the upstream item tree.
///
/// `Item` is whatever the source decodes a single item into. Implementations must be
/// shareable across tasks because the fan-out spawns one task per identifier.
#[async_trait]
pub trait ItemSource: Send + Sync {
    type Item: Send + 'static;

    /// Current ranking of top-level stories, best first.
    async fn top_story_ids(&self) -> StoryResult<Vec<ItemId>>;

    async fn item(&self, id: ItemId) -> StoryResult<Self::Item>;

    fn name(&self) -> &'static str;
}
