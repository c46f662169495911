pub mod api;
pub mod assembler;
pub mod cache;
pub mod fetch;
pub mod filter;
pub mod models;

use std::sync::Arc;

pub use api::HackerNewsAPI;
pub use assembler::{Assembler, StoryProvider};
pub use cache::{Snapshot, StoryCache};
pub use models::{DisplayStory, HNItem, ItemKind};

use common::{Config, StoryResult};
use tracing::info;

pub type TopStoriesCache = StoryCache<Assembler<HackerNewsAPI>>;

/// Wires the API client, assembler and cache together from `config`.
pub fn build_cache(config: &Config) -> StoryResult<TopStoriesCache> {
    let api = HackerNewsAPI::new(&config.api_base)?;
    info!(
        "Caching {} top stories from {} (ttl {:?}, over-fetch {})",
        config.num_stories,
        api.base_url(),
        config.cache_ttl,
        config.over_fetch
    );
    let assembler = Assembler::new(Arc::new(api), config.fetch_timeout, config.over_fetch);
    Ok(StoryCache::new(assembler, config.num_stories, config.cache_ttl))
}
