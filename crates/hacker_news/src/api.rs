use crate::models::HNItem;
use async_trait::async_trait;
use common::{ItemId, ItemSource, StoryError, StoryResult};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

#[derive(Clone)]
pub struct HackerNewsAPI {
    client: Client,
    base_url: String,
}

impl HackerNewsAPI {
    pub fn new(base_url: &str) -> StoryResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("top-stories/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> StoryResult<T> {
        debug!("GET {}", url);
        let resp = self.client.get(url).send().await?.error_for_status()?;
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl ItemSource for HackerNewsAPI {
    type Item = HNItem;

    async fn top_story_ids(&self) -> StoryResult<Vec<ItemId>> {
        let url = format!("{}/topstories.json", self.base_url);
        self.get_json(&url).await
    }

    async fn item(&self, id: ItemId) -> StoryResult<HNItem> {
        let url = format!("{}/item/{}.json", self.base_url, id);
        // Deleted or unknown ids come back as a literal `null`.
        let item: Option<HNItem> = self.get_json(&url).await?;
        item.ok_or(StoryError::MissingItem(id))
    }

    fn name(&self) -> &'static str {
        "Hacker News"
    }
}
