use common::ItemId;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Story,
    Comment,
    Job,
    Poll,
    PollOpt,
    #[default]
    #[serde(other)]
    Other,
}

/// An item exactly as the API returns it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HNItem {
    pub id: ItemId,
    #[serde(default)]
    pub by: String,
    #[serde(default)]
    pub descendants: u64,
    #[serde(default)]
    pub kids: Vec<ItemId>,
    #[serde(default)]
    pub score: i64,
    /// Unix seconds.
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: ItemKind,

    // Only one of these should be present
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl HNItem {
    pub fn link(&self) -> &str {
        self.url.as_deref().unwrap_or_default()
    }
}

/// A story that passed the filter, with the link's host precomputed for display.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayStory {
    pub item: HNItem,
    pub host: String,
}

impl DisplayStory {
    pub fn id(&self) -> ItemId {
        self.item.id
    }

    pub fn to_line(&self) -> String {
        format!(
            "{} ({}) - {} points by {}, {} comments",
            self.item.title, self.host, self.item.score, self.item.by, self.item.descendants
        )
    }
}
