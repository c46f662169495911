use url::Url;

use crate::models::{DisplayStory, HNItem, ItemKind};

/// Only link posts make it onto the page; text posts, jobs, comments and polls do not.
pub fn is_story_link(item: &HNItem) -> bool {
    item.kind == ItemKind::Story && !item.link().is_empty()
}

/// Display host of a link: the hostname with a single leading `www.` removed.
/// Links that do not parse give an empty host.
pub fn host_of(link: &str) -> String {
    let Ok(url) = Url::parse(link) else {
        return String::new();
    };
    let host = url.host_str().unwrap_or_default();
    host.strip_prefix("www.").unwrap_or(host).to_string()
}

pub fn normalize(item: HNItem) -> Option<DisplayStory> {
    if !is_story_link(&item) {
        return None;
    }
    let host = host_of(item.link());
    Some(DisplayStory { item, host })
}
