use std::time::Duration;

use thiserror::Error;

use crate::source::ItemId;

#[derive(Debug, Error)]
pub enum StoryError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Item {0} does not exist")]
    MissingItem(ItemId),

    #[error("Timed out fetching item {id} after {after:?}")]
    Timeout { id: ItemId, after: Duration },

    #[error("Only {found} of {wanted} stories available in the ranked list")]
    InsufficientResults { wanted: usize, found: usize },

    #[error("Top stories unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to render page: {0}")]
    Render(String),
}

pub type StoryResult<T> = Result<T, StoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_results_names_both_counts() {
        let err = StoryError::InsufficientResults { wanted: 30, found: 12 };
        assert_eq!(
            err.to_string(),
            "Only 12 of 30 stories available in the ranked list"
        );
    }

    #[test]
    fn timeout_mentions_item() {
        let err = StoryError::Timeout {
            id: 42,
            after: Duration::from_secs(2),
        };
        assert!(err.to_string().contains("item 42"));
    }
}
