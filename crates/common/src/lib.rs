pub mod config;
pub mod error;
pub mod source;

pub use config::{Config, OverFetch};
pub use error::{StoryError, StoryResult};
pub use source::{ItemId, ItemSource};
