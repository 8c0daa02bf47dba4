//! sr-core: story-relay core library
//!
//! Configuration, the error taxonomy, the story model, the sent-story store
//! and the capability traits the watch loop is written against.

pub mod capability;
pub mod config;
pub mod error;
pub mod media;
pub mod shortener;
pub mod store;
pub mod story;

pub use capability::{LinkShortener, MediaAttachment, MediaFetcher, StoryPublisher, StorySource};
pub use config::{Config, DiscordConfig, InstagramConfig, PollConfig, ShortenerConfig, StoreConfig};
pub use error::{AuthError, Error, Result};
pub use media::HttpMediaFetcher;
pub use shortener::{PassthroughShortener, TinyUrlShortener};
pub use store::SentStoryStore;
pub use story::{AccountId, MediaKind, StoryItem, attachment_name, story_caption};
