//! Capability traits for the external collaborators of the relay
//!
//! The watch loop only talks to these traits. Concrete adapters live in
//! `sr-instagram`, `sr-discord` and the `shortener` / `media` modules.

use async_trait::async_trait;

use crate::Result;
use crate::story::{AccountId, StoryItem};

/// Upstream platform that owns accounts and their stories
#[async_trait]
pub trait StorySource: Send + Sync {
    /// Authenticated handle returned by [`StorySource::login`]
    type Session: Send + Sync;

    /// Establish the device identity and log in
    async fn login(&self) -> Result<Self::Session>;

    /// Resolve a display name to the platform account id
    ///
    /// Fails with [`crate::Error::AccountNotFound`] when no account has
    /// exactly this name.
    async fn resolve_account(&self, session: &Self::Session, name: &str) -> Result<AccountId>;

    /// Fetch the full current story set for an account
    async fn fetch_stories(
        &self,
        session: &Self::Session,
        account: &AccountId,
    ) -> Result<Vec<StoryItem>>;
}

/// URL in, short URL out
#[async_trait]
pub trait LinkShortener: Send + Sync {
    async fn shorten(&self, url: &str) -> Result<String>;
}

/// Download arbitrary binary content by URL
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Binary attachment posted to the chat webhook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaAttachment {
    /// File name shown in the chat
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Chat webhook that accepts one attachment plus a text message
#[async_trait]
pub trait StoryPublisher: Send + Sync {
    async fn publish(&self, attachment: MediaAttachment, content: &str) -> Result<()>;
}
