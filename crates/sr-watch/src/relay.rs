//! Delivery relay: one story in, one webhook post out

use std::sync::Arc;
use tracing::{debug, info};

use sr_core::{
    LinkShortener, MediaAttachment, MediaFetcher, MediaKind, Result, StoryItem, StoryPublisher,
    attachment_name, story_caption,
};

/// What happened to a story handed to the relay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Posted to the webhook; the caller should record the id
    Delivered,
    /// Kind cannot be relayed; nothing was sent
    Unsupported(MediaKind),
}

/// Shortens, downloads and posts story media
#[derive(Clone)]
pub struct DeliveryRelay {
    shortener: Arc<dyn LinkShortener>,
    fetcher: Arc<dyn MediaFetcher>,
    publisher: Arc<dyn StoryPublisher>,
}

impl DeliveryRelay {
    pub fn new(
        shortener: Arc<dyn LinkShortener>,
        fetcher: Arc<dyn MediaFetcher>,
        publisher: Arc<dyn StoryPublisher>,
    ) -> Self {
        Self {
            shortener,
            fetcher,
            publisher,
        }
    }

    /// Relay a single story.
    ///
    /// Any failing step aborts this story only; the error is returned and
    /// the story stays unsent.
    pub async fn deliver(&self, item: &StoryItem) -> Result<DeliveryOutcome> {
        let Some(media_url) = item.media_url() else {
            debug!(story = %item.id, kind = %item.kind, "Skipping story without relayable media");
            return Ok(DeliveryOutcome::Unsupported(item.kind));
        };

        let short_link = self.shortener.shorten(media_url).await?;
        let bytes = self.fetcher.fetch(media_url).await?;

        let attachment = MediaAttachment {
            name: attachment_name(media_url),
            bytes,
        };
        let content = story_caption(&item.account, &short_link);

        self.publisher.publish(attachment, &content).await?;

        info!(story = %item.id, account = %item.account, "Story sent to Discord successfully.");
        Ok(DeliveryOutcome::Delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingShortener, FakeFetcher, FakeShortener, RecordingPublisher};

    fn relay(
        fetcher: FakeFetcher,
        publisher: Arc<RecordingPublisher>,
    ) -> DeliveryRelay {
        DeliveryRelay::new(Arc::new(FakeShortener), Arc::new(fetcher), publisher)
    }

    #[tokio::test]
    async fn test_deliver_image() {
        let publisher = Arc::new(RecordingPublisher::default());
        let relay = relay(FakeFetcher::default(), publisher.clone());

        let item = StoryItem::image("1", "p1", "https://cdn.example.com/v/photo_n.jpg?stp=1");
        let outcome = relay.deliver(&item).await.unwrap();
        assert_eq!(outcome, DeliveryOutcome::Delivered);

        let posts = publisher.posts();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].attachment.name, "photo_n.jpg");
        assert_eq!(
            posts[0].attachment.bytes,
            b"https://cdn.example.com/v/photo_n.jpg?stp=1".to_vec()
        );
        assert_eq!(
            posts[0].content,
            "New story from p1 on Instagram\nhttps://tiny.example/photo_n.jpg"
        );
    }

    #[tokio::test]
    async fn test_deliver_video_uses_video_candidate() {
        let publisher = Arc::new(RecordingPublisher::default());
        let relay = relay(FakeFetcher::default(), publisher.clone());

        let mut item = StoryItem::video("2", "p1", "https://cdn.example.com/clip.mp4");
        item.image_candidates.push("https://cdn.example.com/cover.jpg".to_string());

        relay.deliver(&item).await.unwrap();
        assert_eq!(publisher.posts()[0].attachment.name, "clip.mp4");
    }

    #[tokio::test]
    async fn test_unsupported_kind_sends_nothing() {
        let publisher = Arc::new(RecordingPublisher::default());
        let relay = relay(FakeFetcher::default(), publisher.clone());

        let mut item = StoryItem::image("3", "p1", "https://cdn.example.com/a.jpg");
        item.kind = MediaKind::Unsupported(8);

        let outcome = relay.deliver(&item).await.unwrap();
        assert_eq!(outcome, DeliveryOutcome::Unsupported(MediaKind::Unsupported(8)));
        assert!(publisher.posts().is_empty());
    }

    #[tokio::test]
    async fn test_shortener_failure_publishes_nothing() {
        let publisher = Arc::new(RecordingPublisher::default());
        let relay = DeliveryRelay::new(
            Arc::new(FailingShortener),
            Arc::new(FakeFetcher::default()),
            publisher.clone(),
        );

        let item = StoryItem::image("5", "p1", "https://cdn.example.com/a.jpg");
        assert!(relay.deliver(&item).await.is_err());
        assert!(publisher.posts().is_empty());
    }

    #[tokio::test]
    async fn test_download_failure() {
        let publisher = Arc::new(RecordingPublisher::default());
        let fetcher = FakeFetcher::failing(&["https://cdn.example.com/gone.jpg"]);
        let relay = relay(fetcher, publisher.clone());

        let item = StoryItem::image("4", "p1", "https://cdn.example.com/gone.jpg");
        assert!(relay.deliver(&item).await.is_err());
        assert!(publisher.posts().is_empty());
    }

    #[tokio::test]
    async fn test_publish_failure() {
        let publisher = Arc::new(RecordingPublisher::failing());
        let relay = relay(FakeFetcher::default(), publisher.clone());

        let item = StoryItem::image("5", "p1", "https://cdn.example.com/a.jpg");
        assert!(relay.deliver(&item).await.is_err());
    }
}
