//! Story data model shared by every crate in the workspace

use std::fmt;

/// Platform-assigned account identifier (Instagram `pk`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of media attached to a story
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    /// Any platform media code the relay does not know how to forward
    Unsupported(i64),
}

impl MediaKind {
    /// Map Instagram's `media_type` code
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => MediaKind::Image,
            2 => MediaKind::Video,
            other => MediaKind::Unsupported(other),
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Image => f.write_str("image"),
            MediaKind::Video => f.write_str("video"),
            MediaKind::Unsupported(code) => write!(f, "unsupported({})", code),
        }
    }
}

/// One story post as fetched during a poll cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryItem {
    /// Platform story identifier
    pub id: String,
    /// Display name of the owning account
    pub account: String,
    pub kind: MediaKind,
    /// Image URLs, best candidate first
    pub image_candidates: Vec<String>,
    /// Video URLs, best candidate first
    pub video_candidates: Vec<String>,
}

impl StoryItem {
    pub fn image(id: impl Into<String>, account: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            account: account.into(),
            kind: MediaKind::Image,
            image_candidates: vec![url.into()],
            video_candidates: Vec::new(),
        }
    }

    pub fn video(id: impl Into<String>, account: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            account: account.into(),
            kind: MediaKind::Video,
            image_candidates: Vec::new(),
            video_candidates: vec![url.into()],
        }
    }

    /// URL to forward for this story, if its kind is relayable.
    ///
    /// Images use the first image candidate and videos the first video
    /// candidate. Unsupported kinds, and kinds with no candidates, yield
    /// `None`.
    pub fn media_url(&self) -> Option<&str> {
        match self.kind {
            MediaKind::Image => self.image_candidates.first().map(String::as_str),
            MediaKind::Video => self.video_candidates.first().map(String::as_str),
            MediaKind::Unsupported(_) => None,
        }
    }
}

/// Caption posted alongside a relayed story
pub fn story_caption(account: &str, short_link: &str) -> String {
    format!("New story from {} on Instagram\n{}", account, short_link)
}

/// Attachment file name taken from the last path segment of a media URL
pub fn attachment_name(media_url: &str) -> String {
    let name = match url::Url::parse(media_url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back().map(str::to_string))
            .unwrap_or_default(),
        // Not an absolute URL: fall back to plain splitting
        Err(_) => media_url
            .split(['?', '#'])
            .next()
            .and_then(|path| path.rsplit('/').next())
            .unwrap_or_default()
            .to_string(),
    };

    if name.is_empty() {
        "media".to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_kind_from_code() {
        assert_eq!(MediaKind::from_code(1), MediaKind::Image);
        assert_eq!(MediaKind::from_code(2), MediaKind::Video);
        assert_eq!(MediaKind::from_code(8), MediaKind::Unsupported(8));
    }

    #[test]
    fn test_media_url_picks_first_candidate() {
        let mut item = StoryItem::image("1", "p1", "https://cdn.example.com/a.jpg");
        item.image_candidates.push("https://cdn.example.com/small.jpg".to_string());
        assert_eq!(item.media_url(), Some("https://cdn.example.com/a.jpg"));

        let item = StoryItem::video("2", "p1", "https://cdn.example.com/b.mp4");
        assert_eq!(item.media_url(), Some("https://cdn.example.com/b.mp4"));
    }

    #[test]
    fn test_media_url_unsupported_or_empty() {
        let mut item = StoryItem::image("1", "p1", "https://cdn.example.com/a.jpg");
        item.kind = MediaKind::Unsupported(8);
        assert_eq!(item.media_url(), None);

        // Video kind with only image candidates has nothing to send
        let mut item = StoryItem::image("1", "p1", "https://cdn.example.com/a.jpg");
        item.kind = MediaKind::Video;
        assert_eq!(item.media_url(), None);
    }

    #[test]
    fn test_story_caption() {
        assert_eq!(
            story_caption("p1", "https://tinyurl.com/abc"),
            "New story from p1 on Instagram\nhttps://tinyurl.com/abc"
        );
    }

    #[test]
    fn test_attachment_name() {
        assert_eq!(
            attachment_name("https://cdn.example.com/v/t51/12345_n.jpg?stp=dst&_nc_ht=x"),
            "12345_n.jpg"
        );
        assert_eq!(attachment_name("https://cdn.example.com/"), "media");
        assert_eq!(attachment_name("relative/path/clip.mp4?x=1"), "clip.mp4");
    }
}
