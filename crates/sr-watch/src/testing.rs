//! In-memory fakes of the capability traits

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use sr_core::{
    AccountId, AuthError, Error, LinkShortener, MediaAttachment, MediaFetcher, Result, StoryItem,
    StoryPublisher, StorySource, attachment_name,
};

/// Story source with scripted accounts and login failures.
///
/// Sessions are the login attempt number, starting at 1.
#[derive(Default)]
pub struct FakeSource {
    accounts: HashMap<String, Vec<StoryItem>>,
    broken: HashSet<String>,
    login_failures: Mutex<VecDeque<AuthError>>,
    logins: AtomicU32,
    /// Reject sessions issued before this login number
    valid_from: AtomicU32,
    expire_next_fetch: AtomicBool,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, name: &str, items: Vec<StoryItem>) -> Self {
        self.accounts.insert(name.to_string(), items);
        self
    }

    /// Account whose story fetch always fails
    pub fn with_broken_account(mut self, name: &str) -> Self {
        self.broken.insert(name.to_string());
        self
    }

    /// Failures returned by the next login attempts, in order
    pub fn fail_logins(self, failures: Vec<AuthError>) -> Self {
        *self.login_failures.lock().unwrap() = failures.into();
        self
    }

    /// Queue failures for later login attempts, after the ones already queued
    pub fn queue_login_failures(&self, failures: Vec<AuthError>) {
        self.login_failures.lock().unwrap().extend(failures);
    }

    /// Make the next fetch report an expired session
    pub fn expire_session(&self) {
        self.expire_next_fetch.store(true, Ordering::SeqCst);
        self.valid_from
            .store(self.logins.load(Ordering::SeqCst) + 1, Ordering::SeqCst);
    }

    pub fn login_count(&self) -> u32 {
        self.logins.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StorySource for FakeSource {
    type Session = u32;

    async fn login(&self) -> Result<u32> {
        let attempt = self.logins.fetch_add(1, Ordering::SeqCst) + 1;
        let failure = self.login_failures.lock().unwrap().pop_front();
        match failure {
            Some(failure) => Err(failure.into()),
            None => Ok(attempt),
        }
    }

    async fn resolve_account(&self, _session: &u32, name: &str) -> Result<AccountId> {
        if self.accounts.contains_key(name) || self.broken.contains(name) {
            Ok(AccountId::new(format!("pk-{}", name)))
        } else {
            Err(Error::AccountNotFound(name.to_string()))
        }
    }

    async fn fetch_stories(&self, session: &u32, account: &AccountId) -> Result<Vec<StoryItem>> {
        if self.expire_next_fetch.load(Ordering::SeqCst)
            && *session < self.valid_from.load(Ordering::SeqCst)
        {
            return Err(AuthError::LoginRequired.into());
        }

        let name = account.as_str().trim_start_matches("pk-");
        if self.broken.contains(name) {
            return Err(Error::Fetch(format!("feed unavailable for {}", name)));
        }
        Ok(self.accounts.get(name).cloned().unwrap_or_default())
    }
}

/// Shortens to `https://tiny.example/<file name>`
pub struct FakeShortener;

#[async_trait]
impl LinkShortener for FakeShortener {
    async fn shorten(&self, url: &str) -> Result<String> {
        Ok(format!("https://tiny.example/{}", attachment_name(url)))
    }
}

/// Shortener whose service is always down
pub struct FailingShortener;

#[async_trait]
impl LinkShortener for FailingShortener {
    async fn shorten(&self, url: &str) -> Result<String> {
        Err(Error::Delivery(format!("shortener rejected {}", url)))
    }
}

/// Returns the URL itself as the media bytes
#[derive(Default)]
pub struct FakeFetcher {
    failing: HashSet<String>,
}

impl FakeFetcher {
    pub fn failing(urls: &[&str]) -> Self {
        Self {
            failing: urls.iter().map(|u| u.to_string()).collect(),
        }
    }
}

#[async_trait]
impl MediaFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        if self.failing.contains(url) {
            return Err(Error::Delivery(format!("download failed: {}", url)));
        }
        Ok(url.as_bytes().to_vec())
    }
}

/// One webhook post captured by [`RecordingPublisher`]
#[derive(Debug, Clone)]
pub struct Post {
    pub attachment: MediaAttachment,
    pub content: String,
}

/// Publisher that remembers every post
#[derive(Default)]
pub struct RecordingPublisher {
    posts: Mutex<Vec<Post>>,
    fail: bool,
}

impl RecordingPublisher {
    pub fn failing() -> Self {
        Self {
            posts: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn posts(&self) -> Vec<Post> {
        self.posts.lock().unwrap().clone()
    }

    /// Attachment names of every post, in order
    pub fn names(&self) -> Vec<String> {
        self.posts()
            .into_iter()
            .map(|p| p.attachment.name)
            .collect()
    }
}

#[async_trait]
impl StoryPublisher for RecordingPublisher {
    async fn publish(&self, attachment: MediaAttachment, content: &str) -> Result<()> {
        if self.fail {
            return Err(Error::Delivery("webhook returned 500".to_string()));
        }
        self.posts.lock().unwrap().push(Post {
            attachment,
            content: content.to_string(),
        });
        Ok(())
    }
}
