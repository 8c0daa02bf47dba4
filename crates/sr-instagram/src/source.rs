//! `StorySource` implementation backed by the private API

use async_trait::async_trait;
use tracing::info;

use sr_core::{AccountId, StoryItem, StorySource};

use crate::api::{InstagramApi, InstagramSession};

#[async_trait]
impl StorySource for InstagramApi {
    type Session = InstagramSession;

    async fn login(&self) -> sr_core::Result<InstagramSession> {
        info!(device_id = %self.device().device_id, "Using device identity");
        Ok(InstagramApi::login(self).await?)
    }

    async fn resolve_account(
        &self,
        session: &InstagramSession,
        name: &str,
    ) -> sr_core::Result<AccountId> {
        Ok(self.search_exact(session, name).await?)
    }

    async fn fetch_stories(
        &self,
        session: &InstagramSession,
        account: &AccountId,
    ) -> sr_core::Result<Vec<StoryItem>> {
        Ok(self.user_story(session, account).await?)
    }
}
