//! セッション管理
//!
//! ログインと、チェックポイントなしで失敗した場合の一度だけの再試行を扱います。

use std::time::Duration;
use tracing::{error, info, warn};

use sr_core::{Result, SentStoryStore, StorySource};

/// Login policy for the upstream platform
#[derive(Debug, Clone)]
pub struct SessionManager {
    /// Pause before the single retry
    retry_delay: Duration,
    /// Wipe the sent-story record after a retried login
    reset_store_on_relogin: bool,
}

impl SessionManager {
    pub fn new(retry_delay: Duration, reset_store_on_relogin: bool) -> Self {
        Self {
            retry_delay,
            reset_store_on_relogin,
        }
    }

    /// Log in, retrying once after a "no checkpoint" failure.
    ///
    /// A successful retry clears `store` (file included) when the reset
    /// policy is on. Any other failure, or a failed retry, is returned.
    pub async fn login<P: StorySource>(
        &self,
        source: &P,
        store: &mut SentStoryStore,
    ) -> Result<P::Session> {
        let err = match source.login().await {
            Ok(session) => {
                info!("Logged in to the story source");
                return Ok(session);
            }
            Err(e) => e,
        };

        if !err.is_no_checkpoint() {
            error!("An error occurred while logging in: {}", err);
            return Err(err);
        }

        warn!(
            delay_secs = self.retry_delay.as_secs(),
            "No checkpoint data available. Retrying login..."
        );
        tokio::time::sleep(self.retry_delay).await;

        match source.login().await {
            Ok(session) => {
                info!("Login successful after retry.");
                if self.reset_store_on_relogin {
                    if let Err(e) = store.reset() {
                        error!("Failed to reset sent stories: {}", e);
                    }
                }
                Ok(session)
            }
            Err(e) => {
                error!("An error occurred during login retry: {}", e);
                Err(e)
            }
        }
    }
}
