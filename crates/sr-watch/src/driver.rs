//! ポーリングループ
//!
//! アカウントを順番に処理し、一定時間待機する処理を繰り返します。

use std::time::Duration;
use tracing::{debug, error, info, warn};

use sr_core::{Result, SentStoryStore, StorySource};

use crate::poller::poll_account;
use crate::relay::{DeliveryOutcome, DeliveryRelay};
use crate::session::SessionManager;

/// Mutable state threaded through the loop
pub struct WatchContext<S> {
    /// Current platform session, replaced wholesale on re-login
    pub session: S,
    pub store: SentStoryStore,
}

/// Loop settings
#[derive(Debug, Clone)]
pub struct DriverSettings {
    /// Account names, polled in this order
    pub accounts: Vec<String>,
    /// Pause between cycles
    pub poll_interval: Duration,
}

/// Counters for one poll cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub accounts_polled: usize,
    pub accounts_failed: usize,
    pub delivered: usize,
    pub unsupported: usize,
    pub failed: usize,
}

/// Poll loop over a story source
pub struct Driver<P: StorySource> {
    source: P,
    relay: DeliveryRelay,
    sessions: SessionManager,
    settings: DriverSettings,
}

impl<P: StorySource> Driver<P> {
    pub fn new(
        source: P,
        relay: DeliveryRelay,
        sessions: SessionManager,
        settings: DriverSettings,
    ) -> Self {
        Self {
            source,
            relay,
            sessions,
            settings,
        }
    }

    /// Log in and build the context the loop runs on
    pub async fn start(&self, mut store: SentStoryStore) -> Result<WatchContext<P::Session>> {
        let session = self.sessions.login(&self.source, &mut store).await?;
        Ok(WatchContext { session, store })
    }

    /// Poll forever, sleeping between cycles.
    ///
    /// Account failures never end the loop; only dropping the future does.
    pub async fn run(&self, ctx: &mut WatchContext<P::Session>) {
        info!(
            accounts = self.settings.accounts.len(),
            interval_secs = self.settings.poll_interval.as_secs(),
            "Story watch started"
        );

        loop {
            let report = self.run_cycle(ctx).await;
            info!(
                polled = report.accounts_polled,
                failed_accounts = report.accounts_failed,
                delivered = report.delivered,
                unsupported = report.unsupported,
                failed_deliveries = report.failed,
                "Poll cycle finished"
            );

            debug!("Sleeping {:?} until the next cycle", self.settings.poll_interval);
            tokio::time::sleep(self.settings.poll_interval).await;
        }
    }

    /// Poll every configured account once
    pub async fn run_cycle(&self, ctx: &mut WatchContext<P::Session>) -> CycleReport {
        let mut report = CycleReport::default();

        let accounts = &self.settings.accounts;
        for (i, name) in accounts.iter().enumerate() {
            match self.process_account(ctx, name, &mut report).await {
                Ok(()) => report.accounts_polled += 1,
                Err(e) if e.is_session_expired() => {
                    report.accounts_failed += 1;
                    warn!(account = %name, "Session expired, logging in again");
                    if let Err(e) = self.relogin(ctx).await {
                        // The session is still stale; try again next cycle
                        let skipped = accounts.len() - i - 1;
                        report.accounts_failed += skipped;
                        error!(skipped, "Re-login failed: {}", e);
                        break;
                    }
                }
                Err(e) => {
                    report.accounts_failed += 1;
                    error!(account = %name, "An error occurred while accessing Instagram: {}", e);
                }
            }
        }

        report
    }

    /// Replace the session in `ctx` with a fresh login
    pub async fn relogin(&self, ctx: &mut WatchContext<P::Session>) -> Result<()> {
        ctx.session = self.sessions.login(&self.source, &mut ctx.store).await?;
        Ok(())
    }

    async fn process_account(
        &self,
        ctx: &mut WatchContext<P::Session>,
        name: &str,
        report: &mut CycleReport,
    ) -> Result<()> {
        let items = poll_account(&self.source, &ctx.session, name).await?;
        let new_items = ctx.store.filter_new(items);

        for item in new_items {
            match self.relay.deliver(&item).await {
                Ok(DeliveryOutcome::Delivered) => {
                    ctx.store.record(item.id);
                    report.delivered += 1;
                }
                Ok(DeliveryOutcome::Unsupported(_)) => report.unsupported += 1,
                Err(e) => {
                    report.failed += 1;
                    error!(story = %item.id, "An error occurred while sending story to Discord: {}", e);
                }
            }
        }

        if let Err(e) = ctx.store.flush() {
            error!("Failed to save sent stories: {}", e);
        }

        Ok(())
    }

    pub fn source(&self) -> &P {
        &self.source
    }

    pub fn settings(&self) -> &DriverSettings {
        &self.settings
    }
}
