//! Story poller: account name in, current story list out

use tracing::info;

use sr_core::{Result, StoryItem, StorySource};

/// Resolve `name` and fetch every story it currently has
pub async fn poll_account<P: StorySource>(
    source: &P,
    session: &P::Session,
    name: &str,
) -> Result<Vec<StoryItem>> {
    let account = source.resolve_account(session, name).await?;
    let items = source.fetch_stories(session, &account).await?;

    info!(account = %name, "Downloaded {} stories for user: {}", items.len(), name);
    Ok(items)
}
