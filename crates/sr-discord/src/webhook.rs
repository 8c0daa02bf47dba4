//! Discord webhook publisher using Serenity

use async_trait::async_trait;
use serenity::all::{CreateAttachment, ExecuteWebhook, Webhook};
use serenity::http::Http;
use std::sync::Arc;
use tracing::{debug, info};

use sr_core::{MediaAttachment, StoryPublisher};

use crate::error::{DiscordError, Result};

/// Posts one attachment plus a message to a channel webhook
pub struct WebhookPublisher {
    http: Arc<Http>,
    webhook: Webhook,
}

/// Check that `url` looks like `https://discord.com/api/webhooks/<id>/<token>`
pub fn validate_webhook_url(url: &str) -> Result<()> {
    let parsed = url::Url::parse(url).map_err(|e| DiscordError::InvalidWebhookUrl(e.to_string()))?;

    let host_ok = matches!(
        parsed.host_str(),
        Some("discord.com" | "discordapp.com" | "canary.discord.com" | "ptb.discord.com")
    );
    if !host_ok {
        return Err(DiscordError::InvalidWebhookUrl(format!(
            "unexpected host in {}",
            parsed.host_str().unwrap_or_default()
        )));
    }

    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    match segments.as_slice() {
        ["api", "webhooks", id, token] | ["api", _, "webhooks", id, token]
            if id.parse::<u64>().is_ok() && !token.is_empty() =>
        {
            Ok(())
        }
        _ => Err(DiscordError::InvalidWebhookUrl(
            "expected /api/webhooks/<id>/<token>".to_string(),
        )),
    }
}

impl WebhookPublisher {
    /// Resolve the webhook behind `url`
    pub async fn connect(url: &str) -> Result<Self> {
        if url.is_empty() {
            return Err(DiscordError::WebhookNotSet);
        }
        validate_webhook_url(url)?;

        // Webhook calls authenticate with the token in the URL
        let http = Arc::new(Http::new(""));
        let webhook = Webhook::from_url(&*http, url).await?;

        info!(
            "Connected to Discord webhook {}",
            webhook.name.as_deref().unwrap_or("(unnamed)")
        );

        Ok(Self { http, webhook })
    }

    async fn send(&self, attachment: MediaAttachment, content: &str) -> Result<()> {
        debug!(
            "Posting {} ({} bytes) to Discord",
            attachment.name,
            attachment.bytes.len()
        );

        let builder = ExecuteWebhook::new()
            .content(content)
            .add_file(CreateAttachment::bytes(attachment.bytes, attachment.name));

        self.webhook.execute(&*self.http, true, builder).await?;
        Ok(())
    }
}

#[async_trait]
impl StoryPublisher for WebhookPublisher {
    async fn publish(&self, attachment: MediaAttachment, content: &str) -> sr_core::Result<()> {
        Ok(self.send(attachment, content).await?)
    }
}
