//! Error types for sr-discord

use thiserror::Error;

/// sr-discord error type
#[derive(Error, Debug)]
pub enum DiscordError {
    #[error("Discord webhook URL not set")]
    WebhookNotSet,

    #[error("Invalid Discord webhook URL: {0}")]
    InvalidWebhookUrl(String),

    #[error("Discord API error: {0}")]
    Api(String),

    #[error("Serenity error: {0}")]
    SerenityError(#[from] serenity::Error),
}

impl From<DiscordError> for sr_core::Error {
    fn from(err: DiscordError) -> Self {
        match err {
            DiscordError::WebhookNotSet | DiscordError::InvalidWebhookUrl(_) => {
                sr_core::Error::Config(err.to_string())
            }
            other => sr_core::Error::Delivery(other.to_string()),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, DiscordError>;
