//! sr-discord: Discord webhook publisher for story-relay
//!
//! Posts relayed stories to a channel webhook using Serenity 0.12.

pub mod error;
pub mod webhook;

pub use error::{DiscordError, Result};
pub use webhook::WebhookPublisher;
