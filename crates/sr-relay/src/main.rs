//! story-relay: main binary
//!
//! Polls Instagram stories of the configured accounts and relays new ones
//! to a Discord webhook.
//!
//! Usage:
//!   story-relay            - Start the poll loop
//!   story-relay --help     - Show help
//!   story-relay --version  - Show version

use sr_core::{
    Config, HttpMediaFetcher, LinkShortener, PassthroughShortener, SentStoryStore,
    TinyUrlShortener,
};
use sr_discord::WebhookPublisher;
use sr_instagram::InstagramApi;
use sr_watch::{DeliveryRelay, Driver, DriverSettings, SessionManager};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Run mode
enum RunMode {
    /// Poll loop
    Watch,
    /// Show help
    Help,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    match parse_args() {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("story-relay {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        RunMode::Watch => {}
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    tracing::info!("Starting story-relay...");
    tracing::info!("Watching accounts: {:?}", config.poll.accounts);

    run_watch(config).await
}

/// Parse command line arguments
fn parse_args() -> RunMode {
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => return RunMode::Help,
            "--version" | "-v" => return RunMode::Version,
            _ => {}
        }
    }

    RunMode::Watch
}

/// Print help message
fn print_help() {
    println!("story-relay - Instagram story to Discord relay");
    println!();
    println!("Usage:");
    println!("  story-relay            Start polling");
    println!("  story-relay --help     Show this help message");
    println!("  story-relay --version  Show version");
    println!();
    println!("Configuration is read from story-relay.toml when present,");
    println!("then overridden by environment variables:");
    println!("  DISCORD_WEBHOOK_URL      Discord webhook URL (required; DISCORD also accepted)");
    println!("  IG_USERNAME              Instagram username");
    println!("  IG_PASSWORD              Instagram password");
    println!("  STORY_ACCOUNTS           Comma-separated accounts to watch (default: p1,p2,p3)");
    println!("  POLL_INTERVAL_SECS       Seconds between poll cycles (default: 600)");
    println!("  LOGIN_RETRY_DELAY_SECS   Seconds before the login retry (default: 5)");
    println!("  RESET_STORE_ON_RELOGIN   Clear sent stories after a retried login (default: true)");
    println!("  SENT_STORIES_PATH        Sent story file (default: sentStories.json)");
    println!("  SHORTENER_ENABLED        Shorten links with TinyURL (default: true)");
}

/// Wire the collaborators together and poll until Ctrl+C
async fn run_watch(config: Config) -> anyhow::Result<()> {
    let http = reqwest::Client::new();

    let shortener: Arc<dyn LinkShortener> = if config.shortener.enabled {
        Arc::new(TinyUrlShortener::with_client(http.clone()))
    } else {
        tracing::info!("Link shortening disabled");
        Arc::new(PassthroughShortener)
    };

    let publisher = WebhookPublisher::connect(config.webhook_url()?)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to Discord webhook: {}", e))?;

    let relay = DeliveryRelay::new(
        shortener,
        Arc::new(HttpMediaFetcher::new(http)),
        Arc::new(publisher),
    );

    let instagram = InstagramApi::new(
        config.instagram.username.clone(),
        config.instagram.password.clone(),
    )?;

    let driver = Driver::new(
        instagram,
        relay,
        SessionManager::new(config.retry_delay(), config.poll.reset_store_on_relogin),
        DriverSettings {
            accounts: config.poll.accounts.clone(),
            poll_interval: config.poll_interval(),
        },
    );

    let store = SentStoryStore::load(&config.store.path);
    let mut ctx = driver
        .start(store)
        .await
        .map_err(|e| anyhow::anyhow!("Instagram login failed: {}", e))?;

    tracing::info!("story-relay initialized successfully");
    tracing::info!("Press Ctrl+C to exit");

    tokio::select! {
        _ = driver.run(&mut ctx) => {}
        result = tokio::signal::ctrl_c() => {
            result?;
            tracing::info!("Shutting down...");
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
