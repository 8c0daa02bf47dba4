//! Configuration management
//!
//! 設定は以下の優先順位で読み込まれます:
//! 1. 環境変数
//! 2. story-relay.toml 設定ファイル
//! 3. デフォルト値
//!
//! 設定ファイル内では `${VAR_NAME}` 形式で環境変数を展開できます。

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::Error;

/// Default configuration file name
pub const CONFIG_FILE: &str = "story-relay.toml";

/// Instagram login credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstagramConfig {
    pub username: String,

    #[serde(skip_serializing)]
    pub password: String,
}

/// Discord webhook configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// Webhook endpoint that receives relayed stories
    #[serde(skip_serializing)]
    pub webhook_url: Option<String>,
}

/// Poll loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Account names to watch
    #[serde(default = "default_accounts")]
    pub accounts: Vec<String>,

    /// Pause between poll cycles, in seconds
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Pause before the single login retry, in seconds
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,

    /// Wipe the sent-story record after a retried login
    #[serde(default = "default_true")]
    pub reset_store_on_relogin: bool,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            accounts: default_accounts(),
            interval_secs: default_interval_secs(),
            retry_delay_secs: default_retry_delay_secs(),
            reset_store_on_relogin: true,
        }
    }
}

/// Sent-story store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the JSON file of sent story ids
    #[serde(default = "default_store_path")]
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// Link shortener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortenerConfig {
    /// When disabled, captions carry the full media URL
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for ShortenerConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Main configuration for story-relay
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub instagram: InstagramConfig,

    #[serde(default)]
    pub discord: DiscordConfig,

    #[serde(default)]
    pub poll: PollConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub shortener: ShortenerConfig,
}

fn default_accounts() -> Vec<String> {
    vec!["p1".to_string(), "p2".to_string(), "p3".to_string()]
}

fn default_interval_secs() -> u64 {
    600
}

fn default_retry_delay_secs() -> u64 {
    5
}

fn default_store_path() -> String {
    "sentStories.json".to_string()
}

fn default_true() -> bool {
    true
}

fn parse_bool(value: &str) -> bool {
    value.to_lowercase() != "false"
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    /// 設定ファイルから環境変数を展開する
    ///
    /// `${VAR_NAME}` 形式の文字列を環境変数の値に置換します。
    /// 環境変数が存在しない場合は空文字列になります。
    fn expand_env_vars(value: &str) -> String {
        let mut result = String::new();
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next(); // '{' を消費

                let mut var_name = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    var_name.push(c);
                }

                if let Ok(env_value) = std::env::var(&var_name) {
                    result.push_str(&env_value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// TOML 文字列から設定を読み込む（環境変数による上書きなし）
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        let expanded = Self::expand_env_vars(content);

        let toml: TomlConfig = toml::from_str(&expanded)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;

        Ok(Self::from_toml_config(toml))
    }

    /// TOML 設定ファイルから設定を読み込む
    ///
    /// 設定ファイル内の `${VAR_NAME}` は環境変数の値に置換され、
    /// その後に環境変数による上書きが適用されます。
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let mut cfg = Self::from_toml_str(&content)?;
        cfg.apply_env_overrides();
        cfg.validate()?;
        Ok(cfg)
    }

    /// デフォルトパスから設定を読み込む
    ///
    /// `./story-relay.toml` があればそれを使い、なければ環境変数のみを使います。
    pub fn load() -> crate::Result<Self> {
        if Path::new(CONFIG_FILE).exists() {
            return Self::from_toml_file(CONFIG_FILE);
        }

        Self::from_env()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut cfg = Self::default();
        cfg.apply_env_overrides();
        cfg.validate()?;
        Ok(cfg)
    }

    /// TOML 構造から Config を構築
    fn from_toml_config(toml: TomlConfig) -> Self {
        let instagram = toml.instagram.unwrap_or_default();
        let discord = toml.discord.unwrap_or_default();
        let poll = toml.poll.unwrap_or_default();
        let store = toml.store.unwrap_or_default();
        let shortener = toml.shortener.unwrap_or_default();

        Config {
            instagram: InstagramConfig {
                username: instagram.username.unwrap_or_default(),
                password: instagram.password.unwrap_or_default(),
            },
            discord: DiscordConfig {
                webhook_url: discord.webhook_url.filter(|url| !url.is_empty()),
            },
            poll: PollConfig {
                accounts: poll.accounts.unwrap_or_else(default_accounts),
                interval_secs: poll.interval_secs.unwrap_or_else(default_interval_secs),
                retry_delay_secs: poll
                    .retry_delay_secs
                    .unwrap_or_else(default_retry_delay_secs),
                reset_store_on_relogin: poll.reset_store_on_relogin.unwrap_or(true),
            },
            store: StoreConfig {
                path: store.path.unwrap_or_else(default_store_path),
            },
            shortener: ShortenerConfig {
                enabled: shortener.enabled.unwrap_or(true),
            },
        }
    }

    /// 環境変数で設定を上書きする
    fn apply_env_overrides(&mut self) {
        if let Ok(username) = std::env::var("IG_USERNAME") {
            self.instagram.username = username;
        }
        if let Ok(password) = std::env::var("IG_PASSWORD") {
            self.instagram.password = password;
        }

        // DISCORD is the historical name of the webhook variable
        if let Ok(url) = std::env::var("DISCORD_WEBHOOK_URL").or_else(|_| std::env::var("DISCORD")) {
            if !url.is_empty() {
                self.discord.webhook_url = Some(url);
            }
        }

        if let Ok(accounts) = std::env::var("STORY_ACCOUNTS") {
            let accounts = split_list(&accounts);
            if !accounts.is_empty() {
                self.poll.accounts = accounts;
            }
        }
        if let Ok(secs) = std::env::var("POLL_INTERVAL_SECS") {
            if let Ok(secs) = secs.parse() {
                self.poll.interval_secs = secs;
            }
        }
        if let Ok(secs) = std::env::var("LOGIN_RETRY_DELAY_SECS") {
            if let Ok(secs) = secs.parse() {
                self.poll.retry_delay_secs = secs;
            }
        }
        if let Ok(reset) = std::env::var("RESET_STORE_ON_RELOGIN") {
            self.poll.reset_store_on_relogin = parse_bool(&reset);
        }

        if let Ok(path) = std::env::var("SENT_STORIES_PATH") {
            self.store.path = path;
        }

        if let Ok(enabled) = std::env::var("SHORTENER_ENABLED") {
            self.shortener.enabled = parse_bool(&enabled);
        }
    }

    /// Reject configurations the relay cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        if self.discord.webhook_url.is_none() {
            return Err(Error::Config(
                "DISCORD_WEBHOOK_URL (or DISCORD) not set".to_string(),
            ));
        }
        if self.poll.accounts.is_empty() {
            return Err(Error::Config("no accounts configured".to_string()));
        }
        Ok(())
    }

    /// Webhook endpoint; only `None` on an unvalidated config
    pub fn webhook_url(&self) -> crate::Result<&str> {
        self.discord
            .webhook_url
            .as_deref()
            .ok_or_else(|| Error::Config("webhook URL not set".to_string()))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll.interval_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.poll.retry_delay_secs)
    }
}

// ============================================================================
// TOML 構造体定義（ファイル解析用）
// ============================================================================

/// TOML ファイル用のトップレベル構造
#[derive(Debug, Deserialize)]
struct TomlConfig {
    instagram: Option<TomlInstagramConfig>,
    discord: Option<TomlDiscordConfig>,
    poll: Option<TomlPollConfig>,
    store: Option<TomlStoreConfig>,
    shortener: Option<TomlShortenerConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlInstagramConfig {
    username: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlDiscordConfig {
    /// Webhook URL
    webhook_url: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlPollConfig {
    /// 監視するアカウント名
    accounts: Option<Vec<String>>,
    interval_secs: Option<u64>,
    retry_delay_secs: Option<u64>,
    reset_store_on_relogin: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlStoreConfig {
    path: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlShortenerConfig {
    enabled: Option<bool>,
}
