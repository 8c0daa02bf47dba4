//! Error types for sr-core

use thiserror::Error;

/// Authentication failures reported by a story source
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The platform demanded a checkpoint but handed out no challenge to solve
    #[error("no checkpoint data available")]
    NoCheckpoint,

    #[error("checkpoint required: {0}")]
    Checkpoint(String),

    #[error("two-factor authentication required")]
    TwoFactorRequired,

    #[error("bad credentials: {0}")]
    BadCredentials(String),

    /// The session was valid once but the platform no longer accepts it
    #[error("login required")]
    LoginRequired,

    #[error("login rejected: {0}")]
    Rejected(String),
}

/// Main error type for sr-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Story fetch error: {0}")]
    Fetch(String),

    #[error("Delivery error: {0}")]
    Delivery(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error means the platform session has to be replaced
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Error::Auth(AuthError::LoginRequired))
    }

    /// Whether this is the "no checkpoint" login failure that earns one retry
    pub fn is_no_checkpoint(&self) -> bool {
        matches!(self, Error::Auth(AuthError::NoCheckpoint))
    }
}

/// Result type alias for sr-core
pub type Result<T> = std::result::Result<T, Error>;
