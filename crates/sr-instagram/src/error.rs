//! Error types for sr-instagram

use sr_core::AuthError;
use thiserror::Error;

/// sr-instagram error type
#[derive(Error, Debug)]
pub enum InstagramError {
    #[error("Instagram username not set")]
    UsernameNotSet,

    /// `challenge_required` without any challenge to follow
    #[error("No checkpoint data available")]
    NoCheckpoint,

    #[error("Checkpoint required: {0}")]
    Checkpoint(String),

    #[error("Two-factor authentication required")]
    TwoFactorRequired,

    #[error("Bad password: {0}")]
    BadPassword(String),

    #[error("Invalid user: {0}")]
    InvalidUser(String),

    #[error("Login rejected: {0}")]
    LoginRejected(String),

    #[error("Login required")]
    LoginRequired,

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Instagram API error: {0}")]
    Api(String),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<InstagramError> for sr_core::Error {
    fn from(err: InstagramError) -> Self {
        match err {
            InstagramError::NoCheckpoint => AuthError::NoCheckpoint.into(),
            InstagramError::Checkpoint(url) => AuthError::Checkpoint(url).into(),
            InstagramError::TwoFactorRequired => AuthError::TwoFactorRequired.into(),
            InstagramError::BadPassword(user) | InstagramError::InvalidUser(user) => {
                AuthError::BadCredentials(user).into()
            }
            InstagramError::UsernameNotSet => {
                AuthError::BadCredentials("username not set".to_string()).into()
            }
            InstagramError::LoginRejected(msg) => AuthError::Rejected(msg).into(),
            InstagramError::LoginRequired => AuthError::LoginRequired.into(),
            InstagramError::UserNotFound(name) => sr_core::Error::AccountNotFound(name),
            InstagramError::Api(msg) => sr_core::Error::Fetch(msg),
            InstagramError::Request(e) => sr_core::Error::Http(e),
            InstagramError::Json(e) => sr_core::Error::Json(e),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, InstagramError>;
