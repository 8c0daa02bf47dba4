//! Instagram private API client implementation

use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Deserializer};
use tracing::{debug, error, info};

use sr_core::{AccountId, MediaKind, StoryItem};

use crate::device::Device;
use crate::error::{InstagramError, Result};

/// Instagram private API base URL
const INSTAGRAM_API_URL: &str = "https://i.instagram.com";

/// Application id of the Android app
const IG_APP_ID: &str = "567067343352427";

const LOCALE: &str = "en_US";

/// Response header carrying the bearer token of a fresh session
const AUTHORIZATION_HEADER: &str = "ig-set-authorization";

/// Authenticated Instagram session
#[derive(Debug, Clone)]
pub struct InstagramSession {
    /// `pk` of the logged-in account
    pub user_id: String,
    pub username: String,
    /// Bearer token handed out at login, when the platform sends one
    pub authorization: Option<String>,
}

/// Instagram private API client
#[derive(Clone)]
pub struct InstagramApi {
    client: Client,
    base_url: String,
    username: String,
    password: String,
    device: Device,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    logged_in_user: LoggedInUser,
}

#[derive(Debug, Deserialize)]
struct LoggedInUser {
    #[serde(deserialize_with = "de_id")]
    pk: String,
    username: String,
}

/// Error body returned by failing endpoints
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub two_factor_required: Option<bool>,
    #[serde(default)]
    pub challenge: Option<Challenge>,
}

#[derive(Debug, Deserialize)]
pub struct Challenge {
    #[serde(default)]
    pub api_path: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserSearchResponse {
    #[serde(default)]
    pub users: Vec<SearchUser>,
}

#[derive(Debug, Deserialize)]
pub struct SearchUser {
    #[serde(deserialize_with = "de_id")]
    pub pk: String,
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct UserStoryResponse {
    #[serde(default)]
    pub reel: Option<Reel>,
}

#[derive(Debug, Deserialize)]
pub struct Reel {
    #[serde(default)]
    pub items: Vec<ReelItem>,
}

#[derive(Debug, Deserialize)]
pub struct ReelItem {
    pub id: String,
    pub media_type: i64,
    pub user: ReelUser,
    #[serde(default)]
    pub image_versions2: Option<ImageVersions>,
    #[serde(default)]
    pub video_versions: Vec<MediaCandidate>,
}

#[derive(Debug, Deserialize)]
pub struct ReelUser {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct ImageVersions {
    #[serde(default)]
    pub candidates: Vec<MediaCandidate>,
}

#[derive(Debug, Deserialize)]
pub struct MediaCandidate {
    pub url: String,
}

impl From<ReelItem> for StoryItem {
    fn from(item: ReelItem) -> Self {
        StoryItem {
            id: item.id,
            account: item.user.username,
            kind: MediaKind::from_code(item.media_type),
            image_candidates: item
                .image_versions2
                .map(|v| v.candidates.into_iter().map(|c| c.url).collect())
                .unwrap_or_default(),
            video_candidates: item.video_versions.into_iter().map(|c| c.url).collect(),
        }
    }
}

/// Accept ids sent either as JSON numbers or strings
fn de_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Num(u64),
        Str(String),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Num(n) => n.to_string(),
        Id::Str(s) => s,
    })
}

/// Map a failed response to the matching error
pub fn classify_error(status: StatusCode, body: &str) -> InstagramError {
    let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed.message.as_deref().unwrap_or_default();
    let error_type = parsed.error_type.as_deref().unwrap_or_default();

    if parsed.two_factor_required.unwrap_or(false) {
        return InstagramError::TwoFactorRequired;
    }

    if message == "challenge_required" || message == "checkpoint_required" {
        return match parsed.challenge.and_then(|c| c.api_path.or(c.url)) {
            Some(path) => InstagramError::Checkpoint(path),
            None => InstagramError::NoCheckpoint,
        };
    }

    match error_type {
        "bad_password" => return InstagramError::BadPassword(message.to_string()),
        "invalid_user" => return InstagramError::InvalidUser(message.to_string()),
        _ => {}
    }

    if message == "login_required" || status == StatusCode::UNAUTHORIZED {
        return InstagramError::LoginRequired;
    }

    InstagramError::Api(format!("Status: {}, Body: {}", status, body))
}

impl InstagramApi {
    /// Create a new client for `username`, deriving its device identity
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        let username = username.into();
        let device = Device::from_seed(&username);

        let mut headers = HeaderMap::new();
        headers.insert("X-IG-App-ID", HeaderValue::from_static(IG_APP_ID));
        headers.insert("X-IG-App-Locale", HeaderValue::from_static(LOCALE));
        headers.insert("X-IG-Device-Locale", HeaderValue::from_static(LOCALE));
        headers.insert("X-IG-Capabilities", HeaderValue::from_static("3brTvw=="));
        headers.insert("X-IG-Connection-Type", HeaderValue::from_static("WIFI"));

        let client = Client::builder()
            .user_agent(device.user_agent(LOCALE))
            .default_headers(headers)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            base_url: INSTAGRAM_API_URL.to_string(),
            username,
            password: password.into(),
            device,
        })
    }

    /// Point the client at another host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Log in with the configured credentials
    pub async fn login(&self) -> Result<InstagramSession> {
        if self.username.is_empty() {
            return Err(InstagramError::UsernameNotSet);
        }

        info!("Logging in to Instagram as {}", self.username);

        let url = format!("{}/api/v1/accounts/login/", self.base_url);
        let payload = serde_json::json!({
            "username": self.username,
            "enc_password": format!("#PWD_INSTAGRAM:0:{}:{}", Utc::now().timestamp(), self.password),
            "guid": self.device.uuid,
            "phone_id": self.device.phone_id,
            "device_id": self.device.device_id,
            "adid": self.device.adid,
            "google_tokens": "[]",
            "login_attempt_count": "0",
        });
        let signed_body = format!("SIGNATURE.{}", payload);

        let response = self
            .client
            .post(&url)
            .form(&[("signed_body", signed_body.as_str())])
            .send()
            .await?;

        let status = response.status();
        let authorization = response
            .headers()
            .get(AUTHORIZATION_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(String::from);
        let body = response.text().await?;

        debug!("Instagram login response: {}", status);

        if !status.is_success() {
            error!("Instagram login failed: {}", status);
            return Err(match classify_error(status, &body) {
                InstagramError::Api(msg) => InstagramError::LoginRejected(msg),
                other => other,
            });
        }

        let login: LoginResponse = serde_json::from_str(&body)?;
        info!("Logged in to Instagram as {} ({})", login.logged_in_user.username, login.logged_in_user.pk);

        Ok(InstagramSession {
            user_id: login.logged_in_user.pk,
            username: login.logged_in_user.username,
            authorization,
        })
    }

    /// Look up the account whose username matches `name` exactly
    pub async fn search_exact(&self, session: &InstagramSession, name: &str) -> Result<AccountId> {
        let url = format!("{}/api/v1/users/search/", self.base_url);
        let body = self.get(session, &url, &[("q", name)]).await?;

        let search: UserSearchResponse = serde_json::from_str(&body)?;
        find_exact(search, name)
    }

    /// Fetch the current story reel of an account
    pub async fn user_story(
        &self,
        session: &InstagramSession,
        account: &AccountId,
    ) -> Result<Vec<StoryItem>> {
        let url = format!("{}/api/v1/feed/user/{}/story/", self.base_url, account);
        let body = self.get(session, &url, &[]).await?;

        parse_user_story(&body)
    }

    async fn get(
        &self,
        session: &InstagramSession,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<String> {
        let mut request = self.client.get(url).query(query);
        if let Some(token) = &session.authorization {
            request = request.header(reqwest::header::AUTHORIZATION, token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        debug!("Instagram API response: {} {}", status, url);

        if !status.is_success() {
            error!("Instagram API error: {} - {}", status, body);
            return Err(classify_error(status, &body));
        }

        Ok(body)
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn device(&self) -> &Device {
        &self.device
    }
}

fn find_exact(search: UserSearchResponse, name: &str) -> Result<AccountId> {
    search
        .users
        .into_iter()
        .find(|user| user.username.eq_ignore_ascii_case(name))
        .map(|user| AccountId::new(user.pk))
        .ok_or_else(|| InstagramError::UserNotFound(name.to_string()))
}

/// Parse a `feed/user/{pk}/story/` body; a missing reel means no stories
pub fn parse_user_story(body: &str) -> Result<Vec<StoryItem>> {
    let feed: UserStoryResponse = serde_json::from_str(body)?;
    Ok(feed
        .reel
        .map(|reel| reel.items.into_iter().map(StoryItem::from).collect())
        .unwrap_or_default())
}
