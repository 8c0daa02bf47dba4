//! Link shortener adapters

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, error};

use crate::capability::LinkShortener;
use crate::{Error, Result};

/// TinyURL's plain-text creation endpoint
const TINYURL_API_URL: &str = "https://tinyurl.com/api-create.php";

/// Shortener backed by the public TinyURL API
#[derive(Debug, Clone)]
pub struct TinyUrlShortener {
    client: Client,
    base_url: String,
}

impl TinyUrlShortener {
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    /// Share an existing HTTP client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            base_url: TINYURL_API_URL.to_string(),
        }
    }

    /// Point the shortener at a compatible endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for TinyUrlShortener {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkShortener for TinyUrlShortener {
    async fn shorten(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("url", url)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let short = short_link_from(status, &body)?;
        debug!("Shortened {} -> {}", url, short);
        Ok(short)
    }
}

/// Read the short link out of a TinyURL response
fn short_link_from(status: StatusCode, body: &str) -> Result<String> {
    if !status.is_success() {
        error!("TinyURL error: {} - {}", status, body);
        return Err(Error::Delivery(format!(
            "shortener returned status {}: {}",
            status, body
        )));
    }

    let short = body.trim();
    if short.is_empty() || short.eq_ignore_ascii_case("error") {
        return Err(Error::Delivery(format!(
            "shortener returned no link: {:?}",
            body
        )));
    }

    Ok(short.to_string())
}

/// Shortener that hands the URL back unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughShortener;

#[async_trait]
impl LinkShortener for PassthroughShortener {
    async fn shorten(&self, url: &str) -> Result<String> {
        Ok(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_passthrough() {
        let link = PassthroughShortener
            .shorten("https://cdn.example.com/a.jpg")
            .await
            .unwrap();
        assert_eq!(link, "https://cdn.example.com/a.jpg");
    }

    #[test]
    fn test_short_link_from_body() {
        let link = short_link_from(StatusCode::OK, "https://tinyurl.com/abc123\n").unwrap();
        assert_eq!(link, "https://tinyurl.com/abc123");
    }

    #[test]
    fn test_short_link_from_error_status() {
        let err = short_link_from(StatusCode::SERVICE_UNAVAILABLE, "down").unwrap_err();
        assert!(matches!(err, Error::Delivery(_)));
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_short_link_from_empty_body() {
        assert!(matches!(
            short_link_from(StatusCode::OK, "  \n"),
            Err(Error::Delivery(_))
        ));
    }

    #[test]
    fn test_short_link_from_error_body() {
        assert!(matches!(
            short_link_from(StatusCode::OK, "Error"),
            Err(Error::Delivery(_))
        ));
    }

    #[test]
    fn test_tinyurl_base_url() {
        let shortener = TinyUrlShortener::new();
        assert_eq!(shortener.base_url, TINYURL_API_URL);

        let shortener = shortener.with_base_url("http://localhost:9000/create");
        assert_eq!(shortener.base_url, "http://localhost:9000/create");
    }
}
