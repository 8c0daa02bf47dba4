//! HTTP download of story media

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::capability::MediaFetcher;
use crate::{Error, Result};

/// Fetches media bytes with a plain GET
#[derive(Debug, Clone, Default)]
pub struct HttpMediaFetcher {
    client: Client,
}

impl HttpMediaFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MediaFetcher for HttpMediaFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(Error::Delivery(format!(
                "media download returned status {}",
                status
            )));
        }

        let bytes = response.bytes().await?;
        debug!("Downloaded {} bytes of media", bytes.len());
        Ok(bytes.to_vec())
    }
}
