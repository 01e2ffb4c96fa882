//! HttpSource - HTTP GET で CSV を取得する
//!
//! Sent with `Cache-Control: no-store` so an edited list is picked up on retry.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{CACHE_CONTROL, PRAGMA};

use crate::domain::LoadError;
use crate::ports::CsvSource;

#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    url: String,
}

impl HttpSource {
    /// Build a source with a 30s request timeout.
    pub fn new(url: impl Into<String>) -> Result<Self, LoadError> {
        let url = url.into();
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| LoadError::Transport {
                location: url.clone(),
                reason: e.to_string(),
            })?;
        Ok(Self::with_client(client, url))
    }

    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    fn transport(&self, e: reqwest::Error) -> LoadError {
        LoadError::Transport {
            location: self.url.clone(),
            reason: e.to_string(),
        }
    }
}

#[async_trait]
impl CsvSource for HttpSource {
    fn location(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        let response = self
            .client
            .get(&self.url)
            .header(CACHE_CONTROL, "no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(|e| self.transport(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Fetch {
                location: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| self.transport(e))?;
        Ok(bytes.to_vec())
    }
}
